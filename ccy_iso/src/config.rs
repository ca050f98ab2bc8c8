use std::path::{Path, PathBuf};

use crate::error::Error;

/// The authoritative ISO 4217 list, as published by the maintenance agency
pub const REMOTE_LIST_URL: &str = "https://www.six-group.com/dam/download/financial-information/data-center/iso-currrency/lists/list-one.xml";

/// The snapshot of the list shipped with this crate
pub const BUNDLED_LIST_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources/ISO_4217.xml");

/// Name of the file the list is cached into, inside the cache directory
pub const CACHE_FILE_NAME: &str = "ISO_4217.xml";

/// One of the two places a list can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// The snapshot on the local file system
    Bundled,

    /// The list downloaded over HTTP
    Remote,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Bundled => "bundled",
            Location::Remote => "remote",
        }
    }
}

/// The only two list locations a source accepts.
///
/// The default is the bundled snapshot and [`REMOTE_LIST_URL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLocations {
    bundled: PathBuf,
    remote: String,
}

impl Default for ListLocations {
    fn default() -> Self {
        Self::new(BUNDLED_LIST_PATH, REMOTE_LIST_URL)
    }
}

impl ListLocations {
    pub fn new(bundled: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            bundled: bundled.into(),
            remote: remote.into(),
        }
    }

    pub fn bundled(&self) -> &Path {
        &self.bundled
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Whether the bundled location is the snapshot compiled into this crate
    pub fn is_embedded(&self) -> bool {
        self.bundled.as_os_str() == BUNDLED_LIST_PATH
    }

    /// The resource string of the given location
    pub fn resource(&self, location: Location) -> String {
        match location {
            Location::Bundled => self.bundled.display().to_string(),
            Location::Remote => self.remote.clone(),
        }
    }

    /// Map a resource string back to its location, rejecting anything else.
    ///
    /// Only the exact strings of the two locations are accepted.
    pub fn locate(&self, resource: &str) -> Result<Location, Error> {
        if resource == self.remote {
            Ok(Location::Remote)
        } else if !resource.is_empty() && resource == self.resource(Location::Bundled) {
            Ok(Location::Bundled)
        } else {
            Err(Error::custom_list())
        }
    }
}
