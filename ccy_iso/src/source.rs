use std::fs::File;
use std::io::BufReader;

use once_cell::unsync::OnceCell;
use reqwest::blocking;

use crate::config::{ListLocations, Location};
use crate::error::Error;
use crate::parser::XmlRecords;
use crate::record::Record;

/// The bundled list, compiled into the binary
const SNAPSHOT: &[u8] = include_bytes!("../resources/ISO_4217.xml");

/// A single pass over the records of a source.
///
/// A failure is yielded as the last item.
pub type Records<'a> = Box<dyn Iterator<Item = Result<Record, Error>> + 'a>;

/// Something producing raw currency records
pub trait RecordSource {
    /// Stream the records from the start, each call begins a new pass.
    fn records(&mut self) -> Records<'_>;

    /// The resources currently used by the source
    fn resources(&self) -> Vec<String>;

    /// Replace the resources, only accepted values are stored.
    fn set_resources(&mut self, resources: &[&str]) -> Result<(), Error>;

    fn add_resource(&mut self, resource: &str) -> Result<(), Error>;
}

/// Streams the ISO 4217 list from one of the two accepted [`ListLocations`].
///
/// The default bundled location is served from the copy compiled into the binary,
/// so it keeps working when the crate sources are not around.
#[derive(Debug, Clone)]
pub struct ListSource {
    locations: ListLocations,
    active: Location,
    client: OnceCell<blocking::Client>,
}

impl ListSource {
    /// Create a source reading `resource`, which must be one of the default locations.
    pub fn new(resource: &str) -> Result<Self, Error> {
        let locations = ListLocations::default();
        let active = locations.locate(resource)?;
        Ok(Self::with_locations(locations, active))
    }

    /// Source reading the snapshot shipped with this crate
    pub fn bundled() -> Self {
        Self::with_locations(ListLocations::default(), Location::Bundled)
    }

    /// Source reading the list published by the maintenance agency
    pub fn remote() -> Self {
        Self::with_locations(ListLocations::default(), Location::Remote)
    }

    pub fn with_locations(locations: ListLocations, active: Location) -> Self {
        Self {
            locations,
            active,
            client: OnceCell::new(),
        }
    }

    /// Use the given HTTP client for the remote list, eg. to set timeouts or proxies
    pub fn with_client(mut self, client: blocking::Client) -> Self {
        self.client = OnceCell::new();
        let _ = self.client.set(client);
        self
    }

    // Built on first use, reading the bundled list needs no client.
    fn client(&self) -> &blocking::Client {
        self.client.get_or_init(blocking::Client::new)
    }

    pub fn locations(&self) -> &ListLocations {
        &self.locations
    }

    pub fn active(&self) -> Location {
        self.active
    }

    pub fn set_active(&mut self, location: Location) {
        self.active = location;
    }

    /// The resource string of the active location
    pub fn resource(&self) -> String {
        self.locations.resource(self.active)
    }

    /// Open the active location and stream its records.
    ///
    /// The returned iterator does not borrow the source.
    pub fn stream(&self) -> Records<'static> {
        let resource = self.resource();
        log::debug!("opening {} currency list '{resource}'", self.active.as_str());
        let opened = match self.active {
            Location::Bundled => self.open_bundled(&resource),
            Location::Remote => self.open_remote(&resource),
        };
        match opened {
            Ok(records) => records,
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    }

    fn open_bundled(&self, resource: &str) -> Result<Records<'static>, Error> {
        if self.locations.is_embedded() {
            return Ok(Box::new(XmlRecords::new(SNAPSHOT, resource)));
        }
        let file = File::open(self.locations.bundled())
            .map_err(|e| Error::open_failed(resource, e))?;
        Ok(Box::new(XmlRecords::new(BufReader::new(file), resource)))
    }

    fn open_remote(&self, resource: &str) -> Result<Records<'static>, Error> {
        let response = self
            .client()
            .get(resource)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::open_failed(resource, e))?;
        log::debug!(
            "{} status_code:{} body bytes:{:?}",
            resource,
            response.status(),
            response.content_length(),
        );
        Ok(Box::new(XmlRecords::new(BufReader::new(response), resource)))
    }
}

impl RecordSource for ListSource {
    fn records(&mut self) -> Records<'_> {
        self.stream()
    }

    fn resources(&self) -> Vec<String> {
        vec![self.resource()]
    }

    fn set_resources(&mut self, resources: &[&str]) -> Result<(), Error> {
        let located = resources
            .iter()
            .map(|r| self.locations.locate(r))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(last) = located.last() {
            self.active = *last;
        }
        Ok(())
    }

    fn add_resource(&mut self, resource: &str) -> Result<(), Error> {
        self.active = self.locations.locate(resource)?;
        Ok(())
    }
}

/// A fixed in-memory table of records
#[derive(Debug, Clone, Default)]
pub struct TableSource {
    records: Vec<Record>,
}

impl TableSource {
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// The bundled list parsed once, no file system access needed.
    pub fn snapshot() -> Result<Self, Error> {
        let records = XmlRecords::new(SNAPSHOT, "snapshot").collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for TableSource {
    fn records(&mut self) -> Records<'_> {
        Box::new(self.records.iter().cloned().map(Ok))
    }

    fn resources(&self) -> Vec<String> {
        vec![]
    }

    fn set_resources(&mut self, _resources: &[&str]) -> Result<(), Error> {
        Err(Error::custom_list())
    }

    fn add_resource(&mut self, _resource: &str) -> Result<(), Error> {
        Err(Error::custom_list())
    }
}
