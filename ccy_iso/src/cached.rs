use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;
use reqwest::blocking;

use crate::config::{ListLocations, Location, CACHE_FILE_NAME};
use crate::error::{Error, ErrorKind};
use crate::parser::XmlRecords;
use crate::source::{ListSource, RecordSource, Records};

/// A [`RecordSource`] keeping a copy of the remote list on disk.
///
/// Records are read from the cache file when it exists, otherwise the list is
/// downloaded into it. When the download fails the remote list is streamed directly
/// and, should that fail too, the bundled snapshot is used instead. Once the
/// network is involved the same [`ListSource`] keeps being used for this instance.
///
/// The cache file is not locked, concurrent instances sharing a directory may
/// read a file being written.
#[derive(Debug)]
pub struct CachedListSource {
    cache_dir: PathBuf,
    locations: ListLocations,
    client: OnceCell<blocking::Client>,
    resources: Vec<String>,
    network: Option<ListSource>,
}

impl CachedListSource {
    /// Create a source caching into `cache_dir`, which must already exist.
    ///
    /// No network access happens here.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let mut source = Self {
            cache_dir: PathBuf::new(),
            locations: ListLocations::default(),
            client: OnceCell::new(),
            resources: vec![],
            network: None,
        };
        source.set_cache_dir(cache_dir)?;
        Ok(source)
    }

    pub fn with_locations(mut self, locations: ListLocations) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_client(mut self, client: blocking::Client) -> Self {
        self.client = OnceCell::new();
        let _ = self.client.set(client);
        self
    }

    fn client(&self) -> &blocking::Client {
        self.client.get_or_init(blocking::Client::new)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Change the cache directory, it must exist.
    pub fn set_cache_dir(&mut self, cache_dir: impl Into<PathBuf>) -> Result<(), Error> {
        let cache_dir = cache_dir.into();
        if !cache_dir.is_dir() {
            return Err(Error::InvalidCacheDirectory(cache_dir));
        }
        self.cache_dir = cache_dir;
        self.resources = if self.is_cached() {
            vec![self.cache_resource()]
        } else {
            vec![]
        };
        Ok(())
    }

    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE_NAME)
    }

    pub fn is_cached(&self) -> bool {
        self.cache_file().exists()
    }

    /// The network backed source, if it was needed
    pub fn network(&self) -> Option<&ListSource> {
        self.network.as_ref()
    }

    /// Download the remote list into the cache file, returns whether it succeeded.
    ///
    /// The file is only created once the server answered successfully, a transfer
    /// interrupted afterwards leaves a partial file behind.
    pub fn refresh(&mut self) -> bool {
        match self.download() {
            Ok(bytes) => {
                log::debug!("cached {bytes} bytes into '{}'", self.cache_resource());
                self.resources = vec![self.cache_resource()];
                true
            }
            Err(e) => {
                log::warn!("Failed to refresh the currency list: {e}");
                false
            }
        }
    }

    fn download(&self) -> Result<u64, Error> {
        let url = self.locations.remote();
        let mut response = self
            .client()
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::open_failed(url, e))?;

        let path = self.cache_resource();
        let mut file = File::create(self.cache_file()).map_err(|e| Error::open_failed(&path, e))?;
        response
            .copy_to(&mut file)
            .map_err(|e| Error::read_failed(url, e))
    }

    fn cache_resource(&self) -> String {
        self.cache_file().display().to_string()
    }

    fn stream_cache(&self) -> Records<'static> {
        let resource = self.cache_resource();
        match File::open(self.cache_file()) {
            Ok(file) => Box::new(XmlRecords::new(BufReader::new(file), resource)),
            Err(e) => Box::new(std::iter::once(Err(Error::open_failed(&resource, e)))),
        }
    }
}

impl RecordSource for CachedListSource {
    fn records(&mut self) -> Records<'_> {
        if self.network.is_none() && (self.is_cached() || self.refresh()) {
            return self.stream_cache();
        }

        let locations = &self.locations;
        let client = &self.client;
        let network = self.network.get_or_insert_with(|| {
            ListSource::with_locations(locations.clone(), Location::Remote)
                .with_client(client.get_or_init(blocking::Client::new).clone())
        });
        let stream = network.stream();
        Box::new(FallbackRecords {
            source: network,
            stream,
        })
    }

    fn resources(&self) -> Vec<String> {
        self.resources.clone()
    }

    fn set_resources(&mut self, _resources: &[&str]) -> Result<(), Error> {
        Err(Error::custom_list())
    }

    fn add_resource(&mut self, _resource: &str) -> Result<(), Error> {
        Err(Error::custom_list())
    }
}

/// Streams `source`, switching it to the bundled snapshot on the first failure of
/// the remote list. Records already yielded are not repeated.
struct FallbackRecords<'a> {
    source: &'a mut ListSource,
    stream: Records<'static>,
}

impl Iterator for FallbackRecords<'_> {
    type Item = Result<crate::record::Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.stream.next() {
            Some(Err(e))
                if e.kind() == ErrorKind::SourceUnavailable
                    && self.source.active() == Location::Remote =>
            {
                log::warn!(
                    "{e}, falling back to the {} currency list",
                    Location::Bundled.as_str()
                );
                self.source.set_active(Location::Bundled);
                self.stream = self.source.stream();
                self.stream.next()
            }
            item => item,
        }
    }
}
