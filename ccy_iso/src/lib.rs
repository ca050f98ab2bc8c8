#![cfg_attr(not(test), deny(clippy::unwrap_used))]

//! # ISO 4217 currencies
//!
//! Look up currencies in the ISO 4217 list published by SIX, either the snapshot
//! bundled with this crate, the list downloaded from SIX, or a copy of it cached
//! on disk.
//!
//! For an entry point see [`CurrencyDirectory`]:
//!
//! ```
//! use ccy_iso::{Currency, CurrencyDirectory, ListSource};
//!
//! let mut directory = CurrencyDirectory::new(ListSource::bundled());
//! let euro = directory.find_by_name("Euro").unwrap();
//! assert_eq!(euro.alphabetic_code(), "EUR");
//! assert_eq!(euro.minor_unit_rate(), Some(2));
//! ```

mod cached;
mod config;
mod currency;
mod directory;
mod error;
mod manager;
mod parser;
mod record;
mod source;

pub use crate::cached::CachedListSource;
pub use crate::config::{
    ListLocations, Location, BUNDLED_LIST_PATH, CACHE_FILE_NAME, REMOTE_LIST_URL,
};
pub use crate::currency::{validate, Currency, IsoCurrency};
pub use crate::directory::CurrencyDirectory;
pub use crate::error::{Error, ErrorKind};
pub use crate::manager::ComplianceManager;
pub use crate::parser::XmlRecords;
pub use crate::record::{
    Field, Record, ENTRY_TAG, MINOR_UNITS_NOT_APPLICABLE, NO_UNIVERSAL_CURRENCY,
};
pub use crate::source::{ListSource, RecordSource, Records, TableSource};

pub use reqwest;
