use std::path::PathBuf;

/// Error type for the whole crate.
///
/// Every variant belongs to the currency domain, callers match on [`Error::kind()`]
/// when they only care about the category.
#[derive(thiserror::Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    /// The list could not be opened or parsed, or a custom list was requested.
    #[error("{0}")]
    SourceUnavailable(String),

    #[error("Directory '{}' does not exist!", .0.display())]
    InvalidCacheDirectory(PathBuf),

    /// A currency does not satisfy the ISO 4217 format rules.
    #[error("{0}")]
    InvalidCurrency(String),

    /// The record is known but deliberately carries no currency (eg. Antarctica).
    #[error("No universal currency!")]
    NoUniversalCurrency,

    #[error("The ISO currency could not be found!")]
    CurrencyNotFound,
}

/// Kind of an [`Error`], without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SourceUnavailable,
    InvalidCacheDirectory,
    InvalidCurrency,
    NoUniversalCurrency,
    CurrencyNotFound,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SourceUnavailable(_) => ErrorKind::SourceUnavailable,
            Error::InvalidCacheDirectory(_) => ErrorKind::InvalidCacheDirectory,
            Error::InvalidCurrency(_) => ErrorKind::InvalidCurrency,
            Error::NoUniversalCurrency => ErrorKind::NoUniversalCurrency,
            Error::CurrencyNotFound => ErrorKind::CurrencyNotFound,
        }
    }

    pub(crate) fn custom_list() -> Self {
        Error::SourceUnavailable("Cannot use custom list of ISO currencies!".to_string())
    }

    pub(crate) fn open_failed(resource: &str, cause: impl std::fmt::Display) -> Self {
        Error::SourceUnavailable(format!(
            "Failed to open currency list '{resource}': {cause}"
        ))
    }

    pub(crate) fn read_failed(resource: &str, cause: impl std::fmt::Display) -> Self {
        Error::SourceUnavailable(format!(
            "Failed to read currency list '{resource}': {cause}"
        ))
    }
}
