use std::any::Any;
use std::fmt;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

static RE_ALPHABETIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("static"));
static RE_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3}$").expect("static"));

/// A currency identified by name and codes
pub trait Currency: fmt::Debug {
    fn name(&self) -> &str;

    fn alphabetic_code(&self) -> &str;

    /// The numeric code, leading zeros included
    fn numeric_code(&self) -> &str;

    /// Number of decimal places of the minor unit, `None` if not subdivided
    fn minor_unit_rate(&self) -> Option<u32>;

    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete type, used in error messages
    fn kind_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether `other` has the same name, codes and minor unit rate
    fn is(&self, other: &dyn Currency) -> bool {
        self.name() == other.name()
            && self.alphabetic_code() == other.alphabetic_code()
            && self.numeric_code() == other.numeric_code()
            && self.minor_unit_rate() == other.minor_unit_rate()
    }
}

/// An ISO 4217 currency, always well formed.
///
/// ```
/// # use ccy_iso::{Currency, IsoCurrency};
/// let euro = IsoCurrency::new("Euro", "EUR", "978", Some(2)).unwrap();
/// assert_eq!(euro.numeric_code(), "978");
/// assert!(IsoCurrency::new("Euro", "eur", "978", Some(2)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IsoCurrencyData")]
pub struct IsoCurrency {
    name: String,
    alphabetic_code: String,
    numeric_code: String,
    minor_unit_rate: Option<u32>,
}

#[derive(Deserialize)]
struct IsoCurrencyData {
    name: String,
    alphabetic_code: String,
    numeric_code: String,
    minor_unit_rate: Option<u32>,
}

impl TryFrom<IsoCurrencyData> for IsoCurrency {
    type Error = Error;

    fn try_from(data: IsoCurrencyData) -> Result<Self, Self::Error> {
        IsoCurrency::new(
            data.name,
            data.alphabetic_code,
            data.numeric_code,
            data.minor_unit_rate,
        )
    }
}

impl IsoCurrency {
    pub fn new(
        name: impl Into<String>,
        alphabetic_code: impl Into<String>,
        numeric_code: impl Into<String>,
        minor_unit_rate: Option<u32>,
    ) -> Result<Self, Error> {
        let currency = Self {
            name: name.into(),
            alphabetic_code: alphabetic_code.into(),
            numeric_code: numeric_code.into(),
            minor_unit_rate,
        };
        check_format(&currency)?;
        Ok(currency)
    }
}

impl Currency for IsoCurrency {
    fn name(&self) -> &str {
        &self.name
    }

    fn alphabetic_code(&self) -> &str {
        &self.alphabetic_code
    }

    fn numeric_code(&self) -> &str {
        &self.numeric_code
    }

    fn minor_unit_rate(&self) -> Option<u32> {
        self.minor_unit_rate
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for IsoCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.alphabetic_code)
    }
}

fn check_format(currency: &dyn Currency) -> Result<(), Error> {
    if !RE_ALPHABETIC.is_match(currency.alphabetic_code()) {
        return Err(Error::InvalidCurrency(
            "Alphabetical code of ISO currency MUST be 3 characters long and made of capitals only!"
                .to_string(),
        ));
    }
    if !RE_NUMERIC.is_match(currency.numeric_code()) {
        return Err(Error::InvalidCurrency(
            "Numerical code of ISO currency MUST be 3 characters long and made of digits only!"
                .to_string(),
        ));
    }
    if currency.name().is_empty() {
        return Err(Error::InvalidCurrency(
            "Name of ISO currency MUST NOT be empty!".to_string(),
        ));
    }
    Ok(())
}

/// Check that `candidate` is an [`IsoCurrency`] satisfying the ISO 4217 format rules
pub fn validate(candidate: &dyn Currency) -> Result<(), Error> {
    if candidate.as_any().downcast_ref::<IsoCurrency>().is_none() {
        return Err(Error::InvalidCurrency(format!(
            "Provided currency is not type of '{}'. '{}' provided.",
            std::any::type_name::<IsoCurrency>(),
            candidate.kind_name(),
        )));
    }
    check_format(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[derive(Debug)]
    struct Token;

    impl Currency for Token {
        fn name(&self) -> &str {
            "Euro"
        }
        fn alphabetic_code(&self) -> &str {
            "EUR"
        }
        fn numeric_code(&self) -> &str {
            "978"
        }
        fn minor_unit_rate(&self) -> Option<u32> {
            Some(2)
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn euro() -> IsoCurrency {
        IsoCurrency::new("Euro", "EUR", "978", Some(2)).unwrap()
    }

    #[test]
    fn test_new() {
        let euro = euro();
        assert_eq!(euro.name(), "Euro");
        assert_eq!(euro.alphabetic_code(), "EUR");
        assert_eq!(euro.numeric_code(), "978");
        assert_eq!(euro.minor_unit_rate(), Some(2));
        assert_eq!(euro.to_string(), "EUR");

        let gold = IsoCurrency::new("Gold", "XAU", "959", None).unwrap();
        assert_eq!(gold.minor_unit_rate(), None);

        let leading_zeros = IsoCurrency::new("Lek", "ALL", "008", Some(2)).unwrap();
        assert_eq!(leading_zeros.numeric_code(), "008");
    }

    #[test]
    fn test_format_rules() {
        for alpha in ["eur", "EU", "EURO", "E1R", "", "ÉUR"] {
            let err = IsoCurrency::new("Euro", alpha, "978", Some(2)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidCurrency);
            assert!(err.to_string().starts_with("Alphabetical code"), "{alpha}");
        }
        for numeric in ["97", "9788", "97a", "", "0"] {
            let err = IsoCurrency::new("Euro", "EUR", numeric, Some(2)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidCurrency);
            assert!(err.to_string().starts_with("Numerical code"), "{numeric}");
        }

        // alphabetic code is checked first
        let err = IsoCurrency::new("Euro", "TEST", "0", Some(2)).unwrap_err();
        assert!(err.to_string().starts_with("Alphabetical code"));

        let err = IsoCurrency::new("", "EUR", "978", Some(2)).unwrap_err();
        assert_eq!(err.to_string(), "Name of ISO currency MUST NOT be empty!");
    }

    #[test]
    fn test_is() {
        let a = euro();
        let b = euro();
        let other = IsoCurrency::new("Euro", "EUB", "970", Some(2)).unwrap();
        let no_minor = IsoCurrency::new("Euro", "EUR", "978", None).unwrap();

        assert!(a.is(&a));
        assert!(a.is(&b) && b.is(&a));
        assert!(!a.is(&other) && !other.is(&a));
        assert!(!a.is(&no_minor));
        assert_eq!(a.is(&b), a == b);
        assert_eq!(a.is(&other), a == other);

        // structural, regardless of the concrete type
        assert!(a.is(&Token));
    }

    #[test]
    fn test_validate() {
        assert!(validate(&euro()).is_ok());

        let err = validate(&Token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCurrency);
        let msg = err.to_string();
        assert!(msg.starts_with("Provided currency is not type of '"), "{msg}");
        assert!(msg.contains("IsoCurrency"), "{msg}");
        assert!(msg.contains("Token"), "{msg}");
    }

    #[test]
    fn test_serde() {
        let euro = euro();
        let json = serde_json::to_string(&euro).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Euro","alphabetic_code":"EUR","numeric_code":"978","minor_unit_rate":2}"#
        );
        let back: IsoCurrency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, euro);

        let invalid =
            r#"{"name":"Euro","alphabetic_code":"eur","numeric_code":"978","minor_unit_rate":2}"#;
        let err = serde_json::from_str::<IsoCurrency>(invalid).unwrap_err();
        assert!(err.to_string().contains("Alphabetical code"));

        let gold = r#"{"name":"Gold","alphabetic_code":"XAU","numeric_code":"959","minor_unit_rate":null}"#;
        let gold: IsoCurrency = serde_json::from_str(gold).unwrap();
        assert_eq!(gold.minor_unit_rate(), None);
    }
}
