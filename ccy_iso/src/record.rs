use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Tag of the repeated element holding one country/currency pair
pub const ENTRY_TAG: &str = "CcyNtry";

/// Currency name used by entries of territories without a currency of their own
pub const NO_UNIVERSAL_CURRENCY: &str = "No universal currency";

/// Minor units value of currencies that are not subdivided
pub const MINOR_UNITS_NOT_APPLICABLE: &str = "N.A.";

/// The fields of an entry of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CountryName,
    CurrencyName,
    AlphabeticCode,
    NumericCode,
    MinorUnits,
}

impl Field {
    /// The element name of the field in the list
    pub const fn tag(self) -> &'static str {
        match self {
            Field::CountryName => "CtryNm",
            Field::CurrencyName => "CcyNm",
            Field::AlphabeticCode => "Ccy",
            Field::NumericCode => "CcyNbr",
            Field::MinorUnits => "CcyMnrUnts",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A raw entry of the list: field names mapped to their text, in document order.
///
/// Values are kept as they appear in the list, they are interpreted only when the
/// record is turned into a currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. If the name is already present the first value wins on lookup.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.get(field.tag())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.push(name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
