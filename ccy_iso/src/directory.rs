use crate::currency::IsoCurrency;
use crate::error::Error;
use crate::record::{Field, Record, MINOR_UNITS_NOT_APPLICABLE, NO_UNIVERSAL_CURRENCY};
use crate::source::RecordSource;

/// Looks up ISO 4217 currencies in the records of a [`RecordSource`].
///
/// Every lookup streams the source from the start, nothing is cached between calls.
pub struct CurrencyDirectory {
    source: Box<dyn RecordSource>,
}

impl CurrencyDirectory {
    pub fn new(source: impl RecordSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn source(&self) -> &dyn RecordSource {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> &mut dyn RecordSource {
        self.source.as_mut()
    }

    pub fn set_source(&mut self, source: impl RecordSource + 'static) {
        self.source = Box::new(source);
    }

    pub fn find_by_name(&mut self, name: &str) -> Result<IsoCurrency, Error> {
        log::debug!("Looking for a currency with name '{name}'");
        self.find_first_by(Field::CurrencyName, name)
    }

    pub fn find_by_alphabetic_code(&mut self, code: &str) -> Result<IsoCurrency, Error> {
        log::debug!("Looking for a currency with alphabetical code '{code}'");
        self.find_first_by(Field::AlphabeticCode, code)
    }

    /// `code` is compared as a string, leading zeros included
    pub fn find_by_numeric_code(&mut self, code: &str) -> Result<IsoCurrency, Error> {
        log::debug!("Looking for a currency with numerical code '{code}'");
        self.find_first_by(Field::NumericCode, code)
    }

    /// All the currencies used in `country`, as spelled in the list (eg. "SLOVAKIA")
    pub fn find_by_country(&mut self, country: &str) -> Result<Vec<IsoCurrency>, Error> {
        log::debug!("Looking for a currencies used in country '{country}'");
        self.find_by(Field::CountryName, country, 0)
    }

    pub fn find_first_by(&mut self, field: Field, needle: &str) -> Result<IsoCurrency, Error> {
        self.find_by(field, needle, 1)?
            .into_iter()
            .next()
            .ok_or(Error::CurrencyNotFound)
    }

    /// Currencies of the records whose `field` equals `needle`, in list order.
    ///
    /// At most `max_matches` are returned, `0` means no limit. A matching record that
    /// cannot be turned into a currency fails the whole search, as does a source failure.
    pub fn find_by(
        &mut self,
        field: Field,
        needle: &str,
        max_matches: usize,
    ) -> Result<Vec<IsoCurrency>, Error> {
        let mut found = vec![];

        for record in self.source.records() {
            let record = record?;
            let name = record.field(Field::CurrencyName).unwrap_or_default();
            log::debug!("Checking currency '{name}'");

            if record.field(field) == Some(needle) {
                log::debug!("Found currency '{name}'");
                found.push(Self::transform(&record)?);

                if found.len() == max_matches {
                    return Ok(found);
                }
            }
        }

        if found.is_empty() {
            log::info!("Failed to find currency by '{field}' matching '{needle}'");
            return Err(Error::CurrencyNotFound);
        }
        Ok(found)
    }

    /// Turn a raw record into a validated currency
    pub fn transform(record: &Record) -> Result<IsoCurrency, Error> {
        let name = record.field(Field::CurrencyName).unwrap_or_default();
        if name == NO_UNIVERSAL_CURRENCY {
            return Err(Error::NoUniversalCurrency);
        }

        let minor_units = record.field(Field::MinorUnits).unwrap_or_default();
        let minor_unit_rate = if minor_units == MINOR_UNITS_NOT_APPLICABLE {
            None
        } else {
            Some(parse_minor_units(minor_units))
        };

        IsoCurrency::new(
            name,
            record.field(Field::AlphabeticCode).unwrap_or_default(),
            record.field(Field::NumericCode).unwrap_or_default(),
            minor_unit_rate,
        )
    }
}

/// Leading decimal digits of `value`, 0 if there are none.
///
/// A value overflowing `u32` also gives 0, it is not clamped to `u32::MAX`.
/// Published minor units are single digits, so only hand made records can hit this.
fn parse_minor_units(value: &str) -> u32 {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::error::ErrorKind;
    use crate::source::TableSource;

    fn record(fields: &[(&str, &str)]) -> Record {
        fields.iter().copied().collect()
    }

    fn euro(country: &str) -> Record {
        record(&[
            ("CtryNm", country),
            ("CcyNm", "Euro"),
            ("Ccy", "EUR"),
            ("CcyNbr", "978"),
            ("CcyMnrUnts", "2"),
        ])
    }

    fn table() -> TableSource {
        TableSource::from_records(vec![
            record(&[("CtryNm", "ANTARCTICA"), ("CcyNm", "No universal currency")]),
            euro("AUSTRIA"),
            record(&[
                ("CtryNm", "BOLIVIA (PLURINATIONAL STATE OF)"),
                ("CcyNm", "Boliviano"),
                ("Ccy", "BOB"),
                ("CcyNbr", "068"),
                ("CcyMnrUnts", "2"),
            ]),
            record(&[
                ("CtryNm", "BOLIVIA (PLURINATIONAL STATE OF)"),
                ("CcyNm", "Mvdol"),
                ("Ccy", "BOV"),
                ("CcyNbr", "984"),
                ("CcyMnrUnts", "2"),
            ]),
            euro("SLOVAKIA"),
            record(&[
                ("CtryNm", "ZZ08_Gold"),
                ("CcyNm", "Gold"),
                ("Ccy", "XAU"),
                ("CcyNbr", "959"),
                ("CcyMnrUnts", "N.A."),
            ]),
            record(&[
                ("CtryNm", "BROKEN"),
                ("CcyNm", "Broken"),
                ("Ccy", "brk"),
                ("CcyNbr", "999"),
                ("CcyMnrUnts", "2"),
            ]),
        ])
    }

    #[test]
    fn test_find_by_name() {
        let mut directory = CurrencyDirectory::new(table());
        let euro = directory.find_by_name("Euro").unwrap();
        assert_eq!(euro.alphabetic_code(), "EUR");
        assert_eq!(euro.numeric_code(), "978");
        assert_eq!(euro.minor_unit_rate(), Some(2));

        let err = directory.find_by_name("Bitcoin").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CurrencyNotFound);
        assert_eq!(err.to_string(), "The ISO currency could not be found!");
    }

    #[test]
    fn test_find_by_codes() {
        let mut directory = CurrencyDirectory::new(table());
        let bob = directory.find_by_numeric_code("068").unwrap();
        assert_eq!(bob.alphabetic_code(), "BOB");
        assert_eq!(
            directory.find_by_numeric_code("68").unwrap_err().kind(),
            ErrorKind::CurrencyNotFound
        );

        let gold = directory.find_by_alphabetic_code("XAU").unwrap();
        assert_eq!(gold.name(), "Gold");
        assert_eq!(gold.minor_unit_rate(), None);
    }

    #[test]
    fn test_find_by_country() {
        let mut directory = CurrencyDirectory::new(table());
        let bolivia = directory
            .find_by_country("BOLIVIA (PLURINATIONAL STATE OF)")
            .unwrap();
        let codes: Vec<_> = bolivia.iter().map(|c| c.alphabetic_code()).collect();
        assert_eq!(codes, ["BOB", "BOV"]);

        let slovakia = directory.find_by_country("SLOVAKIA").unwrap();
        assert_eq!(slovakia.len(), 1);
        assert!(slovakia[0].is(&directory.find_by_name("Euro").unwrap()));

        let err = directory.find_by_country("ANTARCTICA").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoUniversalCurrency);
        assert_eq!(err.to_string(), "No universal currency!");

        let err = directory.find_by_country("Slovakia").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CurrencyNotFound);
    }

    #[test]
    fn test_find_by_limit() {
        let mut directory = CurrencyDirectory::new(table());
        assert_eq!(directory.find_by(Field::CurrencyName, "Euro", 0).unwrap().len(), 2);
        assert_eq!(directory.find_by(Field::CurrencyName, "Euro", 1).unwrap().len(), 1);
        assert_eq!(directory.find_by(Field::CurrencyName, "Euro", 5).unwrap().len(), 2);

        // the limit stops before the invalid record is reached
        assert_eq!(directory.find_by(Field::MinorUnits, "2", 4).unwrap().len(), 4);
        let err = directory.find_by(Field::MinorUnits, "2", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCurrency);
    }

    #[test]
    fn test_invalid_record() {
        let mut directory = CurrencyDirectory::new(table());
        let err = directory.find_by_country("BROKEN").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCurrency);
    }

    #[test]
    fn test_source_failure() {
        let mut directory = CurrencyDirectory::new(table());
        directory.set_source(crate::source::ListSource::with_locations(
            crate::config::ListLocations::new(
                "/nonexistent/ISO_4217.xml",
                crate::config::REMOTE_LIST_URL,
            ),
            crate::config::Location::Bundled,
        ));
        let err = directory.find_by_name("Euro").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
        assert_eq!(
            directory.source().resources(),
            vec!["/nonexistent/ISO_4217.xml".to_string()]
        );
    }

    #[test]
    fn test_transform() {
        let gold = CurrencyDirectory::transform(&record(&[
            ("CcyNm", "Gold"),
            ("Ccy", "XAU"),
            ("CcyNbr", "959"),
            ("CcyMnrUnts", "N.A."),
        ]))
        .unwrap();
        assert_eq!(gold.minor_unit_rate(), None);

        let missing_units = CurrencyDirectory::transform(&record(&[
            ("CcyNm", "Euro"),
            ("Ccy", "EUR"),
            ("CcyNbr", "978"),
        ]))
        .unwrap();
        assert_eq!(missing_units.minor_unit_rate(), Some(0));

        let err = CurrencyDirectory::transform(&record(&[("CcyNm", "Euro")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCurrency);
    }

    #[test]
    fn test_parse_minor_units() {
        assert_eq!(parse_minor_units("2"), 2);
        assert_eq!(parse_minor_units("0"), 0);
        assert_eq!(parse_minor_units("3x"), 3);
        assert_eq!(parse_minor_units(" 4"), 4);
        assert_eq!(parse_minor_units("+1"), 1);
        assert_eq!(parse_minor_units("abc"), 0);
        assert_eq!(parse_minor_units(""), 0);
        assert_eq!(parse_minor_units("-1"), 0);
        assert_eq!(parse_minor_units("99999999999999999999"), 0);
    }

    #[test]
    fn test_parse_minor_units_overflow() {
        assert_eq!(parse_minor_units("4294967295"), u32::MAX);
        assert_eq!(parse_minor_units("4294967296"), 0);
        assert_eq!(parse_minor_units("4294967296.5"), 0);
    }
}
