use crate::currency::{validate, Currency};
use crate::directory::CurrencyDirectory;

/// Tells whether currencies follow ISO 4217, answering only `true` or `false`.
pub struct ComplianceManager {
    directory: CurrencyDirectory,
}

impl ComplianceManager {
    pub fn new(directory: CurrencyDirectory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &CurrencyDirectory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut CurrencyDirectory {
        &mut self.directory
    }

    /// Whether `candidate` is an ISO currency with well formed codes
    pub fn is_valid(&self, candidate: &dyn Currency) -> bool {
        let code = candidate.alphabetic_code();
        match validate(candidate) {
            Ok(()) => {
                log::debug!("Currency '{code}' is valid for ISO.");
                true
            }
            Err(e) => {
                log::debug!("Currency '{code}' is not valid for ISO: {e}");
                false
            }
        }
    }

    /// Whether `candidate` is valid and equal to the listed currency of the same name.
    ///
    /// Failures of the directory, including an unreachable list, result in `false`.
    pub fn is_authoritative(&mut self, candidate: &dyn Currency) -> bool {
        let code = candidate.alphabetic_code();
        if !self.is_valid(candidate) {
            log::debug!("Currency '{code}' is not ISO standard.");
            return false;
        }

        match self.directory.find_by_name(candidate.name()) {
            Ok(listed) if listed.is(candidate) => {
                log::debug!("Currency '{code}' is ISO standard.");
                true
            }
            Ok(_) => {
                log::debug!("Currency '{code}' is not ISO standard.");
                false
            }
            Err(e) => {
                log::debug!("Currency '{code}' is not ISO standard: {e}");
                false
            }
        }
    }
}
