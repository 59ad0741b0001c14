//! Importer configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_require_account_number() -> bool {
    true
}

/// Settings for one comdirect checking account.
///
/// ```no_run
/// use comdirect_importer::ImporterConfig;
///
/// let config = ImporterConfig::from_json_file("comdirect.json")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImporterConfig {
    /// Ledger account the postings and balances are booked to.
    pub account: String,

    /// Account number as it appears in export file names.
    #[serde(default)]
    pub account_number: String,

    /// Currency of the account; rows do not carry one.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Only accept files whose name contains `account_number`.
    ///
    /// When false, detection looks at file contents alone.
    #[serde(default = "default_require_account_number")]
    pub require_account_number_in_filename: bool,
}

impl ImporterConfig {
    /// Configuration with EUR and file name checking enabled.
    pub fn new(account: impl Into<String>, account_number: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            account_number: account_number.into(),
            currency: default_currency(),
            require_account_number_in_filename: true,
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Set the account currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Toggle the file name check.
    pub fn with_filename_check(mut self, enabled: bool) -> Self {
        self.require_account_number_in_filename = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let json = r#"{"account": "Assets:Comdirect:Checking", "account_number": "5873596814"}"#;
        let config: ImporterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config,
            ImporterConfig::new("Assets:Comdirect:Checking", "5873596814")
        );
    }

    #[test]
    fn test_builder_toggles() {
        let config = ImporterConfig::new("Assets:Comdirect:Checking", "5873596814")
            .with_currency("USD")
            .with_filename_check(false);
        assert_eq!(config.currency, "USD");
        assert!(!config.require_account_number_in_filename);
    }

    #[test]
    fn test_content_only_policy() {
        let json = r#"{
            "account": "Assets:Comdirect:Checking",
            "currency": "USD",
            "require_account_number_in_filename": false
        }"#;
        let config: ImporterConfig = serde_json::from_str(json).unwrap();
        assert!(!config.require_account_number_in_filename);
        assert_eq!(config.currency, "USD");
        assert!(config.account_number.is_empty());
    }
}
