//! comdirect Importer Library
//!
//! Turns the CSV export of a comdirect checking account ("Umsätze
//! Girokonto") into ledger entries: one transaction per booked row and a
//! closing balance assertion.
//!
//! # Features
//!
//! - Detect exports by their first two lines, tolerating re-encoded umlauts
//! - Resolve the statement period from either header layout
//! - Exact decimal amounts from German number formatting
//! - Write entries as ledger text or JSON
//!
//! # Examples
//!
//! ## Extracting an export
//!
//! ```no_run
//! use std::path::Path;
//! use comdirect_importer::{ComdirectImporter, Extraction, Importer, ImporterConfig};
//!
//! let config = ImporterConfig::new("Assets:Comdirect:Checking", "5873596814");
//! let importer = ComdirectImporter::new(config);
//! let path = Path::new("umsaetze_5873596814_20240901-1606.csv");
//!
//! match importer.extract(path)? {
//!     Extraction::Parsed(statement) => println!("{} entries", statement.entries.len()),
//!     Extraction::Skipped { reason } => eprintln!("{}", reason),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Writing ledger text
//!
//! ```no_run
//! use std::path::Path;
//! use comdirect_importer::{beancount_format, ComdirectImporter, Importer, ImporterConfig};
//!
//! let config = ImporterConfig::new("Assets:Comdirect:Checking", "5873596814");
//! let importer = ComdirectImporter::new(config);
//! let path = Path::new("umsaetze_5873596814_20240901-1606.csv");
//! let entries = importer.extract(path)?.into_entries();
//!
//! beancount_format::write_entries(&mut std::io::stdout(), &entries)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod beancount_format;
pub mod config;
pub mod detector;
pub mod error;
pub mod header;
pub mod importer;
pub mod locale;
pub mod statement;
pub mod types;

use std::io::Write;
use std::str::FromStr;

// Re-export commonly used types
pub use config::ImporterConfig;
pub use error::{Error, Result};
pub use importer::{ComdirectImporter, Importer};
pub use types::{
    Amount, BalanceAssertion, Entry, Extraction, Statement, StatementHeader, Transaction,
};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Ledger directives
    Beancount,
    /// JSON array of entries
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "beancount" | "bean" | "ledger" => Ok(OutputFormat::Beancount),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

impl OutputFormat {
    /// Get file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Beancount => "beancount",
            OutputFormat::Json => "json",
        }
    }

    /// Write entries in this format.
    pub fn write_entries<W: Write>(&self, writer: &mut W, entries: &[Entry]) -> Result<()> {
        match self {
            OutputFormat::Beancount => beancount_format::write_entries(writer, entries),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *writer, entries)?;
                writeln!(writer)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("beancount".parse::<OutputFormat>().unwrap(), OutputFormat::Beancount);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Beancount.extension(), "beancount");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }

    #[test]
    fn test_write_empty_json() {
        let mut out = Vec::new();
        OutputFormat::Json.write_entries(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
    }
}
