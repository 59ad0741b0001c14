//! Importer capabilities used by the ledger's file ingestion.

use crate::config::ImporterConfig;
use crate::detector::identify_reader;
use crate::error::Result;
use crate::statement::{decode_latin1, parse_statement, read_header};
use crate::types::Extraction;
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Stem given to filed exports.
pub const CANONICAL_STEM: &str = "comdirect";

/// What the ledger needs from an importer.
pub trait Importer {
    /// Whether the file belongs to this importer. Never fails.
    fn identify(&self, path: &Path) -> bool;

    /// Turn the file into ledger entries.
    fn extract(&self, path: &Path) -> Result<Extraction>;

    /// Account the file is filed under.
    fn account_for(&self, path: &Path) -> &str;

    /// Date the file is filed under, if the file is recognized.
    fn effective_date(&self, path: &Path) -> Result<Option<NaiveDate>>;

    /// Name the file is filed as.
    fn canonical_name(&self, path: &Path) -> String;
}

/// Importer for comdirect checking account CSV exports.
#[derive(Debug, Clone)]
pub struct ComdirectImporter {
    config: ImporterConfig,
}

impl ComdirectImporter {
    pub fn new(config: ImporterConfig) -> Self {
        Self { config }
    }

    fn name_matches(&self, path: &Path) -> bool {
        if !self.config.require_account_number_in_filename {
            return true;
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        !self.config.account_number.is_empty() && name.contains(&self.config.account_number)
    }

    fn read_text(path: &Path) -> Result<String> {
        let bytes = fs::read(path)?;
        Ok(decode_latin1(&bytes).into_owned())
    }
}

impl Importer for ComdirectImporter {
    fn identify(&self, path: &Path) -> bool {
        if !self.name_matches(path) {
            debug!(path = %path.display(), "account number not in file name");
            return false;
        }
        let Ok(file) = File::open(path) else {
            return false;
        };
        identify_reader(&mut BufReader::new(file))
    }

    fn extract(&self, path: &Path) -> Result<Extraction> {
        let name = path.to_string_lossy();
        if !self.name_matches(path) {
            let reason = format!("{} is not compatible with the comdirect importer", name);
            tracing::warn!("{}", reason);
            return Ok(Extraction::Skipped { reason });
        }
        let text = Self::read_text(path)?;
        parse_statement(&text, &name, &self.config)
    }

    fn account_for(&self, _path: &Path) -> &str {
        &self.config.account
    }

    fn effective_date(&self, path: &Path) -> Result<Option<NaiveDate>> {
        if !self.name_matches(path) {
            return Ok(None);
        }
        let text = Self::read_text(path)?;
        let header = read_header(&text, &path.to_string_lossy())?;
        Ok(header.map(|header| header.period.end))
    }

    fn canonical_name(&self, path: &Path) -> String {
        match path.extension() {
            Some(ext) => format!("{}.{}", CANONICAL_STEM, ext.to_string_lossy()),
            None => CANONICAL_STEM.to_string(),
        }
    }
}
