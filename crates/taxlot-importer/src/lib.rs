//! Import framework for taxlot
//!
//! This crate extracts [`TradeRecord`]s from brokerage activity exports.
//! Each supported format implements the [`Importer`] trait; malformed rows
//! are dropped with a warning rather than failing the whole file, because
//! real exports mix trades with transfers, interest, and footer junk.
//!
//! # Example
//!
//! ```
//! use taxlot_importer::{extract_from_string, RobinhoodCsv};
//!
//! let csv = "\
//! Activity Date,Process Date,Settle Date,Instrument,Description,Trans Code,Quantity,Price,Amount
//! 1/3/2022,1/3/2022,1/5/2022,AAPL,Apple,Buy,10,$150.00,($1500.00)
//! ";
//! let result = extract_from_string(csv, &RobinhoodCsv::new()).unwrap();
//! assert_eq!(result.records.len(), 1);
//! assert_eq!(result.records[0].instrument, "AAPL");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod robinhood;

use anyhow::Result;
use std::path::Path;
use taxlot_core::TradeRecord;

pub use robinhood::RobinhoodCsv;

/// Result of an import operation.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// The extracted trade records.
    pub records: Vec<TradeRecord>,
    /// Warnings encountered during import (dropped rows, odd fields).
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Create a new import result.
    #[must_use]
    pub const fn new(records: Vec<TradeRecord>) -> Self {
        Self {
            records,
            warnings: Vec::new(),
        }
    }

    /// Create an empty import result.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a warning to the result.
    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Trait for activity-file importers.
///
/// Implementors extract trade records from a specific brokerage export
/// format.
pub trait Importer: Send + Sync {
    /// Returns the name of this importer.
    fn name(&self) -> &str;

    /// Check if this importer can handle the given file.
    ///
    /// This method should be fast - it typically checks the file extension
    /// or header row.
    fn identify(&self, path: &Path) -> bool;

    /// Extract trade records from the given file.
    fn extract(&self, path: &Path) -> Result<ImportResult>;

    /// Extract trade records from file contents.
    fn extract_string(&self, content: &str) -> Result<ImportResult>;

    /// Returns a description of what this importer handles.
    fn description(&self) -> &str {
        self.name()
    }
}

/// Extract trade records from a file using the given importer.
pub fn extract_from_file(path: &Path, importer: &dyn Importer) -> Result<ImportResult> {
    importer.extract(path)
}

/// Extract trade records from string content (useful for testing and
/// in-memory uploads).
pub fn extract_from_string(content: &str, importer: &dyn Importer) -> Result<ImportResult> {
    importer.extract_string(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxlot_core::TradeKind;

    #[test]
    fn import_result_empty() {
        let result = ImportResult::empty();
        assert!(result.records.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn import_result_with_warnings() {
        let result = ImportResult::empty()
            .with_warning("Warning 1")
            .with_warning("Warning 2");
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[0], "Warning 1");
    }

    #[test]
    fn import_result_with_records() {
        let records = vec![TradeRecord::new(
            TradeKind::Buy,
            "1/3/2022",
            "AAPL",
            10.0,
            150.0,
        )];
        let result = ImportResult::new(records);
        assert_eq!(result.records.len(), 1);
        assert!(result.warnings.is_empty());
    }
}
