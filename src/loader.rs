//! Document loading.
//!
//! This module turns YAML text, already parsed YAML values, or files on
//! disk into validated datasets. Every dataset type implements
//! [`Document`], so the same three entry points serve rates and outages.
//!
//! # Example
//!
//! ```no_run
//! use nerc_rates::loader::{DEFAULT_RATES_FILE, load_from_file};
//! use nerc_rates::rates::RateDataset;
//!
//! let rates: RateDataset = load_from_file(DEFAULT_RATES_FILE)?;
//! println!("{} rates loaded", rates.len());
//! # Ok::<(), nerc_rates::error::DataError>(())
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{info, warn};

use crate::error::{DataError, DataResult};
use crate::outages::{OutageDataset, OutageItemRecord};
use crate::rates::{RateDataset, RateItemRecord};

/// Default file name of the rates document.
pub const DEFAULT_RATES_FILE: &str = "rates.yaml";

/// Default file name of the outages document.
pub const DEFAULT_OUTAGES_FILE: &str = "outages.yaml";

const STRING_SOURCE: &str = "<string>";

/// A dataset that can be built from a sequence of document records.
pub trait Document: Sized {
    /// The shape of one top-level entry of the document.
    type Record: DeserializeOwned;

    /// Validates the records and builds the dataset.
    fn from_document(records: Vec<Self::Record>) -> DataResult<Self>;

    /// Number of top-level entries in the dataset.
    fn entry_count(&self) -> usize;
}

impl Document for RateDataset {
    type Record = RateItemRecord;

    fn from_document(records: Vec<Self::Record>) -> DataResult<Self> {
        Self::from_records(records)
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}

impl Document for OutageDataset {
    type Record = OutageItemRecord;

    fn from_document(records: Vec<Self::Record>) -> DataResult<Self> {
        Self::from_records(records)
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}

/// Parses and validates a YAML document held in memory.
pub fn load_from_str<D: Document>(yaml: &str) -> DataResult<D> {
    load_yaml(STRING_SOURCE, yaml)
}

/// Validates a document that was already parsed into a YAML value.
pub fn load_from_value<D: Document>(value: serde_yaml::Value) -> DataResult<D> {
    let records = serde_yaml::from_value(value).map_err(|e| DataError::ConfigParseError {
        path: STRING_SOURCE.to_string(),
        message: e.to_string(),
    })?;
    D::from_document(records)
}

/// Reads, parses and validates a YAML file.
///
/// # Errors
///
/// - [`DataError::ConfigNotFound`] if the file does not exist
/// - [`DataError::ConfigReadError`] if it exists but cannot be read as UTF-8 text
/// - [`DataError::YamlSyntax`] if it is not well-formed YAML
/// - [`DataError::ConfigParseError`] if it is not a YAML list of records
/// - any validation error of the dataset
pub fn load_from_file<D: Document, P: AsRef<Path>>(path: P) -> DataResult<D> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataError::ConfigNotFound {
            path: path_str.clone(),
        },
        kind => DataError::ConfigReadError {
            path: path_str.clone(),
            message: format!("{kind}: {e}"),
        },
    })?;

    let dataset: D = load_yaml(&path_str, &content)?;
    info!(path = %path_str, entries = dataset.entry_count(), "loaded data file");
    Ok(dataset)
}

fn load_yaml<D: Document>(source: &str, yaml: &str) -> DataResult<D> {
    // Any well-formed document deserializes into `IgnoredAny`, so a failure
    // here is a syntax error rather than a shape mismatch.
    serde_yaml::from_str::<IgnoredAny>(yaml).map_err(|e| DataError::YamlSyntax {
        path: source.to_string(),
        line: e.location().map(|location| location.line()),
        message: e.to_string(),
    })?;

    let records = serde_yaml::from_str(yaml).map_err(|e| DataError::ConfigParseError {
        path: source.to_string(),
        message: e.to_string(),
    })?;

    D::from_document(records).inspect_err(|error| {
        warn!(source, %error, "rejected data document");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RATES_YAML: &str = r#"
- name: CPU SU Rate
  type: "Decimal"
  history:
    - value: "0.013"
      from: 2023-06
"#;

    #[test]
    fn test_load_rates_from_str() {
        let rates: RateDataset = load_from_str(RATES_YAML).unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates.get("CPU SU Rate").unwrap().name(), "CPU SU Rate");
    }

    #[test]
    fn test_load_from_value() {
        let value: serde_yaml::Value = serde_yaml::from_str(RATES_YAML).unwrap();
        let rates: RateDataset = load_from_value(value).unwrap();
        assert_eq!(rates.entry_count(), 1);
    }

    #[test]
    fn test_invalid_yaml_is_syntax_error() {
        let result = load_from_str::<RateDataset>("- name: [unclosed");
        match result {
            Err(DataError::YamlSyntax { path, .. }) => assert_eq!(path, "<string>"),
            other => panic!("Expected YamlSyntax, got {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let yaml = "- name: CPU SU Rate\n  type: Decimal\n  history: [\n    - value: \"1\"\n";
        match load_from_str::<RateDataset>(yaml) {
            Err(DataError::YamlSyntax { line, .. }) => {
                let line = line.unwrap();
                assert!(line >= 3, "line {line} should point into the history list");
            }
            other => panic!("Expected YamlSyntax, got {other:?}"),
        }
    }

    #[test]
    fn test_mapping_instead_of_list_is_parse_error() {
        let result = load_from_str::<OutageDataset>("name: not a list");
        assert!(matches!(result, Err(DataError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = load_from_file::<RateDataset, _>("/nonexistent/rates.yaml");
        match result {
            Err(DataError::ConfigNotFound { path }) => {
                assert!(path.contains("rates.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_file_is_read_error_not_missing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x2d]).unwrap();

        match load_from_file::<RateDataset, _>(file.path()) {
            Err(DataError::ConfigReadError { path, message }) => {
                assert_eq!(path, file.path().display().to_string());
                assert!(message.contains("invalid data"), "message: {message}");
            }
            other => panic!("Expected ConfigReadError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RATES_YAML.as_bytes()).unwrap();

        let rates: RateDataset = load_from_file(file.path()).unwrap();
        assert_eq!(rates.len(), 1);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"- name: [unclosed").unwrap();

        let result = load_from_file::<OutageDataset, _>(file.path());
        match result {
            Err(DataError::YamlSyntax { path, .. }) => {
                assert_eq!(path, file.path().display().to_string());
            }
            other => panic!("Expected YamlSyntax, got {other:?}"),
        }
    }
}
