//! Department taxonomy lookup.
//!
//! Maps a 4-character main department code to a human label. Lookup absence
//! is non-fatal: gross-profit rows keep the raw code.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// In-memory department code catalog.
#[derive(Debug, Clone, Default)]
pub struct DepartmentCatalog {
    labels: HashMap<String, String>,
}

impl DepartmentCatalog {
    /// Load from a CSV with `code,name` columns (header optional).
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut catalog = Self::default();
        for record in csv_reader.records() {
            let record = record?;
            let (Some(code), Some(name)) = (record.get(0), record.get(1)) else {
                continue;
            };
            let code = code.trim().to_uppercase();
            // Skip a header row and anything that is not a 4-char code.
            if code.len() != 4 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
                continue;
            }
            catalog.labels.insert(code, name.trim().to_string());
        }

        debug!(departments = catalog.labels.len(), "department catalog loaded");
        Ok(catalog)
    }

    pub fn insert(&mut self, code: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(code.into().to_uppercase(), label.into());
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader_skips_header_and_bad_rows() {
        let csv = "code,name\nBAAC,Analgesics\nBAAF,Cough and Cold\nXX,too short\n";
        let catalog = DepartmentCatalog::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.label("BAAC"), Some("Analgesics"));
        assert_eq!(catalog.label("BAAF"), Some("Cough and Cold"));
        assert_eq!(catalog.label("XX"), None);
    }

    #[test]
    fn test_unknown_code_is_none() {
        let catalog = DepartmentCatalog::default();
        assert_eq!(catalog.label("ZZZZ"), None);
    }
}
