//! Taxonomy reference data
//!
//! Loads the static (code, label) reference CSV into an ordered record list
//! for prompt serialization plus a code-to-label map for O(1) resolution.
//! Loaded once per run and read-only thereafter.

use std::collections::HashMap;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FileError;

/// Supported industry taxonomies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Taxonomy {
    /// Business Industry Classification codes
    Bic,
    /// Australia/New Zealand Standard Industrial Classification codes
    Anzsic,
}

impl Taxonomy {
    /// Standard reference file name for this taxonomy.
    pub fn default_codes_file(self) -> &'static str {
        match self {
            Taxonomy::Bic => "bic_codes.csv",
            Taxonomy::Anzsic => "anzsic_2006_class_codes.csv",
        }
    }

    /// Prefix of the classifier output files, e.g. `bic_classification_0001.csv`.
    pub fn output_prefix(self) -> &'static str {
        match self {
            Taxonomy::Bic => "bic_classification",
            Taxonomy::Anzsic => "anzsic_classification",
        }
    }

    /// Column order of the reference CSV varies by taxonomy:
    /// BIC files are (code, label), ANZSIC files are (label, code).
    fn code_first(self) -> bool {
        matches!(self, Taxonomy::Bic)
    }
}

/// One (code, label) pair from the reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRecord {
    pub code: String,
    pub label: String,
}

/// The loaded reference list: ordered records for prompt serialization and a
/// code-to-label map for lookup. Codes are unique keys.
#[derive(Debug)]
pub struct CodeTable {
    taxonomy: Taxonomy,
    records: Vec<CodeRecord>,
    labels: HashMap<String, String>,
}

impl CodeTable {
    /// Parse the two-column reference CSV at `path`.
    ///
    /// Rows with fewer than two fields are skipped silently; the reference
    /// file is operator-controlled and stable.
    pub fn load(taxonomy: Taxonomy, path: &Path) -> Result<Self, FileError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| FileError::csv(path, e))?;

        let mut records = Vec::new();
        let mut labels = HashMap::new();

        for result in reader.records() {
            let record = result.map_err(|e| FileError::csv(path, e))?;
            if record.len() < 2 {
                continue;
            }

            let (code_field, label_field) = if taxonomy.code_first() { (0, 1) } else { (1, 0) };
            let code = record[code_field].trim().to_string();
            let label = record[label_field].trim().to_string();
            if code.is_empty() {
                continue;
            }

            labels.insert(code.clone(), label.clone());
            records.push(CodeRecord { code, label });
        }

        Ok(Self {
            taxonomy,
            records,
            labels,
        })
    }

    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.labels.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the full candidate list for a classification prompt, one
    /// candidate per line, in reference-file order and column order.
    pub fn prompt_block(&self) -> String {
        self.records
            .iter()
            .map(|r| {
                if self.taxonomy.code_first() {
                    format!("{} --- {}", r.code, r.label)
                } else {
                    format!("{} --- {}", r.label, r.code)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_bic_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bic_codes.csv");
        fs::write(&path, "1234,Coffee roasting\n5678,Software publishing\n").unwrap();

        let table = CodeTable::load(Taxonomy::Bic, &path).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.contains("1234"));
        assert_eq!(table.label_for("1234"), Some("Coffee roasting"));
        assert_eq!(table.label_for("9999"), None);
    }

    #[test]
    fn test_load_anzsic_table_reversed_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anzsic.csv");
        fs::write(&path, "Coffee roasting,1182\nSoftware publishing,5420\n").unwrap();

        let table = CodeTable::load(Taxonomy::Anzsic, &path).unwrap();
        assert!(table.contains("1182"));
        assert_eq!(table.label_for("5420"), Some("Software publishing"));
        // label is not a key
        assert!(!table.contains("Coffee roasting"));
    }

    #[test]
    fn test_malformed_rows_skipped_silently() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bic_codes.csv");
        fs::write(&path, "1234,Coffee roasting\nlonelyfield\n5678,Software publishing\n").unwrap();

        let table = CodeTable::load(Taxonomy::Bic, &path).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_prompt_block_order_matches_taxonomy() {
        let dir = TempDir::new().unwrap();

        let bic_path = dir.path().join("bic.csv");
        fs::write(&bic_path, "1234,Coffee roasting\n").unwrap();
        let bic = CodeTable::load(Taxonomy::Bic, &bic_path).unwrap();
        assert_eq!(bic.prompt_block(), "1234 --- Coffee roasting");

        let anzsic_path = dir.path().join("anzsic.csv");
        fs::write(&anzsic_path, "Coffee roasting,1182\n").unwrap();
        let anzsic = CodeTable::load(Taxonomy::Anzsic, &anzsic_path).unwrap();
        assert_eq!(anzsic.prompt_block(), "Coffee roasting --- 1182");
    }

    #[test]
    fn test_quoted_labels_with_commas() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bic.csv");
        fs::write(&path, "1234,\"Growing of cereals, except rice\"\n").unwrap();

        let table = CodeTable::load(Taxonomy::Bic, &path).unwrap();
        assert_eq!(
            table.label_for("1234"),
            Some("Growing of cereals, except rice")
        );
    }
}
