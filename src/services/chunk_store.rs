//! Chunk file store - capability layer
//!
//! Reads and writes the CSV interchange files the pipeline stages compose
//! through. All files are UTF-8, comma-delimited; indices are 1-based and
//! zero-padded to 4 digits.

use std::path::{Path, PathBuf};

use crate::error::FileError;
use crate::models::{ClassifiedEntity, DescribedEntity};

/// Prefix of splitter output files (`businesses_0001.csv`, ...).
pub const NAMES_PREFIX: &str = "businesses";

/// Prefix of description fetcher output files.
pub const DESCRIPTIONS_PREFIX: &str = "business_descriptions";

/// Path of the chunk file with the given 1-based index.
pub fn chunk_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{}_{:04}.csv", prefix, index))
}

/// Read a headerless one-column name chunk. Names are whitespace-trimmed and
/// empty rows are dropped.
pub fn read_names(path: &Path) -> Result<Vec<String>, FileError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| FileError::csv(path, e))?;

    let mut names = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| FileError::csv(path, e))?;
        if let Some(field) = record.get(0) {
            let name = field.trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Write a headerless one-column name chunk.
pub fn write_names(path: &Path, names: &[String]) -> Result<(), FileError> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| FileError::csv(path, e))?;
    for name in names {
        writer
            .write_record([name.as_str()])
            .map_err(|e| FileError::csv(path, e))?;
    }
    writer.flush().map_err(|e| FileError::write(path, e))?;
    Ok(())
}

/// Read a description file: header row, then (name, description) rows.
/// The description column is kept verbatim; a missing second field reads as
/// an empty description.
pub fn read_described(path: &Path) -> Result<Vec<DescribedEntity>, FileError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| FileError::csv(path, e))?;

    let mut entities = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| FileError::csv(path, e))?;
        let name = record.get(0).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }
        let description = record.get(1).unwrap_or("").to_string();
        entities.push(DescribedEntity { name, description });
    }
    Ok(entities)
}

/// Write a description file with the `BUSINESS_NAME,BUSINESS_DESCRIPTION`
/// header.
pub fn write_described(path: &Path, entities: &[DescribedEntity]) -> Result<(), FileError> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| FileError::csv(path, e))?;
    writer
        .write_record(["BUSINESS_NAME", "BUSINESS_DESCRIPTION"])
        .map_err(|e| FileError::csv(path, e))?;
    for entity in entities {
        writer
            .write_record([entity.name.as_str(), entity.description.as_str()])
            .map_err(|e| FileError::csv(path, e))?;
    }
    writer.flush().map_err(|e| FileError::write(path, e))?;
    Ok(())
}

/// Write a classification file with the `NAME,DESCRIPTION,CODE,LABEL` header.
pub fn write_classified(path: &Path, entities: &[ClassifiedEntity]) -> Result<(), FileError> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| FileError::csv(path, e))?;
    writer
        .write_record(["NAME", "DESCRIPTION", "CODE", "LABEL"])
        .map_err(|e| FileError::csv(path, e))?;
    for entity in entities {
        writer
            .write_record([
                entity.name.as_str(),
                entity.description.as_str(),
                entity.code.as_str(),
                entity.label.as_str(),
            ])
            .map_err(|e| FileError::csv(path, e))?;
    }
    writer.flush().map_err(|e| FileError::write(path, e))?;
    Ok(())
}
