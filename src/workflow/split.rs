//! Splitter stage
//!
//! Partitions a large list of business names into fixed-size chunk files,
//! `businesses_0001.csv` onward, one name per line, preserving input order.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{AppResult, ConfigError, FileError};
use crate::services::chunk_store::{self, NAMES_PREFIX};

pub struct SplitOptions<'a> {
    pub input_file: &'a Path,
    /// Name of the column holding business names. Required when the input
    /// has more than one column.
    pub column_name: Option<&'a str>,
    pub chunk_size: usize,
    pub output_dir: &'a Path,
}

/// Run the splitter. Returns the number of chunk files written.
///
/// An empty input produces zero files and a diagnostic, not an error.
pub fn run(options: &SplitOptions) -> AppResult<usize> {
    if options.chunk_size == 0 {
        return Err(ConfigError::InvalidChunkSize.into());
    }

    let names = read_business_names(options.input_file, options.column_name)?;

    if names.is_empty() {
        info!(
            "no business names found in {}, nothing to split",
            options.input_file.display()
        );
        return Ok(0);
    }

    fs::create_dir_all(options.output_dir)
        .map_err(|e| FileError::write(options.output_dir, e))?;

    let mut written = 0;
    for (i, chunk) in names.chunks(options.chunk_size).enumerate() {
        let path = chunk_store::chunk_path(options.output_dir, NAMES_PREFIX, i + 1);
        chunk_store::write_names(&path, chunk)?;
        written += 1;
    }

    info!(
        "✓ split {} name(s) into {} file(s) in {}",
        names.len(),
        written,
        options.output_dir.display()
    );

    Ok(written)
}

/// Read the business names out of the input CSV.
///
/// The first row is always consumed as a header. With a column name the
/// column must exist; without one, a single-column header means the sole
/// field is the name and a multi-column header demands an explicit choice.
fn read_business_names(path: &Path, column_name: Option<&str>) -> AppResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| FileError::csv(path, e))?;

    let mut records = reader.records();

    let header = match records.next() {
        None => {
            info!("input file {} is empty", path.display());
            return Ok(Vec::new());
        }
        Some(result) => result.map_err(|e| FileError::csv(path, e))?,
    };
    let header_fields: Vec<String> = header.iter().map(|f| f.trim().to_string()).collect();

    let column_index = match column_name {
        Some(column) => header_fields
            .iter()
            .position(|field| field == column)
            .ok_or_else(|| ConfigError::ColumnNotFound {
                column: column.to_string(),
                available: header_fields.clone(),
            })?,
        None => {
            if header_fields.len() == 1 {
                0
            } else {
                return Err(ConfigError::ColumnAmbiguous {
                    available: header_fields,
                }
                .into());
            }
        }
    };

    let mut names = Vec::new();
    for result in records {
        let record = result.map_err(|e| FileError::csv(path, e))?;
        if let Some(field) = record.get(column_index) {
            let name = field.trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }

    Ok(names)
}
