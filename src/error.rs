use std::path::PathBuf;

use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error: fails the whole run before any oracle call
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Oracle error: transport failure or unusable response payload
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),
    /// File operation error
    #[error("file error: {0}")]
    File(#[from] FileError),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested name column does not exist in the input header
    #[error("column \"{column}\" not found in input file; available columns: {available:?}")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },
    /// More than one column and no column name was supplied
    #[error(
        "input file has multiple columns but no --column-name was provided; \
         available columns: {available:?}"
    )]
    ColumnAmbiguous { available: Vec<String> },
    /// Chunk size of zero can never make progress
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,
    /// The reference CSV yielded no usable code records
    #[error("no code records loaded from {}", path.display())]
    EmptyCodeTable { path: PathBuf },
}

/// Oracle errors
///
/// Encodes the tagged outcome of an oracle call: a transport failure, an
/// empty response, or a payload whose shape cannot be consumed.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Network or API failure
    #[error("oracle request failed (model: {model}): {source}")]
    Transport {
        model: String,
        #[source]
        source: async_openai::error::OpenAIError,
    },
    /// The oracle returned no content at all
    #[error("oracle returned no content (model: {model})")]
    EmptyResponse { model: String },
    /// The payload could not be parsed into the expected shape
    #[error("oracle payload has unexpected shape: {reason}")]
    Shape { reason: String },
    /// Positional correspondence is the only name-description link,
    /// so a count mismatch is fatal for the chunk
    #[error("oracle returned {actual} descriptions for {expected} names")]
    CountMismatch { expected: usize, actual: usize },
}

/// File operation errors
///
/// All interchange reads go through the CSV layer, so read failures surface
/// as [`FileError::Csv`].
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// ========== Convenience constructors ==========

impl FileError {
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FileError::Write {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        FileError::Csv {
            path: path.into(),
            source,
        }
    }
}

// ========== Result type alias ==========

/// Application result type
pub type AppResult<T> = std::result::Result<T, AppError>;
