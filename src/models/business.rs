//! Business entity data model

use serde::{Deserialize, Serialize};

/// Emitted as both code and label when a business cannot be classified.
pub const COULD_NOT_CLASSIFY: &str = "Could not be classified";

/// Returned by the oracle as a description when several distinct real-world
/// businesses share the same name.
pub const MULTIPLE_MATCHES: &str = "Multiple businesses with the same name exist";

/// A business name paired with its fetched description.
///
/// The description may be empty (no reliable information found) or the
/// [`MULTIPLE_MATCHES`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribedEntity {
    pub name: String,
    pub description: String,
}

/// The four-column classifier result.
///
/// `code` is either a value from the loaded code table or the
/// [`COULD_NOT_CLASSIFY`] sentinel; `label` resolves through the table or
/// repeats the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEntity {
    pub name: String,
    pub description: String,
    pub code: String,
    pub label: String,
}

impl ClassifiedEntity {
    /// A result row for a business that could not be classified.
    pub fn unclassified(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            code: COULD_NOT_CLASSIFY.to_string(),
            label: COULD_NOT_CLASSIFY.to_string(),
        }
    }
}
