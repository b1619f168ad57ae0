pub mod business;
pub mod taxonomy;

pub use business::{ClassifiedEntity, DescribedEntity, COULD_NOT_CLASSIFY, MULTIPLE_MATCHES};
pub use taxonomy::{CodeRecord, CodeTable, Taxonomy};
