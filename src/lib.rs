//! # Classify Businesses
//!
//! Batch-classifies business entities into standardized industry taxonomy codes
//! (BIC or ANZSIC) using an external AI text-generation service.
//!
//! ## Architecture
//!
//! The crate is layered:
//!
//! ### Models
//! - `models/` - plain data: [`DescribedEntity`], [`ClassifiedEntity`],
//!   [`Taxonomy`], the [`CodeTable`] reference data, and the sentinel constants
//!
//! ### Services (capabilities)
//! - `services/oracle` - the [`Oracle`] seam to the AI service and its
//!   OpenAI-backed implementation
//! - `services/chunk_store` - reading and writing the CSV interchange files
//!
//! ### Workflow (pipeline stages)
//! - `workflow/split` - partition a business-name list into chunk files
//! - `workflow/describe` - one web-search oracle request per chunk, one
//!   description per name
//! - `workflow/classify` - one oracle request per unique non-empty description,
//!   validated against the code table, with a run-scoped memoization cache
//!
//! The stages compose only through files on disk:
//! split output feeds describe, describe output feeds classify.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

pub use config::Config;
pub use error::{AppError, AppResult, ConfigError, FileError, OracleError};
pub use models::{
    ClassifiedEntity, CodeRecord, CodeTable, DescribedEntity, Taxonomy, COULD_NOT_CLASSIFY,
};
pub use services::{OpenAiOracle, Oracle, WebSearch};
