//! Command-line surface
//!
//! One subcommand per pipeline stage. Each stage is an independent batch job;
//! the stages compose only through the CSV files they read and write.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::Taxonomy;

#[derive(Parser, Debug)]
#[command(
    name = "classify_businesses",
    version,
    about = "Batch-classify businesses into industry taxonomy codes via an AI oracle"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a CSV of business names into fixed-size chunk files
    Split {
        /// Path to the input CSV file
        #[arg(long)]
        input_file: PathBuf,

        /// Name of the column containing business names.
        /// Required when the input has more than one column.
        #[arg(long)]
        column_name: Option<String>,

        /// Number of business names per output file
        #[arg(long, default_value_t = 20)]
        chunk_size: usize,
    },

    /// Fetch a business description for every chunked name file (web search enabled)
    Describe {
        /// Number of input chunk files to process
        /// (e.g. 900 for businesses_0001.csv - businesses_0900.csv)
        #[arg(long)]
        num_files: usize,
    },

    /// Classify each described business against a taxonomy code list
    Classify {
        /// Number of description files to process
        #[arg(long)]
        num_files: usize,

        /// Taxonomy to classify against
        #[arg(long, value_enum, default_value = "bic")]
        taxonomy: Taxonomy,

        /// Reference CSV of (code, label) pairs.
        /// Defaults to the taxonomy's standard file name.
        #[arg(long)]
        codes_file: Option<PathBuf>,
    },
}
