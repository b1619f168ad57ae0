use std::path::Path;

use anyhow::Result;
use clap::Parser;

use classify_businesses::cli::{Cli, Command};
use classify_businesses::config::Config;
use classify_businesses::services::OpenAiOracle;
use classify_businesses::utils::logging;
use classify_businesses::workflow::{classify, describe, split};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init();

    // Load configuration
    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Split {
            input_file,
            column_name,
            chunk_size,
        } => {
            split::run(&split::SplitOptions {
                input_file: &input_file,
                column_name: column_name.as_deref(),
                chunk_size,
                output_dir: Path::new(&config.names_dir),
            })?;
        }
        Command::Describe { num_files } => {
            let oracle = OpenAiOracle::new(&config);
            describe::run(&config, &oracle, num_files).await?;
        }
        Command::Classify {
            num_files,
            taxonomy,
            codes_file,
        } => {
            let oracle = OpenAiOracle::new(&config);
            let options = classify::ClassifyOptions {
                taxonomy,
                codes_file,
                num_files,
            };
            classify::run(&config, &oracle, &options).await?;
        }
    }

    Ok(())
}
