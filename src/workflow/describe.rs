//! Description fetcher stage
//!
//! One web-search-enabled oracle request per chunk of business names,
//! returning exactly one description per name in input order. Positional
//! correspondence is the only link between name and description, so a
//! returned list of any other length fails the chunk.

use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppResult, FileError, OracleError};
use crate::models::{DescribedEntity, MULTIPLE_MATCHES};
use crate::services::chunk_store::{self, DESCRIPTIONS_PREFIX, NAMES_PREFIX};
use crate::services::oracle::{strip_code_fences, Oracle, WebSearch};
use crate::utils::logging;

/// Run the description fetcher over chunk files 1..=`num_files`.
///
/// A shape or count failure aborts the run; output files already written for
/// earlier chunks stay valid and the run can be restarted at the first
/// incomplete index.
pub async fn run(config: &Config, oracle: &dyn Oracle, num_files: usize) -> AppResult<()> {
    logging::log_run_start("description fetch", num_files);

    fs::create_dir_all(&config.descriptions_dir)
        .map_err(|e| FileError::write(&config.descriptions_dir, e))?;

    for index in 1..=num_files {
        let input_path =
            chunk_store::chunk_path(Path::new(&config.names_dir), NAMES_PREFIX, index);
        let output_path = chunk_store::chunk_path(
            Path::new(&config.descriptions_dir),
            DESCRIPTIONS_PREFIX,
            index,
        );

        logging::log_file_start(index, num_files, &input_path);
        let started = Instant::now();

        let names = chunk_store::read_names(&input_path)?;
        if names.is_empty() {
            warn!("⚠️ chunk {} contains no names, writing empty output", index);
            chunk_store::write_described(&output_path, &[])?;
            continue;
        }

        info!("sending {} name(s) to the oracle in one request...", names.len());
        let entities = match fetch_descriptions(oracle, &names).await {
            Ok(entities) => entities,
            Err(e) => {
                error!("❌ description request failed for chunk {}: {}", index, e);
                return Err(e.into());
            }
        };

        chunk_store::write_described(&output_path, &entities)?;
        logging::log_file_done(index, &output_path, started.elapsed());
    }

    Ok(())
}

/// Fetch one description per name with a single oracle request.
///
/// The names keep their input order; descriptions are paired positionally.
pub async fn fetch_descriptions(
    oracle: &dyn Oracle,
    names: &[String],
) -> Result<Vec<DescribedEntity>, OracleError> {
    let prompt = build_prompt(names);
    let raw = oracle.complete(&prompt, None, WebSearch::Enabled).await?;
    let descriptions = parse_descriptions(&raw, names.len())?;

    Ok(names
        .iter()
        .cloned()
        .zip(descriptions)
        .map(|(name, description)| DescribedEntity { name, description })
        .collect())
}

fn build_prompt(names: &[String]) -> String {
    format!(
        "{}\n\nCompanies:\n{}",
        instruction(),
        names.join("\n")
    )
}

fn instruction() -> String {
    format!(
        r#"You will receive a list of company names.
For each company, return a CSV with two columns:
1) Company Name
2) Business Model Description (short, factual, 3 sentences)

Do a web search to find accurate information on what the main business model is.
Consult multiple sources if needed.
Do not guess based on the company name.
Leave the description empty if no reliable information is found.
If several distinct businesses share the same name, return exactly: {}
If company names are duplicated, then return the same description.

Output ONLY valid CSV. No extra text."#,
        MULTIPLE_MATCHES
    )
}

/// Parse the oracle payload into exactly `expected` descriptions.
///
/// Accepts either two-column CSV text (optionally fenced, optionally with an
/// echoed header row) or a JSON object carrying an ordered `descriptions`
/// array. Anything else, or any other count, is a shape error.
fn parse_descriptions(raw: &str, expected: usize) -> Result<Vec<String>, OracleError> {
    let body = strip_code_fences(raw);

    let descriptions = if body.trim_start().starts_with('{') {
        parse_json_payload(body)?
    } else {
        parse_csv_payload(body)?
    };

    if descriptions.len() != expected {
        return Err(OracleError::CountMismatch {
            expected,
            actual: descriptions.len(),
        });
    }

    Ok(descriptions)
}

fn parse_json_payload(body: &str) -> Result<Vec<String>, OracleError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| OracleError::Shape {
            reason: format!("invalid JSON payload: {}", e),
        })?;

    let list = value
        .get("descriptions")
        .and_then(|v| v.as_array())
        .ok_or_else(|| OracleError::Shape {
            reason: "JSON payload is missing a \"descriptions\" array".to_string(),
        })?;

    list.iter()
        .map(|item| {
            item.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| OracleError::Shape {
                    reason: "\"descriptions\" entries must be strings".to_string(),
                })
        })
        .collect()
}

fn parse_csv_payload(body: &str) -> Result<Vec<String>, OracleError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut rows: Vec<(String, String)> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| OracleError::Shape {
            reason: format!("invalid CSV payload: {}", e),
        })?;
        let first = record.get(0).unwrap_or("").trim().to_string();
        let second = record.get(1).unwrap_or("").trim().to_string();
        if first.is_empty() && second.is_empty() {
            continue;
        }
        rows.push((first, second));
    }

    // an echoed header row is never a description: drop it unconditionally,
    // so a payload that echoes the header AND drops a row still fails the
    // count check instead of consuming the header as the first description
    if let Some((first, second)) = rows.first() {
        if looks_like_header(first, second) {
            rows.remove(0);
        }
    }

    Ok(rows.into_iter().map(|(_, description)| description).collect())
}

fn looks_like_header(first: &str, second: &str) -> bool {
    first.to_lowercase().contains("name") && second.to_lowercase().contains("description")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::oracle::testing::ScriptedOracle;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_plain_csv_payload() {
        let raw = "Acme Ltd,Sells anvils to coyotes.\nUnknown Co,\n";
        let descriptions = parse_descriptions(raw, 2).unwrap();
        assert_eq!(descriptions, vec!["Sells anvils to coyotes.", ""]);
    }

    #[test]
    fn test_parse_fenced_csv_with_header() {
        let raw = "```csv\nCompany Name,Business Model Description\nAcme Ltd,Sells anvils.\nUnknown Co,\n```";
        let descriptions = parse_descriptions(raw, 2).unwrap();
        assert_eq!(descriptions, vec!["Sells anvils.", ""]);
    }

    #[test]
    fn test_parse_quoted_descriptions_with_commas() {
        let raw = "Acme Ltd,\"Sells anvils, rockets, and paint.\"\n";
        let descriptions = parse_descriptions(raw, 1).unwrap();
        assert_eq!(descriptions, vec!["Sells anvils, rockets, and paint."]);
    }

    #[test]
    fn test_parse_json_payload() {
        let raw = r#"{"descriptions": ["Sells anvils.", ""]}"#;
        let descriptions = parse_descriptions(raw, 2).unwrap();
        assert_eq!(descriptions, vec!["Sells anvils.", ""]);
    }

    #[test]
    fn test_header_with_dropped_row_is_count_mismatch() {
        // header echoed AND one description missing: the header row must not
        // be consumed as the first description
        let raw = "Company Name,Business Model Description\nAcme Ltd,Sells anvils.\n";
        let err = parse_descriptions(raw, 2).unwrap_err();
        assert!(matches!(
            err,
            OracleError::CountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let raw = "Acme Ltd,Sells anvils.\n";
        let err = parse_descriptions(raw, 2).unwrap_err();
        assert!(matches!(
            err,
            OracleError::CountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_json_without_descriptions_array_is_shape_error() {
        let raw = r#"{"companies": ["Acme Ltd"]}"#;
        let err = parse_descriptions(raw, 1).unwrap_err();
        assert!(matches!(err, OracleError::Shape { .. }));
    }

    #[tokio::test]
    async fn test_fetch_descriptions_pairs_in_input_order() {
        let oracle = ScriptedOracle::new(vec![
            "Acme Ltd,Sells anvils.\nAcme Ltd,Sells anvils.\nUnknown Co,\n",
        ]);
        let names = names(&["Acme Ltd", "Acme Ltd", "Unknown Co"]);

        let entities = fetch_descriptions(&oracle, &names).await.unwrap();

        assert_eq!(oracle.call_count(), 1);
        assert_eq!(entities.len(), 3);
        assert_eq!(entities[0].name, "Acme Ltd");
        assert_eq!(entities[0].description, "Sells anvils.");
        assert_eq!(entities[1].description, "Sells anvils.");
        assert_eq!(entities[2].name, "Unknown Co");
        assert_eq!(entities[2].description, "");
    }

    #[tokio::test]
    async fn test_fetch_descriptions_count_mismatch_fails_chunk() {
        let oracle = ScriptedOracle::new(vec!["Acme Ltd,Sells anvils.\n"]);
        let names = names(&["Acme Ltd", "Unknown Co"]);

        let err = fetch_descriptions(&oracle, &names).await.unwrap_err();
        assert!(matches!(err, OracleError::CountMismatch { .. }));
    }

    #[tokio::test]
    async fn test_run_missing_chunk_file_is_file_error() {
        use crate::error::AppError;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let config = Config {
            names_dir: dir.path().join("missing").to_string_lossy().into_owned(),
            descriptions_dir: dir.path().join("out").to_string_lossy().into_owned(),
            ..Config::default()
        };
        let oracle = ScriptedOracle::new(vec![]);

        let err = run(&config, &oracle, 1).await.unwrap_err();
        assert!(matches!(err, AppError::File(_)));
    }

    #[tokio::test]
    async fn test_multiple_matches_sentinel_passes_through() {
        let oracle = ScriptedOracle::new(vec![
            "Acme Ltd,Multiple businesses with the same name exist\n",
        ]);
        let names = names(&["Acme Ltd"]);

        let entities = fetch_descriptions(&oracle, &names).await.unwrap();
        assert_eq!(entities[0].description, MULTIPLE_MATCHES);
    }
}
