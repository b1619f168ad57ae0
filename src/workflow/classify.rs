//! Classifier stage
//!
//! One oracle request per unique non-empty description, strictly sequential,
//! matching the description against the full candidate code list. Codes the
//! table cannot resolve are replaced by the sentinel; identical descriptions
//! within one run reuse the cached code without a second request.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppResult, ConfigError, FileError, OracleError};
use crate::models::{ClassifiedEntity, CodeTable, DescribedEntity, Taxonomy, COULD_NOT_CLASSIFY};
use crate::services::chunk_store::{self, DESCRIPTIONS_PREFIX};
use crate::services::oracle::{strip_code_fences, Oracle, WebSearch};
use crate::utils::logging;

const INSTRUCTION: &str = r#"You will receive:
1. A company's business model description.
2. A list of industry codes and the classifications they represent.

Your task:
- Consider all codes and match the company to the most appropriate code based on the business model description.
- You MUST select one code from the provided list.
- If classification cannot be made, set the code to "Could not be classified".
- If company descriptions are duplicated, then return the same codes.

Rules:
- Interpret the entire business model description as a whole to make the classification.
- The code must only come from the provided list.
- Do NOT guess outside the list.

Output format (VERY IMPORTANT):
Return ONLY a single JSON object, nothing else, with exactly this key:

{
  "code": "...."
}"#;

pub struct ClassifyOptions {
    pub taxonomy: Taxonomy,
    /// Reference CSV path; defaults to the taxonomy's standard file name.
    pub codes_file: Option<PathBuf>,
    pub num_files: usize,
}

/// Run the classifier over description files 1..=`num_files`.
///
/// The code table is loaded once; the description-to-code cache spans the
/// whole run and is discarded on exit.
pub async fn run(config: &Config, oracle: &dyn Oracle, options: &ClassifyOptions) -> AppResult<()> {
    logging::log_run_start("classification", options.num_files);

    let codes_path = options
        .codes_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(options.taxonomy.default_codes_file()));

    let table = CodeTable::load(options.taxonomy, &codes_path)?;
    if table.is_empty() {
        return Err(ConfigError::EmptyCodeTable { path: codes_path }.into());
    }
    info!(
        "✓ loaded {} code(s) from {}",
        table.len(),
        codes_path.display()
    );

    fs::create_dir_all(&config.classifications_dir)
        .map_err(|e| FileError::write(&config.classifications_dir, e))?;

    // run-scoped: duplicate descriptions never re-query the oracle
    let mut cache: HashMap<String, String> = HashMap::new();

    for index in 1..=options.num_files {
        let input_path = chunk_store::chunk_path(
            Path::new(&config.descriptions_dir),
            DESCRIPTIONS_PREFIX,
            index,
        );
        let output_path = chunk_store::chunk_path(
            Path::new(&config.classifications_dir),
            options.taxonomy.output_prefix(),
            index,
        );

        logging::log_file_start(index, options.num_files, &input_path);
        let started = Instant::now();

        let entities = chunk_store::read_described(&input_path)?;
        info!("classifying {} business(es)...", entities.len());

        let classified = match classify_entities(oracle, &table, &entities, &mut cache).await {
            Ok(classified) => classified,
            Err(e) => {
                error!("❌ classification failed for file {}: {}", index, e);
                return Err(e.into());
            }
        };

        chunk_store::write_classified(&output_path, &classified)?;
        logging::log_file_done(index, &output_path, started.elapsed());
    }

    Ok(())
}

/// Classify one ordered batch of described entities.
///
/// `cache` maps exact description text to the resolved code (sentinel
/// included) so identical descriptions within one run cost one request.
pub async fn classify_entities(
    oracle: &dyn Oracle,
    table: &CodeTable,
    entities: &[DescribedEntity],
    cache: &mut HashMap<String, String>,
) -> Result<Vec<ClassifiedEntity>, OracleError> {
    let mut rows = Vec::with_capacity(entities.len());

    for entity in entities {
        let code = resolve_code(oracle, table, entity, cache).await?;
        let row = if code == COULD_NOT_CLASSIFY {
            ClassifiedEntity::unclassified(entity.name.clone(), entity.description.clone())
        } else {
            ClassifiedEntity {
                name: entity.name.clone(),
                description: entity.description.clone(),
                label: table
                    .label_for(&code)
                    .unwrap_or(COULD_NOT_CLASSIFY)
                    .to_string(),
                code,
            }
        };
        rows.push(row);
    }

    Ok(rows)
}

/// Resolve the code for one entity: blank short-circuit, then cache, then one
/// oracle request validated against the table.
async fn resolve_code(
    oracle: &dyn Oracle,
    table: &CodeTable,
    entity: &DescribedEntity,
    cache: &mut HashMap<String, String>,
) -> Result<String, OracleError> {
    let description = entity.description.as_str();

    // blank description: cannot classify, zero oracle calls
    if description.trim().is_empty() {
        return Ok(COULD_NOT_CLASSIFY.to_string());
    }

    if let Some(code) = cache.get(description) {
        debug!("cache hit for description of {:?}", entity.name);
        return Ok(code.clone());
    }

    let prompt = build_prompt(description, table);
    let raw = oracle.complete(&prompt, None, WebSearch::Disabled).await?;

    let code = match parse_code(&raw) {
        Some(candidate) if candidate == COULD_NOT_CLASSIFY || table.contains(&candidate) => {
            candidate
        }
        Some(candidate) => {
            // keep the rejected value visible; the output contract stays sentinel-only
            warn!(
                "oracle returned a code outside the reference set for {:?}, substituting sentinel (raw: {:?})",
                entity.name, candidate
            );
            COULD_NOT_CLASSIFY.to_string()
        }
        None => {
            warn!(
                "oracle response for {:?} could not be parsed as a single code (raw: {:?})",
                entity.name, raw
            );
            COULD_NOT_CLASSIFY.to_string()
        }
    };

    cache.insert(description.to_string(), code.clone());
    Ok(code)
}

fn build_prompt(description: &str, table: &CodeTable) -> String {
    // the candidate list is re-serialized into every request on purpose:
    // each request is self-contained and stateless on the oracle side
    format!(
        "{}\n\nBusiness Description:\n{}\n\nAvailable Industries:\n{}",
        INSTRUCTION,
        description,
        table.prompt_block()
    )
}

/// Extract a single code value from the oracle payload.
///
/// Prefers a JSON object with a `code` key; falls back to the first
/// non-empty line of plain text.
fn parse_code(raw: &str) -> Option<String> {
    let body = strip_code_fences(raw);
    if body.is_empty() {
        return None;
    }

    if body.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            let code = value.get("code").and_then(|v| v.as_str())?.trim();
            if code.is_empty() {
                return None;
            }
            return Some(code.to_string());
        }
        // brace but not valid JSON: fall through to plain text
    }

    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(String::from)
}
