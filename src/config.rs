/// Program configuration
#[derive(Clone, Debug)]
pub struct Config {
    // --- Oracle configuration ---
    pub oracle_api_key: String,
    pub oracle_api_base_url: String,
    /// Model used for description fetching; must support live web search
    pub description_model: String,
    /// Model used for code classification
    pub classification_model: String,
    // --- Stage directories ---
    /// Where the splitter writes name chunks
    pub names_dir: String,
    /// Where the description fetcher writes name+description files
    pub descriptions_dir: String,
    /// Where the classifier writes result files
    pub classifications_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oracle_api_key: String::new(),
            oracle_api_base_url: "https://api.openai.com/v1".to_string(),
            description_model: "gpt-4o-search-preview".to_string(),
            classification_model: "gpt-4o-mini".to_string(),
            names_dir: "raw_business_names".to_string(),
            descriptions_dir: "out_business_descriptions".to_string(),
            classifications_dir: "out_classifications".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            oracle_api_key: std::env::var("ORACLE_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .unwrap_or(default.oracle_api_key),
            oracle_api_base_url: std::env::var("ORACLE_API_BASE_URL")
                .unwrap_or(default.oracle_api_base_url),
            description_model: std::env::var("DESCRIPTION_MODEL_NAME")
                .unwrap_or(default.description_model),
            classification_model: std::env::var("CLASSIFICATION_MODEL_NAME")
                .unwrap_or(default.classification_model),
            names_dir: std::env::var("NAMES_DIR").unwrap_or(default.names_dir),
            descriptions_dir: std::env::var("DESCRIPTIONS_DIR").unwrap_or(default.descriptions_dir),
            classifications_dir: std::env::var("CLASSIFICATIONS_DIR")
                .unwrap_or(default.classifications_dir),
        }
    }
}
