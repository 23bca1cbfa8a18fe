//! Configuration management for the Krishi workspace.
//!
//! Configuration is layered, later sources winning:
//! - Built-in defaults (the deployed graph's index list and labels)
//! - A YAML config file (`KRISHI_CONFIG`, or `krishi.yaml` in the working directory)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "krishi.yaml";

/// Database used when `NEO4J_DATABASE` is not set.
pub const DEFAULT_DATABASE: &str = "neo4j";

/// Fulltext indexes queried by the retrieval fan-out unless configured otherwise.
pub const DEFAULT_FULLTEXT_INDEXES: &[&str] = &[
    "categoryFulltext",
    "cropNameFulltext",
    "varietyNameFulltext",
    "stanNirbachonFulltext",
    "baponerShomoyFulltext",
    "beejChararHarFulltext",
    "rogBalaiDomanFulltext",
    "upojogiElakaFulltext",
    "boishisthoFulltext",
    "baponRoponerDurrottoFulltext",
    "marairShomoyFulltext",
    "antoporichorjaFulltext",
    "folonFulltext",
    "pokamakorFulltext",
    "pokamakorDomanFulltext",
    "rogBalaiFulltext",
    "sarBebosthaponaFulltext",
    "charaToriShomoyFulltext",
    "potNirbachonFulltext",
    "biseshUdyantattikBebosthaponaFulltext",
    "mediaFulltext",
];

/// Varieties served while the graph store is unavailable.
pub const DEFAULT_FALLBACK_VARIETIES: &[&str] = &[
    "ব্রি ধান২৮",
    "ব্রি ধান২৯",
    "ব্রি ধান৫০",
    "ব্রি ধান৫৮",
    "বারি আলু-৭",
    "বারি আলু-৮",
    "বারি টমেটো-২",
    "বারি টমেটো-৩",
];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Graph store connection and schema settings
    pub graph: GraphConfig,

    /// Completion endpoint settings
    pub llm: LlmSettings,

    /// Retrieval fan-out settings
    pub retrieval: RetrievalConfig,

    /// Directory with prompt definition overrides
    pub prompts_dir: Option<PathBuf>,

    /// Variety names served in demo mode
    pub fallback_varieties: Vec<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Graph store connection and schema settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Bolt URI, e.g. `neo4j+s://example.databases.neo4j.io`
    pub uri: Option<String>,

    pub username: Option<String>,

    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Database name
    pub database: String,

    /// Node label carrying variety names
    pub variety_label: String,

    /// Property holding the variety name on `variety_label` nodes
    pub variety_property: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: None,
            username: None,
            password: None,
            database: DEFAULT_DATABASE.to_string(),
            variety_label: "Variety Name".to_string(),
            variety_property: "জাতের নাম".to_string(),
        }
    }
}

/// Completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider name ("openai" or "ollama")
    pub provider: String,

    /// Model identifier sent with every completion request
    pub model: String,

    /// Custom endpoint base URL
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Resolved API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub temperature: Option<f32>,

    pub max_tokens: Option<u32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            endpoint: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Retrieval fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Fulltext indexes queried for every question, in fan-out order
    pub fulltext_indexes: Vec<String>,

    /// Hits per index when a variety was matched in the question
    pub variety_limit: usize,

    /// Hits per index for broad questions
    pub broad_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            fulltext_indexes: DEFAULT_FULLTEXT_INDEXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            variety_limit: 5,
            broad_limit: 3,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    graph: Option<GraphSection>,
    llm: Option<LlmSection>,
    retrieval: Option<RetrievalSection>,
    prompts: Option<PromptsSection>,
    #[serde(rename = "fallbackVarieties")]
    fallback_varieties: Option<Vec<String>>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GraphSection {
    uri: Option<String>,
    username: Option<String>,
    #[serde(rename = "passwordEnv")]
    password_env: Option<String>,
    database: Option<String>,
    #[serde(rename = "varietyLabel")]
    variety_label: Option<String>,
    #[serde(rename = "varietyProperty")]
    variety_property: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    temperature: Option<f32>,
    #[serde(rename = "maxTokens")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RetrievalSection {
    #[serde(rename = "fulltextIndexes")]
    fulltext_indexes: Option<Vec<String>>,
    #[serde(rename = "varietyLimit")]
    variety_limit: Option<usize>,
    #[serde(rename = "broadLimit")]
    broad_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PromptsSection {
    dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            graph: GraphConfig::default(),
            llm: LlmSettings::default(),
            retrieval: RetrievalConfig::default(),
            prompts_dir: None,
            fallback_varieties: DEFAULT_FALLBACK_VARIETIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// Environment variables:
    /// - `KRISHI_CONFIG`: Path to config file
    /// - `NEO4J_URI`, `NEO4J_USERNAME`, `NEO4J_PASSWORD`, `NEO4J_DATABASE`
    /// - `OPENAI_API_KEY` (or the variable named by `llm.apiKeyEnv`)
    /// - `KRISHI_PROVIDER`, `KRISHI_MODEL`, `KRISHI_LLM_ENDPOINT`
    /// - `KRISHI_FULLTEXT_INDEXES`: comma separated index names
    /// - `KRISHI_PROMPTS_DIR`: prompt definition overrides
    /// - `RUST_LOG`, `NO_COLOR`
    ///
    /// # Example
    /// ```no_run
    /// use krishi_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Database: {}", config.graph.database);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], with an explicit config file taking
    /// precedence over `KRISHI_CONFIG`.
    pub fn load_from(config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        let explicit = config_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("KRISHI_CONFIG").ok().map(PathBuf::from));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    config = config.merge_yaml(&path)?;
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut result = self.merge_yaml_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        result.config_file = Some(path.to_path_buf());

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(graph) = file.graph {
            if graph.uri.is_some() {
                result.graph.uri = graph.uri;
            }
            if graph.username.is_some() {
                result.graph.username = graph.username;
            }
            if let Some(env) = graph.password_env {
                result.graph.password = std::env::var(&env).ok();
            }
            if let Some(database) = graph.database {
                result.graph.database = database;
            }
            if let Some(label) = graph.variety_label {
                result.graph.variety_label = label;
            }
            if let Some(property) = graph.variety_property {
                result.graph.variety_property = property;
            }
        }

        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                result.llm.provider = provider;
            }
            if let Some(model) = llm.model {
                result.llm.model = model;
            }
            if llm.endpoint.is_some() {
                result.llm.endpoint = llm.endpoint;
            }
            if let Some(env) = llm.api_key_env {
                result.llm.api_key_env = env;
            }
            if llm.temperature.is_some() {
                result.llm.temperature = llm.temperature;
            }
            if llm.max_tokens.is_some() {
                result.llm.max_tokens = llm.max_tokens;
            }
        }

        if let Some(retrieval) = file.retrieval {
            if let Some(indexes) = retrieval.fulltext_indexes {
                result.retrieval.fulltext_indexes = indexes;
            }
            if let Some(limit) = retrieval.variety_limit {
                result.retrieval.variety_limit = limit;
            }
            if let Some(limit) = retrieval.broad_limit {
                result.retrieval.broad_limit = limit;
            }
        }

        if let Some(dir) = file.prompts.and_then(|p| p.dir) {
            result.prompts_dir = Some(PathBuf::from(dir));
        }

        if let Some(varieties) = file.fallback_varieties {
            result.fallback_varieties = varieties;
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply environment variables through `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(uri) = lookup("NEO4J_URI") {
            self.graph.uri = Some(uri);
        }
        if let Some(username) = lookup("NEO4J_USERNAME") {
            self.graph.username = Some(username);
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            self.graph.password = Some(password);
        }
        if let Some(database) = lookup("NEO4J_DATABASE").filter(|d| !d.is_empty()) {
            self.graph.database = database;
        }

        if let Some(provider) = lookup("KRISHI_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Some(model) = lookup("KRISHI_MODEL") {
            self.llm.model = model;
        }
        if let Some(endpoint) = lookup("KRISHI_LLM_ENDPOINT") {
            self.llm.endpoint = Some(endpoint);
        }
        if let Some(key) = lookup(&self.llm.api_key_env).filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }

        if let Some(indexes) = lookup("KRISHI_FULLTEXT_INDEXES") {
            let parsed = parse_index_list(&indexes);
            if !parsed.is_empty() {
                self.retrieval.fulltext_indexes = parsed;
            }
        }

        if let Some(dir) = lookup("KRISHI_PROMPTS_DIR") {
            self.prompts_dir = Some(PathBuf::from(dir));
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = Some(level);
        }
        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over the environment and the config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.llm.provider = provider;
        }

        if let Some(model) = model {
            self.llm.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate that the pipeline can be started with this configuration.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["openai", "ollama"];
        let provider = self.llm.provider.to_lowercase();
        if !known_providers.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.llm.provider,
                known_providers.join(", ")
            )));
        }

        if provider == "openai" && self.llm.api_key.is_none() {
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                self.llm.api_key_env
            )));
        }

        let mut missing = Vec::new();
        if self.graph.uri.is_none() {
            missing.push("NEO4J_URI");
        }
        if self.graph.username.is_none() {
            missing.push("NEO4J_USERNAME");
        }
        if self.graph.password.is_none() {
            missing.push("NEO4J_PASSWORD");
        }
        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "Graph store is not configured, missing: {}",
                missing.join(", ")
            )));
        }

        if self.retrieval.fulltext_indexes.is_empty() {
            return Err(AppError::Config(
                "At least one fulltext index must be configured".to_string(),
            ));
        }

        if self.retrieval.variety_limit == 0 || self.retrieval.broad_limit == 0 {
            return Err(AppError::Config(
                "Per-index retrieval limits must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Split a comma separated index list, dropping blanks.
fn parse_index_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
