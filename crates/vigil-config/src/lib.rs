use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use vigil_engine::classifier::Classifier;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// TOML data model
// ---------------------------------------------------------------------------

/// Top-level TOML config file (`vigil.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VigilConfig {
    /// Upstream analysis object store.
    #[serde(default)]
    pub source: SourceConfig,
    /// Keyword classification.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Acknowledgement store.
    #[serde(default)]
    pub ack: AckConfig,
    /// Proxy server.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Where the analysis document and raw alerts live.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Results bucket base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Object key of the latest analysis document.
    #[serde(default = "default_object_key")]
    pub object_key: String,
    /// Absolute URL of the raw-alerts object (bare envelope array).
    #[serde(default = "default_raw_alerts_url")]
    pub raw_alerts_url: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            object_key: default_object_key(),
            raw_alerts_url: default_raw_alerts_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Which keyword set classifies messages. The upstream producers used two
/// different sets; call sites choose one intentionally here.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// "narrow", "broad", or "custom" (default: "broad").
    #[serde(default = "default_keyword_set")]
    pub keyword_set: String,
    /// Keywords used when `keyword_set = "custom"`.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Match reason reported for custom sets.
    #[serde(default = "default_custom_reason")]
    pub match_reason: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keyword_set: default_keyword_set(),
            keywords: Vec::new(),
            match_reason: default_custom_reason(),
        }
    }
}

/// Acknowledgement store location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AckConfig {
    /// Store file path. None = `~/.vigil/acknowledged.json`.
    pub path: Option<String>,
}

/// Proxy server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen port (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

fn default_base_url() -> String {
    "https://wazuh-results.s3.us-east-1.amazonaws.com".into()
}
fn default_object_key() -> String {
    "latest_analysis.json".into()
}
fn default_raw_alerts_url() -> String {
    "https://wazuh-raw.s3.us-east-1.amazonaws.com/wazuh/raw/alerts.json".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_keyword_set() -> String {
    "broad".into()
}
fn default_custom_reason() -> String {
    "Contains configured keyword".into()
}
fn default_port() -> u16 {
    3000
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
pub fn load(path: &Path) -> Result<VigilConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Load a config file if it exists, otherwise fall back to defaults.
pub fn load_or_default(path: &Path) -> Result<VigilConfig> {
    if path.exists() {
        load(path)
    } else {
        Ok(VigilConfig::default())
    }
}

/// Parse TOML text into a validated VigilConfig.
pub fn parse(toml_str: &str) -> Result<VigilConfig> {
    let config: VigilConfig = toml::from_str(toml_str)?;
    validate(&config)?;
    Ok(config)
}

impl VigilConfig {
    /// Build the classifier this config selects.
    pub fn resolve_classifier(&self) -> Classifier {
        match self.classifier.keyword_set.as_str() {
            "narrow" => Classifier::narrow(),
            "custom" => Classifier::custom(
                self.classifier.keywords.iter().map(String::as_str),
                &self.classifier.match_reason,
            ),
            _ => Classifier::broad(),
        }
    }

    /// Acknowledgement store path, honoring the config override.
    pub fn ack_store_path(&self) -> PathBuf {
        match &self.ack.path {
            Some(p) => PathBuf::from(p),
            None => vigil_engine::ack::default_store_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &VigilConfig) -> Result<()> {
    if config.source.base_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "source.base_url must not be empty".into(),
        ));
    }
    if config.source.object_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "source.object_key must not be empty".into(),
        ));
    }
    if config.source.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "source.timeout_secs must be >= 1".into(),
        ));
    }

    match config.classifier.keyword_set.as_str() {
        "narrow" | "broad" => {}
        "custom" => {
            if config
                .classifier
                .keywords
                .iter()
                .all(|k| k.trim().is_empty())
            {
                return Err(ConfigError::Validation(
                    "classifier.keywords must not be empty when keyword_set = \"custom\"".into(),
                ));
            }
        }
        other => {
            return Err(ConfigError::Validation(format!(
                "classifier.keyword_set must be \"narrow\", \"broad\" or \"custom\", got \"{other}\""
            )));
        }
    }

    if config.api.port == 0 {
        return Err(ConfigError::Validation("api.port must not be 0".into()));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
