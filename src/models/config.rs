use serde::{Deserialize, Serialize};

use super::search::OutputFormat;
use crate::error::ConfigError;

pub const DEFAULT_GENERATION_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:11411";
pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 1536;
pub const DEFAULT_DOCUMENT_STORE_URL: &str = "postgres://localhost:5432/webharvest";
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "web_content";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub document_store: DocumentStoreConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub harvest: HarvestConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join("webharvest").join("config.toml"))
    }

    /// Load the config file if present, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Connection URLs and credentials can come from the environment,
    /// which wins over the config file.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.generation.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("GENERATION_URL") {
            self.generation.url = url;
        }
        if let Ok(url) = std::env::var("EMBEDDING_URL") {
            self.embedding.url = url;
        }
        if let Ok(key) = std::env::var("EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.document_store.url = url;
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            self.vector_store.url = url;
        }
        if let Ok(key) = std::env::var("QDRANT_API_KEY") {
            self.vector_store.api_key = Some(key);
        }
    }

    /// Startup validation for settings the pipeline cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::MissingCredential(
                "generation api key (set OPENAI_API_KEY)".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(ConfigError::ValidationError(
                "embedding dimension must be nonzero".to_string(),
            ));
        }
        if self.harvest.max_headings == 0 {
            return Err(ConfigError::ValidationError(
                "harvest max_headings must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("webharvest/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_url")]
    pub url: String,

    #[serde(default = "default_generation_model")]
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

fn default_generation_url() -> String {
    DEFAULT_GENERATION_URL.to_string()
}

fn default_generation_model() -> String {
    DEFAULT_GENERATION_MODEL.to_string()
}

fn default_generation_timeout() -> u64 {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            url: default_generation_url(),
            model: default_generation_model(),
            api_key: None,
            timeout_secs: default_generation_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_url")]
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_embedding_dimension")]
    pub dimension: u32,

    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

fn default_embedding_url() -> String {
    DEFAULT_EMBEDDING_URL.to_string()
}

fn default_embedding_dimension() -> u32 {
    DEFAULT_EMBEDDING_DIMENSION
}

fn default_embedding_timeout() -> u64 {
    120
}

fn default_batch_size() -> u32 {
    8
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: default_embedding_url(),
            api_key: None,
            dimension: default_embedding_dimension(),
            timeout_secs: default_embedding_timeout(),
            batch_size: default_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStoreConfig {
    #[serde(default = "default_document_store_url")]
    pub url: String,

    #[serde(default = "default_document_table")]
    pub table: String,

    #[serde(default = "default_pool_max")]
    pub pool_max: u32,
}

fn default_document_store_url() -> String {
    DEFAULT_DOCUMENT_STORE_URL.to_string()
}

fn default_document_table() -> String {
    "web_content".to_string()
}

fn default_pool_max() -> u32 {
    5
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            url: default_document_store_url(),
            table: default_document_table(),
            pool_max: default_pool_max(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_qdrant_url")]
    pub url: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_qdrant_url() -> String {
    DEFAULT_QDRANT_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: default_qdrant_url(),
            collection: default_collection(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Upper bound on headings sent to the summarizer per page.
    #[serde(default = "default_max_headings")]
    pub max_headings: u32,

    /// Character cap on page text fed to the summarizer and embedder.
    #[serde(default = "default_text_limit")]
    pub text_limit: u32,
}

fn default_max_headings() -> u32 {
    10
}

fn default_text_limit() -> u32 {
    4000
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_headings: default_max_headings(),
            text_limit: default_text_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    #[serde(default)]
    pub default_format: OutputFormat,
}

fn default_limit() -> u32 {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            default_format: OutputFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.generation.url, DEFAULT_GENERATION_URL);
        assert_eq!(config.embedding.url, DEFAULT_EMBEDDING_URL);
        assert_eq!(config.vector_store.url, DEFAULT_QDRANT_URL);
        assert_eq!(config.vector_store.collection, DEFAULT_COLLECTION);
        assert_eq!(config.harvest.max_headings, 10);
        assert_eq!(config.harvest.text_limit, 4000);
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path();
        assert!(path.is_some());
    }

    #[test]
    fn test_validate_requires_generation_key() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential(_))
        ));

        let mut config = Config::default();
        config.generation.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let mut config = Config::default();
        config.generation.api_key = Some("sk-test".to_string());
        config.embedding.dimension = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert!(config.user_agent.starts_with("webharvest/"));
    }
}
