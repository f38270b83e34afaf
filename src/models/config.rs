use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_GATEWAY_URL: &str = "https://api.openai.com";
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "transcripts_prod";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Dimension of the default embedding model. The vector store collection
/// must be created with the same value.
pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 1536;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub indexing: IndexingConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join("callscope").join("config.toml"))
    }

    /// Load from the config file, then let the environment override the
    /// credential. `OPENAI_API_KEY` never lands in the TOML file.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.is_empty()
        {
            config.gateway.api_key = Some(key);
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // The credential stays in the environment.
        let mut on_disk = self.clone();
        on_disk.gateway.api_key = None;

        let content = toml::to_string_pretty(&on_disk)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.enable_real_calls && self.gateway.api_key.is_none() {
            return Err(ConfigError::ValidationError(
                "enable_real_calls is set but OPENAI_API_KEY is not".to_string(),
            ));
        }
        if self.gateway.embedding_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "embedding_dimension must be positive".to_string(),
            ));
        }
        if self.gateway.sim_latency_ms_min > self.gateway.sim_latency_ms_max {
            return Err(ConfigError::ValidationError(
                "sim_latency_ms_min must not exceed sim_latency_ms_max".to_string(),
            ));
        }
        if self.indexing.embed_batch_size == 0 || self.indexing.upsert_batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "batch sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Completion/embedding gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// When false the gateway runs in simulation mode and never touches
    /// the network.
    #[serde(default)]
    pub enable_real_calls: bool,

    /// Bearer credential. Populated from `OPENAI_API_KEY`, required iff
    /// real calls are enabled.
    #[serde(skip)]
    pub api_key: Option<String>,

    #[serde(default = "default_gateway_url")]
    pub base_url: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Simulated-call latency window, in milliseconds.
    #[serde(default = "default_sim_latency_min")]
    pub sim_latency_ms_min: u64,

    #[serde(default = "default_sim_latency_max")]
    pub sim_latency_ms_max: u64,
}

fn default_gateway_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_embedding_dimension() -> u32 {
    DEFAULT_EMBEDDING_DIMENSION
}

fn default_timeout() -> u64 {
    120
}

fn default_sim_latency_min() -> u64 {
    100
}

fn default_sim_latency_max() -> u64 {
    300
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enable_real_calls: false,
            api_key: None,
            base_url: default_gateway_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            embedding_dimension: default_embedding_dimension(),
            timeout_secs: default_timeout(),
            sim_latency_ms_min: default_sim_latency_min(),
            sim_latency_ms_max: default_sim_latency_max(),
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
pub struct IndexingConfig {
    /// Texts per embedding API call.
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: u32,

    /// Points per vector-store upsert, 2x the embed batch so upserts
    /// amortize over two embedding rounds.
    #[serde(default = "default_upsert_batch_size")]
    pub upsert_batch_size: u32,

    /// Embedding chunks in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Cap on stored transcript text.
    #[serde(default = "default_max_stored_chars")]
    pub max_stored_chars: u32,
}

fn default_embed_batch_size() -> u32 {
    64
}

fn default_upsert_batch_size() -> u32 {
    128
}

fn default_concurrency() -> u32 {
    4
}

fn default_max_stored_chars() -> u32 {
    20_000
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            embed_batch_size: default_embed_batch_size(),
            upsert_batch_size: default_upsert_batch_size(),
            concurrency: default_concurrency(),
            max_stored_chars: default_max_stored_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_semantic_top_n")]
    pub semantic_top_n: u64,

    #[serde(default = "default_keyword_top_n")]
    pub keyword_top_n: u64,
}

fn default_semantic_top_n() -> u64 {
    5
}

fn default_keyword_top_n() -> u64 {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            semantic_top_n: default_semantic_top_n(),
            keyword_top_n: default_keyword_top_n(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.gateway.enable_real_calls);
        assert_eq!(config.gateway.embedding_dimension, 1536);
        assert_eq!(config.vector_store.collection, DEFAULT_COLLECTION);
        assert_eq!(config.indexing.embed_batch_size, 64);
        assert_eq!(config.indexing.upsert_batch_size, 128);
    }

    #[test]
    fn test_validate_requires_key_for_real_calls() {
        let mut config = Config::default();
        config.gateway.enable_real_calls = true;
        assert!(config.validate().is_err());

        config.gateway.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_simulation_needs_no_key() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_latency_window() {
        let mut config = Config::default();
        config.gateway.sim_latency_ms_min = 400;
        config.gateway.sim_latency_ms_max = 300;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = Config::default();
        config.gateway.api_key = Some("sk-secret".to_string());
        let toml = toml::to_string(&config).unwrap();
        assert!(!toml.contains("sk-secret"));
    }
}
