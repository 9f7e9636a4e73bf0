mod loader;

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub use loader::load_config;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Listen address and CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Frontend origins allowed by the CORS layer
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Upstream Generative Language API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the upstream API
    #[serde(default = "default_upstream_url")]
    pub url: String,
    /// Ceiling for a whole upstream call, streaming included
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// API key injected into every relayed request. Usually comes from the
    /// GOOGLE_API_KEY environment variable rather than the config file.
    #[serde(default)]
    pub api_key: Option<ApiKey>,
}

fn default_upstream_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    300
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_seconds: default_timeout(),
            api_key: None,
        }
    }
}

impl UpstreamConfig {
    /// Returns the base URL with trailing slash stripped
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Style retrieval configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Directory holding the persisted vector store
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Fallback embedding model when upstream resolution fails
    #[serde(default = "default_embedding_model")]
    pub default_embedding_model: String,
    /// Number of style examples returned per topic
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("style_db")
}

fn default_embedding_model() -> String {
    "models/text-embedding-004".to_string()
}

fn default_top_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            default_embedding_model: default_embedding_model(),
            top_k: default_top_k(),
        }
    }
}

/// Upstream credential. Debug output is redacted so the key cannot end up
/// in logs or panic messages.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for building upstream requests only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load from `path` if it exists, otherwise start from defaults. The
    /// GOOGLE_API_KEY environment variable is merged in either way; this is
    /// the only place the environment is consulted.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            AppConfig::default()
        };
        config.merge_env();
        Ok(config)
    }

    /// Fill the upstream credential from the environment if the config file
    /// did not set one.
    pub fn merge_env(&mut self) {
        if self.upstream.api_key.is_none() {
            if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
                if !key.is_empty() {
                    self.upstream.api_key = Some(ApiKey::new(key));
                }
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}
