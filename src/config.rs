use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Search backend: "elastic" or "memory".
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_search_url")]
    pub url: String,
    #[serde(default = "default_index")]
    pub index: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: default_search_url(),
            index: default_index(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_backend() -> String {
    "elastic".to_string()
}
fn default_search_url() -> String {
    "http://127.0.0.1:9200".to_string()
}
fn default_index() -> String {
    "items".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

/// Expiry policy for the two cached read paths. The paths never share a
/// TTL silently — each is configured on its own key.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_search_ttl_secs")]
    pub search_ttl_secs: u64,
    #[serde(default = "default_autocomplete_ttl_secs")]
    pub autocomplete_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            search_ttl_secs: default_search_ttl_secs(),
            autocomplete_ttl_secs: default_autocomplete_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }

    pub fn autocomplete_ttl(&self) -> Duration {
        Duration::from_secs(self.autocomplete_ttl_secs)
    }
}

// Full search results stay cached for a day.
fn default_search_ttl_secs() -> u64 {
    86_400
}
fn default_autocomplete_ttl_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    match config.search.backend.as_str() {
        "elastic" | "memory" => {}
        other => anyhow::bail!(
            "Unknown search backend: '{}'. Must be elastic or memory.",
            other
        ),
    }

    if config.search.index.is_empty() {
        anyhow::bail!("search.index must not be empty");
    }

    if config.cache.search_ttl_secs == 0 || config.cache.autocomplete_ttl_secs == 0 {
        anyhow::bail!("cache TTLs must be > 0");
    }

    Ok(config)
}
