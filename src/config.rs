//! Configuration loading and management for song-vocab.
//!
//! Loads settings from `song-vocab.toml` with environment variable overrides.
//! Every setting has a default, so running without a config file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE: &str = "song-vocab.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Web search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// DuckDuckGo HTML endpoint
    pub endpoint: String,
    /// Results requested per query
    pub max_results: usize,
}

/// Page fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Browser-like identity sent to lyrics sites
    pub user_agent: String,
}

/// Storage paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory lyrics artifacts are written to
    pub path: PathBuf,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from the default location (song-vocab.toml in cwd or home),
    /// or defaults when no file exists
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                let mut config = Config::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse configuration text without consulting the environment
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env(&mut self) {
        if let Ok(bind) = std::env::var("SONG_VOCAB_BIND") {
            self.server.bind = bind;
        }
        if let Ok(dir) = std::env::var("SONG_VOCAB_LYRICS_DIR") {
            self.storage.path = PathBuf::from(dir);
        }
        if let Ok(endpoint) = std::env::var("SONG_VOCAB_SEARCH_ENDPOINT") {
            self.search.endpoint = endpoint;
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("song-vocab")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            max_results: 15,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./lyrics"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.search.max_results, 15);
        assert_eq!(config.fetch.timeout(), Duration::from_secs(10));
        assert_eq!(config.storage.path, PathBuf::from("./lyrics"));
        assert_eq!(config.server.bind, "0.0.0.0:8000");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [fetch]
            timeout_secs = 3

            [storage]
            path = "/tmp/lyrics"
            "#,
        )
        .unwrap();
        assert_eq!(config.fetch.timeout_secs, 3);
        assert!(config.fetch.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.storage.path, PathBuf::from("/tmp/lyrics"));
        assert_eq!(config.search.endpoint, "https://html.duckduckgo.com/html/");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::parse("[search\nmax_results = 1"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[search]\nmax_results = 5\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.max_results, 5);
    }
}
