//! Configuration management
//!
//! TOML-based configuration with defaults and validation.
//! Location: ~/.omichat/config.toml

use crate::errors::{ChatError, Result};
use crate::ollama::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
use crate::search::searx::DEFAULT_SEARX_URL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete configuration for omichat
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ollama: OllamaConfig,
    pub search: SearchConfig,
    pub repl: ReplConfig,
}

/// Ollama connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
}

/// Web search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// "duckduckgo" or "searx"
    pub backend: String,
    pub searx_url: String,
    pub max_results: usize,
}

/// REPL behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    pub history_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ollama: OllamaConfig::default(),
            search: SearchConfig::default(),
            repl: ReplConfig::default(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        OllamaConfig {
            host: "127.0.0.1".to_string(),
            port: 11434,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            backend: "duckduckgo".to_string(),
            searx_url: DEFAULT_SEARX_URL.to_string(),
            max_results: 3,
        }
    }
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            history_file: "~/.omichat/history".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ChatError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location or fall back to built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".omichat").join("config.toml");
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }
        Ok(Config::default())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.ollama.host.is_empty() {
            return Err(ChatError::Config("ollama.host must not be empty".to_string()));
        }

        if self.ollama.model.is_empty() {
            return Err(ChatError::Config(
                "ollama.model must not be empty".to_string(),
            ));
        }

        match self.search.backend.as_str() {
            "duckduckgo" | "searx" => {}
            other => {
                return Err(ChatError::Config(format!(
                    "Invalid search backend: {} (expected 'duckduckgo' or 'searx')",
                    other
                )))
            }
        }

        if self.search.max_results == 0 || self.search.max_results > 10 {
            return Err(ChatError::Config(
                "search.max_results must be between 1 and 10".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &PathBuf) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ChatError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ChatError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ChatError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get Ollama base URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }

    /// Expand a leading tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Resolved REPL history file path, `None` when disabled
    pub fn history_path(&self) -> Option<PathBuf> {
        if self.repl.history_file.is_empty() {
            None
        } else {
            Some(Self::expand_path(&self.repl.history_file))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ollama.host, "127.0.0.1");
        assert_eq!(config.ollama.port, 11434);
        assert_eq!(config.ollama.model, "OMI");
        assert_eq!(config.search.backend, "duckduckgo");
        assert_eq!(config.search.max_results, 3);
    }

    #[test]
    fn test_default_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_unknown_backend() {
        let mut config = Config::default();
        config.search.backend = "bing".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_result_count() {
        let mut config = Config::default();
        config.search.max_results = 0;
        assert!(config.validate().is_err());
        config.search.max_results = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_model() {
        let mut config = Config::default();
        config.ollama.model = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ollama_url() {
        assert_eq!(Config::default().ollama_url(), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.ollama.model = "llama3.2:3b".to_string();
        config.search.backend = "searx".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.ollama.model, "llama3.2:3b");
        assert_eq!(loaded.search.backend, "searx");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[ollama]\nmodel = \"custom\"\n").unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.ollama.model, "custom");
        assert_eq!(loaded.ollama.port, 11434);
        assert_eq!(loaded.search.backend, "duckduckgo");
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.omichat");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        assert_eq!(
            Config::expand_path("/absolute/path").to_string_lossy(),
            "/absolute/path"
        );
    }

    #[test]
    fn test_history_disabled_by_empty_string() {
        let mut config = Config::default();
        config.repl.history_file = String::new();
        assert!(config.history_path().is_none());
    }
}
