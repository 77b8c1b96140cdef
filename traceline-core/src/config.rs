//! Configuration for traceline
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (TRACELINE_*)
//! 3. Config file (~/.config/traceline/config.toml)
//! 4. Default values

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::prompt::Lang;
use crate::{Error, Result};

/// Model endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,

    /// API key sent as a bearer token
    pub api_key: String,

    /// Model identifier
    pub model: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/v1".to_string(),
            api_key: "0".to_string(),
            model: "deepseek-coder-6.7b-instruct".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Model endpoint configuration
    pub api: ApiConfig,

    /// Prompt language
    pub lang: Lang,

    /// Token budget per code chunk
    pub max_chunk_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            lang: Lang::Zh,
            max_chunk_tokens: 3000,
        }
    }
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if the file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/traceline/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("traceline").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - TRACELINE_BASE_URL: endpoint base URL
    /// - TRACELINE_API_KEY: API key
    /// - TRACELINE_MODEL: model identifier
    /// - TRACELINE_LANG: prompt language (zh or en)
    /// - TRACELINE_MAX_CHUNK_TOKENS: token budget per chunk
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var("TRACELINE_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(api_key) = std::env::var("TRACELINE_API_KEY") {
            self.api.api_key = api_key;
        }

        if let Ok(model) = std::env::var("TRACELINE_MODEL") {
            self.api.model = model;
        }

        if let Ok(lang) = std::env::var("TRACELINE_LANG") {
            match lang.parse() {
                Ok(lang) => self.lang = lang,
                Err(e) => warn!(error = %e, "Ignoring TRACELINE_LANG"),
            }
        }

        if let Ok(budget) = std::env::var("TRACELINE_MAX_CHUNK_TOKENS") {
            match budget.parse() {
                Ok(budget) => self.max_chunk_tokens = budget,
                Err(_) => warn!(value = %budget, "Ignoring TRACELINE_MAX_CHUNK_TOKENS"),
            }
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, model: Option<String>, lang: Option<Lang>) -> Self {
        if let Some(model) = model {
            self.api.model = model;
        }

        if let Some(lang) = lang {
            self.lang = lang;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(model: Option<String>, lang: Option<Lang>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(model, lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/v1");
        assert_eq!(config.api.api_key, "0");
        assert_eq!(config.api.model, "deepseek-coder-6.7b-instruct");
        assert_eq!(config.lang, Lang::Zh);
        assert_eq!(config.max_chunk_tokens, 3000);
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default()
            .with_cli_overrides(Some("qwen2.5-coder-32b".to_string()), Some(Lang::En));

        assert_eq!(config.api.model, "qwen2.5-coder-32b");
        assert_eq!(config.lang, Lang::En);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
lang = "en"
max_chunk_tokens = 1500

[api]
base_url = "https://models.example.com/v1"
api_key = "secret"
model = "coder-v2"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "https://models.example.com/v1");
        assert_eq!(config.api.model, "coder-v2");
        assert_eq!(config.lang, Lang::En);
        assert_eq!(config.max_chunk_tokens, 1500);
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[api]
model = "coder-v2"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        // Everything else keeps its default
        assert_eq!(config.api.base_url, "http://localhost:8000/v1");
        assert_eq!(config.api.model, "coder-v2");
        assert_eq!(config.lang, Lang::Zh);
        assert_eq!(config.max_chunk_tokens, 3000);
    }
}
