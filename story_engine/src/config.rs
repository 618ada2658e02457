//! Engine configuration, loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use story_tree::Genre;

use crate::error::ConfigError;

/// Top-level engine configuration. Every field has a default, so an empty
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Genre selected when the engine starts.
    pub default_genre: Genre,
    pub generation: GenerationConfig,
    pub export: ExportConfig,
}

/// Settings for the remote generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Messages endpoint of the completion API.
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    /// Environment variable holding the API key, if one is sent.
    pub api_key_env: Option<String>,
    pub anthropic_version: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1000,
            api_key_env: Some("ANTHROPIC_API_KEY".to_string()),
            anthropic_version: "2023-06-01".to_string(),
        }
    }
}

/// Settings for the "copy all" export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub title: String,
    /// Width of the `=` rule under the title.
    pub rule_width: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "Fractal Story Tree - Generated Story".to_string(),
            rule_width: 50,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
