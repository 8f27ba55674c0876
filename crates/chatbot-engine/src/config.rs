//! Configuration for the chatbot.
//!
//! Settings live in an optional JSON file; every field has a default, so a
//! missing file or a partial one both work. The API credential is never
//! stored there. It comes from the process environment.

use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::generation::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Primary environment variable holding the API key.
pub const API_KEY_ENV: &str = "CHATBOT_API_KEY";

/// Checked when [`API_KEY_ENV`] is unset.
pub const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Model name passed to the generation endpoint.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generation API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling parameters sent with every request.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Colour scheme of the widget.
    #[serde(default)]
    pub theme: ThemeVariant,
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

/// The two colour schemes the widget ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeVariant {
    /// Red accents on near-black.
    #[default]
    Crimson,
    /// Amber accents on warm grey.
    Ember,
}

impl ThemeVariant {
    /// Parse a variant name as written in config files and flags.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "crimson" => Some(Self::Crimson),
            "ember" => Some(Self::Ember),
            _ => None,
        }
    }

    /// Lowercase name of the variant.
    pub fn name(self) -> &'static str {
        match self {
            Self::Crimson => "crimson",
            Self::Ember => "ember",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            generation: GenerationConfig::default(),
            theme: ThemeVariant::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }
}

/// Read the API key from the process environment.
///
/// The key is taken as-is: no validation, no trimming. A missing key only
/// shows up later, as a failed generation call.
pub fn api_key_from_env() -> Option<String> {
    resolve_api_key(|name| std::env::var(name).ok())
}

/// Resolve the API key through `lookup`, preferring [`API_KEY_ENV`].
pub fn resolve_api_key(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    lookup(API_KEY_ENV)
        .filter(|key| !key.is_empty())
        .or_else(|| lookup(FALLBACK_API_KEY_ENV).filter(|key| !key.is_empty()))
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
