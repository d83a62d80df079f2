// src/infra/config.rs — Configuration loading (TOML)
//
// The API key is never read from or written to this file; it is entered
// interactively and lives only in the session.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::generation::GenerationConfig;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationSection,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Initial slider positions. Values outside the allowed ranges are clamped
/// when converted into a [`GenerationConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSection {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSection {
    fn default() -> Self {
        let d = GenerationConfig::default();
        Self {
            temperature: d.temperature(),
            top_p: d.top_p(),
            top_k: d.top_k(),
            max_output_tokens: d.max_output_tokens(),
        }
    }
}

impl GenerationSection {
    pub fn to_generation_config(&self) -> GenerationConfig {
        GenerationConfig::new(
            self.temperature,
            self.top_p,
            self.top_k,
            self.max_output_tokens,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Root of the generative-language REST API.
    pub base_url: String,
    /// Model used when discovery fails.
    pub default_model: String,
    /// Per-request timeout. Unset means the HTTP client's own behavior.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: crate::provider::google::DEFAULT_BASE_URL.into(),
            default_model: crate::core::controller::FALLBACK_MODEL.into(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Preselected in the model list when the provider offers it.
    #[serde(default)]
    pub preferred_model: Option<String>,
    #[serde(default = "default_true")]
    pub spinner: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preferred_model: None,
            spinner: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        match paths::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
