use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    /// Explicit degraded mode: replies come from the canned responder and no
    /// request leaves the machine. Never inferred from a missing key.
    #[serde(default)]
    pub offline: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

/// What the session actually runs against once the config file and the
/// environment have been collapsed: the canned offline responder, or a remote
/// endpoint with every credential resolved.
#[derive(Debug, PartialEq)]
pub enum Mode {
    Offline,
    Remote {
        api_key: String,
        endpoint: String,
        model: String,
    },
}

impl Config {
    pub fn load() -> Result<Self> {
        let candidates = [
            env::var("STRATCHAT_CONFIG").ok().map(PathBuf::from),
            dirs::config_dir().map(|dir| dir.join("stratchat").join("config.toml")),
        ];
        for path in candidates.into_iter().flatten() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }
        Ok(Self::default())
    }

    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Collapse file values and environment variables into the startup mode.
    /// Each `llm` field falls back to its environment variable; the model
    /// falls back further to `menu_model`, the menu selection. A missing API
    /// key outside offline mode is fatal here, before any loop starts.
    pub fn resolve(self, menu_model: &str) -> Result<Mode> {
        let offline = self.offline
            || env::var("STRATCHAT_OFFLINE")
                .map(|v| v == "1")
                .unwrap_or(false);
        if offline {
            return Ok(Mode::Offline);
        }

        let api_key = self
            .llm
            .api_key
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .context("OPENAI_API_KEY is required (set it via config file or environment variable)")?;
        let endpoint = self
            .llm
            .endpoint
            .or_else(|| env::var("OPENAI_ENDPOINT").ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let model = self
            .llm
            .model
            .or_else(|| env::var("OPENAI_MODEL").ok())
            .unwrap_or_else(|| menu_model.to_string());

        Ok(Mode::Remote {
            api_key,
            endpoint,
            model,
        })
    }
}
