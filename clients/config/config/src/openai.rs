use std::fmt;

use serde::Deserialize;

use crate::{envy_load, FromEnv};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Completion service settings, read from `OPENAI_KEY`, `OPENAI_MODEL` and `OPENAI_API_BASE`.
#[derive(Clone, PartialEq, Deserialize)]
pub struct OpenAIConfig {
    /// Bearer credential. Left optional here so a missing key is reported by the client
    /// rather than as a generic config error.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl OpenAIConfig {
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            model: default_model(),
            api_base: default_api_base(),
        }
    }
}

impl FromEnv for OpenAIConfig {
    fn from_env() -> anyhow::Result<Self> {
        envy_load("openai", "OPENAI_")
    }
}

impl fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}
