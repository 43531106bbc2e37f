use anyhow::Context;
use serde::de::DeserializeOwned;

pub mod celestia;
pub mod openai;

pub use celestia::CelestiaConfig;
pub use openai::OpenAIConfig;

/// Configs that can be assembled from prefixed environment variables.
pub trait FromEnv: Sized {
    fn from_env() -> anyhow::Result<Self>;
}

/// Loads `T` from the variables starting with `prefix`; `name` only appears in the error.
pub fn envy_load<T: DeserializeOwned>(name: &str, prefix: &str) -> anyhow::Result<T> {
    envy::prefixed(prefix)
        .from_env()
        .with_context(|| format!("Cannot load config <{name}>"))
}
