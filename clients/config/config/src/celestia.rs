use serde::Deserialize;

use crate::{envy_load, FromEnv};

pub const DEFAULT_EXPLORER_URL: &str = "https://arabica.celenium.io";

/// Settings for talking to a Celestia node. The node endpoint itself is given on the command line.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CelestiaConfig {
    /// JWT for nodes running with auth enabled. Nodes started with `--rpc.skip-auth` need none.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Block explorer used for the link logged after submission.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
    /// How many times a failed blob fetch is re-issued. Submissions are never retried.
    /// Zero means every call is made exactly once.
    #[serde(default)]
    pub max_retries: usize,
}

fn default_explorer_url() -> String {
    DEFAULT_EXPLORER_URL.to_string()
}

impl Default for CelestiaConfig {
    fn default() -> Self {
        Self {
            auth_token: None,
            explorer_url: default_explorer_url(),
            max_retries: 0,
        }
    }
}

impl CelestiaConfig {
    pub fn explorer_block_url(&self, height: u64) -> String {
        format!("{}/block/{height}", self.explorer_url.trim_end_matches('/'))
    }
}

impl FromEnv for CelestiaConfig {
    fn from_env() -> anyhow::Result<Self> {
        envy_load("celestia_client", "CELESTIA_CLIENT_")
    }
}
