//! Node endpoint configuration.
//!
//! Resolved from environment variables (`SHOAL_NODE_URL`,
//! `SHOAL_NETWORK_ID`, `SHOAL_CHAIN_ID`), with a TOML round-trip for
//! on-disk config. CLI flags override the environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{GAS_LIMIT, GAS_PRICE};

pub const DEFAULT_NETWORK_ID: &str = "testnet01";
pub const DEFAULT_CHAIN_ID: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub network_id: String,
    pub chain_id: String,
    /// Base URL of the chain's exec API; `/api/v1/local` and
    /// `/api/v1/send` are appended per request.
    pub endpoint: String,
    pub gas_price: f64,
    pub gas_limit: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NETWORK_ID, DEFAULT_CHAIN_ID, None)
    }
}

impl NodeConfig {
    pub fn new(network_id: &str, chain_id: &str, endpoint: Option<String>) -> Self {
        let endpoint =
            endpoint.unwrap_or_else(|| default_endpoint(network_id, chain_id));
        Self {
            network_id: network_id.to_string(),
            chain_id: chain_id.to_string(),
            endpoint,
            gas_price: GAS_PRICE,
            gas_limit: GAS_LIMIT,
        }
    }

    /// Resolve from the environment. Unset variables fall back to the
    /// public testnet defaults.
    pub fn from_env() -> Self {
        let network_id =
            std::env::var("SHOAL_NETWORK_ID").unwrap_or_else(|_| DEFAULT_NETWORK_ID.to_string());
        let chain_id =
            std::env::var("SHOAL_CHAIN_ID").unwrap_or_else(|_| DEFAULT_CHAIN_ID.to_string());
        let endpoint = std::env::var("SHOAL_NODE_URL").ok().filter(|s| !s.is_empty());
        Self::new(&network_id, &chain_id, endpoint)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: NodeConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Public testnet endpoint for a network/chain pair.
pub fn default_endpoint(network_id: &str, chain_id: &str) -> String {
    format!(
        "https://api.testnet.shoal.exchange/{}/chain/{}/pact",
        network_id, chain_id
    )
}
