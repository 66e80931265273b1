//! Chain endpoint configuration.
//!
//! Names the three endpoints a proving host talks to. Constructed
//! explicitly or loaded from the environment; injected into the clients,
//! never read from global state.

use serde::{Deserialize, Serialize};

/// Endpoints and limits for the chain-side collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// JSON-RPC endpoint of the EVM node hosting the state contract.
    pub evm_rpc_url: String,
    /// Address of the identity state contract (`0x`-prefixed).
    pub state_contract_address: String,
    /// Base URL of the core REST API (operation log, state info).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_api_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Error loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
}

impl ChainConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ZKID_EVM_RPC_URL` (required)
    /// - `ZKID_STATE_CONTRACT` (required)
    /// - `ZKID_CORE_API_URL` (optional)
    /// - `ZKID_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let evm_rpc_url = std::env::var("ZKID_EVM_RPC_URL")
            .map_err(|_| ConfigError::MissingVar("ZKID_EVM_RPC_URL"))?;
        let state_contract_address = std::env::var("ZKID_STATE_CONTRACT")
            .map_err(|_| ConfigError::MissingVar("ZKID_STATE_CONTRACT"))?;
        Ok(ChainConfig {
            evm_rpc_url,
            state_contract_address,
            core_api_url: std::env::var("ZKID_CORE_API_URL").ok(),
            timeout_secs: std::env::var("ZKID_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_timeout_secs),
        })
    }
}
