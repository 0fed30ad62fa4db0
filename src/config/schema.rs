//! Configuration schema definitions.
//!
//! Two kinds of configuration feed a run:
//! - [`Settings`]: non-secret tunables from an optional TOML file, every field defaulted
//! - [`Configuration`]: the four required values (network, API key, contract,
//!   signing key) resolved from the environment

use alloy::primitives::Address;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::blockchain::ConfirmationPolicy;

/// Root of the settings file.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Which contract methods to invoke, and how.
    pub contract: ContractConfig,

    /// Node connection and confirmation settings.
    pub rpc: RpcConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Receipt polling policy derived from the RPC section.
    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(self.rpc.poll_interval_ms),
            timeout: Duration::from_secs(self.rpc.confirmation_timeout_secs),
        }
    }
}

/// Contract invocation settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContractConfig {
    /// ABI file (bare array or artifact with an `abi` field).
    pub abi_path: PathBuf,

    /// Mutating method submitted as a transaction.
    pub write_method: String,

    /// Arguments for the write, in ABI textual form.
    pub write_args: Vec<String>,

    /// Read-only method queried after the write confirms.
    pub read_method: String,

    /// Arguments for the read.
    pub read_args: Vec<String>,

    /// Gas limit for the write transaction.
    pub gas_limit: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            abi_path: PathBuf::from("Test.json"),
            write_method: "setData".to_string(),
            write_args: vec!["20".to_string()],
            read_method: "getData".to_string(),
            read_args: Vec::new(),
            gas_limit: 1_000_000,
        }
    }
}

/// Node connection settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RpcConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum wait for a transaction receipt, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// When set, the node must report this chain ID before anything is sent.
    pub chain_id: Option<u64>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            confirmation_timeout_secs: 300,
            poll_interval_ms: 2_000,
            chain_id: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Required per-run values, resolved once at startup.
///
/// Immutable after construction. `Debug` redacts the secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Network name used to build the endpoint (e.g. `sepolia`).
    pub network: String,
    pub(crate) api_key: String,
    /// Deployed contract address.
    pub contract_address: Address,
    pub(crate) private_key: String,
    pub(crate) rpc_url_override: Option<String>,
}

impl Configuration {
    /// JSON-RPC endpoint for this run.
    pub fn rpc_url(&self) -> String {
        match &self.rpc_url_override {
            Some(url) => url.clone(),
            None => format!("https://{}.infura.io/v3/{}", self.network, self.api_key),
        }
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("network", &self.network)
            .field("api_key", &"<redacted>")
            .field("contract_address", &self.contract_address)
            .field("private_key", &"<redacted>")
            .field("rpc_url_override", &self.rpc_url_override.is_some())
            .finish()
    }
}
