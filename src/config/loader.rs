//! Configuration loading from the environment and disk.

use alloy::primitives::Address;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{Configuration, Settings};
use crate::config::validation::{validate_settings, ValidationError};

/// Network name used to build the endpoint URL.
pub const NETWORK_ENV_VAR: &str = "ETHEREUM_NETWORK";
/// RPC provider API key.
pub const API_KEY_ENV_VAR: &str = "INFURA_API_KEY";
/// Deployed contract address.
pub const CONTRACT_ENV_VAR: &str = "DEMO_CONTRACT";
/// Hex private key of the signing account.
pub const PRIVATE_KEY_ENV_VAR: &str = "SIGNER_PRIVATE_KEY";
/// Optional full endpoint URL overriding the derived one.
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";
/// Optional settings file location.
pub const SETTINGS_PATH_ENV_VAR: &str = "CONTRACT_CALL_CONFIG";

pub const DEFAULT_SETTINGS_PATH: &str = "contract-call.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment value is absent or empty.
    #[error("Missing required configuration: {0}")]
    MissingConfiguration(&'static str),

    /// A required value is present but unusable.
    #[error("Invalid value for {key}: {reason}")]
    InvalidConfiguration { key: &'static str, reason: String },

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Configuration {
    /// Resolve the required values through `lookup`.
    ///
    /// Keys are checked in a fixed order and the first missing one is
    /// reported. Whitespace-only values count as missing.
    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| present(key).ok_or(ConfigError::MissingConfiguration(key));

        let network = require(NETWORK_ENV_VAR)?;
        let api_key = require(API_KEY_ENV_VAR)?;
        let contract = require(CONTRACT_ENV_VAR)?;
        let private_key = require(PRIVATE_KEY_ENV_VAR)?;

        let contract_address = contract.parse::<Address>().map_err(|e| {
            ConfigError::InvalidConfiguration {
                key: CONTRACT_ENV_VAR,
                reason: e.to_string(),
            }
        })?;

        let rpc_url_override = present(RPC_URL_ENV_VAR);

        tracing::info!(
            network = %network,
            contract = %contract_address,
            rpc_override = rpc_url_override.is_some(),
            "Configuration resolved"
        );

        Ok(Self {
            network,
            api_key,
            contract_address,
            private_key,
            rpc_url_override,
        })
    }
}

/// Load and validate settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Settings = toml::from_str(&content)?;

    validate_settings(&settings).map_err(ConfigError::Validation)?;

    Ok(settings)
}

/// Load settings if the file exists, otherwise fall back to defaults.
pub fn load_settings_or_default(path: &Path) -> Result<Settings, ConfigError> {
    if path.exists() {
        load_settings(path)
    } else {
        tracing::debug!(path = %path.display(), "No settings file, using defaults");
        Ok(Settings::default())
    }
}

/// Settings file location: `CONTRACT_CALL_CONFIG`, or `contract-call.toml`.
pub fn settings_path_from_env() -> PathBuf {
    std::env::var(SETTINGS_PATH_ENV_VAR)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH))
}
