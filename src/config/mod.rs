//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (optional) → process environment
//!     → loader.rs (Configuration::resolve: four required values, fail fast)
//!
//! contract-call.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Both values are immutable once loaded and passed explicitly to constructors
//! - Secrets come only from the environment; the settings file holds none
//! - All settings fields have defaults to allow running without a file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, load_settings_or_default, settings_path_from_env, ConfigError};
pub use schema::{Configuration, ContractConfig, ObservabilityConfig, RpcConfig, Settings};
