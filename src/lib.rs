//! Single-contract call client.
//!
//! Binds a JSON ABI to one deployed contract, signs and submits a write,
//! waits for its receipt, then issues a read-only query.

pub mod blockchain;
pub mod config;
pub mod driver;
pub mod observability;

pub use blockchain::{ContractBinding, HttpTransport, RpcTransport, Wallet};
pub use config::{Configuration, Settings};
pub use driver::{Invocation, RunError, RunReport, RunState};
