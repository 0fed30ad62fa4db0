//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration (private key, endpoint, contract address)
//!     → wallet.rs (key validation, signing)
//!     → transport.rs (JSON-RPC over HTTPS with timeouts)
//!     → client.rs (typed eth_* methods)
//!     → contract.rs (ABI lookup, call / send)
//!     → transaction.rs (build, sign, broadcast, await receipt)
//! ```
//!
//! # Security Constraints
//! - Private keys arrive through `Configuration`, never read from the environment here
//! - Never log private keys or the endpoint path (it carries the API key)
//! - All RPC calls have a fixed timeout; receipt polling has a deadline

pub mod client;
pub mod contract;
pub mod transaction;
pub mod transport;
pub mod types;
pub mod wallet;

pub use client::{ChainClient, ChainId};
pub use contract::{load_abi, parse_abi, ContractBinding, Operation, SendOptions};
pub use transaction::ConfirmationPolicy;
pub use transport::{HttpTransport, RpcTransport, TransportError};
pub use types::{BlockchainError, BlockchainResult, ConfirmationStatus};
pub use alloy::rpc::types::TransactionReceipt;
pub use wallet::Wallet;
