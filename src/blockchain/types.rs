//! Chain-specific types and error definitions.

use alloy::json_abi::StateMutability;
use thiserror::Error;

use crate::blockchain::transport::TransportError;

/// Errors that can occur while binding to or invoking a contract.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Private key is not 32 bytes of hex, or is not a valid secp256k1 scalar.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// ABI document could not be read or contains no callable functions.
    #[error("Invalid ABI: {0}")]
    InvalidAbi(String),

    /// Argument could not be coerced into the method's input type.
    #[error("Invalid argument for {method}: {reason}")]
    InvalidArgument { method: String, reason: String },

    /// No function with this name (and arity) exists in the ABI.
    #[error("Method not found in ABI: {0}")]
    MethodNotFound(String),

    /// `call` on a mutating method, or `send` on a read-only one.
    #[error("Method {method} is {mutability}, cannot be used with {operation}")]
    MethodMutabilityMismatch {
        method: String,
        mutability: &'static str,
        operation: &'static str,
    },

    /// Network or JSON-RPC failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Node serves a different chain than configured.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Submitted but reverted, or not included before the deadline.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Human-readable label used in mismatch errors.
pub fn mutability_label(mutability: StateMutability) -> &'static str {
    match mutability {
        StateMutability::Pure => "pure",
        StateMutability::View => "view",
        StateMutability::NonPayable => "nonpayable",
        StateMutability::Payable => "payable",
    }
}

/// Whether a method changes chain state and therefore needs a transaction.
pub fn is_mutating(mutability: StateMutability) -> bool {
    matches!(
        mutability,
        StateMutability::NonPayable | StateMutability::Payable
    )
}

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Submitted, no receipt yet.
    Pending,
    /// Included in a block.
    Confirmed { block_number: u64 },
    /// Reverted or dropped.
    Failed(String),
}
