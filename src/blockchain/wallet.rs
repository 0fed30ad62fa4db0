//! Signing account derived from a raw private key.
//!
//! # Security
//! - The key arrives through [`crate::config::Configuration`], never read here
//! - Keys are never logged or serialized; `Debug` shows only the address

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::hex;
use alloy::primitives::{Address, Bytes, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Number of hex characters in a secp256k1 private key.
const PRIVATE_KEY_HEX_LEN: usize = 64;

/// Account able to authorize outgoing transactions, with local nonce tracking.
pub struct Wallet {
    signer: PrivateKeySigner,
    nonce: Arc<AtomicU64>,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - 64 hex characters, `0x` prefix optional
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let trimmed = private_key_hex.trim();
        let key_hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if key_hex.len() != PRIVATE_KEY_HEX_LEN {
            return Err(BlockchainError::InvalidKey(format!(
                "expected {} hex characters, got {}",
                PRIVATE_KEY_HEX_LEN,
                key_hex.len()
            )));
        }

        let bytes = hex::decode(key_hex)
            .map_err(|e| BlockchainError::InvalidKey(format!("not hex: {}", e)))?;
        let signer = PrivateKeySigner::from_bytes(&B256::from_slice(&bytes))
            .map_err(|e| BlockchainError::InvalidKey(format!("not a valid scalar: {}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self {
            signer,
            nonce: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get and increment the nonce atomically.
    pub fn get_and_increment_nonce(&self) -> u64 {
        self.nonce.fetch_add(1, Ordering::SeqCst)
    }

    /// Set the nonce to a specific value (e.g., after querying from chain).
    pub fn set_nonce(&self, nonce: u64) {
        self.nonce.store(nonce, Ordering::SeqCst);
    }

    /// Get current nonce without incrementing.
    pub fn current_nonce(&self) -> u64 {
        self.nonce.load(Ordering::SeqCst)
    }

    /// Sign a legacy transaction and return its raw EIP-2718 encoding,
    /// ready for `eth_sendRawTransaction`.
    pub fn sign_transaction(&self, tx: TxLegacy) -> BlockchainResult<Bytes> {
        let signature = self
            .signer
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|e| BlockchainError::InvalidKey(format!("signing failed: {}", e)))?;

        let envelope = TxEnvelope::from(tx.into_signed(signature));
        Ok(Bytes::from(envelope.encoded_2718()))
    }
}

impl Clone for Wallet {
    fn clone(&self) -> Self {
        Self {
            signer: self.signer.clone(),
            nonce: self.nonce.clone(),
        }
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("nonce", &self.current_nonce())
            .finish()
    }
}
