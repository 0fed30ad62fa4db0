//! Typed Ethereum RPC client.
//!
//! # Responsibilities
//! - Map each `eth_*` method the client needs onto the transport
//! - Decode hex quantities and hashes into alloy primitives
//! - Verify the connected chain when an expected chain ID is configured

use alloy::primitives::{Address, Bytes, TxHash, U128, U64};
use alloy::rpc::types::TransactionReceipt;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::blockchain::transport::{RpcTransport, TransportError};
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Ethereum RPC client over a single transport.
pub struct ChainClient<T> {
    transport: Arc<T>,
}

impl<T: RpcTransport> ChainClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    async fn request<R: DeserializeOwned>(&self, method: &str, params: Value) -> BlockchainResult<R> {
        let result = self.transport.request(method, params).await?;
        serde_json::from_value(result).map_err(|e| {
            BlockchainError::Transport(TransportError::Envelope(format!(
                "unexpected {} result: {}",
                method, e
            )))
        })
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        let id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(ChainId(id.to::<u64>()))
    }

    /// Verify the connected chain ID matches the expected one.
    pub async fn verify_chain_id(&self, expected: u64) -> BlockchainResult<()> {
        let actual = self.get_chain_id().await?;
        if actual.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: actual.0,
            });
        }
        Ok(())
    }

    /// Get the pending transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        let count: U64 = self
            .request("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        Ok(count.to::<u64>())
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        let price: U128 = self.request("eth_gasPrice", json!([])).await?;
        Ok(price.to::<u128>())
    }

    /// Ask the node how much gas a call would consume.
    pub async fn estimate_gas(&self, from: Address, to: Address, data: &Bytes) -> BlockchainResult<u64> {
        let gas: U64 = self
            .request(
                "eth_estimateGas",
                json!([{ "from": from, "to": to, "data": data }]),
            )
            .await?;
        Ok(gas.to::<u64>())
    }

    /// Broadcast a signed transaction.
    pub async fn send_raw_transaction(&self, raw: &Bytes) -> BlockchainResult<TxHash> {
        self.request("eth_sendRawTransaction", json!([raw])).await
    }

    /// Get a transaction receipt by hash; `None` while the transaction is pending.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.request("eth_getTransactionReceipt", json!([tx_hash])).await
    }

    /// Execute a read-only call against the latest block.
    pub async fn call(&self, to: Address, data: &Bytes) -> BlockchainResult<Bytes> {
        self.request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }
}

impl<T> Clone for ChainClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ChainClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient").finish_non_exhaustive()
    }
}
