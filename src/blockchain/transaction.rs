//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Build legacy EIP-155 transactions from chain state (chain ID, nonce, gas price)
//! - Sign and broadcast transactions
//! - Poll for the receipt until inclusion or the confirmation deadline

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};
use alloy::rpc::types::TransactionReceipt;
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::ChainClient;
use crate::blockchain::transport::RpcTransport;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;

/// How long, and how often, to wait for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Transaction builder for contract writes.
pub struct TxBuilder<'a, T> {
    client: &'a ChainClient<T>,
    wallet: &'a Wallet,
    policy: ConfirmationPolicy,
}

impl<'a, T: RpcTransport> TxBuilder<'a, T> {
    pub fn new(client: &'a ChainClient<T>, wallet: &'a Wallet, policy: ConfirmationPolicy) -> Self {
        Self {
            client,
            wallet,
            policy,
        }
    }

    /// Build a transaction request from current chain state.
    ///
    /// # Arguments
    /// * `to` - Contract address
    /// * `value` - Amount of native token to send
    /// * `data` - ABI-encoded call data
    /// * `gas_limit` - Explicit limit, or `None` to ask the node for an estimate
    pub async fn build(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        gas_limit: Option<u64>,
    ) -> BlockchainResult<TxLegacy> {
        let chain_id = self.client.get_chain_id().await?;

        // Get current nonce from chain and sync wallet
        let chain_nonce = self.client.get_transaction_count(self.wallet.address()).await?;
        self.wallet.set_nonce(chain_nonce);

        let gas_price = self.client.get_gas_price().await?;

        let gas_limit = match gas_limit {
            Some(limit) => limit,
            None => {
                self.client
                    .estimate_gas(self.wallet.address(), to, &data)
                    .await?
            }
        };

        let nonce = self.wallet.get_and_increment_nonce();

        tracing::debug!(
            chain_id = chain_id.0,
            nonce,
            gas_price,
            gas_limit,
            "Transaction built"
        );

        Ok(TxLegacy {
            chain_id: Some(chain_id.0),
            nonce,
            gas_price,
            gas_limit,
            to: TxKind::Call(to),
            value,
            input: data,
        })
    }

    /// Sign and broadcast, returning the transaction hash.
    pub async fn submit(&self, tx: TxLegacy) -> BlockchainResult<TxHash> {
        let raw = self.wallet.sign_transaction(tx)?;
        let tx_hash = self.client.send_raw_transaction(&raw).await?;
        tracing::info!(tx_hash = %tx_hash, "Transaction submitted");
        Ok(tx_hash)
    }

    /// Wait until the transaction has a receipt.
    ///
    /// A receipt is returned whether or not execution succeeded; the caller
    /// decides what a revert means. Expiry of the deadline is an error.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<TransactionReceipt> {
        let result = timeout(self.policy.timeout, async {
            let mut ticker = interval(self.policy.poll_interval);
            // A slow reply must not be followed by a burst of catch-up polls.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(receipt) => return Ok::<_, BlockchainError>(receipt),
                    None => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::TransactionFailed(format!(
                "{} not included within {:?}",
                tx_hash, self.policy.timeout
            ))),
        }
    }
}
