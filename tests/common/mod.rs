//! Shared utilities for integration testing.
//!
//! [`FakeNode`] is an in-memory node serving one storage contract: any
//! mutating method stores its first argument, any read-only method returns
//! the stored value.

#![allow(dead_code)]

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{Transaction as _, TxEnvelope};
use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::eips::eip2718::Decodable2718;
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use contract_call::blockchain::{parse_abi, RpcTransport, TransportError};
use contract_call::config::loader::{
    API_KEY_ENV_VAR, CONTRACT_ENV_VAR, NETWORK_ENV_VAR, PRIVATE_KEY_ENV_VAR,
};
use contract_call::{Configuration, Settings};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Anvil's first account.
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const TEST_CHAIN_ID: u64 = 31337;

pub fn abi_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Test.json")
}

/// Environment values for a complete configuration.
pub fn test_env() -> HashMap<&'static str, String> {
    HashMap::from([
        (NETWORK_ENV_VAR, "sepolia".to_string()),
        (API_KEY_ENV_VAR, "test-key".to_string()),
        (CONTRACT_ENV_VAR, TEST_CONTRACT.to_string()),
        (PRIVATE_KEY_ENV_VAR, TEST_PRIVATE_KEY.to_string()),
    ])
}

pub fn test_configuration() -> Configuration {
    let env = test_env();
    Configuration::resolve(|key| env.get(key).cloned()).unwrap()
}

/// Default settings with the bundled ABI and fast receipt polling.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.contract.abi_path = abi_path();
    settings.rpc.poll_interval_ms = 5;
    settings.rpc.confirmation_timeout_secs = 1;
    settings
}

/// In-memory node for one storage contract.
pub struct FakeNode {
    abi: JsonAbi,
    /// Method that fails with HTTP 503.
    pub fail_method: Option<&'static str>,
    /// Include writes with status 0 and leave storage untouched.
    pub revert_writes: bool,
    /// Never report a receipt.
    pub withhold_receipts: bool,
    pub chain_id: u64,
    stored: Mutex<DynSolValue>,
    receipts: Mutex<HashMap<TxHash, Value>>,
    sent_to: Mutex<Vec<Option<Address>>>,
    requests: Mutex<Vec<String>>,
    block: AtomicU64,
}

impl FakeNode {
    pub fn new() -> Self {
        let content = std::fs::read_to_string(abi_path()).unwrap();
        Self {
            abi: parse_abi(&content).unwrap(),
            fail_method: None,
            revert_writes: false,
            withhold_receipts: false,
            chain_id: TEST_CHAIN_ID,
            stored: Mutex::new(DynSolValue::Uint(U256::ZERO, 256)),
            receipts: Mutex::new(HashMap::new()),
            sent_to: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            block: AtomicU64::new(100),
        }
    }

    /// JSON-RPC methods received, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn received(&self, method: &str) -> bool {
        self.requests.lock().unwrap().iter().any(|m| m == method)
    }

    /// Recipients of every raw transaction received.
    pub fn sent_to(&self) -> Vec<Option<Address>> {
        self.sent_to.lock().unwrap().clone()
    }

    fn function_for(&self, input: &[u8]) -> Result<&Function, TransportError> {
        if input.len() < 4 {
            return Err(TransportError::Rpc {
                code: 3,
                message: "execution reverted: no selector".to_string(),
            });
        }
        self.abi
            .functions()
            .find(|f| f.selector().as_slice() == &input[..4])
            .ok_or_else(|| TransportError::Rpc {
                code: 3,
                message: "execution reverted: unknown selector".to_string(),
            })
    }

    fn send_raw(&self, params: &Value) -> Result<Value, TransportError> {
        let raw: Bytes = serde_json::from_value(params[0].clone())
            .map_err(|e| TransportError::Envelope(e.to_string()))?;
        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref()).map_err(|e| TransportError::Rpc {
            code: -32000,
            message: format!("invalid raw transaction: {}", e),
        })?;
        self.sent_to.lock().unwrap().push(envelope.to());
        let from = envelope.recover_signer().map_err(|e| TransportError::Rpc {
            code: -32000,
            message: format!("invalid signature: {}", e),
        })?;

        let input = envelope.input().clone();
        let function = self.function_for(&input)?;
        let args = function
            .abi_decode_input(&input[4..])
            .map_err(|e| TransportError::Rpc {
                code: 3,
                message: format!("execution reverted: {}", e),
            })?;

        if !self.revert_writes {
            if let Some(first) = args.into_iter().next() {
                *self.stored.lock().unwrap() = first;
            }
        }

        let tx_hash = keccak256(&raw);
        let block = self.block.fetch_add(1, Ordering::SeqCst);
        let status = if self.revert_writes { "0x0" } else { "0x1" };
        self.receipts.lock().unwrap().insert(
            tx_hash,
            json!({
                "type": "0x0",
                "status": status,
                "cumulativeGasUsed": "0xa410",
                "logs": [],
                "logsBloom": format!("0x{}", "00".repeat(256)),
                "transactionHash": tx_hash,
                "transactionIndex": "0x0",
                "blockNumber": format!("{:#x}", block),
                "gasUsed": "0xa410",
                "effectiveGasPrice": "0x3b9aca00",
                "from": from,
                "to": envelope.to(),
                "contractAddress": null,
            }),
        );
        Ok(json!(tx_hash))
    }

    fn call(&self, params: &Value) -> Result<Value, TransportError> {
        let data: Bytes = serde_json::from_value(params[0]["data"].clone())
            .map_err(|e| TransportError::Envelope(e.to_string()))?;
        self.function_for(&data)?;
        let encoded = self.stored.lock().unwrap().abi_encode();
        Ok(json!(Bytes::from(encoded)))
    }

    fn receipt(&self, params: &Value) -> Result<Value, TransportError> {
        if self.withhold_receipts {
            return Ok(Value::Null);
        }
        let tx_hash: TxHash = serde_json::from_value(params[0].clone())
            .map_err(|e| TransportError::Envelope(e.to_string()))?;
        Ok(self
            .receipts
            .lock()
            .unwrap()
            .get(&tx_hash)
            .cloned()
            .unwrap_or(Value::Null))
    }
}

impl RpcTransport for FakeNode {
    async fn request(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(method.to_string());

        if self.fail_method == Some(method) {
            return Err(TransportError::Status {
                status: 503,
                body: "Service Unavailable".to_string(),
            });
        }

        match method {
            "eth_chainId" => Ok(json!(format!("{:#x}", self.chain_id))),
            "eth_getTransactionCount" => Ok(json!("0x0")),
            "eth_gasPrice" => Ok(json!("0x3b9aca00")),
            "eth_estimateGas" => Ok(json!("0xa410")),
            "eth_sendRawTransaction" => self.send_raw(&params),
            "eth_getTransactionReceipt" => self.receipt(&params),
            "eth_call" => self.call(&params),
            other => Err(TransportError::Rpc {
                code: -32601,
                message: format!("the method {} does not exist", other),
            }),
        }
    }
}
