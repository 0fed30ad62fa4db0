//! Contract binding: ABI lookup table + address + transport.
//!
//! # Data Flow
//! ```text
//! method name + args
//!     → resolve (name lookup, arity, mutability check; no I/O)
//!     → encode calldata
//!     → call: eth_call → decode outputs
//!     → send: TxBuilder (build, sign, submit, wait) → TransactionReceipt
//! ```

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy::json_abi::{Function, JsonAbi, StateMutability};
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionReceipt;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::blockchain::client::ChainClient;
use crate::blockchain::transaction::{ConfirmationPolicy, TxBuilder};
use crate::blockchain::transport::RpcTransport;
use crate::blockchain::types::{
    is_mutating, mutability_label, BlockchainError, BlockchainResult,
};
use crate::blockchain::wallet::Wallet;

/// Which interaction shape a method is being used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read-only query, no signing.
    Call,
    /// State-changing transaction.
    Send,
}

impl Operation {
    /// Whether a method with this mutability can be used for the operation.
    fn accepts(self, mutability: StateMutability) -> bool {
        match self {
            Operation::Call => !is_mutating(mutability),
            Operation::Send => is_mutating(mutability),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Operation::Call => "call",
            Operation::Send => "send",
        }
    }
}

/// Sender and gas settings for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    pub from: Address,
    /// `None` asks the node for an estimate.
    pub gas_limit: Option<u64>,
}

/// Parse an ABI document.
///
/// Accepts either a bare ABI array or a compiler artifact carrying an `abi`
/// field.
pub fn parse_abi(content: &str) -> BlockchainResult<JsonAbi> {
    let document: Value = serde_json::from_str(content)
        .map_err(|e| BlockchainError::InvalidAbi(format!("not valid JSON: {}", e)))?;

    let abi_value = match document {
        Value::Array(_) => document,
        Value::Object(mut fields) => fields
            .remove("abi")
            .ok_or_else(|| BlockchainError::InvalidAbi("missing `abi` field".to_string()))?,
        other => {
            return Err(BlockchainError::InvalidAbi(format!(
                "expected array or object, got {}",
                other
            )))
        }
    };

    let abi: JsonAbi = serde_json::from_value(abi_value)
        .map_err(|e| BlockchainError::InvalidAbi(e.to_string()))?;

    if abi.functions.is_empty() {
        return Err(BlockchainError::InvalidAbi(
            "ABI declares no functions".to_string(),
        ));
    }
    Ok(abi)
}

/// Read and parse an ABI file.
pub fn load_abi(path: &Path) -> BlockchainResult<JsonAbi> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BlockchainError::InvalidAbi(format!("cannot read {}: {}", path.display(), e))
    })?;
    let abi = parse_abi(&content)?;
    tracing::debug!(
        path = %path.display(),
        functions = abi.functions.len(),
        "ABI loaded"
    );
    Ok(abi)
}

/// A deployed contract reachable through one transport.
pub struct ContractBinding<T> {
    address: Address,
    abi: JsonAbi,
    client: ChainClient<T>,
    signer: Option<Wallet>,
    policy: ConfirmationPolicy,
}

impl<T: RpcTransport> ContractBinding<T> {
    /// Bind an ABI to a deployed address.
    pub fn bind(abi: JsonAbi, address: Address, transport: Arc<T>) -> BlockchainResult<Self> {
        if abi.functions.is_empty() {
            return Err(BlockchainError::InvalidAbi(
                "ABI declares no functions".to_string(),
            ));
        }

        tracing::info!(
            contract = %address,
            functions = abi.functions.len(),
            "Contract bound"
        );

        Ok(Self {
            address,
            abi,
            client: ChainClient::new(transport),
            signer: None,
            policy: ConfirmationPolicy::default(),
        })
    }

    /// Attach the account used to sign `send` transactions.
    pub fn with_signer(mut self, wallet: Wallet) -> Self {
        self.signer = Some(wallet);
        self
    }

    /// Override the receipt polling policy.
    pub fn with_confirmation(mut self, policy: ConfirmationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn client(&self) -> &ChainClient<T> {
        &self.client
    }

    /// Names of all functions in the ABI, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        self.abi.functions.keys().map(String::as_str).collect()
    }

    /// Look up a method and check it can be used with `operation`.
    ///
    /// Mutability is checked before arity, so using a view method for a
    /// write (or the reverse) is reported as such whatever the arguments.
    /// Performs no I/O, so callers can validate a whole run up front.
    pub fn resolve(&self, name: &str, arity: usize, operation: Operation) -> BlockchainResult<&Function> {
        let overloads = self
            .abi
            .function(name)
            .ok_or_else(|| BlockchainError::MethodNotFound(name.to_string()))?;

        let mut usable = overloads
            .iter()
            .filter(|f| operation.accepts(f.state_mutability))
            .peekable();
        if usable.peek().is_none() {
            return Err(BlockchainError::MethodMutabilityMismatch {
                method: name.to_string(),
                mutability: mutability_label(overloads[0].state_mutability),
                operation: operation.as_str(),
            });
        }

        let mut arities = Vec::new();
        for function in usable {
            if function.inputs.len() == arity {
                return Ok(function);
            }
            arities.push(function.inputs.len().to_string());
        }
        Err(BlockchainError::InvalidArgument {
            method: name.to_string(),
            reason: format!("expected {} argument(s), got {}", arities.join(" or "), arity),
        })
    }

    /// Convert textual arguments into typed ABI values for `name`.
    pub fn coerce_args(
        &self,
        name: &str,
        raw: &[String],
        operation: Operation,
    ) -> BlockchainResult<Vec<DynSolValue>> {
        let function = self.resolve(name, raw.len(), operation)?;
        function
            .inputs
            .iter()
            .zip(raw)
            .map(|(param, text)| {
                let ty = param.resolve().map_err(|e| BlockchainError::InvalidAbi(format!(
                    "{}: unsupported type {}: {}",
                    name, param.ty, e
                )))?;
                ty.coerce_str(text).map_err(|e| BlockchainError::InvalidArgument {
                    method: name.to_string(),
                    reason: format!("{:?} is not a valid {}: {}", text, param.ty, e),
                })
            })
            .collect()
    }

    fn encode(&self, function: &Function, args: &[DynSolValue]) -> BlockchainResult<Bytes> {
        function
            .abi_encode_input(args)
            .map(Bytes::from)
            .map_err(|e| BlockchainError::InvalidArgument {
                method: function.name.clone(),
                reason: e.to_string(),
            })
    }

    /// Invoke a read-only method and decode its outputs.
    pub async fn call(&self, name: &str, args: &[DynSolValue]) -> BlockchainResult<Vec<DynSolValue>> {
        let function = self.resolve(name, args.len(), Operation::Call)?;
        let data = self.encode(function, args)?;

        let output = self.client.call(self.address, &data).await?;
        let values = function.abi_decode_output(&output).map_err(|e| {
            BlockchainError::InvalidAbi(format!(
                "output of {} does not match ABI: {}",
                function.signature(),
                e
            ))
        })?;

        tracing::debug!(method = name, outputs = values.len(), "Call returned");
        Ok(values)
    }

    /// Submit a state-changing method and wait for its receipt.
    ///
    /// Suspends until the node reports inclusion or the confirmation deadline
    /// passes. A reverted receipt is reported as `TransactionFailed`.
    pub async fn send(
        &self,
        name: &str,
        args: &[DynSolValue],
        options: &SendOptions,
    ) -> BlockchainResult<TransactionReceipt> {
        let function = self.resolve(name, args.len(), Operation::Send)?;

        let wallet = self
            .signer
            .as_ref()
            .filter(|w| w.address() == options.from)
            .ok_or_else(|| {
                BlockchainError::InvalidKey(format!("no signer available for {}", options.from))
            })?;

        let data = self.encode(function, args)?;

        let builder = TxBuilder::new(&self.client, wallet, self.policy);
        let tx = builder
            .build(self.address, U256::ZERO, data, options.gas_limit)
            .await?;
        let tx_hash = builder.submit(tx).await?;
        let receipt = builder.wait_for_receipt(tx_hash).await?;

        if !receipt.status() {
            return Err(BlockchainError::TransactionFailed(format!(
                "{} reverted in block {}",
                tx_hash,
                receipt.block_number.unwrap_or_default()
            )));
        }

        tracing::info!(
            method = name,
            tx_hash = %tx_hash,
            block_number = receipt.block_number.unwrap_or_default(),
            "Transaction confirmed"
        );
        Ok(receipt)
    }
}

impl<T> std::fmt::Debug for ContractBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractBinding")
            .field("address", &self.address)
            .field("functions", &self.abi.functions.len())
            .field("signer", &self.signer.as_ref().map(Wallet::address))
            .finish()
    }
}
