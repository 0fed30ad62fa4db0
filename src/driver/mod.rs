//! Invocation driver: one write, then one read, against one contract.
//!
//! # Responsibilities
//! - Resolve configuration and construct signer, transport, binding in order
//! - Validate both methods and their arguments before anything goes on-chain
//! - Time the write from submission to receipt
//! - Stop at the first failure and return it unchanged
//!
//! # Design Decisions
//! - Strictly sequential: the read is issued only after the write's receipt
//! - No recovery; a failure moves the run to `Aborted`

pub mod state;

use alloy::dyn_abi::DynSolValue;
use alloy::hex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::blockchain::{
    load_abi, BlockchainError, ConfirmationStatus, ContractBinding, HttpTransport, Operation,
    RpcTransport, SendOptions, TransactionReceipt, Wallet,
};
use crate::config::{ConfigError, Configuration, Settings};
use crate::observability::metrics;

pub use state::RunState;

/// First failure of a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

impl RunError {
    /// Pipeline stage that failed, for user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            RunError::Config(ConfigError::MissingConfiguration(_))
            | RunError::Config(ConfigError::InvalidConfiguration { .. }) => "configuration",
            RunError::Config(_) => "settings",
            RunError::Blockchain(err) => match err {
                BlockchainError::InvalidKey(_) => "signer",
                BlockchainError::InvalidAbi(_)
                | BlockchainError::InvalidArgument { .. }
                | BlockchainError::MethodNotFound(_)
                | BlockchainError::MethodMutabilityMismatch { .. } => "contract binding",
                BlockchainError::Transport(_) | BlockchainError::ChainMismatch { .. } => {
                    "transport"
                }
                BlockchainError::TransactionFailed(_) => "transaction",
            },
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Submission-to-receipt latency of the write.
    pub elapsed: Duration,
    pub receipt: TransactionReceipt,
    /// Decoded outputs of the read.
    pub values: Vec<DynSolValue>,
}

impl RunReport {
    /// Read result as printed on stdout, e.g. `{ data: 20 }`.
    pub fn render(&self) -> String {
        let data = match self.values.as_slice() {
            [single] => format_value(single),
            many => format!(
                "({})",
                many.iter().map(format_value).collect::<Vec<_>>().join(", ")
            ),
        };
        format!("{{ data: {} }}", data)
    }
}

/// Human-readable rendering of a decoded ABI value.
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Address(a) => a.to_string(),
        DynSolValue::Function(f) => hex::encode_prefixed(f.as_slice()),
        DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
        DynSolValue::Bytes(bytes) => hex::encode_prefixed(bytes),
        DynSolValue::String(s) => format!("{:?}", s),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => format!(
            "[{}]",
            items.iter().map(format_value).collect::<Vec<_>>().join(", ")
        ),
        DynSolValue::Tuple(items) => format!(
            "({})",
            items.iter().map(format_value).collect::<Vec<_>>().join(", ")
        ),
        // EIP-712 structs, when alloy is built with that feature.
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other),
    }
}

/// Drives one run through the state machine.
#[derive(Debug)]
pub struct Invocation {
    settings: Settings,
    state: RunState,
}

impl Invocation {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: RunState::Unconfigured,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run against the endpoint described by the process environment.
    pub async fn run_from_env(&mut self) -> Result<RunReport, RunError> {
        self.run(|key| std::env::var(key).ok()).await
    }

    /// Resolve configuration through `lookup`, connect over HTTPS, and run.
    pub async fn run<F>(&mut self, lookup: F) -> Result<RunReport, RunError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let outcome = self.connect_and_execute(lookup).await;
        self.finish(outcome)
    }

    /// Run with an already-resolved configuration and a caller-supplied transport.
    pub async fn run_with<T: RpcTransport>(
        &mut self,
        config: Configuration,
        transport: Arc<T>,
    ) -> Result<RunReport, RunError> {
        let outcome = match self.configure(&config) {
            Ok(wallet) => self.execute(config, wallet, transport).await,
            Err(err) => Err(err),
        };
        self.finish(outcome)
    }

    async fn connect_and_execute<F>(&mut self, lookup: F) -> Result<RunReport, RunError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Configuration::resolve(lookup)?;
        let wallet = self.configure(&config)?;
        let transport = HttpTransport::new(&config.rpc_url(), self.settings.rpc.timeout_secs)
            .map_err(BlockchainError::from)?;
        self.execute(config, wallet, Arc::new(transport)).await
    }

    /// Enter `Configured` and derive the signer, before any transport exists.
    fn configure(&mut self, config: &Configuration) -> Result<Wallet, RunError> {
        self.transition(RunState::Configured);
        Ok(Wallet::from_private_key(config.private_key())?)
    }

    async fn execute<T: RpcTransport>(
        &mut self,
        config: Configuration,
        wallet: Wallet,
        transport: Arc<T>,
    ) -> Result<RunReport, RunError> {
        let contract_settings = self.settings.contract.clone();

        let abi = load_abi(&contract_settings.abi_path)?;
        let contract = ContractBinding::bind(abi, config.contract_address, transport)?
            .with_signer(wallet.clone())
            .with_confirmation(self.settings.confirmation_policy());

        // Both methods are checked before the write so a bad read never
        // follows an on-chain state change.
        let write_args = contract.coerce_args(
            &contract_settings.write_method,
            &contract_settings.write_args,
            Operation::Send,
        )?;
        let read_args = contract.coerce_args(
            &contract_settings.read_method,
            &contract_settings.read_args,
            Operation::Call,
        )?;

        if let Some(expected) = self.settings.rpc.chain_id {
            contract.client().verify_chain_id(expected).await?;
        }
        self.transition(RunState::Bound);

        let options = SendOptions {
            from: wallet.address(),
            gas_limit: Some(contract_settings.gas_limit),
        };

        self.transition(RunState::Sent(ConfirmationStatus::Pending));
        let start = Instant::now();
        let sent = contract
            .send(&contract_settings.write_method, &write_args, &options)
            .await;
        let elapsed = start.elapsed();

        let receipt = match sent {
            Ok(receipt) => receipt,
            Err(err) => {
                if let BlockchainError::TransactionFailed(reason) = &err {
                    self.transition(RunState::Sent(ConfirmationStatus::Failed(reason.clone())));
                }
                return Err(err.into());
            }
        };
        self.transition(RunState::Sent(ConfirmationStatus::Confirmed {
            block_number: receipt.block_number.unwrap_or_default(),
        }));
        metrics::record_send_duration(elapsed);
        tracing::info!(
            method = %contract_settings.write_method,
            elapsed_ms = elapsed.as_millis() as u64,
            "Write confirmed"
        );

        let values = contract
            .call(&contract_settings.read_method, &read_args)
            .await?;
        self.transition(RunState::Queried);

        self.transition(RunState::Done);
        Ok(RunReport {
            elapsed,
            receipt,
            values,
        })
    }

    fn finish(&mut self, outcome: Result<RunReport, RunError>) -> Result<RunReport, RunError> {
        if let Err(err) = &outcome {
            tracing::error!(stage = err.stage(), error = %err, "Run aborted");
            self.transition(RunState::Aborted(err.to_string()));
        }
        metrics::record_run(outcome.is_ok());
        outcome
    }

    fn transition(&mut self, next: RunState) {
        if !self.state.can_transition_to(&next) {
            tracing::warn!(from = self.state.name(), to = next.name(), "Unexpected state transition");
        }
        tracing::debug!(from = self.state.name(), to = next.name(), "Run state");
        self.state = next;
    }
}
