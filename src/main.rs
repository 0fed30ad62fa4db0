//! contract-call: submit one contract write, then read the result back.
//!
//! # Flow
//!
//! ```text
//!   .env + environment ──▶ Configuration ──▶ Wallet
//!                                │
//!   contract-call.toml ──▶ Settings ──▶ ABI file ──▶ ContractBinding ──▶ HttpTransport ──▶ node
//!                                                          │
//!                                          send(write) ──▶ receipt (timed)
//!                                          call(read)  ──▶ decoded values
//! ```
//!
//! Prints the write latency in milliseconds, then the decoded read result.
//! Exits non-zero on the first failure.

use std::process::ExitCode;

use contract_call::config::{load_settings_or_default, settings_path_from_env};
use contract_call::driver::{Invocation, RunError};
use contract_call::observability::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; values may already be in the environment.
    let _ = dotenvy::dotenv();

    let settings = match load_settings_or_default(&settings_path_from_env()) {
        Ok(settings) => settings,
        Err(e) => {
            let err = RunError::from(e);
            eprintln!("error: {}: {}", err.stage(), err);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.observability.log_level);
    tracing::info!("contract-call v{} starting", env!("CARGO_PKG_VERSION"));

    let mut invocation = Invocation::new(settings);
    match invocation.run_from_env().await {
        Ok(report) => {
            println!("{}", report.elapsed.as_millis());
            println!("{}", report.render());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}: {}", err.stage(), err);
            ExitCode::FAILURE
        }
    }
}
