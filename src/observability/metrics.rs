//! Metrics collection.
//!
//! # Metrics
//! - `contract_rpc_requests_total` (counter): JSON-RPC requests by method, outcome
//! - `contract_send_duration_seconds` (histogram): submit-to-receipt latency
//! - `contract_runs_total` (counter): completed runs by outcome
//!
//! No exporter is installed by this crate; without a recorder the macros are no-ops.

use std::time::Duration;

pub fn record_rpc_request(method: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    ::metrics::counter!(
        "contract_rpc_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_send_duration(elapsed: Duration) {
    ::metrics::histogram!("contract_send_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_run(ok: bool) {
    let outcome = if ok { "done" } else { "aborted" };
    ::metrics::counter!("contract_runs_total", "outcome" => outcome).increment(1);
}
