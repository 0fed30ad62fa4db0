//! JSON-RPC transport.
//!
//! # Responsibilities
//! - Carry one `eth_*` method call to the node and hand back its raw result
//! - Enforce a fixed per-request timeout
//! - Collapse every failure mode into [`TransportError`]
//!
//! Envelopes, request ids and the HTTP exchange belong to alloy's
//! [`RpcClient`]. There is no retry here: a failed request surfaces to the
//! caller as-is.

use alloy::rpc::client::{ClientBuilder, RpcClient};
use alloy::transports::{RpcError, TransportError as RpcClientError, TransportErrorKind};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use url::Url;

use crate::observability::metrics;

/// Errors raised while talking to the node.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint answered with a non-2xx status.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Request or response body did not match the expected shape.
    #[error("Malformed JSON-RPC payload: {0}")]
    Envelope(String),

    /// No answer within the configured timeout.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The endpoint URL could not be parsed.
    #[error("Invalid RPC URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection, DNS or TLS failure, or any other client-side fault.
    #[error("RPC client error: {0}")]
    Client(#[source] RpcClientError),
}

impl From<RpcClientError> for TransportError {
    fn from(err: RpcClientError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => TransportError::Rpc {
                code: payload.code,
                message: payload.message.into_owned(),
            },
            RpcError::Transport(TransportErrorKind::HttpError(http)) => TransportError::Status {
                status: http.status,
                body: http.body,
            },
            RpcError::SerError(e) => TransportError::Envelope(e.to_string()),
            RpcError::DeserError { err, .. } => TransportError::Envelope(err.to_string()),
            other => TransportError::Client(other),
        }
    }
}

/// A channel able to execute one JSON-RPC method.
///
/// The contract binding is generic over this so tests can swap in an
/// in-memory node.
pub trait RpcTransport: Send + Sync {
    fn request(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// HTTP(S) transport backed by alloy's RPC client.
#[derive(Debug)]
pub struct HttpTransport {
    client: RpcClient,
    host: String,
    timeout_duration: Duration,
}

impl HttpTransport {
    /// Create a transport for a single endpoint.
    ///
    /// # Arguments
    /// * `rpc_url` - Full endpoint URL, API key included
    /// * `timeout_secs` - Per-request timeout
    pub fn new(rpc_url: &str, timeout_secs: u64) -> Result<Self, TransportError> {
        let url = Url::parse(rpc_url).map_err(|e| TransportError::InvalidUrl {
            url: redact_url(rpc_url),
            reason: e.to_string(),
        })?;
        let host = url.host_str().unwrap_or_default().to_string();
        let client = ClientBuilder::default().http(url);

        tracing::debug!(host = %host, "HTTP transport ready");

        Ok(Self {
            client,
            host,
            timeout_duration: Duration::from_secs(timeout_secs),
        })
    }
}

impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        tracing::trace!(host = %self.host, method, "JSON-RPC request");

        let call = self.client.request::<_, Value>(method.to_string(), params);
        let outcome = match timeout(self.timeout_duration, call).await {
            Ok(result) => result.map_err(TransportError::from),
            Err(_) => Err(TransportError::Timeout(self.timeout_duration.as_secs())),
        };

        metrics::record_rpc_request(method, outcome.is_ok());
        if let Err(e) = &outcome {
            tracing::warn!(method, error = %e, "JSON-RPC request failed");
        }
        outcome
    }
}

/// Strip the path from an endpoint so the API key never reaches logs.
pub fn redact_url(url: &str) -> String {
    match url.parse::<Url>() {
        Ok(u) => format!("{}://{}/…", u.scheme(), u.host_str().unwrap_or("")),
        Err(_) => "<unparseable>".to_string(),
    }
}
