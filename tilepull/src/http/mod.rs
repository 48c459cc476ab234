//! HTTP client abstraction for testability
//!
//! The downloader talks to tile servers through the [`AsyncHttpClient`]
//! trait, so tests inject stub transports and production code uses the
//! reqwest-backed [`AsyncReqwestClient`]. A non-success response status and
//! a transport-level failure are distinct error variants; the orchestrator
//! reacts to them differently.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Default timeout for tile requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent for outgoing requests. Public tile servers reject clients
/// that do not identify themselves.
const USER_AGENT: &str = concat!("tilepull/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while fetching a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The request itself failed (DNS, connect, timeout, reset).
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// A response arrived carrying a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be read to completion.
    #[error("failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),
}

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes, or an [`HttpError`] separating a
    /// non-success status from a failed transport.
    fn get(&self, url: &str) -> impl Future<Output = Result<Bytes, HttpError>> + Send;
}

/// Async HTTP client implementation using reqwest.
///
/// Tuned for batch tile downloads: pooled keep-alive connections and TCP
/// nodelay, so bursts of small requests to one host reuse warm sockets.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new client with the default 30 second timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            // Connection pooling - keep connections alive for parallel requests
            .pool_max_idle_per_host(64)
            .pool_idle_timeout(Duration::from_secs(90))
            // TCP optimizations
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Bytes, HttpError> {
        trace!(url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(url, status = resp.status().as_u16(), "HTTP response received");
                resp
            }
            Err(e) => {
                warn!(
                    url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(HttpError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "HTTP error status");
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes)
            }
            Err(e) => {
                warn!(url, error = %e, "Failed to read response body");
                Err(HttpError::Body {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
