//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::HttpClient,
};
use futures_util::TryStreamExt;
use reqwest::Client;
use std::io;
use std::time::Duration;
use tracing::{debug, warn};

/// Default bound on establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on waiting for the next chunk of a response body.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Reqwest-based HTTP client implementation
///
/// Provides HTTP operations with:
/// - Connection pooling via reqwest
/// - Bounded connect and per-read timeouts
/// - TLS support by default
/// - Async streaming
///
/// No retries are attempted: each call is a single request.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with the default 10 s connect / 30 s read timeouts
    pub fn new() -> Result<Self> {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }

    /// Create a new HTTP client with custom timeouts
    pub fn with_timeouts(connect_timeout: Duration, read_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .pool_max_idle_per_host(4)
            .user_agent(concat!("simple-sound-player/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BridgeError::OperationFailed(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Convert a transport error into the bridge error space
    fn map_request_error(url: &str, e: reqwest::Error) -> BridgeError {
        if e.is_timeout() {
            BridgeError::Timeout(format!("Request to {} timed out", url))
        } else if e.is_connect() {
            BridgeError::OperationFailed(format!("Connection failed: {}", e))
        } else {
            BridgeError::OperationFailed(e.to_string())
        }
    }

    /// Convert a body streaming error into an I/O error, preserving timeouts
    fn map_body_error(e: reqwest::Error) -> io::Error {
        if e.is_timeout() {
            io::Error::new(io::ErrorKind::TimedOut, e)
        } else {
            io::Error::other(e)
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn download_stream(
        &self,
        url: String,
    ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
        debug!(url = %url, "Starting download");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, url = %url, "HTTP request failed");
            Self::map_request_error(&url, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %url, "HTTP request returned error status");
            return Err(BridgeError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let stream = response.bytes_stream().map_err(Self::map_body_error);
        let reader = tokio_util::io::StreamReader::new(stream);

        Ok(Box::new(reader))
    }
}
