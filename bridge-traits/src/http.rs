//! HTTP Client Abstraction
//!
//! Provides the async download primitive used to fetch remote audio payloads.

use async_trait::async_trait;

use crate::error::Result;

/// Returns `true` if `source` names an HTTP(S) resource rather than a bundled asset.
pub fn is_remote_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Async HTTP client trait
///
/// Implementations are expected to apply their own connect and read timeouts
/// (the desktop client uses 10 s and 30 s) and must not retry on their own:
/// one playback request maps to exactly one download attempt.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::HttpClient;
/// use tokio::io::AsyncReadExt;
///
/// async fn fetch(client: &dyn HttpClient) -> Result<Vec<u8>> {
///     let mut reader = client.download_stream("https://cdn.example.com/a.mp3".into()).await?;
///     let mut body = Vec::new();
///     reader.read_to_end(&mut body).await?;
///     Ok(body)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Download a resource as a stream of bytes.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network connection fails or the connect timeout elapses
    /// - TLS validation fails
    /// - The server answers with a non-2xx status, reported as
    ///   [`BridgeError::HttpStatus`](crate::error::BridgeError::HttpStatus)
    ///   before any body is handed out
    async fn download_stream(
        &self,
        url: String,
    ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;
}
