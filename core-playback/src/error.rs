//! # Playback Error Types
//!
//! Errors surfaced when a sound request is rejected.

use bridge_traits::BridgeError;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while resolving or playing a sound.
#[derive(Error, Debug)]
pub enum SoundError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// The bundled asset does not exist.
    #[error("Sound file not found: {0}")]
    SourceNotFound(String),

    /// The remote source could not be fetched.
    #[error("Error downloading sound: {0}")]
    DownloadFailed(#[from] DownloadError),

    /// Cache maintenance or lookup could not access the cache directory.
    #[error("Cache error: {0}")]
    Cache(String),

    // ========================================================================
    // Player Errors
    // ========================================================================
    /// The platform player rejected the source or failed to start.
    #[error("Error playing sound: {0}")]
    PlaybackFailed(String),

    /// Teardown failed. Rarely surfaced since stop swallows sub-errors.
    #[error("Error stopping sound: {0}")]
    StopFailed(String),

    /// A newer request or an explicit stop superseded this request before
    /// playback began.
    #[error("Sound request was interrupted before playback started")]
    Interrupted,
}

impl SoundError {
    /// Stable kind string used when rejecting a request across the bridge.
    pub fn code(&self) -> &'static str {
        match self {
            SoundError::SourceNotFound(_) => "FILE_NOT_FOUND",
            SoundError::DownloadFailed(_) => "DOWNLOAD_ERROR",
            SoundError::Cache(_) => "CACHE_ERROR",
            SoundError::PlaybackFailed(_) => "PLAYBACK_ERROR",
            SoundError::StopFailed(_) => "STOP_ERROR",
            SoundError::Interrupted => "INTERRUPTED",
        }
    }

    /// Convert into the `{code, message}` pair a host promise is rejected with.
    pub fn to_rejection(&self) -> Rejection {
        Rejection {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Typed failure outcome delivered to the host for a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub code: String,
    pub message: String,
}

/// A single download attempt failed.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Server answered with a non-2xx status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Connect or read bound elapsed.
    #[error("timed out")]
    Timeout,

    /// Reading the response body failed.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Any other client-side failure (DNS, TLS, malformed URL, ...).
    #[error("{0}")]
    Transport(String),

    /// The payload arrived but could not be written into the cache.
    #[error("failed to store downloaded payload: {0}")]
    Store(String),
}

impl From<BridgeError> for DownloadError {
    fn from(error: BridgeError) -> Self {
        if error.is_timeout() {
            return DownloadError::Timeout;
        }
        match error {
            BridgeError::HttpStatus { status, .. } => DownloadError::Status(status),
            BridgeError::Io(e) => DownloadError::Io(e),
            other => DownloadError::Transport(other.to_string()),
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::TimedOut {
            DownloadError::Timeout
        } else {
            DownloadError::Io(error)
        }
    }
}

pub type Result<T> = std::result::Result<T, SoundError>;
