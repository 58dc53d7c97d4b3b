use core_playback::{Rejection, SoundError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Sound player initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Sound(#[from] SoundError),
}

impl ServiceError {
    /// Stable kind string for the host.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InitializationFailed(_) => "INITIALIZATION_ERROR",
            ServiceError::CapabilityMissing { .. } => "CAPABILITY_MISSING",
            ServiceError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ServiceError::Sound(e) => e.code(),
        }
    }

    /// `{code, message}` pair a host promise is rejected with.
    pub fn to_rejection(&self) -> Rejection {
        match self {
            ServiceError::Sound(e) => e.to_rejection(),
            other => Rejection {
                code: other.code().to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<core_runtime::Error> for ServiceError {
    fn from(error: core_runtime::Error) -> Self {
        match error {
            core_runtime::Error::CapabilityMissing {
                capability,
                message,
            } => ServiceError::CapabilityMissing {
                capability,
                message,
            },
            other => ServiceError::InitializationFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
