//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides implementations of the bridge traits that have a
//! natural desktop counterpart:
//! - `HttpClient` using `reqwest` (10 s connect / 30 s read timeouts)
//! - `FileSystemAccess` using `tokio::fs`
//! - `AssetResolver` backed by a directory of bundled sounds
//!
//! The media player itself (`PlaybackAdapter`) is always supplied by the host.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DirectoryAssetResolver, ReqwestHttpClient, TokioFileSystem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let fs = TokioFileSystem::new();
//!     let assets = DirectoryAssetResolver::new("assets/sounds");
//!     // Hand to PlayerConfig::builder()
//!     Ok(())
//! }
//! ```

mod assets;
mod filesystem;
mod http;

pub use assets::DirectoryAssetResolver;
pub use filesystem::TokioFileSystem;
pub use http::{ReqwestHttpClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT};
