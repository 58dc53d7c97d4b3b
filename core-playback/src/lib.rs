//! # Sound Playback Core
//!
//! Plays one sound at a time through a host-provided media player, with a
//! small TTL file cache in front of remote sources.
//!
//! ## Overview
//!
//! ```text
//! PlaybackRequest ──> PlaybackController ──asset──> AssetResolver
//!                          │
//!                          └──remote──> RemoteSourceCache
//!                                         ├─ CacheKeyDeriver (sha256 → audio_<hex>)
//!                                         ├─ CacheStore      (lookup / write / purge)
//!                                         └─ Downloader      (connect 10 s, read 30 s)
//! ```
//!
//! The controller then prepares a platform player through
//! [`PlaybackAdapter`](bridge_traits::PlaybackAdapter), tracks repeat cycles in a
//! [`PlaybackSession`] and publishes completion and runtime errors on the
//! [`EventBus`](core_runtime::events::EventBus).
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::{PlaybackController, PlaybackRequest, RepeatMode};
//!
//! let controller = PlaybackController::from_config(&config);
//! let request = PlaybackRequest::new("https://cdn.example.com/ding.mp3", 0.5, ttl)
//!     .with_repeat(RepeatMode::from_count(2));
//! let outcome = controller.play(request).await?;
//! ```

pub mod cache;
pub mod controller;
pub mod downloader;
pub mod error;
pub mod request;
pub mod session;

pub use cache::{derive_key, CacheKeyDeriver, CacheStore, RemoteSourceCache};
pub use controller::PlaybackController;
pub use downloader::Downloader;
pub use error::{DownloadError, Rejection, Result, SoundError};
pub use request::{PlayOutcome, PlaybackRequest, RepeatMode, SoundSource, StopOutcome};
pub use session::{CycleOutcome, PlaybackSession};
