//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the sound player core and the
//! platform-specific services it consumes. Each trait represents a capability
//! that the core requires but that must be implemented differently per
//! platform (desktop, iOS, Android).
//!
//! ## Traits
//!
//! ### Networking & I/O
//! - [`HttpClient`](http::HttpClient) - Streaming downloads with connect/read timeouts
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Cache directory file I/O
//!
//! ### Media
//! - [`PlaybackAdapter`](playback::PlaybackAdapter) - Native media player lifecycle
//! - [`PlayerListener`](playback::PlayerListener) - Completion/error notifications
//! - [`AssetResolver`](playback::AssetResolver) - Bundled asset lookup
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Provides |
//! |----------|---------------------|----------|
//! | Desktop  | `bridge-desktop`    | HTTP, filesystem, asset directory |
//! | Android  | host module         | all, player via `MediaPlayer` |
//! | iOS      | host module         | all, player via `AVAudioPlayer` |
//!
//! The core never ships a media player of its own: `PlaybackAdapter` and
//! `AssetResolver` must always be injected by the host.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert platform-specific errors to `BridgeError`
//! and include context such as the URL or file path.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so they can be shared across
//! async tasks and invoked from platform callback threads.

pub mod error;
pub mod http;
pub mod playback;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{is_remote_url, HttpClient};
pub use playback::{
    AssetResolver, AudioSource, PlaybackAdapter, PlaybackState, PlayerHandle, PlayerListener,
    PlayerRequest,
};
pub use storage::{FileMetadata, FileSystemAccess};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
