//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the sound player core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus for out-of-band sound events
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the playback crates depend on.
//! It establishes the logging conventions, the fail-fast configuration
//! builder and the broadcast channel used to deliver `onSoundComplete` /
//! `onSoundError` notifications to host listeners.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
