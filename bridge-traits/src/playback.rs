//! Playback bridge traits and supporting audio types.
//!
//! These abstractions let the core drive the host platform's native media
//! player (Android `MediaPlayer`, `AVAudioPlayer`, a desktop audio sink)
//! without reimplementing decoding or output. The host owns the player; the
//! core only sequences its lifecycle calls and reacts to its notifications.

use crate::error::Result;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Audio source handed to the platform player once it has been resolved
/// to something locally readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Asset bundled with the host application.
    BundledAsset {
        /// Asset name after extension stripping (e.g. `click`).
        name: String,
        /// Host-specific locator (file path, raw resource path, ...).
        location: PathBuf,
    },
    /// Local file accessible to the host runtime, such as a cached download.
    LocalFile { path: PathBuf },
}

impl AudioSource {
    /// Returns the path the platform player should open.
    pub fn path(&self) -> &PathBuf {
        match self {
            AudioSource::BundledAsset { location, .. } => location,
            AudioSource::LocalFile { path } => path,
        }
    }
}

/// Receives asynchronous notifications from the platform player.
///
/// Callbacks may be invoked on any thread the host media service uses and
/// must not block.
pub trait PlayerListener: Send + Sync {
    /// The player reached the natural end of the source.
    fn on_completion(&self);

    /// The player reported a runtime error (`what`/`extra` are platform codes).
    fn on_error(&self, what: i32, extra: i32);
}

/// Everything a host adapter needs to provision one native player.
#[derive(Clone)]
pub struct PlayerRequest {
    /// Source to open.
    pub source: AudioSource,
    /// Initial volume (0.0 = muted, 1.0 = unity gain). The platform clamps.
    pub volume: f32,
    /// Whether the platform should loop natively until stopped.
    pub looping: bool,
    /// Listener that receives completion and error notifications.
    pub listener: Arc<dyn PlayerListener>,
}

impl fmt::Debug for PlayerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerRequest")
            .field("source", &self.source)
            .field("volume", &self.volume)
            .field("looping", &self.looping)
            .finish_non_exhaustive()
    }
}

/// Opaque identifier for a native player instance owned by the host adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerHandle(Uuid);

impl PlayerHandle {
    /// Generate a new player handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlayerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playback lifecycle state as observed by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Preparing,
    Playing,
    Stopped,
    Completed,
    Errored { message: String },
}

impl PlaybackState {
    /// Returns `true` while a session holds platform resources.
    pub fn is_active(&self) -> bool {
        matches!(self, PlaybackState::Preparing | PlaybackState::Playing)
    }
}

/// Trait for host adapters that drive the platform's native media player.
#[async_trait::async_trait]
pub trait PlaybackAdapter: Send + Sync {
    /// Create a player, attach the source, volume, looping flag and listener,
    /// and run the platform's prepare step. Fails if the source is malformed
    /// or unsupported.
    async fn prepare(&self, request: PlayerRequest) -> Result<PlayerHandle>;

    /// Begin playback from the current position.
    async fn start(&self, player: PlayerHandle) -> Result<()>;

    /// Seek back to the beginning of the source.
    async fn seek_to_start(&self, player: PlayerHandle) -> Result<()>;

    /// Stop output. May fail if the player is already stopped.
    async fn stop(&self, player: PlayerHandle) -> Result<()>;

    /// Return the player to its uninitialized state.
    async fn reset(&self, player: PlayerHandle) -> Result<()>;

    /// Release all native resources held by the player.
    async fn release(&self, player: PlayerHandle) -> Result<()>;
}

/// Looks up audio assets bundled with the host application.
#[async_trait::async_trait]
pub trait AssetResolver: Send + Sync {
    /// Resolve an asset name to a playable source, or `None` if the bundle
    /// does not contain it.
    async fn resolve(&self, name: &str) -> Result<Option<AudioSource>>;
}

/// Strip the audio extensions hosts accept in asset names (`click.mp3` → `click`).
pub fn asset_stem(name: &str) -> String {
    name.replace(".mp3", "").replace(".wav", "").replace(".ogg", "")
}
