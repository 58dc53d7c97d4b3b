//! # Player Configuration Module
//!
//! Provides configuration management for the sound player core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `PlayerConfig` instance that holds all bridge dependencies and tunables.
//! It enforces fail-fast validation so that a missing platform capability is
//! reported at startup with an actionable message instead of on the first
//! play request.
//!
//! ## Required Dependencies
//!
//! - `PlaybackAdapter` - The platform's native media player
//! - `AssetResolver` - Lookup of sounds bundled with the app
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - Downloads (desktop default: reqwest)
//! - `FileSystemAccess` - Cache I/O (desktop default: tokio fs)
//! - `Clock` - Freshness checks (default: system clock)
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults for
//! `HttpClient` and `FileSystemAccess` are injected automatically if not
//! provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::PlayerConfig;
//! use std::sync::Arc;
//!
//! let config = PlayerConfig::builder()
//!     .playback_adapter(Arc::new(MyMediaPlayerAdapter::new()))
//!     .asset_resolver(Arc::new(MyRawResourceResolver::new()))
//!     .default_cache_ttl(Duration::from_secs(600))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{
    AssetResolver, Clock, FileSystemAccess, HttpClient, PlaybackAdapter, SystemClock,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Name of the dedicated subdirectory inside the app cache directory.
pub const DEFAULT_CACHE_SUBDIRECTORY: &str = "SimpleSoundPlayer";

/// Namespace tag prepended to every cache key.
pub const DEFAULT_KEY_PREFIX: &str = "audio_";

/// Extension given to cached payloads.
pub const DEFAULT_CACHE_FILE_EXTENSION: &str = "mp3";

/// Volume used by requests that do not specify one.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Cache lifetime used by requests that do not specify one.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Hash used to derive cache keys from source URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyAlgorithm {
    /// SHA-256, hex encoded.
    #[default]
    Sha256,
    /// 64-bit FNV-1a, hex encoded. Lower collision resistance; acceptable
    /// for a local cache when SHA-256 is unavailable.
    Fnv1a,
}

/// Cache naming and freshness settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Root cache directory. `None` defers to
    /// [`FileSystemAccess::get_cache_directory`].
    pub root: Option<PathBuf>,
    /// Subdirectory under the app cache directory holding payloads.
    pub subdirectory: String,
    /// Namespace tag prepended to derived keys.
    pub key_prefix: String,
    /// Extension of cached payload files (without dot).
    pub file_extension: String,
    /// Hash used for key derivation.
    pub key_algorithm: KeyAlgorithm,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            root: None,
            subdirectory: DEFAULT_CACHE_SUBDIRECTORY.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            file_extension: DEFAULT_CACHE_FILE_EXTENSION.to_string(),
            key_algorithm: KeyAlgorithm::default(),
        }
    }
}

/// Network bounds for a single download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSettings {
    /// Bound on obtaining a response (connection + headers).
    pub connect_timeout: Duration,
    /// Bound on waiting for each chunk of the body.
    pub read_timeout: Duration,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
        }
    }
}

/// Sound player configuration.
///
/// Holds all dependencies and settings required to build the playback core.
/// Use [`PlayerConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct PlayerConfig {
    /// HTTP client used for remote sources
    pub http_client: Arc<dyn HttpClient>,

    /// File system access for the download cache
    pub file_system: Arc<dyn FileSystemAccess>,

    /// Native media player adapter (required)
    pub playback_adapter: Arc<dyn PlaybackAdapter>,

    /// Bundled asset lookup (required)
    pub asset_resolver: Arc<dyn AssetResolver>,

    /// Time source for cache freshness
    pub clock: Arc<dyn Clock>,

    /// Cache naming and hashing
    pub cache: CacheSettings,

    /// Download timeouts
    pub download: DownloadSettings,

    /// Volume applied when a request omits one
    pub default_volume: f32,

    /// Cache TTL applied when a request omits one
    pub default_cache_ttl: Duration,

    /// Per-subscriber event buffer
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("file_system", &"FileSystemAccess { ... }")
            .field("playback_adapter", &"PlaybackAdapter { ... }")
            .field("asset_resolver", &"AssetResolver { ... }")
            .field("cache", &self.cache)
            .field("download", &self.download)
            .field("default_volume", &self.default_volume)
            .field("default_cache_ttl", &self.default_cache_ttl)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl PlayerConfig {
    /// Creates a new builder for constructing a `PlayerConfig`.
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Cache subdirectory, key prefix and extension are usable file name parts
    /// - Download timeouts are non-zero
    /// - Event buffer is non-zero
    pub fn validate(&self) -> Result<()> {
        let subdirectory = &self.cache.subdirectory;
        if subdirectory.is_empty() || subdirectory.contains(['/', '\\']) || subdirectory == ".." {
            return Err(Error::Config(format!(
                "Cache subdirectory must be a single non-empty path component, got {:?}",
                subdirectory
            )));
        }

        if self.cache.key_prefix.is_empty() {
            return Err(Error::Config(
                "Cache key prefix cannot be empty".to_string(),
            ));
        }

        if self.cache.key_prefix.contains(['/', '\\', '.']) {
            return Err(Error::Config(format!(
                "Cache key prefix must be file-name safe, got {:?}",
                self.cache.key_prefix
            )));
        }

        if self.cache.file_extension.is_empty() || self.cache.file_extension.contains(['/', '\\', '.']) {
            return Err(Error::Config(format!(
                "Cache file extension must be non-empty and contain no separators, got {:?}",
                self.cache.file_extension
            )));
        }

        if self.download.connect_timeout.is_zero() || self.download.read_timeout.is_zero() {
            return Err(Error::Config(
                "Download timeouts must be greater than zero".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn playback_adapter_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "PlaybackAdapter".to_string(),
        message: "A PlaybackAdapter driving the platform media player is required. \
                 Android: wrap android.media.MediaPlayer. \
                 iOS: wrap AVAudioPlayer. \
                 Desktop: inject an adapter over your audio output library."
            .to_string(),
    }
}

fn asset_resolver_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "AssetResolver".to_string(),
        message: "An AssetResolver for bundled sounds is required. \
                 Android: resolve names against res/raw. \
                 Desktop: use bridge_desktop::DirectoryAssetResolver."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: ensure the 'desktop-shims' feature is enabled. \
                 Mobile: inject platform-native adapter."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn file_system_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "FileSystemAccess".to_string(),
        message: "No FileSystemAccess implementation provided. \
                 Desktop: ensure the 'desktop-shims' feature is enabled. \
                 Mobile: inject an adapter rooted at the app's private cache directory."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(download: &DownloadSettings) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client =
        ReqwestHttpClient::with_timeouts(download.connect_timeout, download.read_timeout)
            .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_download: &DownloadSettings) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    use bridge_desktop::TokioFileSystem;

    Ok(Arc::new(TokioFileSystem::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Err(file_system_missing_error())
}

/// Builder for constructing [`PlayerConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](PlayerConfigBuilder::build) to create the final config.
#[derive(Default)]
pub struct PlayerConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
    playback_adapter: Option<Arc<dyn PlaybackAdapter>>,
    asset_resolver: Option<Arc<dyn AssetResolver>>,
    clock: Option<Arc<dyn Clock>>,
    cache: CacheSettings,
    download: DownloadSettings,
    default_volume: Option<f32>,
    default_cache_ttl: Option<Duration>,
    event_buffer_size: Option<usize>,
}

impl PlayerConfigBuilder {
    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the reqwest-based desktop client is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the file system access implementation.
    ///
    /// If not provided, the tokio-based desktop implementation is used when
    /// the `desktop-shims` feature is enabled.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Sets the native media player adapter (required).
    pub fn playback_adapter(mut self, adapter: Arc<dyn PlaybackAdapter>) -> Self {
        self.playback_adapter = Some(adapter);
        self
    }

    /// Sets the bundled asset resolver (required).
    pub fn asset_resolver(mut self, resolver: Arc<dyn AssetResolver>) -> Self {
        self.asset_resolver = Some(resolver);
        self
    }

    /// Sets the time source used for cache freshness checks.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Overrides the root cache directory reported by the file system.
    pub fn cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache.root = Some(path.into());
        self
    }

    /// Sets the cache subdirectory name.
    ///
    /// Default: `SimpleSoundPlayer`
    pub fn cache_subdirectory(mut self, name: impl Into<String>) -> Self {
        self.cache.subdirectory = name.into();
        self
    }

    /// Sets the namespace tag prepended to cache keys.
    ///
    /// Default: `audio_`
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cache.key_prefix = prefix.into();
        self
    }

    /// Sets the extension of cached payload files.
    ///
    /// Default: `mp3`
    pub fn cache_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.cache.file_extension = extension.into();
        self
    }

    /// Sets the hash used for cache keys.
    pub fn key_algorithm(mut self, algorithm: KeyAlgorithm) -> Self {
        self.cache.key_algorithm = algorithm;
        self
    }

    /// Sets the connect timeout for downloads.
    ///
    /// Default: 10 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.download.connect_timeout = timeout;
        self
    }

    /// Sets the read timeout for downloads.
    ///
    /// Default: 30 seconds
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.download.read_timeout = timeout;
        self
    }

    /// Sets the volume used by requests that omit one.
    ///
    /// Default: 0.5
    pub fn default_volume(mut self, volume: f32) -> Self {
        self.default_volume = Some(volume);
        self
    }

    /// Sets the cache TTL used by requests that omit one.
    ///
    /// Default: 1 hour
    pub fn default_cache_ttl(mut self, ttl: Duration) -> Self {
        self.default_cache_ttl = Some(ttl);
        self
    }

    /// Sets the per-subscriber event buffer size.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `PlayerConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(PlayerConfig)` on success, or an error if:
    /// - Required bridges are missing (PlaybackAdapter, AssetResolver)
    /// - No HTTP client / file system was provided and no default is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<PlayerConfig> {
        let playback_adapter = self
            .playback_adapter
            .ok_or_else(playback_adapter_missing_error)?;

        let asset_resolver = self
            .asset_resolver
            .ok_or_else(asset_resolver_missing_error)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(&self.download)?,
        };

        let file_system = match self.file_system {
            Some(fs) => fs,
            None => provide_default_file_system()?,
        };

        let config = PlayerConfig {
            http_client,
            file_system,
            playback_adapter,
            asset_resolver,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            cache: self.cache,
            download: self.download,
            default_volume: self.default_volume.unwrap_or(DEFAULT_VOLUME),
            default_cache_ttl: self.default_cache_ttl.unwrap_or(DEFAULT_CACHE_TTL),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
