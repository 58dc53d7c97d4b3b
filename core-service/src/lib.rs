//! Sound player façade and bootstrap helpers.
//!
//! This crate exposes the surface a host bridge (React Native module, Flutter
//! plugin, desktop shell) forwards its calls to:
//!
//! | Host call                             | Method |
//! |---------------------------------------|--------|
//! | `playSound`                           | [`SoundPlayerModule::play_sound`] |
//! | `playSoundWithVolume`                 | [`SoundPlayerModule::play_sound_with_volume`] |
//! | `playSoundWithVolumeAndCache`         | [`SoundPlayerModule::play_sound_with_volume_and_cache`] |
//! | `playSoundWithVolumeAndCacheAndLoop`  | [`SoundPlayerModule::play_sound_with_volume_and_cache_and_loop`] |
//! | `play(options)`                       | [`SoundPlayerModule::play`] |
//! | `stop`                                | [`SoundPlayerModule::stop`] |
//! | `addEventListener` / `removeEventListener` | [`SoundPlayerModule::add_event_listener`] / [`SoundPlayerModule::remove_event_listener`] |
//!
//! Failures come back as [`ServiceError`]; hosts reject their promise with
//! [`ServiceError::to_rejection`]. Desktop apps typically enable the
//! `desktop-shims` feature and call [`bootstrap_desktop`].

pub mod error;
mod listeners;
mod options;

pub use error::{Result, ServiceError};
pub use listeners::{EventHandler, Subscription};
pub use options::PlayOptions;

pub use core_playback::{PlayOutcome, Rejection, StopOutcome};
pub use core_runtime::events::{SoundEvent, SoundEventKind};

use bridge_traits::PlaybackState;
use core_playback::{PlaybackController, PlaybackRequest, RepeatMode};
use core_runtime::config::PlayerConfig;
use core_runtime::events::EventStream;
use listeners::{spawn_dispatcher, ListenerRegistry};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

#[cfg(feature = "desktop-shims")]
use bridge_traits::PlaybackAdapter;
#[cfg(feature = "desktop-shims")]
use std::path::PathBuf;

/// Primary façade exposed to host applications.
///
/// Cloning is cheap and shares the same controller and listeners.
#[derive(Clone)]
pub struct SoundPlayerModule {
    controller: PlaybackController,
    listeners: Arc<ListenerRegistry>,
    default_volume: f32,
    default_cache_ttl: Duration,
}

impl SoundPlayerModule {
    /// Build the module from a validated configuration.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: PlayerConfig) -> Self {
        let controller = PlaybackController::from_config(&config);
        let listeners = Arc::new(ListenerRegistry::default());
        spawn_dispatcher(controller.events(), Arc::clone(&listeners));

        Self {
            controller,
            listeners,
            default_volume: config.default_volume,
            default_cache_ttl: config.default_cache_ttl,
        }
    }

    /// Play at the default volume with the default cache lifetime.
    pub async fn play_sound(&self, file_name: &str) -> Result<PlayOutcome> {
        self.play_sound_with_volume(file_name, self.default_volume)
            .await
    }

    pub async fn play_sound_with_volume(&self, file_name: &str, volume: f32) -> Result<PlayOutcome> {
        self.play_sound_with_volume_and_cache(file_name, volume, self.default_cache_ttl.as_secs())
            .await
    }

    pub async fn play_sound_with_volume_and_cache(
        &self,
        file_name: &str,
        volume: f32,
        cache_duration_seconds: u64,
    ) -> Result<PlayOutcome> {
        self.play_sound_with_volume_and_cache_and_loop(file_name, volume, cache_duration_seconds, 0)
            .await
    }

    /// Play `file_name` (bundled asset name or `http(s)` URL).
    ///
    /// `loop_count`: `-1` loops until [`stop`](Self::stop), `0` plays once,
    /// `N > 0` plays `N` times before `onSoundComplete`.
    pub async fn play_sound_with_volume_and_cache_and_loop(
        &self,
        file_name: &str,
        volume: f32,
        cache_duration_seconds: u64,
        loop_count: i32,
    ) -> Result<PlayOutcome> {
        let request = PlaybackRequest::new(
            file_name,
            volume,
            Duration::from_secs(cache_duration_seconds),
        )
        .with_repeat(RepeatMode::from_count(loop_count));

        Ok(self.controller.play(request).await?)
    }

    /// Options-object entry point with per-call completion/error callbacks.
    #[instrument(skip(self, options), fields(loop_count = options.loop_count))]
    pub async fn play(&self, options: PlayOptions) -> Result<PlayOutcome> {
        if options.file_name.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "fileName is required in options".to_string(),
            ));
        }

        let volume = options.volume.unwrap_or(self.default_volume);
        let cache_duration_seconds = options
            .cache_duration_seconds
            .unwrap_or(self.default_cache_ttl.as_secs());
        let loop_count = options.loop_count.unwrap_or(0);

        let callbacks: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));

        if let Some(on_complete) = options.on_complete {
            let registered = Arc::clone(&callbacks);
            let subscription = self.add_event_listener(
                SoundEventKind::Complete,
                Arc::new(move |event: &SoundEvent| {
                    on_complete(event);
                    if loop_count != -1 {
                        remove_all(&registered);
                    }
                }),
            );
            callbacks.lock().push(subscription);
        }

        if let Some(on_error) = options.on_error {
            let registered = Arc::clone(&callbacks);
            let subscription = self.add_event_listener(
                SoundEventKind::Error,
                Arc::new(move |event: &SoundEvent| {
                    on_error(event);
                    remove_all(&registered);
                }),
            );
            callbacks.lock().push(subscription);
        }

        let result = self
            .play_sound_with_volume_and_cache_and_loop(
                &options.file_name,
                volume,
                cache_duration_seconds,
                loop_count,
            )
            .await;

        if result.is_err() {
            remove_all(&callbacks);
        }
        result
    }

    /// Stop whatever is playing. Always succeeds, even when idle.
    pub async fn stop(&self) -> StopOutcome {
        self.controller.stop().await
    }

    /// Current playback state.
    pub async fn state(&self) -> PlaybackState {
        self.controller.state().await
    }

    /// Register `handler` for every event of `kind`.
    pub fn add_event_listener(&self, kind: SoundEventKind, handler: EventHandler) -> Subscription {
        self.listeners.add(kind, handler)
    }

    /// Register by host event name (`onSoundComplete` / `onSoundError`).
    pub fn add_event_listener_by_name(
        &self,
        event_name: &str,
        handler: EventHandler,
    ) -> Result<Subscription> {
        let kind = SoundEventKind::from_name(event_name).ok_or_else(|| {
            ServiceError::InvalidArgument(format!("Unknown event name: {}", event_name))
        })?;
        Ok(self.add_event_listener(kind, handler))
    }

    pub fn remove_event_listener(&self, subscription: &Subscription) {
        subscription.remove();
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Raw event stream, for hosts that forward events themselves.
    pub fn events(&self) -> EventStream {
        EventStream::new(self.controller.events().subscribe())
    }

    /// Remove every cached download. Returns the number of files removed.
    pub async fn clear_cache(&self) -> Result<usize> {
        let removed = self.controller.remote_cache().store().clear().await?;
        info!(removed, "Sound cache cleared");
        Ok(removed)
    }

    /// Remove cached downloads older than `max_age`.
    pub async fn purge_expired_cache(&self, max_age: Duration) -> Result<usize> {
        Ok(self
            .controller
            .remote_cache()
            .store()
            .purge_expired(max_age)
            .await?)
    }
}

impl std::fmt::Debug for SoundPlayerModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundPlayerModule")
            .field("default_volume", &self.default_volume)
            .field("default_cache_ttl", &self.default_cache_ttl)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

fn remove_all(subscriptions: &Mutex<Vec<Subscription>>) {
    for subscription in subscriptions.lock().drain(..) {
        subscription.remove();
    }
}

/// Build a module from a configuration builder, mapping configuration
/// failures to [`ServiceError`].
pub fn bootstrap(config: core_runtime::config::PlayerConfigBuilder) -> Result<SoundPlayerModule> {
    let config = config.build()?;
    info!(
        cache_subdirectory = %config.cache.subdirectory,
        "Sound player initialized"
    );
    Ok(SoundPlayerModule::new(config))
}

/// Convenience bootstrapper for desktop hosts: reqwest downloads, tokio file
/// cache and bundled sounds looked up in `asset_dir`.
///
/// ```ignore
/// let module = core_service::bootstrap_desktop(Arc::new(MyAudioOutput::new()), "assets/sounds")?;
/// module.play_sound("click.mp3").await?;
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(
    adapter: Arc<dyn PlaybackAdapter>,
    asset_dir: impl Into<PathBuf>,
) -> Result<SoundPlayerModule> {
    use bridge_desktop::DirectoryAssetResolver;

    bootstrap(
        PlayerConfig::builder()
            .playback_adapter(adapter)
            .asset_resolver(Arc::new(DirectoryAssetResolver::new(asset_dir))),
    )
}
