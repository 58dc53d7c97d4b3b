//! # Playback Controller
//!
//! Owns the single current [`PlaybackSession`] and sequences the platform
//! player through it.
//!
//! ## State machine
//!
//! ```text
//!   Idle ──play──> Preparing ──started──> Playing ──end, cycles left──┐
//!                      │                     │  ^                     │
//!                      │                     │  └─────restart─────────┘
//!                      │                     ├──end, done──> Completed
//!                      └──failure──> Errored <──platform error
//!
//!   any ──stop──> Stopped ──> Idle        any ──play──> Stopped ──> Preparing
//! ```
//!
//! ## Notifications
//!
//! Platform callbacks arrive on arbitrary threads. Each [`PlayerListener`]
//! handed to the adapter only forwards `(generation, notification)` into a
//! channel; a driver task applies them under the controller lock and drops any
//! whose generation is no longer current. Every new request and every stop
//! bumps the generation, so a completion racing a superseding request can
//! never touch the new session.

use crate::cache::{CacheKeyDeriver, CacheStore, RemoteSourceCache};
use crate::downloader::Downloader;
use crate::error::{Result, SoundError};
use crate::request::{PlayOutcome, PlaybackRequest, SoundSource, StopOutcome};
use crate::session::{CycleOutcome, PlaybackSession};
use bridge_traits::{
    AssetResolver, AudioSource, PlaybackAdapter, PlaybackState, PlayerHandle, PlayerListener,
    PlayerRequest,
};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{EventBus, SoundEvent};
use core_runtime::logging::redact_url;
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, instrument, warn};

/// Error code reported when the controller itself fails to restart a cycle.
/// Matches the platform's generic "unknown" media error.
pub const UNKNOWN_PLAYER_ERROR: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotificationKind {
    Completion,
    Error { what: i32, extra: i32 },
}

#[derive(Debug, Clone, Copy)]
struct Notification {
    generation: u64,
    kind: NotificationKind,
}

/// Listener given to the platform for one session.
struct SessionListener {
    generation: u64,
    sender: mpsc::UnboundedSender<Notification>,
}

impl SessionListener {
    fn forward(&self, kind: NotificationKind) {
        let notification = Notification {
            generation: self.generation,
            kind,
        };
        if self.sender.send(notification).is_err() {
            debug!(generation = self.generation, "Controller gone, dropping notification");
        }
    }
}

impl PlayerListener for SessionListener {
    fn on_completion(&self) {
        self.forward(NotificationKind::Completion);
    }

    fn on_error(&self, what: i32, extra: i32) {
        self.forward(NotificationKind::Error { what, extra });
    }
}

struct Slot {
    generation: u64,
    state: PlaybackState,
    session: Option<PlaybackSession>,
}

struct ControllerInner {
    adapter: Arc<dyn PlaybackAdapter>,
    assets: Arc<dyn AssetResolver>,
    remote: RemoteSourceCache,
    events: EventBus,
    slot: Mutex<Slot>,
    notifications: mpsc::UnboundedSender<Notification>,
}

/// Plays at most one sound at a time.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct PlaybackController {
    inner: Arc<ControllerInner>,
}

impl PlaybackController {
    /// Create a controller and spawn its notification driver.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        adapter: Arc<dyn PlaybackAdapter>,
        assets: Arc<dyn AssetResolver>,
        remote: RemoteSourceCache,
        events: EventBus,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let inner = Arc::new(ControllerInner {
            adapter,
            assets,
            remote,
            events,
            slot: Mutex::new(Slot {
                generation: 0,
                state: PlaybackState::Idle,
                session: None,
            }),
            notifications: sender,
        });

        tokio::spawn(drive_notifications(Arc::downgrade(&inner), receiver));

        Self { inner }
    }

    /// Wire a controller from a validated configuration.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &PlayerConfig) -> Self {
        let deriver = CacheKeyDeriver::new(
            config.cache.key_prefix.clone(),
            config.cache.key_algorithm,
        );
        let store = CacheStore::new(
            Arc::clone(&config.file_system),
            Arc::clone(&config.clock),
            config.cache.clone(),
        );
        let downloader = Downloader::new(Arc::clone(&config.http_client), config.download);
        Self::new(
            Arc::clone(&config.playback_adapter),
            Arc::clone(&config.asset_resolver),
            RemoteSourceCache::new(deriver, store, downloader),
            EventBus::new(config.event_buffer_size),
        )
    }

    /// Event bus receiving `onSoundComplete` / `onSoundError`.
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Download cache backing remote sources.
    pub fn remote_cache(&self) -> &RemoteSourceCache {
        &self.inner.remote
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> PlaybackState {
        self.inner.slot.lock().await.state.clone()
    }

    /// Play `request`, tearing down whatever was playing first.
    ///
    /// Resolves once the platform player has started. Later completion or
    /// runtime errors are published on the event bus. Resolution failures
    /// reject this request only; no event is emitted for them.
    #[instrument(
        skip(self, request),
        fields(file_name = %redact_url(request.file_name()), volume = request.volume)
    )]
    pub async fn play(&self, request: PlaybackRequest) -> Result<PlayOutcome> {
        let generation = {
            let mut slot = self.inner.slot.lock().await;
            slot.generation += 1;
            if let Some(previous) = slot.session.take() {
                info!(
                    generation = previous.generation(),
                    "Superseding current session"
                );
                slot.state = PlaybackState::Stopped;
                self.inner.teardown(previous.handle()).await;
            }
            slot.state = PlaybackState::Preparing;
            slot.generation
        };

        // Downloads happen without the lock so stop() stays responsive.
        let source = match self.inner.resolve(&request).await {
            Ok(source) => source,
            Err(e) => {
                warn!(error = %e, "Failed to resolve sound source");
                self.inner.fail_if_current(generation, &e).await;
                return Err(e);
            }
        };

        let mut slot = self.inner.slot.lock().await;
        if slot.generation != generation {
            info!(generation, "Request superseded while preparing");
            return Err(SoundError::Interrupted);
        }

        let listener = Arc::new(SessionListener {
            generation,
            sender: self.inner.notifications.clone(),
        });
        let player_request = PlayerRequest {
            source,
            volume: request.volume,
            looping: request.repeat.is_native_loop(),
            listener,
        };

        let handle = match self.inner.adapter.prepare(player_request).await {
            Ok(handle) => handle,
            Err(e) => {
                let err = SoundError::PlaybackFailed(e.to_string());
                error!(error = %e, "Platform player rejected source");
                slot.state = PlaybackState::Errored {
                    message: err.to_string(),
                };
                return Err(err);
            }
        };

        if let Err(e) = self.inner.adapter.start(handle).await {
            let err = SoundError::PlaybackFailed(e.to_string());
            error!(error = %e, "Platform player failed to start");
            self.inner.teardown(handle).await;
            slot.state = PlaybackState::Errored {
                message: err.to_string(),
            };
            return Err(err);
        }

        let outcome = PlayOutcome {
            success: true,
            file_name: request.file_name().to_string(),
            volume: request.volume,
        };

        slot.session = Some(PlaybackSession::new(handle, request, generation));
        slot.state = PlaybackState::Playing;
        info!(generation, player = %handle, "Playback started");

        Ok(outcome)
    }

    /// Stop and release the current session, if any. Always succeeds.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> StopOutcome {
        let mut slot = self.inner.slot.lock().await;
        slot.generation += 1;

        match slot.session.take() {
            Some(session) => {
                info!(generation = session.generation(), "Stopping sound");
                slot.state = PlaybackState::Stopped;
                self.inner.teardown(session.handle()).await;
            }
            None => debug!("Stop requested with no active session"),
        }

        slot.state = PlaybackState::Idle;
        StopOutcome { success: true }
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("events", &self.inner.events)
            .finish_non_exhaustive()
    }
}

async fn drive_notifications(
    inner: Weak<ControllerInner>,
    mut receiver: mpsc::UnboundedReceiver<Notification>,
) {
    while let Some(notification) = receiver.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        inner.handle_notification(notification).await;
    }
    debug!("Notification driver stopped");
}

impl ControllerInner {
    async fn resolve(&self, request: &PlaybackRequest) -> Result<AudioSource> {
        match &request.source {
            SoundSource::Remote(url) => {
                let path = self.remote.fetch(url, request.cache_ttl).await?;
                Ok(AudioSource::LocalFile { path })
            }
            SoundSource::Asset(name) => match self.assets.resolve(name).await {
                Ok(Some(source)) => Ok(source),
                Ok(None) => Err(SoundError::SourceNotFound(name.clone())),
                Err(e) => {
                    warn!(name = %name, error = %e, "Asset lookup failed");
                    Err(SoundError::SourceNotFound(name.clone()))
                }
            },
        }
    }

    async fn fail_if_current(&self, generation: u64, err: &SoundError) {
        let mut slot = self.slot.lock().await;
        if slot.generation == generation {
            slot.state = PlaybackState::Errored {
                message: err.to_string(),
            };
        }
    }

    async fn handle_notification(&self, notification: Notification) {
        let mut slot = self.slot.lock().await;

        if slot.generation != notification.generation {
            debug!(
                generation = notification.generation,
                current = slot.generation,
                "Ignoring notification from superseded session"
            );
            return;
        }

        let Some(session) = slot.session.as_mut() else {
            return;
        };

        match notification.kind {
            NotificationKind::Completion => match session.advance() {
                CycleOutcome::Restart => {
                    let handle = session.handle();
                    debug!(cycle = session.current_repeat_index(), "Restarting sound");
                    if let Err(e) = self.restart(handle).await {
                        error!(error = %e, "Failed to restart sound");
                        slot.session = None;
                        self.release(handle).await;
                        let message = format!("Error playing sound: {}", e);
                        slot.state = PlaybackState::Errored {
                            message: message.clone(),
                        };
                        self.publish(SoundEvent::error(UNKNOWN_PLAYER_ERROR, message));
                    }
                }
                CycleOutcome::Complete => {
                    let handle = session.handle();
                    let file_name = session.request().file_name().to_string();
                    slot.session = None;
                    self.release(handle).await;
                    slot.state = PlaybackState::Completed;
                    info!("Sound completed");
                    self.publish(SoundEvent::complete(file_name));
                }
            },
            NotificationKind::Error { what, extra } => {
                let handle = session.handle();
                slot.session = None;
                self.release(handle).await;
                let message = format!("Error playing sound: {}, {}", what, extra);
                error!(what, extra, "Platform player reported an error");
                slot.state = PlaybackState::Errored {
                    message: message.clone(),
                };
                self.publish(SoundEvent::error(what, message));
            }
        }
    }

    async fn restart(&self, handle: PlayerHandle) -> bridge_traits::error::Result<()> {
        self.adapter.seek_to_start(handle).await?;
        self.adapter.start(handle).await
    }

    /// Stop, reset, release. Each step is attempted regardless of the others.
    async fn teardown(&self, handle: PlayerHandle) {
        if let Err(e) = self.adapter.stop(handle).await {
            debug!(player = %handle, error = %e, "Stop failed during teardown");
        }
        if let Err(e) = self.adapter.reset(handle).await {
            warn!(player = %handle, error = %e, "Reset failed during teardown");
        }
        self.release(handle).await;
    }

    async fn release(&self, handle: PlayerHandle) {
        if let Err(e) = self.adapter.release(handle).await {
            warn!(player = %handle, error = %e, "Failed to release player");
        }
    }

    fn publish(&self, event: SoundEvent) {
        if self.events.emit(event).is_err() {
            debug!("No sound event subscribers");
        }
    }
}
