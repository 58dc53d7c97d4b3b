//! # Event Bus System
//!
//! Delivers out-of-band sound notifications using `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! A play request resolves once playback has started; what happens afterwards
//! (natural completion, a runtime error reported by the platform player) is
//! published here so that any number of listeners, not just the original
//! caller, can react. The host bridge forwards these to its own event
//! emitter under the names returned by [`SoundEvent::name`].
//!
//! ```text
//! ┌──────────────────┐   emit    ┌──────────┐  subscribe  ┌──────────────┐
//! │PlaybackController├──────────>│ EventBus ├────────────>│ host emitter │
//! └──────────────────┘           │(broadcast├────────────>│ PlayOptions  │
//!                                └──────────┘             │  callbacks   │
//!                                                         └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, SoundEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(SoundEvent::complete("click.mp3")).ok();
//! let event = rx.recv().await.unwrap();
//! assert_eq!(event.name(), "onSoundComplete");
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast::{self, error::RecvError, error::SendError, Receiver};

/// Default number of events buffered per subscriber.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

/// Host-facing name of the completion event.
pub const SOUND_COMPLETE_EVENT: &str = "onSoundComplete";

/// Host-facing name of the error event.
pub const SOUND_ERROR_EVENT: &str = "onSoundError";

/// Notification emitted for the lifetime of a playback session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SoundEvent {
    /// Playback finished all requested cycles.
    #[serde(rename_all = "camelCase")]
    Complete { file_name: String, success: bool },
    /// The platform player reported a runtime error.
    Error {
        /// Human-readable description.
        error: String,
        /// Platform error code (`what` on Android).
        code: i32,
    },
}

impl SoundEvent {
    /// Completion event for `file_name`.
    pub fn complete(file_name: impl Into<String>) -> Self {
        SoundEvent::Complete {
            file_name: file_name.into(),
            success: true,
        }
    }

    /// Error event carrying a platform error code.
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        SoundEvent::Error {
            error: message.into(),
            code,
        }
    }

    /// Name under which the host emits this event.
    pub fn name(&self) -> &'static str {
        match self {
            SoundEvent::Complete { .. } => SOUND_COMPLETE_EVENT,
            SoundEvent::Error { .. } => SOUND_ERROR_EVENT,
        }
    }

    /// Returns the event kind without its payload.
    pub fn kind(&self) -> SoundEventKind {
        match self {
            SoundEvent::Complete { .. } => SoundEventKind::Complete,
            SoundEvent::Error { .. } => SoundEventKind::Error,
        }
    }

    /// Serialize the payload for the host event emitter.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Discriminant of [`SoundEvent`], used when registering listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEventKind {
    Complete,
    Error,
}

impl SoundEventKind {
    /// Parse a host event name (`onSoundComplete` / `onSoundError`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            SOUND_COMPLETE_EVENT => Some(SoundEventKind::Complete),
            SOUND_ERROR_EVENT => Some(SoundEventKind::Error),
            _ => None,
        }
    }
}

/// Central broadcast channel for sound events.
///
/// Cloning is cheap; all clones publish to the same subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SoundEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// When a subscriber falls behind by more than `capacity` events it
    /// receives `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: SoundEvent) -> Result<usize, SendError<SoundEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<SoundEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&SoundEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, SoundEventKind};
///
/// let bus = EventBus::new(16);
/// let errors_only = EventStream::new(bus.subscribe()).of_kind(SoundEventKind::Error);
/// ```
pub struct EventStream {
    receiver: Receiver<SoundEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<SoundEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only yield events matching `predicate`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&SoundEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Only yield events of the given kind.
    pub fn of_kind(self, kind: SoundEventKind) -> Self {
        self.filter(move |event| event.kind() == kind)
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<SoundEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            match &self.filter {
                Some(filter) if !filter(&event) => continue,
                _ => return Ok(event),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
