//! Options object accepted by [`SoundPlayerModule::play`](crate::SoundPlayerModule::play).

use crate::listeners::EventHandler;
use core_runtime::events::SoundEvent;
use std::fmt;
use std::sync::Arc;

/// Everything `play` needs in one value. Unset fields fall back to the
/// module defaults (volume 0.5, cache 3600 s, play once).
#[derive(Clone, Default)]
pub struct PlayOptions {
    pub file_name: String,
    pub volume: Option<f32>,
    pub cache_duration_seconds: Option<u64>,
    /// `-1` loops forever, `0` plays once, `N > 0` plays `N` times.
    pub loop_count: Option<i32>,
    /// Called on `onSoundComplete`. Removed after the first call unless
    /// `loop_count` is `-1`.
    pub on_complete: Option<EventHandler>,
    /// Called on `onSoundError`. Removed after the first call.
    pub on_error: Option<EventHandler>,
}

impl PlayOptions {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn cache_duration_seconds(mut self, seconds: u64) -> Self {
        self.cache_duration_seconds = Some(seconds);
        self
    }

    pub fn loop_count(mut self, count: i32) -> Self {
        self.loop_count = Some(count);
        self
    }

    pub fn on_complete<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SoundEvent) + Send + Sync + 'static,
    {
        self.on_complete = Some(Arc::new(handler));
        self
    }

    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SoundEvent) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for PlayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayOptions")
            .field("file_name", &self.file_name)
            .field("volume", &self.volume)
            .field("cache_duration_seconds", &self.cache_duration_seconds)
            .field("loop_count", &self.loop_count)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
