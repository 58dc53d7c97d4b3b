//! Play requests and the outcomes reported back to the host.

use bridge_traits::is_remote_url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where a requested sound comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// Sound bundled with the host application, looked up by name.
    Asset(String),
    /// `http://` or `https://` URL, played through the download cache.
    Remote(String),
}

impl SoundSource {
    /// Classify a caller-supplied file name or URL.
    pub fn parse(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        if is_remote_url(&file_name) {
            SoundSource::Remote(file_name)
        } else {
            SoundSource::Asset(file_name)
        }
    }

    /// The string the caller supplied.
    pub fn as_str(&self) -> &str {
        match self {
            SoundSource::Asset(name) => name,
            SoundSource::Remote(url) => url,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SoundSource::Remote(_))
    }
}

/// How many times a sound plays before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// One cycle.
    #[default]
    Once,
    /// Exactly this many cycles (at least one).
    Times(u32),
    /// Loop natively until stopped; never completes.
    Forever,
}

impl RepeatMode {
    /// Map the host's repeat count: `-1` loops forever, `0` plays once and
    /// `N > 0` plays `N` times. Any other negative value plays once.
    pub fn from_count(count: i32) -> Self {
        match count {
            -1 => RepeatMode::Forever,
            n if n > 0 => RepeatMode::Times(n.unsigned_abs()),
            _ => RepeatMode::Once,
        }
    }

    /// Total cycles, or `None` when looping forever.
    pub fn cycles(&self) -> Option<u32> {
        match self {
            RepeatMode::Once => Some(1),
            RepeatMode::Times(n) => Some((*n).max(1)),
            RepeatMode::Forever => None,
        }
    }

    /// Whether the platform player should loop on its own.
    pub fn is_native_loop(&self) -> bool {
        matches!(self, RepeatMode::Forever)
    }
}

/// An immutable request to play one sound.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackRequest {
    pub source: SoundSource,
    /// 0.0 to 1.0; out-of-range values are clamped by the platform.
    pub volume: f32,
    /// Maximum age of a cached download that may be reused.
    pub cache_ttl: Duration,
    pub repeat: RepeatMode,
}

impl PlaybackRequest {
    pub fn new(file_name: impl Into<String>, volume: f32, cache_ttl: Duration) -> Self {
        Self {
            source: SoundSource::parse(file_name),
            volume,
            cache_ttl,
            repeat: RepeatMode::Once,
        }
    }

    pub fn with_repeat(mut self, repeat: RepeatMode) -> Self {
        self.repeat = repeat;
        self
    }

    /// The file name or URL as the caller supplied it.
    pub fn file_name(&self) -> &str {
        self.source.as_str()
    }
}

/// Success payload of a play request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayOutcome {
    pub success: bool,
    pub file_name: String,
    pub volume: f32,
}

/// Result of a stop request. Always successful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopOutcome {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_classification() {
        assert_eq!(
            SoundSource::parse("https://x/a.mp3"),
            SoundSource::Remote("https://x/a.mp3".into())
        );
        assert_eq!(
            SoundSource::parse("http://x/a.mp3"),
            SoundSource::Remote("http://x/a.mp3".into())
        );
        assert_eq!(
            SoundSource::parse("click.mp3"),
            SoundSource::Asset("click.mp3".into())
        );
        assert!(!SoundSource::parse("ftp://x/a.mp3").is_remote());
    }

    #[test]
    fn test_repeat_mode_from_count() {
        assert_eq!(RepeatMode::from_count(-1), RepeatMode::Forever);
        assert_eq!(RepeatMode::from_count(0), RepeatMode::Once);
        assert_eq!(RepeatMode::from_count(3), RepeatMode::Times(3));
        assert_eq!(RepeatMode::from_count(-7), RepeatMode::Once);

        assert_eq!(RepeatMode::Once.cycles(), Some(1));
        assert_eq!(RepeatMode::Times(2).cycles(), Some(2));
        assert_eq!(RepeatMode::Forever.cycles(), None);
        assert!(RepeatMode::Forever.is_native_loop());
    }

    #[test]
    fn test_play_outcome_serializes_camel_case() {
        let outcome = PlayOutcome {
            success: true,
            file_name: "click.mp3".into(),
            volume: 0.5,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["fileName"], "click.mp3");
        assert_eq!(json["success"], true);
        assert_eq!(json["volume"], 0.5);
    }
}
