//! A single playback instance and its repeat bookkeeping.

use crate::request::{PlaybackRequest, RepeatMode};
use bridge_traits::PlayerHandle;

/// What the controller should do when a cycle ends naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Seek to the start and play again.
    Restart,
    /// All requested cycles are done.
    Complete,
}

/// One live platform player plus the request it is serving.
///
/// Owned exclusively by the controller; the generation ties platform
/// notifications back to the session that produced them.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    handle: PlayerHandle,
    request: PlaybackRequest,
    generation: u64,
    current_repeat_index: u32,
}

impl PlaybackSession {
    pub fn new(handle: PlayerHandle, request: PlaybackRequest, generation: u64) -> Self {
        Self {
            handle,
            request,
            generation,
            current_repeat_index: 0,
        }
    }

    pub fn handle(&self) -> PlayerHandle {
        self.handle
    }

    pub fn request(&self) -> &PlaybackRequest {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Zero-based index of the cycle currently playing.
    pub fn current_repeat_index(&self) -> u32 {
        self.current_repeat_index
    }

    /// Record the end of the current cycle and decide what happens next.
    ///
    /// A native loop should never report completion; if the platform does
    /// anyway the session keeps looping.
    pub fn advance(&mut self) -> CycleOutcome {
        match self.request.repeat {
            RepeatMode::Forever => {
                self.current_repeat_index = self.current_repeat_index.saturating_add(1);
                CycleOutcome::Restart
            }
            RepeatMode::Once => CycleOutcome::Complete,
            RepeatMode::Times(n) => {
                if self.current_repeat_index.saturating_add(1) < n {
                    self.current_repeat_index += 1;
                    CycleOutcome::Restart
                } else {
                    CycleOutcome::Complete
                }
            }
        }
    }
}
