//! Speech bridge state machine.
//!
//! ```text
//! Idle ──speak──▶ Synthesizing ──audio decoded──▶ Playing ──clip ends──▶ Idle
//! Synthesizing / Playing ──any error──▶ Idle
//! ```

use std::sync::{Arc, Mutex};

/// States of the speech bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechState {
    /// Ready to accept a request.
    #[default]
    Idle,
    /// Waiting for the speech service.
    Synthesizing,
    /// Audio is being rendered on the output device.
    Playing,
}

impl SpeechState {
    /// Returns `true` unless the bridge is `Idle`.
    ///
    /// The UI uses this to disable the Listen button.
    ///
    /// ```
    /// use lingofix::speech::SpeechState;
    ///
    /// assert!(!SpeechState::Idle.is_busy());
    /// assert!(SpeechState::Synthesizing.is_busy());
    /// assert!(SpeechState::Playing.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        !matches!(self, SpeechState::Idle)
    }

    /// Button label for the current state.
    pub fn label(&self) -> &'static str {
        match self {
            SpeechState::Idle => "Listen",
            SpeechState::Synthesizing => "Synthesizing...",
            SpeechState::Playing => "Playing...",
        }
    }
}

/// Thread-safe handle to the bridge's [`SpeechState`].
pub type SharedSpeechState = Arc<Mutex<SpeechState>>;
