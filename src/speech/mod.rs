//! Speech synthesis bridge for the corrected sentence.
//!
//! [`SpeechBridge`] asks the [`LanguageService`](crate::llm::LanguageService)
//! for audio, decodes it with [`crate::audio`] and plays it through an
//! [`AudioSink`](crate::audio::AudioSink).  It is independent of the history
//! pipeline and nothing it produces is cached.

pub mod bridge;
pub mod state;

pub use bridge::{SpeechBridge, SpeechGenerationError};
pub use state::{SharedSpeechState, SpeechState};
