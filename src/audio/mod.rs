//! Audio output pipeline: speech payload → PCM → resample → output device.
//!
//! # Pipeline
//!
//! ```text
//! base64 text → decode_base64 → pcm16le_to_f32 (24 kHz mono PcmBuffer)
//!            → resample_linear (device rate) → mono_to_interleaved
//!            → cpal output stream
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lingofix::audio::{decode_speech_payload, AudioSink, CpalSink};
//!
//! let buffer = decode_speech_payload("AAABAAIA", 24_000).unwrap();
//! CpalSink::new().play(&buffer).unwrap(); // blocks until the clip ends
//! ```

pub mod pcm;
pub mod playback;
pub mod resample;

pub use pcm::{decode_base64, decode_speech_payload, pcm16le_to_f32, PcmBuffer, PcmError};
pub use playback::{AudioSink, CpalSink, PlaybackError};
pub use resample::{mono_to_interleaved, resample_linear};
