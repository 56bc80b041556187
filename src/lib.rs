//! LingoFix: sentence correction, translation and read-aloud.
//!
//! The library holds everything except process startup:
//!
//! * [`llm`]: request formatter, response decoder and the language service
//!   client.
//! * [`history`]: capped, persisted session history.
//! * [`pipeline`]: submit orchestration over the shared UI state.
//! * [`speech`] and [`audio`]: speech synthesis, PCM decoding, playback.
//! * [`config`]: `settings.toml` and platform paths.
//! * [`app`]: the egui window.

pub mod app;
pub mod audio;
pub mod config;
pub mod history;
pub mod llm;
pub mod pipeline;
pub mod speech;
