//! Correction pipeline and the shared state the UI reads every frame.
//!
//! # Architecture
//!
//! ```text
//! UI "Correct" ──tokio::spawn──▶ CorrectionPipeline::submit()
//!                                   │
//!                                   ├─ Corrector (prompt → LanguageService → decode)
//!                                   └─ HistoryStore::append (persisted)
//!
//! SharedState (Arc<Mutex<AppState>>) ←─── read by egui update() each frame
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{CorrectionPipeline, SubmitOutcome};
pub use state::{lock_state, new_shared_state, AppState, SharedState};
