//! Shared application state.
//!
//! [`AppState`] is the single source of truth for everything the UI needs:
//! the session history (with its active item), whether a correction request
//! is outstanding, and the transient error slot.
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<AppState>>`, cheap to
//! clone and safe to share between the egui thread and tokio tasks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::history::HistoryStore;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state.
///
/// The correction pipeline mutates it; the egui update loop reads it each
/// frame.
pub struct AppState {
    /// Past results, most recent first, plus the active selection.
    pub history: HistoryStore,

    /// `true` while a correction request is in flight.
    pub is_loading: bool,

    /// User-facing message from the last failed submission.
    ///
    /// Cleared at the start of the next submission.
    pub error_message: Option<String>,
}

impl AppState {
    pub fn new(history: HistoryStore) -> Self {
        Self {
            history,
            is_loading: false,
            error_message: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AppState`].
///
/// Lock for a short critical section; do **not** hold the lock across
/// `.await` points.
pub type SharedState = Arc<Mutex<AppState>>;

/// Construct a new [`SharedState`].
pub fn new_shared_state(history: HistoryStore) -> SharedState {
    Arc::new(Mutex::new(AppState::new(history)))
}

/// Lock `state`, recovering the guard if a previous holder panicked.
pub fn lock_state(state: &SharedState) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
