//! Correction pipeline: one submitted sentence → history entry.
//!
//! # Flow
//!
//! ```text
//! submit(input)
//!   ├─ blank input            → Ignored  (no request, nothing changes)
//!   ├─ request in flight      → Busy
//!   └─ is_loading = true, error slot cleared
//!         └─ Corrector::correct_and_translate (async)
//!               ├─ Ok  → HistoryItem::new → history.append  → Completed(id)
//!               └─ Err → error slot = user message           → Failed(msg)
//!      is_loading = false
//! ```
//!
//! The state lock is released before the request is awaited and taken again
//! once it resolves.

use std::sync::Arc;

use crate::history::HistoryItem;
use crate::llm::{Corrector, LanguageService};

use super::state::{lock_state, SharedState};

// ---------------------------------------------------------------------------
// SubmitOutcome
// ---------------------------------------------------------------------------

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The input was blank; no request was made.
    Ignored,
    /// Another submission is still outstanding.
    Busy,
    /// A new history item with this id is now active.
    Completed(String),
    /// The request failed; the message is in the error slot.
    Failed(String),
}

// ---------------------------------------------------------------------------
// CorrectionPipeline
// ---------------------------------------------------------------------------

/// Drives submissions against the shared state.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use lingofix::config::AppConfig;
/// use lingofix::history::{HistoryStore, MemoryStorage};
/// use lingofix::llm::{GeminiClient, LanguageService};
/// use lingofix::pipeline::{new_shared_state, CorrectionPipeline};
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let service: Arc<dyn LanguageService> =
///     Arc::new(GeminiClient::from_config(&config.llm, &config.speech));
/// let history = HistoryStore::new(Arc::new(MemoryStorage::default()));
/// let pipeline = CorrectionPipeline::new(new_shared_state(history), service);
///
/// pipeline.submit("he go to market yesterday").await;
/// # }
/// ```
pub struct CorrectionPipeline {
    state: SharedState,
    corrector: Corrector,
}

impl CorrectionPipeline {
    pub fn new(state: SharedState, service: Arc<dyn LanguageService>) -> Self {
        Self {
            state,
            corrector: Corrector::new(service),
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Correct `input` and record the result as the active history item.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let sentence = input.trim();
        if sentence.is_empty() {
            return SubmitOutcome::Ignored;
        }

        {
            let mut st = lock_state(&self.state);
            if st.is_loading {
                log::debug!("pipeline: submission rejected, request already in flight");
                return SubmitOutcome::Busy;
            }
            st.is_loading = true;
            st.error_message = None;
        }

        log::info!("pipeline: correcting {} chars", sentence.chars().count());
        let result = self.corrector.correct_and_translate(sentence).await;

        let mut st = lock_state(&self.state);
        st.is_loading = false;
        match result {
            Ok(result) => {
                let item = HistoryItem::new(sentence, result);
                let id = item.id.clone();
                st.history.append(item);
                log::debug!("pipeline: stored history item {id}");
                SubmitOutcome::Completed(id)
            }
            Err(e) => {
                log::error!("pipeline error: {e}");
                let message = e.user_message().to_string();
                st.error_message = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Make the history item `id` active.  Returns `false` if it is unknown.
    pub fn select(&self, id: &str) -> bool {
        lock_state(&self.state).history.select_active(id)
    }

    /// Empty the history and drop the active selection.
    pub fn clear_history(&self) {
        lock_state(&self.state).history.clear();
        log::info!("pipeline: history cleared");
    }

    /// Clear the error slot without submitting.
    pub fn dismiss_error(&self) {
        lock_state(&self.state).error_message = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
