//! One persisted correction session.

use serde::{Deserialize, Serialize};

use crate::llm::CorrectionResult;

/// A [`CorrectionResult`] plus the identity of the request that produced it.
///
/// Serialised flat, e.g.
/// `{"id": "...", "originalSentence": "...", "timestamp": 1700000000000,
/// "correctedSentence": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub original_sentence: String,
    /// Creation time in Unix milliseconds.
    #[serde(rename = "timestamp")]
    pub timestamp_millis: i64,
    #[serde(flatten)]
    pub result: CorrectionResult,
}

impl HistoryItem {
    /// Stamp `result` with a fresh UUID v4 and the current time.
    pub fn new(original_sentence: impl Into<String>, result: CorrectionResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            original_sentence: original_sentence.into(),
            timestamp_millis: chrono::Utc::now().timestamp_millis(),
            result,
        }
    }
}
