//! Wire types of the correction contract.
//!
//! The JSON shape of [`CorrectionResult`] (camelCase keys) is what the model
//! is asked to produce and what the history store persists.

use serde::{Deserialize, Serialize};

/// One atomic edit made to the input sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionItem {
    /// The incorrect segment.
    pub original: String,
    /// The corrected segment.
    pub fixed: String,
    /// Brief explanation of the rule.
    pub reason: String,
}

/// Translations of the corrected sentence.
///
/// `telugu` and `hindi` are required; further languages are optional and
/// omitted from the JSON when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationData {
    pub telugu: String,
    pub hindi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marathi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kannada: Option<String>,
}

/// The full decoded answer for one input sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionResult {
    pub corrected_sentence: String,
    pub explanation: String,
    pub corrections: Vec<CorrectionItem>,
    pub translations: TranslationData,
}
