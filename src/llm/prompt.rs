//! Request formatter for the correction + translation call.
//!
//! [`PromptBuilder`] turns one input sentence into a [`GenerationRequest`]:
//! an instruction prompt plus the strict output schema the service must
//! follow.  The schema uses the Gemini OpenAPI subset (`OBJECT`, `ARRAY`,
//! `STRING`) and mirrors [`CorrectionResult`](crate::llm::CorrectionResult).

use serde_json::{json, Value};

use crate::llm::client::GenerationRequest;

const INSTRUCTION: &str = "\
Correct the following English sentence for grammar, punctuation, and style.
Also provide translations for the corrected version in Telugu and Hindi.";

/// MIME type requested for structured output.
pub const JSON_MIME_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds correction requests.
///
/// # Example
/// ```rust
/// use lingofix::llm::PromptBuilder;
///
/// let request = PromptBuilder::new().build("he go to market").unwrap();
/// assert!(request.prompt.contains("he go to market"));
/// assert!(PromptBuilder::new().build("   ").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the request for `sentence`.
    ///
    /// Returns `None` when `sentence` is blank after trimming; blank input
    /// must never reach the service.
    pub fn build(&self, sentence: &str) -> Option<GenerationRequest> {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return None;
        }

        let prompt = format!("{INSTRUCTION}\nSentence to process: \"{sentence}\"");

        Some(GenerationRequest {
            prompt,
            response_mime_type: JSON_MIME_TYPE.to_string(),
            response_schema: correction_schema(),
        })
    }
}

/// The declared output schema; every property is required.
pub fn correction_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "correctedSentence": {
                "type": "STRING",
                "description": "The final polished English sentence."
            },
            "explanation": {
                "type": "STRING",
                "description": "A brief summary of what was improved."
            },
            "corrections": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "original": { "type": "STRING", "description": "The incorrect segment." },
                        "fixed":    { "type": "STRING", "description": "The corrected segment." },
                        "reason":   { "type": "STRING", "description": "Brief explanation of the rule." }
                    },
                    "required": ["original", "fixed", "reason"]
                }
            },
            "translations": {
                "type": "OBJECT",
                "properties": {
                    "telugu": { "type": "STRING", "description": "Translation in Telugu." },
                    "hindi":  { "type": "STRING", "description": "Translation in Hindi." }
                },
                "required": ["telugu", "hindi"]
            }
        },
        "required": ["correctedSentence", "explanation", "corrections", "translations"]
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
