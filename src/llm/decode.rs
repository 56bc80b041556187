//! Validating decoder for the correction payload.
//!
//! The service is asked for JSON matching [`CorrectionResult`] but does not
//! guarantee it.  [`decode_correction`] is all-or-nothing: it either returns a
//! fully populated result or a [`ResponseFormatError`] that carries only a
//! user-safe message.  Parser diagnostics go to the log.

use thiserror::Error;

use crate::llm::types::CorrectionResult;

/// Message shown to the user when the payload cannot be decoded.
pub const FORMAT_MESSAGE: &str = "Failed to process your request. Please try again.";

/// The correction payload did not match the declared schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", FORMAT_MESSAGE)]
pub struct ResponseFormatError;

impl ResponseFormatError {
    pub fn user_message(&self) -> &'static str {
        FORMAT_MESSAGE
    }
}

/// Decode `raw` into a [`CorrectionResult`].
///
/// Fails on an empty payload, malformed JSON, a missing required field or a
/// field of the wrong type.  Unknown extra fields are ignored.
pub fn decode_correction(raw: &str) -> Result<CorrectionResult, ResponseFormatError> {
    let payload = raw.trim();
    if payload.is_empty() {
        log::error!("correction payload was empty");
        return Err(ResponseFormatError);
    }

    serde_json::from_str::<CorrectionResult>(payload).map_err(|e| {
        log::error!("failed to decode correction payload: {e}");
        ResponseFormatError
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{CorrectionItem, TranslationData};

    const VALID: &str = r#"{
        "correctedSentence": "He went to the market yesterday.",
        "explanation": "Fixed verb tense and added article.",
        "corrections": [
            {"original": "go", "fixed": "went", "reason": "past tense required"},
            {"original": "market", "fixed": "the market", "reason": "missing article"}
        ],
        "translations": {"telugu": "అతను నిన్న మార్కెట్‌కి వెళ్ళాడు.", "hindi": "वह कल बाज़ार गया।"}
    }"#;

    #[test]
    fn decodes_every_field_exactly() {
        let result = decode_correction(VALID).expect("valid payload");

        assert_eq!(result.corrected_sentence, "He went to the market yesterday.");
        assert_eq!(result.explanation, "Fixed verb tense and added article.");
        assert_eq!(
            result.corrections,
            vec![
                CorrectionItem {
                    original: "go".into(),
                    fixed: "went".into(),
                    reason: "past tense required".into(),
                },
                CorrectionItem {
                    original: "market".into(),
                    fixed: "the market".into(),
                    reason: "missing article".into(),
                },
            ]
        );
        assert_eq!(
            result.translations,
            TranslationData {
                telugu: "అతను నిన్న మార్కెట్‌కి వెళ్ళాడు.".into(),
                hindi: "वह कल बाज़ार गया।".into(),
                marathi: None,
                kannada: None,
            }
        );
    }

    #[test]
    fn serialised_result_decodes_to_itself() {
        let result = decode_correction(VALID).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"correctedSentence\""));
        assert!(!json.contains("marathi"));
        assert_eq!(decode_correction(&json).unwrap(), result);
    }

    #[test]
    fn accepts_empty_corrections_and_extra_languages() {
        let raw = r#"{
            "correctedSentence": "Hello.",
            "explanation": "Already correct.",
            "corrections": [],
            "translations": {"telugu": "t", "hindi": "h", "marathi": "m"},
            "confidence": 0.9
        }"#;
        let result = decode_correction(raw).unwrap();
        assert!(result.corrections.is_empty());
        assert_eq!(result.translations.marathi.as_deref(), Some("m"));
        assert!(result.translations.kannada.is_none());
    }

    #[test]
    fn empty_payload_fails() {
        assert_eq!(decode_correction(""), Err(ResponseFormatError));
        assert_eq!(decode_correction("  \n"), Err(ResponseFormatError));
    }

    #[test]
    fn invalid_json_fails() {
        assert!(decode_correction("{\"correctedSentence\": ").is_err());
        assert!(decode_correction("not json at all").is_err());
        assert!(decode_correction("[]").is_err());
    }

    #[test]
    fn missing_top_level_field_fails() {
        for field in ["correctedSentence", "explanation", "corrections", "translations"] {
            let mut value: serde_json::Value = serde_json::from_str(VALID).unwrap();
            value.as_object_mut().unwrap().remove(field);
            let raw = value.to_string();
            assert!(decode_correction(&raw).is_err(), "missing {field} must fail");
        }
    }

    #[test]
    fn missing_nested_field_fails() {
        let mut value: serde_json::Value = serde_json::from_str(VALID).unwrap();
        value["corrections"][1]
            .as_object_mut()
            .unwrap()
            .remove("reason");
        assert!(decode_correction(&value.to_string()).is_err());

        let mut value: serde_json::Value = serde_json::from_str(VALID).unwrap();
        value["translations"].as_object_mut().unwrap().remove("hindi");
        assert!(decode_correction(&value.to_string()).is_err());
    }

    #[test]
    fn wrong_field_type_fails() {
        let mut value: serde_json::Value = serde_json::from_str(VALID).unwrap();
        value["explanation"] = serde_json::json!(42);
        assert!(decode_correction(&value.to_string()).is_err());
    }

    #[test]
    fn error_message_is_user_safe() {
        let err = decode_correction("{oops").unwrap_err();
        assert_eq!(err.to_string(), FORMAT_MESSAGE);
        assert_eq!(err.user_message(), FORMAT_MESSAGE);
    }
}
