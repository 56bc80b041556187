//! Correction + translation call: formatter → service → validator.
//!
//! [`Corrector`] holds an injected [`LanguageService`] so tests can swap in a
//! double.  It never retries; retry policy belongs to the caller.

use std::sync::Arc;

use thiserror::Error;

use crate::llm::client::{ExternalServiceError, LanguageService};
use crate::llm::decode::{decode_correction, ResponseFormatError};
use crate::llm::prompt::PromptBuilder;
use crate::llm::types::CorrectionResult;

// ---------------------------------------------------------------------------
// CorrectionError
// ---------------------------------------------------------------------------

/// Errors from one correction request.
#[derive(Debug, Clone, Error)]
pub enum CorrectionError {
    /// The input was blank after trimming; no request was issued.
    #[error("input sentence is empty")]
    EmptyInput,

    #[error(transparent)]
    Service(#[from] ExternalServiceError),

    #[error(transparent)]
    Format(#[from] ResponseFormatError),
}

impl CorrectionError {
    /// Message suitable for the UI error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            CorrectionError::EmptyInput => "Please enter a sentence.",
            CorrectionError::Service(e) => e.user_message(),
            CorrectionError::Format(e) => e.user_message(),
        }
    }
}

// ---------------------------------------------------------------------------
// Corrector
// ---------------------------------------------------------------------------

/// Sends one sentence for correction and decodes the answer.
pub struct Corrector {
    service: Arc<dyn LanguageService>,
    prompt_builder: PromptBuilder,
}

impl Corrector {
    pub fn new(service: Arc<dyn LanguageService>) -> Self {
        Self {
            service,
            prompt_builder: PromptBuilder::new(),
        }
    }

    /// Correct `sentence` and translate the result.
    ///
    /// Blank input returns [`CorrectionError::EmptyInput`] without contacting
    /// the service.
    pub async fn correct_and_translate(
        &self,
        sentence: &str,
    ) -> Result<CorrectionResult, CorrectionError> {
        let request = self
            .prompt_builder
            .build(sentence)
            .ok_or(CorrectionError::EmptyInput)?;

        let raw = self.service.generate(&request).await.map_err(|e| {
            log::warn!("correction request failed: {e}");
            e
        })?;

        Ok(decode_correction(&raw)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::{MockService, SAMPLE_PAYLOAD};

    #[tokio::test]
    async fn decodes_service_payload() {
        let service = Arc::new(MockService::answering(SAMPLE_PAYLOAD));
        let corrector = Corrector::new(service.clone());

        let result = corrector
            .correct_and_translate("he go to market yesterday")
            .await
            .expect("ok");

        assert_eq!(result.corrected_sentence, "He went to the market yesterday.");
        assert_eq!(result.corrections.len(), 2);
        assert_eq!(service.generate_calls(), 1);
        assert!(service
            .last_prompt()
            .is_some_and(|p| p.contains("he go to market yesterday")));
    }

    #[tokio::test]
    async fn blank_input_issues_no_request() {
        let service = Arc::new(MockService::answering(SAMPLE_PAYLOAD));
        let corrector = Corrector::new(service.clone());

        let err = corrector.correct_and_translate("   ").await.unwrap_err();
        assert!(matches!(err, CorrectionError::EmptyInput));
        assert_eq!(service.generate_calls(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_service_error() {
        let service = Arc::new(MockService::failing(ExternalServiceError::Timeout));
        let corrector = Corrector::new(service);

        let err = corrector.correct_and_translate("hello").await.unwrap_err();
        assert!(matches!(err, CorrectionError::Service(ExternalServiceError::Timeout)));
        assert_eq!(
            err.user_message(),
            "Something went wrong. Please check your internet connection."
        );
    }

    #[tokio::test]
    async fn malformed_payload_is_format_error() {
        let service = Arc::new(MockService::answering("{\"correctedSentence\": \"x\"}"));
        let corrector = Corrector::new(service);

        let err = corrector.correct_and_translate("hello").await.unwrap_err();
        assert!(matches!(err, CorrectionError::Format(_)));
        assert_eq!(
            err.user_message(),
            "Failed to process your request. Please try again."
        );
    }
}
