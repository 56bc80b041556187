//! Language-service module for LingoFix.
//!
//! This module provides:
//! * [`LanguageService`]: async trait for the external generation + speech
//!   service, with [`GeminiClient`] as the production backend.
//! * [`PromptBuilder`]: request formatter declaring the output schema.
//! * [`decode_correction`]: validating decoder for the returned payload.
//! * [`Corrector`]: formatter → service → decoder in one call.
//! * [`CorrectionResult`] and its parts: the stable JSON contract.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lingofix::config::AppConfig;
//! use lingofix::llm::{Corrector, GeminiClient, LanguageService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load().unwrap();
//!     let service: Arc<dyn LanguageService> =
//!         Arc::new(GeminiClient::from_config(&config.llm, &config.speech));
//!
//!     let corrector = Corrector::new(service);
//!     let result = corrector
//!         .correct_and_translate("he go to market yesterday")
//!         .await
//!         .unwrap();
//!     println!("{}", result.corrected_sentence);
//! }
//! ```

pub mod client;
pub mod corrector;
pub mod decode;
pub mod prompt;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{
    ExternalServiceError, GeminiClient, GenerationRequest, LanguageService, SpeechRequest,
};
pub use corrector::{CorrectionError, Corrector};
pub use decode::{decode_correction, ResponseFormatError};
pub use prompt::{correction_schema, PromptBuilder};
pub use types::{CorrectionItem, CorrectionResult, TranslationData};
