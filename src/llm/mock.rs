//! In-process [`LanguageService`] double for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::client::{ExternalServiceError, GenerationRequest, LanguageService, SpeechRequest};

/// A schema-conforming payload for "he go to market yesterday".
pub const SAMPLE_PAYLOAD: &str = r#"{
    "correctedSentence": "He went to the market yesterday.",
    "explanation": "Fixed verb tense and added article.",
    "corrections": [
        {"original": "go", "fixed": "went", "reason": "past tense required"},
        {"original": "market", "fixed": "the market", "reason": "missing article"}
    ],
    "translations": {"telugu": "...", "hindi": "..."}
}"#;

/// Returns canned answers and counts calls.
pub struct MockService {
    generate_result: Result<String, ExternalServiceError>,
    speech_result: Result<Option<String>, ExternalServiceError>,
    speech_delay: Duration,
    generate_calls: AtomicUsize,
    speech_calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockService {
    fn new(
        generate_result: Result<String, ExternalServiceError>,
        speech_result: Result<Option<String>, ExternalServiceError>,
    ) -> Self {
        Self {
            generate_result,
            speech_result,
            speech_delay: Duration::ZERO,
            generate_calls: AtomicUsize::new(0),
            speech_calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// `generate` returns `payload`.
    pub fn answering(payload: &str) -> Self {
        Self::new(Ok(payload.to_string()), Ok(None))
    }

    /// Every call fails with `err`.
    pub fn failing(err: ExternalServiceError) -> Self {
        Self::new(Err(err.clone()), Err(err))
    }

    /// `synthesize` returns `audio`.
    pub fn speaking(audio: Option<&str>) -> Self {
        Self::new(Ok(String::new()), Ok(audio.map(str::to_owned)))
    }

    /// Delay every `synthesize` answer.
    pub fn with_speech_delay(mut self, delay: Duration) -> Self {
        self.speech_delay = delay;
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn speech_calls(&self) -> usize {
        self.speech_calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageService for MockService {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ExternalServiceError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());
        self.generate_result.clone()
    }

    async fn synthesize(
        &self,
        _request: &SpeechRequest,
    ) -> Result<Option<String>, ExternalServiceError> {
        self.speech_calls.fetch_add(1, Ordering::SeqCst);
        if !self.speech_delay.is_zero() {
            tokio::time::sleep(self.speech_delay).await;
        }
        self.speech_result.clone()
    }
}
