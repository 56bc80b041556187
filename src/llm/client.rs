//! `LanguageService` trait and the Gemini REST implementation.
//!
//! [`GeminiClient`] calls `POST {base_url}/v1beta/models/{model}:generateContent`
//! for both the structured correction request and the speech request.  All
//! connection details come from [`LlmConfig`] / [`SpeechConfig`]; nothing is
//! hardcoded.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::{LlmConfig, SpeechConfig};

/// Message shown to the user for any transport-level failure.
pub const CONNECTIVITY_MESSAGE: &str =
    "Something went wrong. Please check your internet connection.";

// ---------------------------------------------------------------------------
// ExternalServiceError
// ---------------------------------------------------------------------------

/// Transport/connectivity failures contacting the external service.
#[derive(Debug, Clone, Error)]
pub enum ExternalServiceError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("service request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON envelope the service documents.
    #[error("malformed service envelope: {0}")]
    Envelope(String),

    /// No API key in the config file or the environment.
    #[error("no API key configured")]
    MissingApiKey,
}

impl ExternalServiceError {
    /// User-safe description; never includes response bodies.
    pub fn user_message(&self) -> &'static str {
        CONNECTIVITY_MESSAGE
    }
}

impl From<reqwest::Error> for ExternalServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ExternalServiceError::Timeout
        } else {
            ExternalServiceError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A structured-output request: prompt text plus the declared schema.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_mime_type: String,
    pub response_schema: Value,
}

/// A text-to-speech request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_name: String,
}

// ---------------------------------------------------------------------------
// LanguageService trait
// ---------------------------------------------------------------------------

/// Handle to the external language-generation and speech-synthesis service.
///
/// Implementors must be `Send + Sync` so one instance can be shared as
/// `Arc<dyn LanguageService>` by the corrector and the speech bridge.
#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Run a structured-output request and return the raw text payload.
    ///
    /// The payload is not validated here; it may be empty or malformed.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ExternalServiceError>;

    /// Request speech audio.  Returns the base64 payload, or `None` when the
    /// response carries no audio data.
    async fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> Result<Option<String>, ExternalServiceError>;
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    speech_model: String,
}

impl GeminiClient {
    /// Build a client from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `llm.timeout_secs`; a default client is used if the builder fails.
    pub fn from_config(llm: &LlmConfig, speech: &SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(llm.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: llm.base_url.trim_end_matches('/').to_string(),
            api_key: llm.api_key.clone().filter(|k| !k.is_empty()),
            model: llm.model.clone(),
            temperature: llm.temperature,
            speech_model: speech.model.clone(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn post(&self, model: &str, body: &Value) -> Result<Value, ExternalServiceError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ExternalServiceError::MissingApiKey)?;

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalServiceError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ExternalServiceError::Envelope(e.to_string()))
    }
}

#[async_trait]
impl LanguageService for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ExternalServiceError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
            "generationConfig": {
                "temperature":      self.temperature,
                "responseMimeType": request.response_mime_type,
                "responseSchema":   request.response_schema
            }
        });

        let json = self.post(&self.model, &body).await?;
        Ok(response_text(&json))
    }

    async fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> Result<Option<String>, ExternalServiceError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": request.text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": request.voice_name }
                    }
                }
            }
        });

        let json = self.post(&self.speech_model, &body).await?;
        Ok(inline_audio(&json))
    }
}

// ---------------------------------------------------------------------------
// Envelope helpers
// ---------------------------------------------------------------------------

/// Concatenated `text` parts of the first candidate; empty when absent.
pub(crate) fn response_text(json: &Value) -> String {
    json["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default()
}

/// First non-empty `inlineData.data` part of the first candidate.
pub(crate) fn inline_audio(json: &Value) -> Option<String> {
    json["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .filter_map(|p| p["inlineData"]["data"].as_str())
        .find(|data| !data.is_empty())
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
