//! Text → speech service → PCM → output device.
//!
//! [`SpeechBridge::speak`] is single-flight: a call made while another is
//! synthesizing or playing fails with [`SpeechGenerationError::Busy`] instead
//! of queueing.  Every exit path, success or failure, returns the bridge to
//! [`SpeechState::Idle`].

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::audio::{decode_speech_payload, AudioSink, PcmError, PlaybackError};
use crate::config::SpeechConfig;
use crate::llm::{ExternalServiceError, LanguageService, SpeechRequest};
use crate::speech::state::{SharedSpeechState, SpeechState};

// ---------------------------------------------------------------------------
// SpeechGenerationError
// ---------------------------------------------------------------------------

/// Failures of one speak request.  Local to the Listen control.
#[derive(Debug, Error)]
pub enum SpeechGenerationError {
    /// Another request is synthesizing or playing.
    #[error("speech is already in progress")]
    Busy,

    #[error("nothing to speak")]
    EmptyText,

    #[error(transparent)]
    Service(#[from] ExternalServiceError),

    /// The service answered without an audio payload.
    #[error("speech service returned no audio")]
    NoAudio,

    #[error(transparent)]
    Decode(#[from] PcmError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// The blocking playback task panicked or was cancelled.
    #[error("playback task failed: {0}")]
    Internal(String),
}

impl SpeechGenerationError {
    /// Short message shown next to the Listen button.
    pub fn user_message(&self) -> &'static str {
        match self {
            SpeechGenerationError::Busy => "Audio is already playing.",
            SpeechGenerationError::Service(e) => e.user_message(),
            SpeechGenerationError::Playback(_) => "Could not play audio on this device.",
            _ => "Audio generation failed.",
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechBridge
// ---------------------------------------------------------------------------

/// Requests speech for a text and plays it.
pub struct SpeechBridge {
    service: Arc<dyn LanguageService>,
    sink: Arc<dyn AudioSink>,
    config: SpeechConfig,
    state: SharedSpeechState,
}

impl SpeechBridge {
    pub fn new(
        service: Arc<dyn LanguageService>,
        sink: Arc<dyn AudioSink>,
        config: SpeechConfig,
    ) -> Self {
        Self {
            service,
            sink,
            config,
            state: Arc::new(Mutex::new(SpeechState::Idle)),
        }
    }

    /// Current state.
    pub fn state(&self) -> SpeechState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle for readers that outlive a borrow of the bridge (the UI).
    pub fn shared_state(&self) -> SharedSpeechState {
        Arc::clone(&self.state)
    }

    /// Synthesize `text` and play it, returning once playback has ended.
    pub async fn speak(&self, text: &str) -> Result<(), SpeechGenerationError> {
        let result = self.run(text).await;
        match &result {
            Ok(()) => log::debug!("speech: playback finished"),
            Err(SpeechGenerationError::Busy) => log::debug!("speech: rejected, already busy"),
            Err(e) => log::warn!("speech: {e}"),
        }
        result
    }

    async fn run(&self, text: &str) -> Result<(), SpeechGenerationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechGenerationError::EmptyText);
        }

        let active = ActiveSpeech::begin(&self.state)?;

        let request = SpeechRequest {
            text: text.to_string(),
            voice_name: self.config.voice_name.clone(),
        };
        let payload = self
            .service
            .synthesize(&request)
            .await?
            .ok_or(SpeechGenerationError::NoAudio)?;

        let buffer = decode_speech_payload(&payload, self.config.sample_rate)?;
        active.set(SpeechState::Playing);

        let sink = Arc::clone(&self.sink);
        tokio::task::spawn_blocking(move || sink.play(&buffer))
            .await
            .map_err(|e| SpeechGenerationError::Internal(e.to_string()))??;

        Ok(())
    }
}

/// Claims the bridge for one request; dropping it returns the bridge to
/// `Idle`.
struct ActiveSpeech {
    state: SharedSpeechState,
}

impl ActiveSpeech {
    fn begin(state: &SharedSpeechState) -> Result<Self, SpeechGenerationError> {
        let mut current = state.lock().unwrap_or_else(PoisonError::into_inner);
        if current.is_busy() {
            return Err(SpeechGenerationError::Busy);
        }
        *current = SpeechState::Synthesizing;
        Ok(Self {
            state: Arc::clone(state),
        })
    }

    fn set(&self, next: SpeechState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

impl Drop for ActiveSpeech {
    fn drop(&mut self) {
        self.set(SpeechState::Idle);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::PcmBuffer;
    use crate::llm::mock::MockService;
    use base64::Engine as _;
    use std::time::Duration;

    /// Records every buffer it is asked to play, optionally blocking.
    #[derive(Default)]
    struct RecordingSink {
        played: Mutex<Vec<PcmBuffer>>,
        delay: Duration,
    }

    impl AudioSink for RecordingSink {
        fn play(&self, buffer: &PcmBuffer) -> Result<(), PlaybackError> {
            std::thread::sleep(self.delay);
            self.played.lock().unwrap().push(buffer.clone());
            Ok(())
        }
    }

    struct NoDeviceSink;

    impl AudioSink for NoDeviceSink {
        fn play(&self, _buffer: &PcmBuffer) -> Result<(), PlaybackError> {
            Err(PlaybackError::NoDevice)
        }
    }

    fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    fn bridge(service: MockService, sink: Arc<dyn AudioSink>) -> SpeechBridge {
        SpeechBridge::new(Arc::new(service), sink, SpeechConfig::default())
    }

    #[tokio::test]
    async fn speaks_decoded_audio() {
        let payload = encode(&[0x00, 0x40, 0x00, 0xC0]);
        let sink = Arc::new(RecordingSink::default());
        let bridge = bridge(MockService::speaking(Some(&payload)), sink.clone());

        bridge.speak("He went to the market.").await.expect("ok");

        let played = sink.played.lock().unwrap();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].samples, vec![0.5, -0.5]);
        assert_eq!(played[0].sample_rate, 24_000);
        assert_eq!(played[0].channels, 1);
        assert_eq!(bridge.state(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn missing_audio_returns_to_idle() {
        let sink = Arc::new(RecordingSink::default());
        let bridge = bridge(MockService::speaking(None), sink.clone());

        let err = bridge.speak("hello").await.unwrap_err();
        assert!(matches!(err, SpeechGenerationError::NoAudio));
        assert_eq!(bridge.state(), SpeechState::Idle);
        assert!(sink.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn service_failure_returns_to_idle() {
        let bridge = bridge(
            MockService::failing(ExternalServiceError::Request("offline".into())),
            Arc::new(RecordingSink::default()),
        );

        let err = bridge.speak("hello").await.unwrap_err();
        assert!(matches!(err, SpeechGenerationError::Service(_)));
        assert_eq!(bridge.state(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn odd_length_payload_is_rejected() {
        let payload = encode(&[0x00, 0x01, 0x02]);
        let bridge = bridge(
            MockService::speaking(Some(&payload)),
            Arc::new(RecordingSink::default()),
        );

        let err = bridge.speak("hello").await.unwrap_err();
        assert!(matches!(err, SpeechGenerationError::Decode(PcmError::OddLength(3))));
        assert_eq!(bridge.state(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn playback_failure_returns_to_idle() {
        let payload = encode(&[0x00, 0x00]);
        let bridge = bridge(MockService::speaking(Some(&payload)), Arc::new(NoDeviceSink));

        let err = bridge.speak("hello").await.unwrap_err();
        assert!(matches!(
            err,
            SpeechGenerationError::Playback(PlaybackError::NoDevice)
        ));
        assert_eq!(bridge.state(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn empty_text_issues_no_request() {
        let service = Arc::new(MockService::speaking(None));
        let bridge = SpeechBridge::new(
            service.clone(),
            Arc::new(RecordingSink::default()),
            SpeechConfig::default(),
        );

        let err = bridge.speak("  ").await.unwrap_err();
        assert!(matches!(err, SpeechGenerationError::EmptyText));
        assert_eq!(service.speech_calls(), 0);
    }

    #[tokio::test]
    async fn rejects_overlap_while_synthesizing() {
        let payload = encode(&[0x00, 0x00]);
        let service = MockService::speaking(Some(&payload)).with_speech_delay(Duration::from_millis(200));
        let bridge = Arc::new(bridge(service, Arc::new(RecordingSink::default())));

        let first = {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move { bridge.speak("first").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(bridge.state(), SpeechState::Synthesizing);
        let err = bridge.speak("second").await.unwrap_err();
        assert!(matches!(err, SpeechGenerationError::Busy));

        first.await.unwrap().expect("first call completes");
        assert_eq!(bridge.state(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn rejects_overlap_while_playing() {
        let payload = encode(&[0x00, 0x00]);
        let sink = Arc::new(RecordingSink {
            played: Mutex::new(Vec::new()),
            delay: Duration::from_millis(300),
        });
        let bridge = Arc::new(bridge(MockService::speaking(Some(&payload)), sink.clone()));

        let first = {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move { bridge.speak("first").await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(bridge.state(), SpeechState::Playing);
        assert!(matches!(
            bridge.speak("second").await,
            Err(SpeechGenerationError::Busy)
        ));

        first.await.unwrap().expect("first call completes");
        assert_eq!(bridge.state(), SpeechState::Idle);
        assert_eq!(sink.played.lock().unwrap().len(), 1);
    }
}
