//! Speech payload decoding: base64 text → 16-bit PCM → normalised `f32`.
//!
//! The speech service returns signed 16-bit little-endian mono PCM encoded as
//! base64.  Endianness is part of the contract, not the host's.

use std::time::Duration;

use base64::Engine as _;
use thiserror::Error;

/// Errors while turning a payload into samples.
#[derive(Debug, Error)]
pub enum PcmError {
    #[error("audio payload is empty")]
    Empty,

    #[error("invalid base64 audio payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("PCM byte count {0} is not a multiple of 2")]
    OddLength(usize),
}

/// Decoded mono or interleaved samples in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl PcmBuffer {
    /// Playback length of the buffer.
    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / usize::from(self.channels.max(1));
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate.max(1)))
    }
}

/// Standard-alphabet base64 → bytes.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, PcmError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(PcmError::Empty);
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

/// Reinterpret `bytes` as `i16` little-endian samples, each mapped to
/// `value / 32768.0`.
///
/// The output has exactly `bytes.len() / 2` samples; an odd byte count is an
/// error rather than a silently dropped byte.
///
/// ```rust
/// use lingofix::audio::pcm16le_to_f32;
///
/// let samples = pcm16le_to_f32(&[0x00, 0x40, 0x00, 0x80]).unwrap();
/// assert_eq!(samples, vec![0.5, -1.0]);
/// ```
pub fn pcm16le_to_f32(bytes: &[u8]) -> Result<Vec<f32>, PcmError> {
    if bytes.len() % 2 != 0 {
        return Err(PcmError::OddLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect())
}

/// Full decode of a mono speech payload at `sample_rate`.
pub fn decode_speech_payload(payload: &str, sample_rate: u32) -> Result<PcmBuffer, PcmError> {
    let bytes = decode_base64(payload)?;
    let samples = pcm16le_to_f32(&bytes)?;
    if samples.is_empty() {
        return Err(PcmError::Empty);
    }
    Ok(PcmBuffer {
        samples,
        sample_rate,
        channels: 1,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(samples: &[i16]) -> String {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn known_payload_decodes_to_normalised_samples() {
        let values: [i16; 6] = [0, 1, -1, 16_384, i16::MAX, i16::MIN];
        let buffer = decode_speech_payload(&encode(&values), 24_000).expect("decode");

        assert_eq!(buffer.samples.len(), values.len());
        assert_eq!(buffer.sample_rate, 24_000);
        assert_eq!(buffer.channels, 1);
        for (decoded, raw) in buffer.samples.iter().zip(values) {
            let expected = f32::from(raw) / 32768.0;
            assert!((decoded - expected).abs() < 1e-7, "{decoded} != {expected}");
        }
        assert_eq!(buffer.samples[5], -1.0);
        assert!(buffer.samples[4] < 1.0);
    }

    #[test]
    fn little_endian_is_explicit() {
        // 0x0100 little-endian = 1; big-endian would be 256.
        let samples = pcm16le_to_f32(&[0x01, 0x00]).unwrap();
        assert_eq!(samples, vec![1.0 / 32768.0]);
    }

    #[test]
    fn odd_byte_count_fails() {
        let err = pcm16le_to_f32(&[0x00, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, PcmError::OddLength(3)));
    }

    #[test]
    fn empty_payload_fails() {
        assert!(matches!(decode_speech_payload("", 24_000), Err(PcmError::Empty)));
        assert!(matches!(decode_speech_payload("  ", 24_000), Err(PcmError::Empty)));
    }

    #[test]
    fn invalid_base64_fails() {
        assert!(matches!(
            decode_speech_payload("not base64!!", 24_000),
            Err(PcmError::Base64(_))
        ));
    }

    #[test]
    fn duration_of_one_second() {
        let buffer = PcmBuffer {
            samples: vec![0.0; 48_000],
            sample_rate: 24_000,
            channels: 2,
        };
        assert_eq!(buffer.duration(), Duration::from_secs(1));
    }
}
