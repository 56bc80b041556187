//! Audio output via `cpal`.
//!
//! [`AudioSink`] is the seam the speech bridge plays through.  [`CpalSink`]
//! opens the system default output device per clip, converts the buffer to
//! the device's rate and channel count, and blocks until the clip has been
//! rendered.  Call it from a blocking thread, never from the async runtime.

use std::sync::{mpsc, Arc};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use thiserror::Error;

use crate::audio::pcm::PcmBuffer;
use crate::audio::resample::{mono_to_interleaved, resample_linear};

/// Extra time allowed beyond the clip length before playback is abandoned.
const PLAYBACK_GRACE: Duration = Duration::from_secs(2);

/// Pause after the last sample is queued so the device drains its buffer.
const DRAIN_TAIL: Duration = Duration::from_millis(150);

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

/// Errors that can occur while opening or running the output stream.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no output device found on the default audio host")]
    NoDevice,

    #[error("failed to query default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported output sample format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("audio stream failed during playback: {0}")]
    Stream(#[from] cpal::StreamError),

    #[error("output device did not finish the clip in time")]
    Stalled,
}

/// Message sent from the stream callbacks: `Ok` once the last frame has
/// been queued, `Err` when the device reports a failure.
type PlaybackSignal = Result<(), cpal::StreamError>;

// ---------------------------------------------------------------------------
// AudioSink
// ---------------------------------------------------------------------------

/// Plays a decoded buffer.  Returns once playback has finished or failed.
pub trait AudioSink: Send + Sync {
    fn play(&self, buffer: &PcmBuffer) -> Result<(), PlaybackError>;
}

// ---------------------------------------------------------------------------
// CpalSink
// ---------------------------------------------------------------------------

/// Default-output-device sink built on `cpal`.
#[derive(Debug, Clone, Default)]
pub struct CpalSink;

impl CpalSink {
    pub fn new() -> Self {
        Self
    }
}

impl AudioSink for CpalSink {
    fn play(&self, buffer: &PcmBuffer) -> Result<(), PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PlaybackError::NoDevice)?;

        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let device_rate = config.sample_rate.0;
        let channels = config.channels;

        let mono = if buffer.channels == 1 {
            resample_linear(&buffer.samples, buffer.sample_rate, device_rate)
        } else {
            // Already interleaved for some other layout; take the first channel.
            let first: Vec<f32> = buffer
                .samples
                .iter()
                .step_by(usize::from(buffer.channels))
                .copied()
                .collect();
            resample_linear(&first, buffer.sample_rate, device_rate)
        };
        let frames = Arc::new(mono_to_interleaved(&mono, channels));

        let (done_tx, done_rx) = mpsc::channel::<PlaybackSignal>();
        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, frames, done_tx)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, frames, done_tx)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, frames, done_tx)?,
            other => return Err(PlaybackError::UnsupportedFormat(format!("{other:?}"))),
        };

        stream.play()?;
        log::debug!(
            "playback: {:.2}s at {device_rate} Hz, {channels} ch",
            buffer.duration().as_secs_f32()
        );

        await_completion(&done_rx, buffer.duration() + PLAYBACK_GRACE)?;
        std::thread::sleep(DRAIN_TAIL);
        Ok(())
    }
}

/// Wait for the stream callbacks to report the end of the clip.
///
/// A disconnected channel counts as a stall: the stream was dropped before
/// either callback fired.
fn await_completion(
    done_rx: &mpsc::Receiver<PlaybackSignal>,
    timeout: Duration,
) -> Result<(), PlaybackError> {
    match done_rx.recv_timeout(timeout) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(PlaybackError::Stream(err)),
        Err(_) => {
            log::warn!("playback: device did not finish the clip within {timeout:?}");
            Err(PlaybackError::Stalled)
        }
    }
}

/// Output stream that copies `frames` into the device buffer, then silence,
/// signalling `done_tx` once after the last frame or on a stream error.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    frames: Arc<Vec<f32>>,
    done_tx: mpsc::Sender<PlaybackSignal>,
) -> Result<cpal::Stream, PlaybackError>
where
    T: SizedSample + FromSample<f32>,
{
    let mut position = 0usize;
    let mut finished = false;
    let error_tx = done_tx.clone();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for slot in data.iter_mut() {
                let sample = frames.get(position).copied().unwrap_or(0.0);
                *slot = <T as Sample>::from_sample(sample);
                position += 1;
            }
            if !finished && position >= frames.len() {
                finished = true;
                // Ignore send errors; the receiver may have timed out.
                let _ = done_tx.send(Ok(()));
            }
        },
        move |err: cpal::StreamError| {
            log::error!("cpal output stream error: {err}");
            let _ = error_tx.send(Err(err));
        },
        None,
    )?;

    Ok(stream)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
