//! Sample-rate and channel conversion for playback.
//!
//! Speech arrives as 24 kHz mono; output devices usually run at 44.1 or
//! 48 kHz with two channels.  This module provides the two conversion steps:
//!
//! 1. [`resample_linear`]: resample mono audio between arbitrary rates.
//! 2. [`mono_to_interleaved`]: duplicate a mono signal across channels.

// ---------------------------------------------------------------------------
// resample_linear
// ---------------------------------------------------------------------------

/// Resample `samples` from `source_rate` Hz to `target_rate` Hz using linear
/// interpolation.
///
/// * Equal rates return the input unchanged.
/// * Empty input (or a zero rate) returns an empty vector.
///
/// The output length is `ceil(samples.len() * target_rate / source_rate)`.
///
/// # Example
///
/// ```rust
/// use lingofix::audio::resample_linear;
///
/// let speech = vec![0.5_f32; 240];
/// let out = resample_linear(&speech, 24_000, 48_000);
/// assert_eq!(out.len(), 480);
/// ```
pub fn resample_linear(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate {
        return samples.to_vec();
    }

    if samples.is_empty() || source_rate == 0 || target_rate == 0 {
        return Vec::new();
    }

    let ratio = f64::from(target_rate) / f64::from(source_rate);
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let idx = src_pos as usize;
            let frac = (src_pos - idx as f64) as f32;

            match (samples.get(idx), samples.get(idx + 1)) {
                (Some(a), Some(b)) => a * (1.0 - frac) + b * frac,
                (Some(a), None) => *a,
                _ => 0.0,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// mono_to_interleaved
// ---------------------------------------------------------------------------

/// Repeat every mono sample `channels` times (L R L R … for stereo).
///
/// `channels == 0` returns an empty vector.
pub fn mono_to_interleaved(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => samples
            .iter()
            .flat_map(|&s| std::iter::repeat(s).take(usize::from(n)))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_rate_is_identity() {
        let input = vec![0.1, -0.2, 0.3];
        assert_eq!(resample_linear(&input, 24_000, 24_000), input);
    }

    #[test]
    fn upsample_doubles_length_and_interpolates() {
        let input = vec![0.0, 1.0];
        let out = resample_linear(&input, 24_000, 48_000);
        assert_eq!(out.len(), 4);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[2] - 1.0).abs() < 1e-6);
        // past the last sample: hold it
        assert!((out[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn to_44100_length() {
        let input = vec![0.0_f32; 24_000];
        let out = resample_linear(&input, 24_000, 44_100);
        assert!((44_100..=44_101).contains(&out.len()));
    }

    #[test]
    fn constant_signal_stays_constant() {
        let input = vec![0.25_f32; 100];
        let out = resample_linear(&input, 24_000, 44_100);
        assert!(out.iter().all(|s| (s - 0.25).abs() < 1e-6));
    }

    #[test]
    fn empty_and_zero_rate() {
        assert!(resample_linear(&[], 24_000, 48_000).is_empty());
        assert!(resample_linear(&[0.1], 0, 48_000).is_empty());
    }

    #[test]
    fn interleave_stereo() {
        assert_eq!(mono_to_interleaved(&[0.1, 0.2], 2), vec![0.1, 0.1, 0.2, 0.2]);
        assert_eq!(mono_to_interleaved(&[0.1, 0.2], 1), vec![0.1, 0.2]);
        assert!(mono_to_interleaved(&[0.1], 0).is_empty());
    }
}
