//! Channel mixing and resampling to the recognizer's canonical rate.
//!
//! 1. [`stereo_to_mono`] averages any number of interleaved channels.
//! 2. [`resample_to_16k`] linearly interpolates to 16 000 Hz.
//!
//! The resampler is deliberately simple (no band-limiting).  Good enough for
//! speech intelligibility, not for hi-fi work.

/// Sample rate the recognition engine accepts.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// stereo_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging all channels.
///
/// The output length is `samples.len() / channels`; a trailing partial frame
/// is dropped.
///
/// * `channels == 1` returns the input unchanged.
/// * `channels == 0` returns an empty vector.
///
/// # Example
///
/// ```rust
/// use speech_services::audio::stereo_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, 0.4]; // L R L R
/// let mono = stereo_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.0).abs() < 1e-6);
/// assert!((mono[1] - 0.3).abs() < 1e-6);
/// ```
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample_to_16k
// ---------------------------------------------------------------------------

/// Number of output samples for `len` input samples at `source_rate`:
/// `round(len / source_rate × 16000)`.
pub fn resampled_len(len: usize, source_rate: u32) -> usize {
    if source_rate == 0 {
        return 0;
    }
    (len as f64 / f64::from(source_rate) * f64::from(TARGET_SAMPLE_RATE)).round() as usize
}

/// Resample mono `samples` from `source_rate` Hz to 16 000 Hz.
///
/// Output sample `i` of `n` sits at source position `i × len / (n − 1)`,
/// i.e. `n` evenly spaced points spanning `[0, len]`; amplitude is linearly
/// interpolated between neighbouring source samples and held at the last
/// sample past the end.
///
/// * `source_rate == 16_000` returns the input unchanged.
/// * Empty input returns an empty vector.
///
/// # Example
///
/// ```rust
/// use speech_services::audio::resample_to_16k;
///
/// let hi = vec![0.5_f32; 480]; // 10 ms @ 48 kHz
/// let lo = resample_to_16k(&hi, 48_000);
/// assert_eq!(lo.len(), 160);
/// ```
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    if source_rate == TARGET_SAMPLE_RATE {
        return samples.to_vec();
    }

    let output_len = resampled_len(samples.len(), source_rate);
    if samples.is_empty() || output_len == 0 {
        return Vec::new();
    }

    let last = samples.len() - 1;
    let step = if output_len > 1 {
        samples.len() as f64 / (output_len - 1) as f64
    } else {
        0.0
    };

    (0..output_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = pos.floor() as usize;
            if idx >= last {
                return samples[last];
            }
            let frac = (pos - idx as f64) as f32;
            samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
