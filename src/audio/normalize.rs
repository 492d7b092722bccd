//! The normalizer: request audio in, canonical 16 kHz mono `f32` out.
//!
//! # Steps
//!
//! ```text
//! base64 ──decode_base64──▶ bytes ──decode_container──▶ interleaved f32
//!        ──stereo_to_mono──▶ mono ──resample_to_16k──▶ AudioBuffer (16 kHz)
//! ```
//!
//! Transport errors are reported before the container is looked at.
//! Duration is always computed from the *output* buffer, since that is what
//! the recognizer actually hears.

use crate::audio::decode::{decode_base64, decode_container, DecodeError, DecodedAudio};
use crate::audio::resample::{resample_to_16k, stereo_to_mono, TARGET_SAMPLE_RATE};

// ---------------------------------------------------------------------------
// AudioBuffer
// ---------------------------------------------------------------------------

/// Mono audio at a known rate.  Produced by [`AudioNormalizer`] always at
/// [`TARGET_SAMPLE_RATE`].
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate_hz: u32,
}

impl AudioBuffer {
    /// `len / sample_rate_hz` seconds; 0 for an empty buffer.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate_hz == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate_hz)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// AudioNormalizer
// ---------------------------------------------------------------------------

/// Stateless; every call produces a fresh buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioNormalizer;

impl AudioNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Full pipeline from the wire representation.
    ///
    /// `format` is the caller's declared container (`wav`, `mp3`, `webm`),
    /// used only as a demuxer hint.
    pub fn normalize(&self, encoded: &str, format: Option<&str>) -> Result<AudioBuffer, DecodeError> {
        let bytes = decode_base64(encoded)?;
        self.normalize_bytes(bytes, format)
    }

    /// Pipeline from raw container bytes.
    pub fn normalize_bytes(
        &self,
        bytes: Vec<u8>,
        format: Option<&str>,
    ) -> Result<AudioBuffer, DecodeError> {
        let decoded = decode_container(bytes, format)?;
        log::debug!(
            "Decoded {} samples, {} Hz, {} channel(s)",
            decoded.samples.len(),
            decoded.sample_rate,
            decoded.channels
        );
        Ok(self.normalize_samples(decoded))
    }

    /// Channel mixing and resampling only.
    pub fn normalize_samples(&self, decoded: DecodedAudio) -> AudioBuffer {
        let mono = if decoded.channels > 1 {
            stereo_to_mono(&decoded.samples, decoded.channels)
        } else {
            decoded.samples
        };
        let samples = resample_to_16k(&mono, decoded.sample_rate);
        AudioBuffer {
            samples,
            sample_rate_hz: TARGET_SAMPLE_RATE,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
