//! Audio normalization — request audio → canonical 16 kHz mono `f32`.
//!
//! # Pipeline
//!
//! ```text
//! base64 → decode_base64 → decode_container (symphonia)
//!        → stereo_to_mono → resample_to_16k → AudioBuffer
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use speech_services::audio::AudioNormalizer;
//!
//! # let encoded_wav = String::new();
//! let buffer = AudioNormalizer::new().normalize(&encoded_wav, Some("wav")).unwrap();
//! println!("{} samples, {:.2}s", buffer.samples.len(), buffer.duration_secs());
//! ```

pub mod decode;
pub mod normalize;
pub mod resample;

pub use decode::{decode_base64, decode_container, DecodeError, DecodedAudio};
pub use normalize::{AudioBuffer, AudioNormalizer};
pub use resample::{resample_to_16k, resampled_len, stereo_to_mono, TARGET_SAMPLE_RATE};
