//! Playback-length estimate for synthesized audio.
//!
//! This is an approximation, not a header parse: it assumes a canonical
//! 44-byte RIFF header followed by 16-bit mono PCM at the *requested* sample
//! rate.  A backend that writes extra chunks, another bit depth, or renders at
//! its own native rate will be misreported.

/// Size of a canonical PCM WAV header.
pub const WAV_HEADER_LEN: usize = 44;

/// Bytes per 16-bit mono frame.
const BYTES_PER_FRAME: f64 = 2.0;

/// Estimated duration in seconds of a WAV payload of `len` bytes.
///
/// `(len - 44) / (sample_rate × 2)`, clamped at 0.  Returns 0 for a zero
/// sample rate.
pub fn estimate_wav_duration(len: usize, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    len.saturating_sub(WAV_HEADER_LEN) as f64 / (f64::from(sample_rate) * BYTES_PER_FRAME)
}
