//! Transport and container decoding.
//!
//! Two stages, each with its own failure class:
//!
//! 1. [`decode_base64`] handles the wire encoding.  Fails with
//!    [`DecodeError::InvalidBase64`] before any container parsing happens.
//! 2. [`decode_container`] reads WAV / MP3 / Matroska via `symphonia`, producing
//!    interleaved `f32` samples plus the source rate and channel count.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Errors produced while turning request bytes into samples.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The transport encoding was not valid base64.
    #[error("Invalid base64 audio data")]
    InvalidBase64(#[source] base64::DecodeError),

    /// No demuxer or decoder recognised the data.
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// The container was recognised but is corrupt.
    #[error("Audio decode failed: {0}")]
    Container(String),
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Decode standard (padded) base64.  Surrounding whitespace is tolerated.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(DecodeError::InvalidBase64)
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// Interleaved samples straight out of the container.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Interleaved `f32` samples, `frames × channels` long.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Demuxer hint for a declared request `format`.
///
/// `webm` is a Matroska profile, so it goes to the `mkv` demuxer.  Unknown
/// or absent formats give no hint and leave detection to the probe.
fn format_hint(format: Option<&str>) -> Hint {
    let mut hint = Hint::new();
    match format.map(str::to_ascii_lowercase).as_deref() {
        Some("wav" | "wave") => {
            hint.with_extension("wav");
        }
        Some("mp3") => {
            hint.with_extension("mp3");
        }
        Some("webm" | "mkv") => {
            hint.with_extension("mkv");
        }
        _ => {}
    }
    hint
}

/// Decode the first audio track of `data` into interleaved `f32`.
///
/// A well-formed container holding zero frames decodes to an empty buffer.
///
/// # Errors
///
/// - [`DecodeError::UnsupportedFormat`]: unrecognised container or codec.
/// - [`DecodeError::Container`]: a recognised container failed mid-stream.
pub fn decode_container(data: Vec<u8>, format: Option<&str>) -> Result<DecodedAudio, DecodeError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &format_hint(format),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::UnsupportedFormat("no audio track found".into()))?;

    let track_id = track.id;
    let params = track.codec_params.clone();
    let mut sample_rate = params.sample_rate.unwrap_or(0);
    let mut channels = params.channels.map_or(1, |c| c.count() as u16);

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match reader.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(DecodeError::Container(format!("packet read: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| DecodeError::Container(format!("decode: {e}")))?;

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count() as u16;

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    if sample_rate == 0 {
        return Err(DecodeError::Container("missing sample rate".into()));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels: channels.max(1),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Author a 16-bit PCM WAV in memory.  `frames` is one `Vec` per frame
    /// holding one value per channel.
    pub(crate) fn wav_bytes(sample_rate: u32, channels: u16, frames: &[Vec<i16>]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for frame in frames {
                for &s in frame {
                    writer.write_sample(s).unwrap();
                }
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    // ---- base64 ------------------------------------------------------------

    #[test]
    fn base64_round_trip() {
        let encoded = STANDARD.encode(b"RIFF....");
        assert_eq!(decode_base64(&encoded).unwrap(), b"RIFF....");
    }

    #[test]
    fn base64_tolerates_surrounding_whitespace() {
        let encoded = format!("  {}\n", STANDARD.encode([1u8, 2, 3]));
        assert_eq!(decode_base64(&encoded).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let err = decode_base64("not*base64!").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidBase64(_)));
        assert_eq!(err.to_string(), "Invalid base64 audio data");
    }

    // ---- container ---------------------------------------------------------

    #[test]
    fn decodes_stereo_wav_interleaved() {
        let wav = wav_bytes(8_000, 2, &[vec![16_384, -16_384], vec![8_192, 0]]);
        let audio = decode_container(wav, Some("wav")).unwrap();

        assert_eq!(audio.sample_rate, 8_000);
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.samples.len(), 4);
        assert!((audio.samples[0] - 0.5).abs() < 1e-4);
        assert!((audio.samples[1] + 0.5).abs() < 1e-4);
        assert!((audio.samples[2] - 0.25).abs() < 1e-4);
        assert!(audio.samples[3].abs() < 1e-4);
    }

    #[test]
    fn detects_wav_without_hint() {
        let wav = wav_bytes(16_000, 1, &vec![vec![0]; 160]);
        let audio = decode_container(wav, None).unwrap();
        assert_eq!(audio.sample_rate, 16_000);
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.samples.len(), 160);
    }

    #[test]
    fn zero_frame_wav_is_empty_not_an_error() {
        let wav = wav_bytes(16_000, 1, &[]);
        let audio = decode_container(wav, Some("wav")).unwrap();
        assert!(audio.samples.is_empty());
        assert_eq!(audio.sample_rate, 16_000);
    }

    #[test]
    fn garbage_is_unsupported() {
        let err = decode_container(b"definitely not audio".to_vec(), Some("wav")).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
    }

    #[test]
    fn empty_input_is_unsupported() {
        assert!(decode_container(Vec::new(), None).is_err());
    }
}
