//! Response encoding.
//!
//! Synthesis results have two representations, picked from the `Accept`
//! header; transcription results are always JSON.
//!
//! | `Accept` contains `application/json` | Body |
//! |---|---|
//! | yes | `{audio: <base64>, sample_rate, duration, engine}` |
//! | no  | raw WAV, `audio/wav`, `attachment; filename=speech.wav` |

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::stt::TranscriptionResult;
use crate::tts::SynthesisResult;

/// Offers the WAV to clients as a `speech.wav` download.
const WAV_DISPOSITION: &str = "attachment; filename=speech.wav";

/// JSON form of a synthesis result.
#[derive(Debug, Serialize)]
struct SynthesisJson<'a> {
    audio: String,
    sample_rate: u32,
    duration: f64,
    engine: &'a str,
}

/// How a synthesis response is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCodec {
    /// Base64 audio inside a JSON object.
    Json,
    /// Raw WAV bytes.
    Wav,
}

impl ResponseCodec {
    /// Pick the representation from the request's `Accept` header.
    pub fn negotiate(headers: &HeaderMap) -> Self {
        let wants_json = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.contains("application/json"));
        if wants_json {
            Self::Json
        } else {
            Self::Wav
        }
    }

    pub fn synthesis(self, result: SynthesisResult) -> Response {
        match self {
            Self::Json => Json(SynthesisJson {
                audio: STANDARD.encode(&result.audio),
                sample_rate: result.sample_rate,
                duration: result.duration_secs,
                engine: result.engine_used.as_str(),
            })
            .into_response(),
            Self::Wav => (
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("audio/wav")),
                    (
                        header::CONTENT_DISPOSITION,
                        HeaderValue::from_static(WAV_DISPOSITION),
                    ),
                ],
                result.audio,
            )
                .into_response(),
        }
    }
}

/// Transcriptions are always JSON.
pub fn transcription(result: TranscriptionResult) -> Response {
    Json(result).into_response()
}
