//! Transcription service: runs the loaded engine on normalized audio and
//! packages the result.
//!
//! ```text
//! AudioBuffer (16 kHz mono) + language hint
//!     │  "auto" / absent → None
//!     ▼
//! spawn_blocking(engine.transcribe) ──▶ TranscriptionResult
//!     text trimmed · language or "unknown" · duration = len / 16000
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::audio::AudioBuffer;
use crate::stt::engine::{SttEngine, SttError};

/// Language reported when the engine does not name one.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Hint value meaning "let the engine detect".
pub const AUTO_LANGUAGE: &str = "auto";

/// A finished transcription.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionResult {
    /// Transcript with surrounding whitespace removed.
    pub text: String,
    /// Language code, or `"unknown"`.
    pub language: String,
    /// Length of the audio the engine received, in seconds.
    #[serde(rename = "duration")]
    pub duration_secs: f64,
}

/// Resolve the request hint to what the engine receives.
fn engine_language(hint: Option<&str>) -> Option<String> {
    match hint.map(str::trim) {
        None | Some("") => None,
        Some(h) if h.eq_ignore_ascii_case(AUTO_LANGUAGE) => None,
        Some(h) => Some(h.to_string()),
    }
}

/// Owns the single recognition engine of the process.
#[derive(Clone)]
pub struct TranscriptionService {
    engine: Arc<dyn SttEngine>,
}

impl std::fmt::Debug for TranscriptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionService").finish_non_exhaustive()
    }
}

impl TranscriptionService {
    pub fn new(engine: Arc<dyn SttEngine>) -> Self {
        Self { engine }
    }

    /// Transcribe a normalized buffer.
    ///
    /// An empty buffer returns an empty transcript without touching the
    /// engine.
    ///
    /// # Errors
    ///
    /// Whatever the engine reports, or [`SttError::Transcription`] if the
    /// blocking task panicked.
    pub async fn transcribe(
        &self,
        buffer: AudioBuffer,
        language_hint: Option<&str>,
    ) -> Result<TranscriptionResult, SttError> {
        let duration_secs = buffer.duration_secs();

        if buffer.is_empty() {
            return Ok(TranscriptionResult {
                text: String::new(),
                language: UNKNOWN_LANGUAGE.into(),
                duration_secs,
            });
        }

        log::info!(
            "Transcribing {:.2}s of audio at {} Hz",
            duration_secs,
            buffer.sample_rate_hz
        );

        let engine = Arc::clone(&self.engine);
        let language = engine_language(language_hint);
        let transcript = tokio::task::spawn_blocking(move || {
            engine.transcribe(&buffer.samples, language.as_deref())
        })
        .await
        .map_err(|e| SttError::Transcription(format!("transcription task failed: {e}")))??;

        Ok(TranscriptionResult {
            text: transcript.text.trim().to_string(),
            language: transcript
                .language
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| UNKNOWN_LANGUAGE.into()),
            duration_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
