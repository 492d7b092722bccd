//! Recognition engine trait and error type.
//!
//! [`SttEngine`] is object-safe and `Send + Sync` so the service can hold it
//! behind an `Arc<dyn SttEngine>` and move calls onto the blocking pool.
//! The production implementation is [`WhisperEngine`] (feature `whisper`).
//!
//! [`WhisperEngine`]: crate::stt::whisper::WhisperEngine

use thiserror::Error;

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the STT subsystem.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SttError {
    /// The GGML model file was not found at the given path.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// whisper.cpp failed to initialise a context or per-call state.
    #[error("Whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// An error occurred during the inference pass.
    #[error("Transcription error: {0}")]
    Transcription(String),
}

// ---------------------------------------------------------------------------
// SttEngine trait
// ---------------------------------------------------------------------------

/// What an engine returns for one clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineTranscript {
    /// Concatenated segment text, untrimmed.
    pub text: String,
    /// Detected or forced language code, if the engine knows it.
    pub language: Option<String>,
}

/// Object-safe, thread-safe interface for speech-to-text engines.
///
/// # Contract
///
/// - `audio` is **16 kHz, mono, f32** PCM.
/// - `language` of `None` asks the engine to auto-detect.
/// - Calls may block for seconds; callers run them off the async runtime.
pub trait SttEngine: Send + Sync {
    fn transcribe(&self, audio: &[f32], language: Option<&str>)
        -> Result<EngineTranscript, SttError>;
}

// Compile-time assertion: Box<dyn SttEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SttEngine>) {}
};

// ---------------------------------------------------------------------------
// MockSttEngine  (test-only)
// ---------------------------------------------------------------------------

/// Test double returning a pre-configured response and recording the
/// arguments of every call.
#[cfg(test)]
pub struct MockSttEngine {
    response: Result<EngineTranscript, SttError>,
    pub calls: std::sync::Mutex<Vec<(usize, Option<String>)>>,
}

#[cfg(test)]
impl MockSttEngine {
    pub fn ok(text: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            response: Ok(EngineTranscript {
                text: text.into(),
                language: language.map(str::to_string),
            }),
            calls: Default::default(),
        }
    }

    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
            calls: Default::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[cfg(test)]
impl SttEngine for MockSttEngine {
    fn transcribe(
        &self,
        audio: &[f32],
        language: Option<&str>,
    ) -> Result<EngineTranscript, SttError> {
        self.calls
            .lock()
            .unwrap()
            .push((audio.len(), language.map(str::to_string)));
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
