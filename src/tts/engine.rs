//! Engine identity, capability trait and error types.
//!
//! # Overview
//!
//! [`SpeechEngine`] is the uniform capability every synthesis backend
//! implements.  It is object-safe and `Send + Sync` so backends live behind
//! `Arc<dyn SpeechEngine>` inside the [`EngineRegistry`].
//!
//! Three distinct "cannot synthesize" outcomes exist and are kept apart:
//!
//! | Outcome | Where it is decided | Type |
//! |---------|---------------------|------|
//! | unavailable | once, at startup probe | `probe()` returns `Err` |
//! | not yet implemented | per call | [`EngineError::Unimplemented`] |
//! | execution failed | per call | [`EngineError::Execution`] / [`EngineError::Timeout`] |
//!
//! [`EngineRegistry`]: crate::tts::EngineRegistry

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// EngineName
// ---------------------------------------------------------------------------

/// Identity of a synthesis backend.
///
/// The declaration order is the static priority order: most capable neural
/// engine first, most basic local fallback last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineName {
    /// VoxCPM neural TTS.
    #[serde(rename = "voxcpm")]
    VoxCpm,
    /// Index-TTS2 neural TTS.
    #[serde(rename = "index-tts2")]
    IndexTts2,
    /// `espeak-ng` command-line synthesizer, the always-available fallback.
    #[serde(rename = "espeak")]
    Espeak,
    /// macOS `say` with selectable installed voices.
    #[serde(rename = "say")]
    Say,
}

impl EngineName {
    /// Every supported engine, in priority (and probe) order.
    pub const ALL: [EngineName; 4] = [
        EngineName::VoxCpm,
        EngineName::IndexTts2,
        EngineName::Espeak,
        EngineName::Say,
    ];

    /// The backend the dispatcher substitutes when another engine reports
    /// [`EngineError::Unimplemented`].
    pub const FALLBACK: EngineName = EngineName::Espeak;

    /// Wire name used in requests, responses and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            EngineName::VoxCpm => "voxcpm",
            EngineName::IndexTts2 => "index-tts2",
            EngineName::Espeak => "espeak",
            EngineName::Say => "say",
        }
    }

    /// `true` for the model-backed engines.
    pub fn is_neural(self) -> bool {
        matches!(self, EngineName::VoxCpm | EngineName::IndexTts2)
    }
}

impl fmt::Display for EngineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineName {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| TtsError::UnknownEngine(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// Failure reported by a single backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// The backend is a placeholder whose model integration does not exist
    /// yet.  Always intercepted by the dispatcher's one-shot fallback.
    #[error("{0} model integration pending")]
    Unimplemented(EngineName),

    /// The backend could not be used at startup (missing model directory,
    /// missing executable, …).
    #[error("{engine} unavailable: {reason}")]
    Unavailable { engine: EngineName, reason: String },

    /// The backend ran and failed.
    #[error("{engine} synthesis failed: {message}")]
    Execution { engine: EngineName, message: String },

    /// The external process exceeded the configured time budget and was
    /// killed.
    #[error("{engine} timed out after {secs}s")]
    Timeout { engine: EngineName, secs: u64 },
}

impl EngineError {
    pub(crate) fn execution(engine: EngineName, message: impl Into<String>) -> Self {
        EngineError::Execution {
            engine,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// Errors surfaced by request validation and the [`SynthesisDispatcher`].
///
/// [`SynthesisDispatcher`]: crate::tts::SynthesisDispatcher
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TtsError {
    /// `text` was empty or whitespace-only.
    #[error("Empty text")]
    EmptyText,

    /// A numeric request parameter was out of range.
    #[error("Invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// No engine probed as available and the request named none.
    #[error("No TTS engine available")]
    NoEngineAvailable,

    /// The requested engine name is not one of [`EngineName::ALL`].
    #[error("Unknown TTS engine: {0}")]
    UnknownEngine(String),

    /// The resolved engine (or the fallback) failed to produce audio.
    #[error(transparent)]
    EngineExecutionFailed(EngineError),
}

// ---------------------------------------------------------------------------
// SpeechEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for synthesis backends.
///
/// # Contract
///
/// - `probe` is called exactly once, at startup.  It must report failure
///   through its `Result`, never by panicking.
/// - `synthesize` returns a complete WAV file on success.
/// - Any scratch resource acquired by `synthesize` is released before it
///   returns, on every path.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Which backend this is.
    fn name(&self) -> EngineName;

    /// Check whether the backend can be used at all.
    async fn probe(&self) -> Result<(), EngineError>;

    /// Render `text` to WAV bytes.
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        speed: f64,
        sample_rate: u32,
    ) -> Result<Vec<u8>, EngineError>;
}

// Compile-time assertion: Box<dyn SpeechEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechEngine>) {}
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for name in EngineName::ALL {
            assert_eq!(name.as_str().parse::<EngineName>().unwrap(), name);
        }
    }

    #[test]
    fn unknown_name_is_unknown_engine() {
        let err = "festival".parse::<EngineName>().unwrap_err();
        assert_eq!(err, TtsError::UnknownEngine("festival".into()));
        assert_eq!(err.to_string(), "Unknown TTS engine: festival");
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("Espeak".parse::<EngineName>().is_err());
    }

    #[test]
    fn priority_order_puts_neural_first_and_fallback_before_say() {
        assert!(EngineName::ALL[0].is_neural());
        assert!(EngineName::ALL[1].is_neural());
        assert_eq!(EngineName::ALL[2], EngineName::FALLBACK);
        assert!(!EngineName::Say.is_neural());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&EngineName::IndexTts2).unwrap();
        assert_eq!(json, "\"index-tts2\"");
        let back: EngineName = serde_json::from_str("\"voxcpm\"").unwrap();
        assert_eq!(back, EngineName::VoxCpm);
    }

    #[test]
    fn execution_failure_display_is_transparent() {
        let err = TtsError::EngineExecutionFailed(EngineError::execution(
            EngineName::Espeak,
            "exit status 1",
        ));
        assert_eq!(err.to_string(), "espeak synthesis failed: exit status 1");
    }
}
