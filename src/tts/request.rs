//! Synthesis request and result types.
//!
//! [`SynthesisRequest::new`] is the only way to build a request, and it
//! rejects empty/whitespace-only text, so a request that exists has already
//! passed validation and can be handed to an engine.

use crate::config::TtsConfig;
use crate::tts::duration::estimate_wav_duration;
use crate::tts::engine::{EngineName, TtsError};

// ---------------------------------------------------------------------------
// SynthesisRequest
// ---------------------------------------------------------------------------

/// A validated synthesis request.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    text: String,
    voice: String,
    speed: f64,
    sample_rate: u32,
    engine_override: Option<String>,
}

impl SynthesisRequest {
    /// Build a request with the built-in defaults: voice `"default"`,
    /// speed 1.0, 22 050 Hz, no engine override.
    ///
    /// # Errors
    ///
    /// [`TtsError::EmptyText`] when `text` is empty after trimming.
    pub fn new(text: impl Into<String>) -> Result<Self, TtsError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }
        Ok(Self {
            text,
            voice: "default".into(),
            speed: 1.0,
            sample_rate: 22_050,
            engine_override: None,
        })
    }

    /// Like [`new`](Self::new) but takes voice and sample rate defaults from
    /// the service configuration.
    pub fn with_defaults(text: impl Into<String>, config: &TtsConfig) -> Result<Self, TtsError> {
        let mut request = Self::new(text)?;
        request.voice = config.default_voice.clone();
        request.sample_rate = config.default_sample_rate;
        Ok(request)
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// # Errors
    ///
    /// [`TtsError::InvalidParameter`] unless `speed` is finite and positive.
    pub fn speed(mut self, speed: f64) -> Result<Self, TtsError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(TtsError::InvalidParameter {
                field: "speed",
                reason: format!("must be a positive number, got {speed}"),
            });
        }
        self.speed = speed;
        Ok(self)
    }

    /// # Errors
    ///
    /// [`TtsError::InvalidParameter`] for a zero rate.
    pub fn sample_rate(mut self, sample_rate: u32) -> Result<Self, TtsError> {
        if sample_rate == 0 {
            return Err(TtsError::InvalidParameter {
                field: "sample_rate",
                reason: "must be a positive integer".into(),
            });
        }
        self.sample_rate = sample_rate;
        Ok(self)
    }

    /// Name an engine for this request only.  The name is resolved (and
    /// possibly rejected) by the dispatcher.
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine_override = Some(engine.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn voice_name(&self) -> &str {
        &self.voice
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed
    }

    pub fn rate_hz(&self) -> u32 {
        self.sample_rate
    }

    pub fn engine_override(&self) -> Option<&str> {
        self.engine_override.as_deref()
    }
}

// ---------------------------------------------------------------------------
// SynthesisResult
// ---------------------------------------------------------------------------

/// Audio produced by a dispatch, tagged with the engine that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Complete WAV file.
    pub audio: Vec<u8>,
    /// Sample rate the request asked for.
    pub sample_rate: u32,
    /// Engine that actually rendered `audio` (the fallback, if one ran).
    pub engine_used: EngineName,
    /// Approximate playback length; see [`estimate_wav_duration`].
    pub duration_secs: f64,
}

impl SynthesisResult {
    pub fn new(audio: Vec<u8>, sample_rate: u32, engine_used: EngineName) -> Self {
        let duration_secs = estimate_wav_duration(audio.len(), sample_rate);
        Self {
            audio,
            sample_rate,
            engine_used,
            duration_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
