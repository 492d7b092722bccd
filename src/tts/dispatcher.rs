//! Synthesis dispatcher: resolves the target engine, invokes it, and applies
//! the one-shot fallback policy.
//!
//! ```text
//! request.engine_override ──┐
//!                           ├─▶ EngineName ──▶ registry.engine(name)
//! registry.active() ────────┘        │
//!                                    ▼
//!                         engine.synthesize(...)
//!                          ├─ Ok(audio)                 → result (engine = name)
//!                          ├─ Err(Unimplemented)        → espeak.synthesize(...)
//!                          │     ├─ Ok(audio)           → result (engine = espeak)
//!                          │     └─ Err(e)              → EngineExecutionFailed
//!                          └─ Err(anything else)        → EngineExecutionFailed
//! ```
//!
//! Only "not yet implemented" triggers the fallback.  Real execution errors
//! are surfaced without a retry.

use std::sync::Arc;

use crate::tts::duration::WAV_HEADER_LEN;
use crate::tts::engine::{EngineError, EngineName, TtsError};
use crate::tts::registry::EngineRegistry;
use crate::tts::request::{SynthesisRequest, SynthesisResult};

/// Routes validated requests to engines held by an [`EngineRegistry`].
#[derive(Debug, Clone)]
pub struct SynthesisDispatcher {
    registry: Arc<EngineRegistry>,
}

impl SynthesisDispatcher {
    pub fn new(registry: Arc<EngineRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Resolve the engine a request would run on, without running it.
    ///
    /// # Errors
    ///
    /// - [`TtsError::UnknownEngine`]: the override names no known engine.
    /// - [`TtsError::NoEngineAvailable`]: no override and no active engine.
    pub fn resolve(&self, request: &SynthesisRequest) -> Result<EngineName, TtsError> {
        match request.engine_override() {
            Some(name) => name.parse(),
            None => self.registry.active().ok_or(TtsError::NoEngineAvailable),
        }
    }

    /// Synthesize `request`.
    pub async fn dispatch(&self, request: &SynthesisRequest) -> Result<SynthesisResult, TtsError> {
        let target = self.resolve(request)?;

        let (engine_used, audio) = match self.invoke(target, request).await {
            Ok(audio) => (target, audio),
            Err(EngineError::Unimplemented(_)) => {
                log::warn!("Falling back to {} from {target}", EngineName::FALLBACK);
                let audio = self
                    .invoke(EngineName::FALLBACK, request)
                    .await
                    .map_err(TtsError::EngineExecutionFailed)?;
                (EngineName::FALLBACK, audio)
            }
            Err(e) => return Err(TtsError::EngineExecutionFailed(e)),
        };

        if audio.len() < WAV_HEADER_LEN {
            return Err(TtsError::EngineExecutionFailed(EngineError::execution(
                engine_used,
                format!("produced {} bytes, not a WAV file", audio.len()),
            )));
        }

        Ok(SynthesisResult::new(audio, request.rate_hz(), engine_used))
    }

    async fn invoke(
        &self,
        name: EngineName,
        request: &SynthesisRequest,
    ) -> Result<Vec<u8>, EngineError> {
        let engine = self
            .registry
            .engine(name)
            .ok_or_else(|| EngineError::execution(name, "engine is not registered"))?;
        engine
            .synthesize(
                request.text(),
                request.voice_name(),
                request.speed_factor(),
                request.rate_hz(),
            )
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
