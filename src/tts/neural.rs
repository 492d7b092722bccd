//! Neural backends (VoxCPM, Index-TTS2).
//!
//! Both are capability placeholders: they probe as available when their model
//! directory is present, but every synthesis call reports
//! [`EngineError::Unimplemented`] until a real model integration lands.  The
//! dispatcher turns that into a silent fallback, so either engine can already
//! be configured as the preferred backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::TtsConfig;
use crate::tts::engine::{EngineError, EngineName, SpeechEngine};

/// A model-backed engine identified by its model directory.
#[derive(Debug, Clone)]
pub struct NeuralEngine {
    name: EngineName,
    model_dir: PathBuf,
}

impl NeuralEngine {
    pub fn new(name: EngineName, model_dir: impl Into<PathBuf>) -> Self {
        debug_assert!(name.is_neural(), "{name} is not a neural engine");
        Self {
            name,
            model_dir: model_dir.into(),
        }
    }

    pub fn voxcpm(config: &TtsConfig) -> Self {
        Self::new(EngineName::VoxCpm, &config.voxcpm_model_path)
    }

    pub fn index_tts2(config: &TtsConfig) -> Self {
        Self::new(EngineName::IndexTts2, &config.index_tts_model_path)
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
}

#[async_trait]
impl SpeechEngine for NeuralEngine {
    fn name(&self) -> EngineName {
        self.name
    }

    async fn probe(&self) -> Result<(), EngineError> {
        match tokio::fs::metadata(&self.model_dir).await {
            Ok(_) => {
                log::info!("{} model found at {}", self.name, self.model_dir.display());
                Ok(())
            }
            Err(e) => Err(EngineError::Unavailable {
                engine: self.name,
                reason: format!("{}: {e}", self.model_dir.display()),
            }),
        }
    }

    async fn synthesize(
        &self,
        _text: &str,
        _voice: &str,
        _speed: f64,
        _sample_rate: u32,
    ) -> Result<Vec<u8>, EngineError> {
        Err(EngineError::Unimplemented(self.name))
    }
}
