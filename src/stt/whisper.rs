//! whisper.cpp-backed [`SttEngine`].

use std::path::Path;

use whisper_rs::{FullParams, WhisperContext, WhisperContextParameters};

use crate::stt::engine::{EngineTranscript, SttEngine, SttError};
use crate::stt::transcribe::{SamplingStrategy, TranscribeParams};

/// Production engine wrapping a loaded `WhisperContext`.
///
/// A fresh `WhisperState` is created for every call, so one engine serves
/// concurrent requests without locking.
pub struct WhisperEngine {
    ctx: WhisperContext,
    params: TranscribeParams,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl WhisperEngine {
    /// Load a GGML model from `model_path`.
    ///
    /// # Errors
    ///
    /// - [`SttError::ModelNotFound`]: `model_path` does not exist.
    /// - [`SttError::ContextInit`]: whisper.cpp failed to load the file.
    pub fn load(model_path: impl AsRef<Path>, params: TranscribeParams) -> Result<Self, SttError> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            SttError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(params.use_gpu);
        let ctx = WhisperContext::new_with_params(path_str, ctx_params)
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        log::info!(
            "Whisper model loaded from {} (gpu: {}, threads: {})",
            path.display(),
            params.use_gpu,
            params.n_threads
        );

        Ok(Self { ctx, params })
    }

    fn full_params<'a>(&self, language: Option<&'a str>) -> FullParams<'a, 'a> {
        use whisper_rs::SamplingStrategy as WS;
        let ws = match self.params.strategy {
            SamplingStrategy::Greedy { best_of } => WS::Greedy { best_of },
            SamplingStrategy::BeamSearch {
                beam_size,
                patience,
            } => WS::BeamSearch {
                beam_size,
                patience,
            },
        };

        let mut fp = FullParams::new(ws);
        fp.set_language(language);
        fp.set_n_threads(self.params.n_threads);
        if self.params.suppress_progress {
            fp.set_print_progress(false);
            fp.set_print_realtime(false);
            fp.set_print_special(false);
        }
        fp
    }
}

impl SttEngine for WhisperEngine {
    fn transcribe(
        &self,
        audio: &[f32],
        language: Option<&str>,
    ) -> Result<EngineTranscript, SttError> {
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        state
            .full(self.full_params(language), audio)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n_segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;
            text.push_str(&segment);
        }

        // A forced language is reported as given; otherwise ask the state
        // what it detected.
        let language = match language {
            Some(code) => Some(code.to_string()),
            None => state
                .full_lang_id_from_state()
                .ok()
                .and_then(whisper_rs::get_lang_str)
                .map(str::to_string),
        };

        Ok(EngineTranscript { text, language })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_model_returns_model_not_found() {
        let result = WhisperEngine::load("/nonexistent/ggml-base.bin", TranscribeParams::default());
        assert!(
            matches!(result, Err(SttError::ModelNotFound(_))),
            "expected ModelNotFound, got: {result:?}"
        );
    }
}
