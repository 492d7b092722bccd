//! STT (speech-to-text) module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ TranscriptionService                                 │
//! │   AudioBuffer + hint ──▶ spawn_blocking              │
//! │                             │                        │
//! │                             ▼                        │
//! │   ┌─────────────┐    ┌──────────────────┐            │
//! │   │  ModelPaths │───▶│ SttEngine (trait)│            │
//! │   │ ggml-*.bin  │    │  WhisperEngine   │            │
//! │   └─────────────┘    └──────────────────┘            │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use speech_services::config::AsrConfig;
//! use speech_services::stt::{ModelPaths, TranscribeParams, TranscriptionService, WhisperEngine};
//!
//! let config = AsrConfig::default();
//! let path = ModelPaths::from_config(&config).model_path(&config.model);
//! let engine = WhisperEngine::load(path, TranscribeParams::from_config(&config))?;
//! let service = TranscriptionService::new(Arc::new(engine));
//! ```

pub mod engine;
pub mod model;
pub mod service;
pub mod transcribe;
#[cfg(feature = "whisper")]
pub mod whisper;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{EngineTranscript, SttEngine, SttError};
pub use model::{model_file_name, ModelPaths};
pub use service::{TranscriptionResult, TranscriptionService, AUTO_LANGUAGE, UNKNOWN_LANGUAGE};
pub use transcribe::{SamplingStrategy, TranscribeParams};
#[cfg(feature = "whisper")]
pub use whisper::WhisperEngine;

#[cfg(test)]
pub use engine::MockSttEngine;
