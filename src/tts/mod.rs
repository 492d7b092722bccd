//! Text-to-speech engine orchestration.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ SynthesisDispatcher                                        │
//! │   resolve(override | active) ─▶ EngineRegistry             │
//! │                                   ├─ NeuralEngine voxcpm   │
//! │                                   ├─ NeuralEngine index-tts2│
//! │                                   ├─ EspeakEngine (fallback)│
//! │                                   └─ SayEngine             │
//! │   on Unimplemented ─▶ one retry on espeak                  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use speech_services::config::TtsConfig;
//! use speech_services::tts::{default_engines, EngineRegistry, SynthesisDispatcher, SynthesisRequest};
//!
//! # async fn example() {
//! let config = TtsConfig::default();
//! let registry = EngineRegistry::probe(default_engines(&config), config.backend).await;
//! let dispatcher = SynthesisDispatcher::new(Arc::new(registry));
//!
//! let request = SynthesisRequest::with_defaults("hello", &config).unwrap();
//! let result = dispatcher.dispatch(&request).await.unwrap();
//! println!("{} bytes from {}", result.audio.len(), result.engine_used);
//! # }
//! ```

mod command;
pub mod dispatcher;
pub mod duration;
pub mod engine;
pub mod espeak;
pub mod neural;
pub mod registry;
pub mod request;
pub mod say;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use dispatcher::SynthesisDispatcher;
pub use duration::{estimate_wav_duration, WAV_HEADER_LEN};
pub use engine::{EngineError, EngineName, SpeechEngine, TtsError};
pub use espeak::EspeakEngine;
pub use neural::NeuralEngine;
pub use registry::{default_engines, EngineDescriptor, EngineRegistry};
pub use request::{SynthesisRequest, SynthesisResult};
pub use say::SayEngine;
