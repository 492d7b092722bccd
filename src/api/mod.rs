//! HTTP surface of the two services.
//!
//! ```text
//! tts_router ── GET / · GET /health · GET /engines · POST /tts
//! asr_router ── GET / · GET /health · POST /transcribe
//! ```
//!
//! Handlers only translate between JSON and the library types; all decisions
//! live in [`crate::tts`], [`crate::audio`] and [`crate::stt`].  Failures
//! leave through [`ApiError`].

pub mod asr;
mod body;
pub mod codec;
pub mod error;
pub mod tts;

pub use asr::{asr_router, AsrState};
pub use codec::ResponseCodec;
pub use error::ApiError;
pub use tts::{tts_router, TtsState};
