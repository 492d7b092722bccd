//! Local speech services: text-to-speech synthesis and Whisper transcription
//! behind a small HTTP contract.
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | settings, TOML persistence, environment overrides |
//! | [`tts`]    | engine registry, dispatcher, concrete synthesizers |
//! | [`audio`]  | base64 + container decode, mono mix, 16 kHz resample |
//! | [`stt`]    | recognition engine trait, Whisper, transcription service |
//! | [`api`]    | axum routers for both services |

pub mod api;
pub mod audio;
pub mod config;
pub mod stt;
pub mod tts;
