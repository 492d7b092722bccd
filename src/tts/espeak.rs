//! `espeak-ng` backend, the always-available fallback.
//!
//! Speed is mapped to words per minute against espeak's own default of 175:
//! `wpm = trunc(175 × speed)`.  The requested sample rate is not passed on;
//! espeak renders at its native rate and the WAV header says so.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::TtsConfig;
use crate::tts::command;
use crate::tts::engine::{EngineError, EngineName, SpeechEngine};

/// espeak-ng's default speaking rate.
const BASE_WPM: f64 = 175.0;

/// Runs the `espeak-ng` executable once per request.
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    program: String,
    timeout: Duration,
}

impl EspeakEngine {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &TtsConfig) -> Self {
        Self::new(
            config.espeak_program.clone(),
            Duration::from_secs(config.engine_timeout_secs),
        )
    }
}

/// Words per minute for a speed multiplier.
pub(crate) fn words_per_minute(speed: f64) -> u32 {
    (BASE_WPM * speed) as u32
}

/// Arguments for one espeak invocation writing to `out`.
pub(crate) fn build_args(out: &Path, text: &str, voice: &str, speed: f64) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-w".into(),
        out.as_os_str().to_owned(),
        "-s".into(),
        words_per_minute(speed).to_string().into(),
    ];
    if voice != "default" {
        args.push("-v".into());
        args.push(voice.into());
    }
    args.push("--".into());
    args.push(text.into());
    args
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    fn name(&self) -> EngineName {
        EngineName::Espeak
    }

    async fn probe(&self) -> Result<(), EngineError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--version");
        command::run(EngineName::Espeak, cmd, self.timeout)
            .await
            .map(|_| ())
            .map_err(|e| EngineError::Unavailable {
                engine: EngineName::Espeak,
                reason: e.to_string(),
            })
    }

    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        speed: f64,
        _sample_rate: u32,
    ) -> Result<Vec<u8>, EngineError> {
        let scratch = command::scratch_wav(EngineName::Espeak)?;

        let mut cmd = Command::new(&self.program);
        cmd.args(build_args(&scratch, text, voice, speed));
        command::run(EngineName::Espeak, cmd, self.timeout).await?;

        tokio::fs::read(&scratch)
            .await
            .map_err(|e| EngineError::execution(EngineName::Espeak, format!("reading output: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
