//! Service settings structs, defaults, TOML persistence and environment
//! overrides.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! Precedence, lowest to highest: built-in defaults → `settings.toml` →
//! environment variables (see [`AppConfig::apply_env`]).

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::tts::{EngineName, TtsError};

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Which of the two HTTP services a binary is starting.
///
/// Only affects how the shared `PORT` variable is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Tts,
    Asr,
}

// ---------------------------------------------------------------------------
// BackendPreference
// ---------------------------------------------------------------------------

/// Configured synthesis backend preference.
///
/// Serialised as the plain strings `"auto"`, `"voxcpm"`, `"index-tts2"`,
/// `"espeak"` or `"say"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackendPreference {
    /// Walk the static priority list and take the first available engine.
    #[default]
    Auto,
    /// Prefer this engine when it probed as available.
    Engine(EngineName),
}

impl FromStr for BackendPreference {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Engine)
        }
    }
}

impl TryFrom<String> for BackendPreference {
    type Error = TtsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackendPreference> for String {
    fn from(value: BackendPreference) -> Self {
        match value {
            BackendPreference::Auto => "auto".into(),
            BackendPreference::Engine(name) => name.as_str().into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the synthesis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Voice used when a request does not name one.
    pub default_voice: String,
    /// Words-per-minute baseline for the `say` backend (scaled by `speed`).
    pub default_rate: u32,
    /// Output sample rate used when a request does not give one.
    pub default_sample_rate: u32,
    /// Backend preference: `auto` or an explicit engine name.
    pub backend: BackendPreference,
    /// Model directory probed for the VoxCPM backend.
    pub voxcpm_model_path: PathBuf,
    /// Model directory probed for the Index-TTS2 backend.
    pub index_tts_model_path: PathBuf,
    /// Executable used by the espeak backend.
    pub espeak_program: String,
    /// Executable used by the `say` backend.
    pub say_program: String,
    /// Upper bound on a single external synthesizer invocation.
    pub engine_timeout_secs: u64,
    /// Listening port of the TTS service.
    pub port: u16,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            default_voice: "default".into(),
            default_rate: 150,
            default_sample_rate: 22_050,
            backend: BackendPreference::Auto,
            voxcpm_model_path: PathBuf::from("/app/models/voxcpm"),
            index_tts_model_path: PathBuf::from("/app/models/index-tts2"),
            espeak_program: "espeak-ng".into(),
            say_program: "say".into(),
            engine_timeout_secs: 30,
            port: 5500,
        }
    }
}

// ---------------------------------------------------------------------------
// AsrConfig
// ---------------------------------------------------------------------------

/// Settings for the transcription service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsrConfig {
    /// Whisper model size / name (e.g. `"base"`, `"small"`, `"large-v3"`).
    pub model: String,
    /// Directory holding the `ggml-<model>.bin` files.
    pub models_dir: PathBuf,
    /// Compute device selector: `"cpu"` disables GPU offload.
    pub device: String,
    /// CPU threads handed to Whisper; `0` picks automatically.
    pub n_threads: i32,
    /// Beam width for decoding; `1` or less decodes greedily.
    pub beam_size: i32,
    /// Largest accepted `/transcribe` request body, in MiB.  Audio travels
    /// base64-encoded inside JSON, so this is about 4/3 of the file size.
    pub max_upload_mb: usize,
    /// Listening port of the ASR service.
    pub port: u16,
}

impl AsrConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            model: "base".into(),
            models_dir: AppPaths::new().models_dir,
            device: "cpu".into(),
            n_threads: 0,
            beam_size: 1,
            max_upload_mb: 64,
            port: 9090,
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Settings shared by both HTTP listeners.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use speech_services::config::{AppConfig, Service};
///
/// let mut config = AppConfig::load().unwrap();
/// config.apply_env(Service::Tts);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Synthesis service settings.
    pub tts: TtsConfig,
    /// Transcription service settings.
    pub asr: AsrConfig,
    /// Listener settings.
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist, so a
    /// container started with environment variables alone needs no file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self, service: Service) {
        self.apply_env_from(service, |key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Values that fail to parse are logged and ignored; the previous value
    /// stays in effect.
    pub fn apply_env_from<F>(&mut self, service: Service, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TTS_VOICE") {
            self.tts.default_voice = v;
        }
        set_parsed(&lookup, "TTS_RATE", &mut self.tts.default_rate);
        set_parsed(&lookup, "TTS_SAMPLE_RATE", &mut self.tts.default_sample_rate);
        set_parsed(&lookup, "TTS_BACKEND", &mut self.tts.backend);
        if let Some(v) = lookup("VOXCPM_MODEL_PATH") {
            self.tts.voxcpm_model_path = v.into();
        }
        if let Some(v) = lookup("INDEX_TTS_MODEL_PATH") {
            self.tts.index_tts_model_path = v.into();
        }
        if let Some(v) = lookup("ESPEAK_PROGRAM") {
            self.tts.espeak_program = v;
        }
        if let Some(v) = lookup("SAY_PROGRAM") {
            self.tts.say_program = v;
        }
        set_parsed(
            &lookup,
            "TTS_ENGINE_TIMEOUT_SECS",
            &mut self.tts.engine_timeout_secs,
        );

        if let Some(v) = lookup("WHISPER_MODEL") {
            self.asr.model = v;
        }
        if let Some(v) = lookup("WHISPER_MODELS_DIR") {
            self.asr.models_dir = v.into();
        }
        if let Some(v) = lookup("DEVICE") {
            self.asr.device = v;
        }
        set_parsed(&lookup, "WHISPER_BEAM_SIZE", &mut self.asr.beam_size);
        set_parsed(&lookup, "ASR_MAX_UPLOAD_MB", &mut self.asr.max_upload_mb);

        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        let port = match service {
            Service::Tts => &mut self.tts.port,
            Service::Asr => &mut self.asr.port,
        };
        set_parsed(&lookup, "PORT", port);
    }

    /// `host:port` the given service should bind to.
    pub fn bind_addr(&self, service: Service) -> String {
        let port = match service {
            Service::Tts => self.tts.port,
            Service::Asr => self.asr.port,
        };
        format!("{}:{}", self.server.host, port)
    }
}

fn set_parsed<F, T>(lookup: &F, key: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(e) => log::warn!("Ignoring {key}={raw:?}: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
