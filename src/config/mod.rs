//! Configuration module for the speech services.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each service,
//! `AppPaths` for the default file locations, TOML loading via
//! `AppConfig::load`, and environment overrides via `AppConfig::apply_env`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AsrConfig, BackendPreference, ServerConfig, Service, TtsConfig};
