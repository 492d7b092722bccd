//! Where the services look for `settings.toml` and Whisper models when
//! nothing overrides it.
//!
//! Both sit in a `speech-services` directory: `settings.toml` under
//! `dirs::config_dir()`, `models/` under `dirs::data_local_dir()`.

use std::path::PathBuf;

const APP_DIR: &str = "speech-services";

/// Default on-disk locations.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Read by [`AppConfig::load`](super::AppConfig::load).
    pub settings_file: PathBuf,
    /// Default `AsrConfig::models_dir`.
    pub models_dir: PathBuf,
}

impl AppPaths {
    /// A platform without a standard directory (a container with no home,
    /// typically) resolves relative to the working directory instead.
    pub fn new() -> Self {
        let under = |base: Option<PathBuf>| base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR);
        Self {
            settings_file: under(dirs::config_dir()).join("settings.toml"),
            models_dir: under(dirs::data_local_dir()).join("models"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_paths_live_under_the_app_directory() {
        let paths = AppPaths::new();
        assert!(paths.settings_file.ends_with("speech-services/settings.toml"));
        assert!(paths.models_dir.ends_with("speech-services/models"));
    }
}
