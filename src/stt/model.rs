//! Whisper model path resolution.
//!
//! Models are GGML files named `ggml-<name>.bin` under the configured models
//! directory: `base`, `small`, `large-v3`, or any custom or fine-tuned file
//! dropped in under that convention.

use std::path::PathBuf;

use crate::config::AsrConfig;

/// `ggml-<name>.bin`.
pub fn model_file_name(name: &str) -> String {
    format!("ggml-{name}.bin")
}

/// Resolves the on-disk location of model files.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    /// Directory that contains GGML `.bin` files.
    pub models_dir: PathBuf,
}

impl ModelPaths {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    pub fn from_config(config: &AsrConfig) -> Self {
        Self::new(config.models_dir.clone())
    }

    /// Full path to the GGML file for `name`.
    pub fn model_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(model_file_name(name))
    }
}
