//! Speech recognition service.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] and apply environment overrides.
//! 3. Load the Whisper model named by `asr.model` (fatal if missing).
//! 4. Serve the ASR router until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use speech_services::{
    api::{asr_router, AsrState},
    config::{AppConfig, Service},
    stt::{ModelPaths, TranscribeParams, TranscriptionService, WhisperEngine},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("ASR service starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config.apply_env(Service::Asr);

    let model_path = ModelPaths::from_config(&config.asr).model_path(&config.asr.model);
    log::info!(
        "Loading Whisper model '{}' from {} on {}",
        config.asr.model,
        model_path.display(),
        config.asr.device
    );
    let params = TranscribeParams::from_config(&config.asr);
    let engine = tokio::task::spawn_blocking(move || WhisperEngine::load(&model_path, params))
        .await
        .context("model loading task failed")?
        .context("failed to load Whisper model")?;

    let service = TranscriptionService::new(Arc::new(engine));
    let app = asr_router(AsrState::new(service, config.asr.clone()));

    let addr = config.bind_addr(Service::Asr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("ASR service listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("ASR service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
    }
}
