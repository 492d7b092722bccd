//! Text-to-speech service.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] and apply environment overrides.
//! 3. Probe every synthesis engine once and select the active one.
//! 4. Serve the TTS router until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use speech_services::{
    api::{tts_router, TtsState},
    config::{AppConfig, Service},
    tts::{default_engines, EngineRegistry, SynthesisDispatcher},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("TTS service starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config.apply_env(Service::Tts);

    let registry =
        EngineRegistry::probe(default_engines(&config.tts), config.tts.backend).await;
    let dispatcher = SynthesisDispatcher::new(Arc::new(registry));
    let app = tts_router(TtsState::new(dispatcher, config.tts.clone()));

    let addr = config.bind_addr(Service::Tts);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("TTS service listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("TTS service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
    }
}
