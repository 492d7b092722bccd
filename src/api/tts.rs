//! Synthesis service routes.
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET  | `/`        | service info |
//! | GET  | `/health`  | engines, defaults, local model presence |
//! | GET  | `/engines` | available / active / supported |
//! | POST | `/tts`     | WAV or JSON, see [`ResponseCodec`] |

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::api::body::JsonFields;
use crate::api::codec::ResponseCodec;
use crate::api::error::ApiError;
use crate::config::TtsConfig;
use crate::tts::{EngineName, SynthesisDispatcher, SynthesisRequest};

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct TtsState {
    pub dispatcher: SynthesisDispatcher,
    pub config: Arc<TtsConfig>,
}

impl TtsState {
    pub fn new(dispatcher: SynthesisDispatcher, config: TtsConfig) -> Self {
        Self {
            dispatcher,
            config: Arc::new(config),
        }
    }
}

/// Build the synthesis router.
pub fn tts_router(state: TtsState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/engines", get(engines))
        .route("/tts", post(synthesize))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

fn names(names: &[EngineName]) -> Vec<&'static str> {
    names.iter().map(|n| n.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Introspection
// ---------------------------------------------------------------------------

async fn index(State(state): State<TtsState>) -> Json<Value> {
    let registry = state.dispatcher.registry();
    Json(json!({
        "service": "TTS Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Text-to-speech with neural engines and local fallbacks",
        "endpoints": {
            "/": "Service info",
            "/health": "Health check",
            "/engines": "List TTS engines",
            "/tts": "Synthesize speech (POST)",
        },
        "active_engine": registry.active().map(EngineName::as_str),
        "available_engines": names(&registry.available()),
    }))
}

async fn health(State(state): State<TtsState>) -> Json<Value> {
    let registry = state.dispatcher.registry();
    Json(json!({
        "status": "healthy",
        "active_engine": registry.active().map(EngineName::as_str),
        "available_engines": names(&registry.available()),
        "default_voice": state.config.default_voice,
        "default_rate": state.config.default_rate,
        "local_models": {
            "voxcpm": registry.is_available(EngineName::VoxCpm),
            "index_tts2": registry.is_available(EngineName::IndexTts2),
        },
    }))
}

async fn engines(State(state): State<TtsState>) -> Json<Value> {
    let registry = state.dispatcher.registry();
    Json(json!({
        "available": names(&registry.available()),
        "active": registry.active().map(EngineName::as_str),
        "supported": names(&EngineName::ALL),
    }))
}

// ---------------------------------------------------------------------------
// POST /tts
// ---------------------------------------------------------------------------

const MISSING_TEXT: &str = "Missing text";

/// Build a request from the body members `text`, `voice`, `speed`,
/// `sample_rate` and `engine`.  Anything else (`format`, for one) is
/// ignored: only WAV is produced.
fn synthesis_request(body: &JsonFields, config: &TtsConfig) -> Result<SynthesisRequest, ApiError> {
    let text: String = body.required("text", MISSING_TEXT)?;
    let mut request = SynthesisRequest::with_defaults(text, config)?;
    if let Some(voice) = body.optional::<String>("voice")? {
        request = request.voice(voice);
    }
    if let Some(speed) = body.optional::<f64>("speed")? {
        request = request.speed(speed)?;
    }
    if let Some(rate) = body.optional::<i64>("sample_rate")? {
        request = request.sample_rate(u32::try_from(rate).unwrap_or(0))?;
    }
    if let Some(engine) = body.optional::<String>("engine")? {
        request = request.engine(engine);
    }
    Ok(request)
}

async fn synthesize(
    State(state): State<TtsState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let body = JsonFields::parse(&body, MISSING_TEXT)?;
    let request = synthesis_request(&body, &state.config)?;

    log::info!(
        "TTS request: '{}' (voice={}, speed={}, engine={})",
        request.text().chars().take(50).collect::<String>(),
        request.voice_name(),
        request.speed_factor(),
        request.engine_override().unwrap_or("auto"),
    );

    let result = state.dispatcher.dispatch(&request).await?;
    Ok(ResponseCodec::negotiate(&headers).synthesis(result))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
