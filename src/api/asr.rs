//! Transcription service routes.
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET  | `/`           | service info |
//! | GET  | `/health`     | model and device |
//! | POST | `/transcribe` | `{text, language, duration}` |

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::api::body::JsonFields;
use crate::api::codec;
use crate::api::error::ApiError;
use crate::audio::AudioNormalizer;
use crate::config::AsrConfig;
use crate::stt::TranscriptionService;

const MISSING_AUDIO: &str = "Missing audio data";

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AsrState {
    pub service: TranscriptionService,
    pub normalizer: AudioNormalizer,
    pub config: Arc<AsrConfig>,
}

impl AsrState {
    pub fn new(service: TranscriptionService, config: AsrConfig) -> Self {
        Self {
            service,
            normalizer: AudioNormalizer::new(),
            config: Arc::new(config),
        }
    }
}

/// Build the transcription router.
///
/// `/transcribe` accepts bodies up to `AsrConfig::max_upload_mb`.
pub fn asr_router(state: AsrState) -> Router {
    let upload_limit = state.config.max_upload_bytes();
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route(
            "/transcribe",
            post(transcribe).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn index(State(state): State<AsrState>) -> Json<Value> {
    Json(json!({
        "service": "ASR Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Speech recognition with Whisper",
        "endpoints": {
            "/": "Service info",
            "/health": "Health check",
            "/transcribe": "Transcribe audio (POST)",
        },
        "model": state.config.model,
        "device": state.config.device,
    }))
}

async fn health(State(state): State<AsrState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "model": state.config.model,
        "device": state.config.device,
    }))
}

/// Reads `audio` (required), `language` and `format`.  `model` may be sent
/// but the service always uses the model it loaded at startup.
async fn transcribe(State(state): State<AsrState>, body: Bytes) -> Result<Response, ApiError> {
    let body = JsonFields::parse(&body, MISSING_AUDIO)?;

    let encoded: String = body.required("audio", MISSING_AUDIO)?;
    if encoded.trim().is_empty() {
        return Err(ApiError::bad_request(MISSING_AUDIO));
    }
    let language: Option<String> = body.optional("language")?;
    let format: Option<String> = body.optional("format")?;
    let bytes = crate::audio::decode_base64(&encoded)?;

    // Container decode and resampling are CPU-bound.
    let normalizer = state.normalizer;
    let buffer = tokio::task::spawn_blocking(move || {
        normalizer.normalize_bytes(bytes, format.as_deref())
    })
    .await
    .map_err(|e| ApiError::internal(format!("audio decode task failed: {e}")))??;

    let result = state
        .service
        .transcribe(buffer, language.as_deref())
        .await?;

    log::info!(
        "Transcribed {:.2}s ({}): {} chars",
        result.duration_secs,
        result.language,
        result.text.chars().count()
    );

    Ok(codec::transcription(result))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::decode::tests::wav_bytes;
    use crate::stt::{MockSttEngine, SttEngine, SttError};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use tower::ServiceExt;

    fn app_with(engine: Arc<MockSttEngine>) -> Router {
        app_with_config(engine, AsrConfig::default())
    }

    fn app_with_config(engine: Arc<MockSttEngine>, config: AsrConfig) -> Router {
        let service = TranscriptionService::new(engine as Arc<dyn SttEngine>);
        asr_router(AsrState::new(service, config))
    }

    fn post(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/transcribe")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, body: String) -> (StatusCode, Value) {
        let response = app.oneshot(post(body)).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn three_second_stereo_44k() -> String {
        let frames = vec![vec![2_000i16, 1_000]; 3 * 44_100];
        STANDARD.encode(wav_bytes(44_100, 2, &frames))
    }

    // ---- success -----------------------------------------------------------

    #[tokio::test]
    async fn three_second_clip_reports_three_seconds() {
        let engine = Arc::new(MockSttEngine::ok(" hello there ", None));
        let body = json!({"audio": three_second_stereo_44k(), "format": "wav"}).to_string();
        let (status, json) = send(app_with(engine.clone()), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "hello there");
        assert_eq!(json["language"], "unknown");
        assert!((json["duration"].as_f64().unwrap() - 3.0).abs() < 1e-3);
        // The engine saw canonical audio: 3 s at 16 kHz.
        assert_eq!(engine.calls.lock().unwrap()[0].0, 48_000);
    }

    #[tokio::test]
    async fn ten_second_clip_above_axum_default_limit_is_accepted() {
        let engine = Arc::new(MockSttEngine::ok("long", None));
        let frames = vec![vec![500i16, -500]; 10 * 44_100];
        let body = json!({"audio": STANDARD.encode(wav_bytes(44_100, 2, &frames))}).to_string();
        assert!(body.len() > 2 * 1024 * 1024);

        let (status, json) = send(app_with(engine.clone()), body).await;
        assert_eq!(status, StatusCode::OK);
        assert!((json["duration"].as_f64().unwrap() - 10.0).abs() < 1e-3);
        assert_eq!(engine.calls.lock().unwrap()[0].0, 160_000);
    }

    #[tokio::test]
    async fn body_over_configured_limit_is_rejected() {
        let engine = Arc::new(MockSttEngine::ok("x", None));
        let mut config = AsrConfig::default();
        config.max_upload_mb = 1;
        let body = json!({"audio": "A".repeat(2 * 1024 * 1024)}).to_string();

        let response = app_with_config(engine.clone(), config)
            .oneshot(post(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn language_hint_reaches_engine() {
        let engine = Arc::new(MockSttEngine::ok("hola", Some("es")));
        let body = json!({
            "audio": STANDARD.encode(wav_bytes(16_000, 1, &vec![vec![0]; 1_600])),
            "language": "es",
            "model": "ignored",
        })
        .to_string();
        let (status, json) = send(app_with(engine.clone()), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["language"], "es");
        assert_eq!(engine.calls.lock().unwrap()[0], (1_600, Some("es".into())));
    }

    #[tokio::test]
    async fn empty_clip_skips_engine() {
        let engine = Arc::new(MockSttEngine::ok("never", Some("en")));
        let body = json!({"audio": STANDARD.encode(wav_bytes(16_000, 1, &[]))}).to_string();
        let (status, json) = send(app_with(engine.clone()), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"text": "", "language": "unknown", "duration": 0.0}));
        assert_eq!(engine.call_count(), 0);
    }

    // ---- errors ------------------------------------------------------------

    #[tokio::test]
    async fn missing_audio_is_400() {
        for body in [
            r#"{"language":"en"}"#,
            r#"{"audio":""}"#,
            r#"{"audio":null}"#,
            "not json",
        ] {
            let engine = Arc::new(MockSttEngine::ok("x", None));
            let (status, json) = send(app_with(engine.clone()), body.to_string()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json["error"], MISSING_AUDIO);
            assert_eq!(engine.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn mistyped_field_is_400_naming_the_field() {
        let audio = STANDARD.encode(wav_bytes(16_000, 1, &vec![vec![0]; 160]));
        for (body, field) in [
            (json!({"audio": 12}), "audio"),
            (json!({"audio": audio, "language": 5}), "language"),
            (json!({"audio": audio, "format": true}), "format"),
        ] {
            let engine = Arc::new(MockSttEngine::ok("x", None));
            let (status, json) = send(app_with(engine.clone()), body.to_string()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            let msg = json["error"].as_str().unwrap();
            assert!(msg.starts_with(&format!("Invalid '{field}': ")), "{body}: {msg}");
            assert_eq!(engine.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn invalid_base64_is_400() {
        let engine = Arc::new(MockSttEngine::ok("x", None));
        let (status, json) =
            send(app_with(engine.clone()), json!({"audio": "@@@@"}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid base64 audio data");
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn undecodable_container_is_500() {
        let engine = Arc::new(MockSttEngine::ok("x", None));
        let body = json!({"audio": STANDARD.encode(b"this is not audio"), "format": "wav"});
        let (status, json) = send(app_with(engine.clone()), body.to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].is_string());
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn engine_failure_is_500() {
        let engine = Arc::new(MockSttEngine::err(SttError::Transcription("boom".into())));
        let body = json!({"audio": three_second_stereo_44k()}).to_string();
        let (status, json) = send(app_with(engine), body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Transcription error: boom");
    }

    // ---- introspection -----------------------------------------------------

    #[tokio::test]
    async fn health_reports_model_and_device() {
        let response = app_with(Arc::new(MockSttEngine::ok("x", None)))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, json!({"status": "healthy", "model": "base", "device": "cpu"}));
    }
}
