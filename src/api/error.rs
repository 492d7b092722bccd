//! HTTP error type shared by both services.
//!
//! Every failure leaves as `{"error": "<message>"}` with the status decided
//! by the library error it came from:
//!
//! | Source | Status |
//! |--------|--------|
//! | missing / empty / mistyped / out-of-range request field | 400 |
//! | invalid base64 audio | 400 |
//! | unknown engine, no engine, engine failure | 500 |
//! | container decode, transcription failure | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::audio::DecodeError;
use crate::stt::SttError;
use crate::tts::TtsError;

/// API error type.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("{}", self.message);
        } else {
            log::warn!("Rejected request: {}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<TtsError> for ApiError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::EmptyText | TtsError::InvalidParameter { .. } => {
                ApiError::bad_request(err.to_string())
            }
            TtsError::NoEngineAvailable
            | TtsError::UnknownEngine(_)
            | TtsError::EngineExecutionFailed(_) => ApiError::internal(err.to_string()),
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::InvalidBase64(_) => ApiError::bad_request(err.to_string()),
            DecodeError::UnsupportedFormat(_) | DecodeError::Container(_) => {
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<SttError> for ApiError {
    fn from(err: SttError) -> Self {
        ApiError::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::{EngineError, EngineName};

    #[test]
    fn validation_errors_are_bad_requests() {
        assert_eq!(
            ApiError::from(TtsError::EmptyText),
            ApiError::bad_request("Empty text")
        );
        let err = ApiError::from(TtsError::InvalidParameter {
            field: "speed",
            reason: "must be positive".into(),
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_errors_are_internal() {
        for err in [
            TtsError::NoEngineAvailable,
            TtsError::UnknownEngine("nope".into()),
            TtsError::EngineExecutionFailed(EngineError::Timeout {
                engine: EngineName::Espeak,
                secs: 30,
            }),
        ] {
            let message = err.to_string();
            let api = ApiError::from(err);
            assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn only_transport_decode_errors_are_bad_requests() {
        let b64 = crate::audio::decode_base64("***").unwrap_err();
        assert_eq!(ApiError::from(b64).status, StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(DecodeError::Container("eof".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(SttError::Transcription("x".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn body_is_error_object() {
        let response = ApiError::bad_request("Missing text").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, json!({"error": "Missing text"}));
    }
}
