//! HTTP server for clip classification.
//!
//! API endpoints:
//! - GET  /health              - liveness probe
//! - POST /detect              - simple policy, errors surface as HTTP failures
//! - POST /api/voice-detection - strict policy, fail-soft, x-api-key guarded

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use voxcheck_detect::policy::{
    validate_format, Classification, Language, ValidationError, Verdict,
};
use voxcheck_detect::DetectError;

use crate::state::AppState;

/// Single opaque message for every strict-endpoint validation failure;
/// callers cannot tell which check rejected them.
const VALIDATION_MESSAGE: &str = "Invalid API key or malformed request";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/detect", post(detect))
        .route("/api/voice-detection", post(voice_detection))
        .with_state(state)
}

/// Builds a CORS layer for the configured origins, if any.
pub fn cors_layer(origins: &str) -> Option<CorsLayer> {
    let parsed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| o.parse().ok())
        .collect();
    if parsed.is_empty() {
        return None;
    }
    Some(
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

#[derive(Debug, Deserialize)]
struct DetectRequest {
    audio_base64: String,
}

#[derive(Debug, Serialize)]
struct DetectResponse {
    classification: Classification,
    confidence: f64,
    explanation: &'static str,
}

#[derive(Debug, Deserialize)]
struct VoiceDetectionRequest {
    language: String,
    #[serde(rename = "audioFormat")]
    audio_format: String,
    #[serde(rename = "audioBase64")]
    audio_base64: String,
}

#[derive(Debug, Serialize)]
struct VoiceDetectionResponse {
    status: &'static str,
    language: String,
    classification: Classification,
    #[serde(rename = "confidenceScore")]
    confidence_score: f64,
    explanation: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Simple endpoint: every pipeline failure maps to a distinguishable
/// HTTP error.
async fn detect(State(state): State<AppState>, Json(req): Json<DetectRequest>) -> Response {
    let analyzer = match state.analyzer() {
        Ok(analyzer) => analyzer,
        Err(e) => return error_response(&e),
    };

    let result =
        tokio::task::spawn_blocking(move || analyzer.detect_simple(&req.audio_base64)).await;

    match result {
        Ok(Ok(verdict)) => Json(DetectResponse {
            classification: verdict.classification,
            confidence: verdict.confidence,
            explanation: verdict.explanation,
        })
        .into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            warn!("detect task panicked: {e}");
            detail_response(StatusCode::INTERNAL_SERVER_ERROR, "Audio processing failed.")
        }
    }
}

/// Strict endpoint: validation failures return an error envelope before
/// any audio work; everything after validation is fail-soft and always
/// answers with a success-shaped body.
async fn voice_detection(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<VoiceDetectionRequest>,
) -> Response {
    let language = match validate(&headers, &req, state.api_key()) {
        Ok(language) => language,
        Err(e) => {
            warn!("rejected voice-detection request: {e}");
            return validation_error();
        }
    };

    let verdict = match state.analyzer() {
        Ok(analyzer) => {
            let task = tokio::task::spawn_blocking(move || {
                analyzer.detect_strict(language, &req.audio_base64)
            })
            .await;
            match task {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!("strict detect task panicked: {e}");
                    voxcheck_detect::policy::fail_soft()
                }
            }
        }
        Err(e) => {
            warn!("model unavailable on strict endpoint: {e}");
            voxcheck_detect::policy::fail_soft()
        }
    };

    success_response(language, verdict)
}

/// Runs the strict endpoint's pre-decode checks in order: API key,
/// language, declared format.
fn validate(
    headers: &HeaderMap,
    req: &VoiceDetectionRequest,
    api_key: &str,
) -> Result<Language, ValidationError> {
    let key_ok = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|k| k == api_key);
    if !key_ok {
        return Err(ValidationError::InvalidApiKey);
    }
    let language = req.language.parse::<Language>()?;
    validate_format(&req.audio_format)?;
    Ok(language)
}

fn success_response(language: Language, verdict: Verdict) -> Response {
    Json(VoiceDetectionResponse {
        status: "success",
        language: language.to_string(),
        classification: verdict.classification,
        confidence_score: verdict.confidence,
        explanation: verdict.explanation,
    })
    .into_response()
}

fn validation_error() -> Response {
    Json(serde_json::json!({
        "status": "error",
        "message": VALIDATION_MESSAGE,
    }))
    .into_response()
}

fn error_response(e: &DetectError) -> Response {
    let status = match e {
        DetectError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_REQUEST,
    };
    detail_response(status, &e.to_string())
}

fn detail_response(status: StatusCode, detail: &str) -> Response {
    (status, Json(serde_json::json!({"detail": detail}))).into_response()
}
