//! Axum REST API handlers.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::export;
use crate::payload::{parse_request, CalcResponse};

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub detail: String,
}

/// Build the service router with CORS and request tracing applied.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/calculate", post(calculate_shares))
        .route("/api/export/csv", post(export_csv))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/calculate`
///
/// Runs one full calculation over the submitted payload. Business-rule
/// violations come back as banners inside a 200 response; only structural
/// payload problems are rejected outright.
pub async fn calculate_shares(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    let request = match parse_request(body) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!(ErrorResponse {
                    error: "invalid_payload",
                    detail: e.to_string(),
                })),
            )
                .into_response();
        }
    };

    match share_engine::calculate(&request.into_input()) {
        Ok(result) => {
            debug!(
                rows = result.per_participant.len(),
                errors = result.banners.errors.len(),
                "calculation completed"
            );
            (
                StatusCode::OK,
                Json(serde_json::json!(CalcResponse::from_result(&result))),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!(ErrorResponse {
                error: "invalid_request",
                detail: e.to_string(),
            })),
        )
            .into_response(),
    }
}

/// `POST /api/export/csv`
///
/// Recomputes from the same payload as `/api/calculate` and serializes the
/// result rows as a CSV download. A result carrying blocking errors must not
/// be rendered as a table, so it is rejected with the banners attached.
pub async fn export_csv(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    let request = match parse_request(body) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!(ErrorResponse {
                    error: "invalid_payload",
                    detail: e.to_string(),
                })),
            )
                .into_response();
        }
    };

    match share_engine::calculate(&request.into_input()) {
        Ok(result) if result.banners.is_blocking() => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": "calculation_blocked",
                "banners": result.banners,
            })),
        )
            .into_response(),
        Ok(result) => {
            let csv = export::to_csv(&CalcResponse::from_result(&result), Utc::now());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"investment-results.csv\"",
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!(ErrorResponse {
                error: "invalid_request",
                detail: e.to_string(),
            })),
        )
            .into_response(),
    }
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
