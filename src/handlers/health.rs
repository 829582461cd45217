// src/handlers/health.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "message": "Scholar training backend is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
