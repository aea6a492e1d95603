//! Health handler.
//!
//! - GET /health -> liveness ("ok"), never touches the object store

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

/// `GET /health`
///
/// Always returns 200 OK, even when the object store is unreachable.
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}
