//! Rejects requests for buckets outside the allow-list before any store call.

use crate::{errors::AppError, state::AppState};
use axum::{
    extract::{Path, Request, State, rejection::PathRejection},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::warn;

/// Only the bucket segment matters here; `key` and friends are ignored.
#[derive(Debug, Deserialize)]
pub struct BucketParam {
    pub bucket: String,
}

pub async fn require_public_bucket(
    State(state): State<AppState>,
    path: Result<Path<BucketParam>, PathRejection>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Path(BucketParam { bucket }) = path?;

    if !state.public_buckets.contains(&bucket) {
        warn!(%bucket, path = %request.uri().path(), "rejected request for bucket outside allow-list");
        return Err(AppError::forbidden("Bucket no permitido"));
    }

    Ok(next.run(request).await)
}
