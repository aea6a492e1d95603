//! HTTP handlers for object fetch and bucket listing.
//! Streams object bodies to avoid buffering in memory and delegates store
//! concerns to `ObjectService`. Both run behind the bucket gate.

use crate::{
    errors::AppError,
    models::object::{ObjectEntry, ObjectStat},
    services::{object_service::FetchedObject, store::StoreError},
    state::AppState,
};
use axum::{
    Json,
    body::Body,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Object content for a key never changes; a new key is used to invalidate.
pub const CACHE_CONTROL: &str = "public, max-age=31536000";

/// Query params accepted by the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListObjectsQuery {
    pub prefix: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListObjectsResponse {
    pub bucket: String,
    pub prefix: String,
    pub objects: Vec<ObjectEntry>,
}

/// Download an object `/{bucket}/{*key}` as a streaming response.
pub async fn get_object(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Response, AppError> {
    let Path((bucket, key)) = path?;
    let FetchedObject { stat, body } = state
        .objects
        .fetch_object(&bucket, &key)
        .await
        .map_err(|err| {
            error!(%bucket, %key, error = %err, "error getting object");
            match err {
                StoreError::NotFound { .. } => AppError::not_found("Archivo no encontrado"),
                StoreError::Transfer(_) => AppError::internal("Error al transmitir el archivo"),
                StoreError::Internal(_) => AppError::internal("Error al obtener el archivo"),
            }
        })?;

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = StatusCode::OK;
    set_object_headers(response.headers_mut(), &stat);

    Ok(response)
}

/// GET `/{bucket}` — list every object, optionally under `?prefix=`.
pub async fn list_objects(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ListObjectsQuery>, QueryRejection>,
) -> Result<Json<ListObjectsResponse>, AppError> {
    let Path(bucket) = path?;
    let Query(q) = query?;
    let prefix = q.prefix.unwrap_or_default();

    let objects = state
        .objects
        .list_objects(&bucket, &prefix)
        .await
        .map_err(|err| {
            error!(%bucket, %prefix, error = %err, "error listing objects");
            AppError::internal("Error al listar objetos")
        })?;

    Ok(Json(ListObjectsResponse {
        bucket,
        prefix,
        objects,
    }))
}

fn set_object_headers(headers: &mut HeaderMap, stat: &ObjectStat) {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(stat.content_type_or_default())
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );

    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(stat.size));

    if let Some(etag) = stat.etag.as_ref() {
        let quoted = format!("\"{}\"", etag);
        if let Ok(value) = HeaderValue::from_str(&quoted) {
            headers.insert(header::ETAG, value);
        }
    }

    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));

    if let Some(modified) = stat.last_modified {
        let http_date = modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        if let Ok(value) = HeaderValue::from_str(&http_date) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }
}
