//! Defines the gateway's routes.
//!
//! ## Structure
//! - `GET /health` — liveness, no bucket involved
//! - `GET /{bucket}` — list objects (supports `?prefix=`)
//! - `GET /{bucket}/{*key}` — stream an object
//!
//! The wildcard `*key` allows nested keys like `photos/2025/img.jpg`.
//! Every bucket route sits behind the allow-list gate.

use crate::{
    handlers::{
        health_handlers::health,
        object_handlers::{get_object, list_objects},
    },
    middleware::bucket_gate::require_public_bucket,
    state::AppState,
};
use axum::{Router, middleware, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the full application router with its state attached.
pub fn routes(state: AppState) -> Router {
    let buckets = Router::new()
        .route("/{bucket}/{*key}", get(get_object))
        .route("/{bucket}", get(list_objects))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_public_bucket,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(buckets)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
