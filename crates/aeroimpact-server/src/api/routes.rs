//! REST API routes.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{flights, request_id};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/flights", get(flights::list_rendered))
        .route("/v1/flights/refresh", post(flights::refresh_flights))
        .route("/v1/flights/select", post(flights::select_flight))
        .layer(middleware::from_fn(request_id::ensure_request_id))
}
