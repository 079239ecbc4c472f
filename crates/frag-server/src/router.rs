use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all frag endpoints.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.limits.max_body_bytes;
    Router::new()
        .route("/write", post(handler::write_handler))
        .route("/read/:doc_id", get(handler::read_handler))
        .route("/raw/:doc_id", get(handler::raw_handler))
        .route("/stat/:doc_id", get(handler::stat_handler))
        .route("/health", get(handler::health_handler))
        .route("/ready", get(handler::ready_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
