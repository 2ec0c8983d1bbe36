pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::agent::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/upload",
            post(handlers::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/ask", post(handlers::handle_ask))
        .route("/graph-info", get(handlers::handle_graph_info))
        .route("/graph-mermaid", get(handlers::handle_graph_mermaid))
        .route("/examples", get(handlers::handle_examples))
        .with_state(state)
}
