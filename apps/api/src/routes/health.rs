use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns agent readiness and whether a CV is loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "cv_loaded": state.agent.document_loaded().await,
        "cv_length": state.agent.document_length().await,
        "cv_loaded_at": state.agent.document_loaded_at().await,
        "agent_ready": state.agent.is_ready()
    }))
}
