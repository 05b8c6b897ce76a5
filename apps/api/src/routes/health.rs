use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and which optional integrations are configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "gradindstud-api",
        "features": {
            "ai": state.config.gemini_api_key.is_some(),
            "jobSearch": state.config.jsearch_api_key.is_some(),
        }
    }))
}
