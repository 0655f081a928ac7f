use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Reports which external services have credentials. Nothing is called, so a
/// configured service may still be unreachable.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();

    services.insert("search".to_string(), key_status(state.pipeline.has_search()));
    services.insert("llm".to_string(), key_status(state.pipeline.has_llm()));

    let reddit = if state.config.secrets.reddit.is_some() { "oauth" } else { "anonymous" };
    services.insert("reddit".to_string(), reddit.to_string());

    let status = if state.pipeline.has_search() && state.pipeline.has_llm() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}

fn key_status(present: bool) -> String {
    let status = if present { "configured" } else { "missing_key" };
    status.to_string()
}
