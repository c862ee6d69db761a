//! Health check endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub active_sessions: usize,
    pub summaries_enabled: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "smartscan-server".to_string(),
        active_sessions: state.sessions().len(),
        summaries_enabled: state.summarizer().is_configured(),
    })
}
