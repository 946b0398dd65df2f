//! GET /health — LLM profile probes.

use std::sync::Arc;

use axum::{Json, extract::State};

use ai_llm_service::health_service::HealthStatus;

use crate::core::app_state::AppState;

/// Handler: GET /health
///
/// Returns one probe result per distinct LLM profile. Always 200; failing
/// backends are reported with `ok: false`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Vec<HealthStatus>> {
    Json(state.shared.svc.health_all().await)
}
