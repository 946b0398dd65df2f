//! POST /session — starts a new chat session.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tracing::{error, info};

use crate::core::{app_state::AppState, frontend_buffer::BufferingFrontend};
use crate::routes::chat::chat_request::StartSessionResponse;
use chat_session::start_session as bootstrap_session;

/// Handler: POST /session
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/session
/// ```
pub async fn start_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StartSessionResponse>, (StatusCode, String)> {
    let frontend = BufferingFrontend::new();

    let ctx = bootstrap_session(&state.shared, &frontend)
        .await
        .map_err(|e| {
            error!(error = %e, "session setup failed");
            (StatusCode::BAD_GATEWAY, e.to_string())
        })?;

    let session_id = state.insert_session(ctx).await;
    info!(%session_id, "session started");

    Ok(Json(StartSessionResponse {
        session_id,
        events: frontend.into_events(),
    }))
}
