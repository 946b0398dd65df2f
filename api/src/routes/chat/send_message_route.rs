//! POST /session/{id}/message — runs one message through the session.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::error;
use uuid::Uuid;

use crate::core::{app_state::AppState, frontend_buffer::BufferingFrontend};
use crate::routes::chat::chat_request::{MessageRequest, MessageResponse};
use chat_session::handle_message;

/// Handler: POST /session/{id}/message
///
/// Refusals and reported errors are ordinary events in the response; a
/// failed turn is logged server-side and the session stays usable.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/session/<id>/message \
///   -H 'content-type: application/json' \
///   -d '{"message":"Who is Paul Allen?"}'
/// ```
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let session = state
        .session(&id)
        .await
        .ok_or((StatusCode::NOT_FOUND, format!("unknown session {id}")))?;

    let frontend = BufferingFrontend::new();

    // One message at a time per session; other sessions are unaffected.
    let mut ctx = session.lock().await;
    if let Err(err) = handle_message(&mut ctx, &frontend, &body.message).await {
        // Already reported to the user through the frontend; log for the
        // operator and keep the session alive.
        error!(session_id = %id, error = %err, "turn failed");
    }
    drop(ctx);

    Ok(Json(MessageResponse {
        events: frontend.into_events(),
    }))
}
