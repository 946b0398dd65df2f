//! HTTP surface for the chat assistant.
//!
//! Routes:
//! - `POST /session`              — start a chat session
//! - `POST /session/{id}/message` — send one message to a session
//! - `GET  /health`               — LLM profile health probes

use std::{env, error::Error, sync::Arc};

mod core;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use colored::Colorize;
use tokio::signal;

use crate::core::app_state::AppState;
use crate::routes::{
    chat::{send_message_route::send_message, start_session_route::start_session},
    health_route::health,
};
use chat_session::SharedServices;

pub use crate::core::frontend_buffer::{BufferingFrontend, FrontendEvent};

pub async fn start() -> Result<(), Box<dyn Error>> {
    let shared = SharedServices::from_env().await?;
    let state = Arc::new(AppState::new(shared));

    let app = Router::new()
        .route("/session", post(start_session))
        .route("/session/{id}/message", post(send_message))
        .route("/health", get(health))
        .with_state(state);

    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&host_url).await?;
    println!("{}", format!("listening on http://{host_url}").green());

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    // Wait for the Ctrl+C signal
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
