use std::error::Error;

use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file.
    // Fails if .env file not found, not readable or invalid.
    dotenvy::dotenv()?;

    // Global INFO logging, DEBUG for the LLM service layer.
    let filter = ai_llm_service::telemetry::env_filter_with_level("info", Level::DEBUG);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    println!("{}", "allen-qa-backend".bold());

    api::start().await?;

    Ok(())
}
