//! verse-forge service entry point.
//!
//! Initializes logging, loads configuration and serves the HTTP API.

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use verse_forge::config::ServiceConfig;
use verse_forge::llm::OpenAiClient;
use verse_forge::orchestrator::Orchestrator;
use verse_forge::server::{create_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "verse-forge", about = "Acrostic limerick generation service")]
struct Cli {
    /// Listen port; overrides the PORT environment variable.
    #[arg(long)]
    port: Option<u16>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing with environment filter
    // Priority: RUST_LOG env var > --log-level CLI arg > default "info"
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone());
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    let mut config = ServiceConfig::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    let client = OpenAiClient::new(
        config.api_base.clone(),
        config.api_key.clone(),
        config.model.clone(),
    );
    let orchestrator = Arc::new(Orchestrator::new(Arc::new(client), config.model.clone()));

    let app = create_router(AppState { orchestrator }, &config.static_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(model = %config.model, "Server running on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
