use anyhow::{Context, Result};
use langleo::config::Config;
use langleo::db::Database;
use langleo::server::{router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("langleo=info".parse()?),
        )
        .init();

    info!("Starting LangLeo chat backend");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Open the conversation log
    let db = Database::open(&config.database_path)?;
    info!("Conversation log open at {}", config.database_path);

    // One shared client; the timeout bounds every outbound provider call
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        db,
        http,
    };

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .context(format!("Failed to bind port {}", port))?;

    info!("Listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
