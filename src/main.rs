use std::net::SocketAddr;

use anyhow::Context;
use portfolio_tracker::{config::Config, create_app, db, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before reading configuration
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let db_conn = db::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let bind_addr = config.bind_addr;
    let docs_enabled = config.enable_docs;
    let app = create_app(AppState::new(db_conn, config));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Server running on http://{}", bind_addr);
    if docs_enabled {
        tracing::info!("API docs at http://{}/docs", bind_addr);
    }

    // Peer addresses feed the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;
    Ok(())
}
