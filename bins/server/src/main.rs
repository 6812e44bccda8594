//! Kasa API Server
//!
//! Main entry point for the cash ledger service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kasa_api::{AppState, create_router};
use kasa_db::connect_with;
use kasa_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kasa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );
    info!(
        reconciliation_mode = ?config.reconciliation.mode,
        allow_unassigned = config.ledger.allow_unassigned_movements,
        overpayment_tolerance = %config.ledger.overpayment_tolerance,
        "Ledger policy loaded"
    );

    let state = AppState::new(db, &config);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
