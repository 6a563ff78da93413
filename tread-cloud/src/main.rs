//! tread-cloud: admin analytics API for the Tread tyre storefront
//!
//! Long-running service that:
//! - Reads orders, items, products and customers from the storefront database
//! - Computes sales, customer, forecast and inventory reports on request
//! - Serves them as JSON to the admin dashboard (admin JWT authenticated)

mod api;
mod auth;
mod config;
mod db;
mod error;
mod logger;
mod services;
mod state;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    logger::init_logger(config.log_json, config.log_dir.as_deref())?;

    tracing::info!(
        environment = %config.environment,
        timezone = %config.store_timezone,
        "Starting tread-cloud"
    );

    let state = AppState::new(&config).await?;
    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("tread-cloud HTTP listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("tread-cloud stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
