use anyhow::{Context, Result};
use cash_offer_backend::api::{router, AppState};
use cash_offer_backend::config::Config;
use cash_offer_backend::logging::init_logging;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env()?;
    init_logging(&config.log_level)?;

    info!("Starting cash offer API server");

    // Create database connection pool
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    info!("Database connected successfully");

    let state = AppState {
        db: pool,
        cash_offer_percent: config.cash_offer_percent,
        comp_cache_ttl_days: config.comp_cache_ttl_days,
        max_comps: config.max_comps,
    };

    let app = router(state);

    info!("Server running on http://{}", config.server_addr);

    let listener = tokio::net::TcpListener::bind(config.server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
