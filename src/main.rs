mod app;
mod config;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::external::alphavantage::AlphaVantageProvider;
use crate::logging::LoggingConfig;
use crate::services::chart_renderer::PlotlyBackend;
use crate::services::symbol_validator::SymbolSet;
use crate::state::AppState;
use crate::store::PgWatchRecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env()?;

    let symbols = SymbolSet::from_csv_path(&config.symbols_csv)?;
    if symbols.is_empty() {
        tracing::warn!("⚠️ No known symbols loaded from {}; every chart request will be rejected",
                       config.symbols_csv.display());
    }
    tracing::info!("📈 Loaded {} known symbols from {}", symbols.len(), config.symbols_csv.display());

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("📊 Using price provider: Alpha Vantage at {}", config.provider_base_url);
    let state = AppState {
        records: Arc::new(PgWatchRecordStore::new(pool)),
        symbols: Arc::new(symbols),
        price_provider: Arc::new(AlphaVantageProvider::new(config.provider_base_url.clone())),
        chart_backend: Arc::new(PlotlyBackend),
        api_key: Arc::from(config.api_key.as_str()),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Stockwatch backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
