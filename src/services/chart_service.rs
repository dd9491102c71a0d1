use thiserror::Error;
use tracing::{error, info, warn};

use crate::external::price_provider::{FetchError, SeriesProvider};
use crate::models::{ChartArtifact, ChartKind, WatchRecord, WatchRequest};
use crate::services::chart_renderer::{self, ChartBackend};
use crate::services::query_mapper;
use crate::services::series_normalizer::{self, ProcessingError};
use crate::services::symbol_validator::{self, SymbolError, SymbolSet};

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl ChartError {
    /// The fixed message shown to the user for each failure class.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChartError::Symbol(SymbolError::Missing) => "Symbol is required",
            ChartError::Symbol(SymbolError::Unknown(_)) => "Invalid stock symbol",
            ChartError::Fetch(FetchError::TransportFailure(_)) => "API request failed",
            ChartError::Fetch(FetchError::FormatError(_)) => {
                "API data format error or limit exceeded"
            }
            ChartError::Processing(_) => "Error processing stock data",
        }
    }
}

/// Validate → map → fetch → normalize → render. Stops at the first failure;
/// nothing is fetched for a symbol outside `symbols`.
pub async fn build_chart(
    request: &WatchRequest,
    symbols: &SymbolSet,
    provider: &dyn SeriesProvider,
    backend: &dyn ChartBackend,
    api_key: &str,
) -> Result<ChartArtifact, ChartError> {
    symbol_validator::check_symbol(&request.symbol, symbols).map_err(|e| {
        warn!("Rejected chart request for '{}': {}", request.symbol, e);
        e
    })?;

    let query = query_mapper::map_to_external_query(&request.symbol, request.granularity, api_key);

    let payload = provider.fetch(&query).await.map_err(|e| {
        error!("Fetching {:?} failed: {}", query, e);
        e
    })?;
    info!(
        "Fetched '{}' with {} records for {} ({})",
        payload.series_key(),
        payload.record_count(),
        request.symbol,
        request.granularity.label()
    );

    let series = series_normalizer::normalize(&payload, request.window()).map_err(|e| {
        error!("Error processing stock data for {}: {}", request.symbol, e);
        e
    })?;

    Ok(chart_renderer::render(
        series,
        request.chart_kind,
        &request.symbol,
        request.granularity,
        backend,
    ))
}

/// Charts a stored watch record. Its saved time series label falls back to
/// Daily when unrecognized.
pub async fn chart_for_record(
    record: &WatchRecord,
    chart_kind: ChartKind,
    symbols: &SymbolSet,
    provider: &dyn SeriesProvider,
    backend: &dyn ChartBackend,
    api_key: &str,
) -> Result<ChartArtifact, ChartError> {
    let request = record.to_request(chart_kind);
    build_chart(&request, symbols, provider, backend, api_key)
        .await
        .map_err(|e| {
            error!("Chart for watch record {} failed: {}", record.id, e);
            e
        })
}
