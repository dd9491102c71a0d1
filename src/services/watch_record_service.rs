use chrono::NaiveDate;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::watch_request::check_date_order;
use crate::models::{CreateWatchRecord, Granularity, UpdateWatchRecord, WatchRecord};
use crate::services::symbol_validator::{self, SymbolSet};
use crate::store::WatchRecordStore;

// Width of watch_records.time_series
pub const MAX_TIME_SERIES_LEN: usize = 20;

fn check_fields(
    symbols: &SymbolSet,
    symbol: &str,
    time_series: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(), AppError> {
    symbol_validator::check_symbol(symbol, symbols).map_err(|e| {
        warn!("Rejected watch record for '{}': {}", symbol, e);
        e
    })?;
    check_date_order(start_date, end_date)?;

    if time_series.chars().count() > MAX_TIME_SERIES_LEN {
        warn!("Rejected watch record for {}: time series label too long", symbol);
        return Err(AppError::Validation(format!(
            "Time series must be at most {} characters",
            MAX_TIME_SERIES_LEN
        )));
    }

    // Stored as given; charts fall back to Daily for it
    if Granularity::from_label(time_series).is_none() {
        warn!("Watch record for {} uses unrecognized time series '{}'", symbol, time_series);
    }
    Ok(())
}

pub async fn list(store: &dyn WatchRecordStore) -> Result<Vec<WatchRecord>, AppError> {
    store.list().await.map_err(|e| {
        error!("Failed to list watch records: {}", e);
        AppError::Db(e)
    })
}

pub async fn get(store: &dyn WatchRecordStore, id: Uuid) -> Result<WatchRecord, AppError> {
    store
        .get(id)
        .await
        .map_err(|e| {
            error!("Failed to fetch watch record {}: {}", id, e);
            AppError::Db(e)
        })?
        .ok_or(AppError::NotFound)
}

pub async fn create(
    store: &dyn WatchRecordStore,
    symbols: &SymbolSet,
    data: CreateWatchRecord,
) -> Result<WatchRecord, AppError> {
    check_fields(symbols, &data.symbol, &data.time_series, data.start_date, data.end_date)?;

    let record = store.create(data).await.map_err(|e| {
        error!("Failed to create watch record: {}", e);
        AppError::Db(e)
    })?;
    info!("Created watch record {} for {}", record.id, record.symbol);
    Ok(record)
}

pub async fn update(
    store: &dyn WatchRecordStore,
    symbols: &SymbolSet,
    id: Uuid,
    data: UpdateWatchRecord,
) -> Result<WatchRecord, AppError> {
    check_fields(symbols, &data.symbol, &data.time_series, data.start_date, data.end_date)?;

    store
        .update(id, data)
        .await
        .map_err(|e| {
            error!("Failed to update watch record {}: {}", id, e);
            AppError::Db(e)
        })?
        .ok_or(AppError::NotFound)
}

pub async fn delete(store: &dyn WatchRecordStore, id: Uuid) -> Result<(), AppError> {
    let removed = store.delete(id).await.map_err(|e| {
        error!("Failed to delete watch record {}: {}", id, e);
        AppError::Db(e)
    })?;

    if removed {
        info!("Deleted watch record {}", id);
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}
