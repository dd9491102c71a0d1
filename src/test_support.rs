//! Stand-ins for the provider and record store used across unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::external::price_provider::{ExternalQuery, FetchError, RawSeriesPayload, SeriesProvider};
use crate::models::{CreateWatchRecord, UpdateWatchRecord, WatchRecord};
use crate::store::WatchRecordStore;

/// Three daily closes in the provider's newest-first order.
pub fn daily_payload() -> Value {
    json!({
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "IBM"
        },
        "Time Series (Daily)": {
            "2024-01-04": { "1. open": "160.50", "4. close": "161.10", "5. volume": "4000000" },
            "2024-01-03": { "1. open": "158.40", "4. close": "160.00", "5. volume": "3500000" },
            "2024-01-02": { "1. open": "157.00", "4. close": "158.40", "5. volume": "3000000" }
        }
    })
}

/// Provider stub that replays one canned outcome and counts calls.
pub struct StubProvider {
    outcome: Result<Value, FetchError>,
    calls: AtomicUsize,
    last_query: Mutex<Option<ExternalQuery>>,
}

impl StubProvider {
    pub fn returning(body: Value) -> Self {
        Self::with_outcome(Ok(body))
    }

    pub fn failing(error: FetchError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<Value, FetchError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<ExternalQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl SeriesProvider for StubProvider {
    async fn fetch(&self, query: &ExternalQuery) -> Result<RawSeriesPayload, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        RawSeriesPayload::from_json(self.outcome.clone()?)
    }
}

#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<WatchRecord>>,
}

#[async_trait]
impl WatchRecordStore for MemoryRecordStore {
    async fn list(&self) -> Result<Vec<WatchRecord>, sqlx::Error> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<WatchRecord>, sqlx::Error> {
        Ok(self.records.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, data: CreateWatchRecord) -> Result<WatchRecord, sqlx::Error> {
        let now = Utc::now();
        let record = WatchRecord {
            id: Uuid::new_v4(),
            symbol: data.symbol,
            time_series: data.time_series,
            start_date: data.start_date,
            end_date: data.end_date,
            created_at: now,
            updated_at: now,
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        data: UpdateWatchRecord,
    ) -> Result<Option<WatchRecord>, sqlx::Error> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.symbol = data.symbol;
        record.time_series = data.time_series;
        record.start_date = data.start_date;
        record.end_date = data.end_date;
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }
}
