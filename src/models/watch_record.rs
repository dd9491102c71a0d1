use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{ChartKind, Granularity, WatchRequest};

// A persisted stock watch: the query parameters only, never fetched prices.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WatchRecord {
    pub id: Uuid,
    pub symbol: String,
    pub time_series: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWatchRecord {
    pub symbol: String,
    pub time_series: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// Updates replace every field, like the edit form they come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWatchRecord {
    pub symbol: String,
    pub time_series: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl WatchRecord {
    pub fn to_request(&self, chart_kind: ChartKind) -> WatchRequest {
        WatchRequest {
            symbol: self.symbol.clone(),
            granularity: Granularity::from_label_or_daily(&self.time_series),
            chart_kind,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
