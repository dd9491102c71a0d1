use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// One closing price from a provider time series. Daily and coarser series
// carry midnight timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}
