use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

pub const INTRADAY_FUNCTION: &str = "TIME_SERIES_INTRADAY";

/// Substring that identifies the time-series object in a provider body,
/// e.g. "Time Series (Daily)" or "Weekly Time Series".
pub const TIME_SERIES_MARKER: &str = "Time Series";

// Fields providers use to explain an empty answer (throttling, bad symbol).
const DIAGNOSTIC_FIELDS: [&str; 3] = ["Note", "Information", "Error Message"];

/// A single provider request, derived from a chart request by the query mapper.
#[derive(Clone, PartialEq, Eq)]
pub struct ExternalQuery {
    pub function_name: String,
    pub symbol: String,
    pub interval_param: Option<String>,
    pub api_key: String,
}

impl ExternalQuery {
    pub fn is_intraday(&self) -> bool {
        self.function_name == INTRADAY_FUNCTION
    }

    /// Query-string pairs in request order. `interval` is only sent for the
    /// intraday function, whatever `interval_param` holds.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            ("function", self.function_name.as_str()),
            ("symbol", self.symbol.as_str()),
        ];
        if self.is_intraday() {
            if let Some(interval) = self.interval_param.as_deref() {
                pairs.push(("interval", interval));
            }
        }
        pairs.push(("apikey", self.api_key.as_str()));
        pairs
    }
}

// Keeps the key out of log lines.
impl fmt::Debug for ExternalQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalQuery")
            .field("function_name", &self.function_name)
            .field("symbol", &self.symbol)
            .field("interval_param", &self.interval_param)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error("unexpected payload format: {0}")]
    FormatError(String),
}

/// Provider body reduced to its single time-series object.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeriesPayload {
    series_key: String,
    records: Map<String, Value>,
}

impl RawSeriesPayload {
    /// Locates the one key containing "Time Series". A missing key covers both
    /// malformed bodies and throttling notices; the two are not told apart.
    pub fn from_json(body: Value) -> Result<Self, FetchError> {
        let Value::Object(mut body) = body else {
            return Err(FetchError::FormatError("response body is not a JSON object".into()));
        };

        let mut keys = body
            .keys()
            .filter(|k| k.contains(TIME_SERIES_MARKER))
            .cloned();

        let series_key = match (keys.next(), keys.next()) {
            (Some(key), None) => key,
            (None, _) => {
                for field in DIAGNOSTIC_FIELDS {
                    if let Some(msg) = body.get(field).and_then(Value::as_str) {
                        warn!("Provider returned '{}': {}", field, msg);
                    }
                }
                return Err(FetchError::FormatError("no time series key in response".into()));
            }
            (Some(first), Some(second)) => {
                return Err(FetchError::FormatError(format!(
                    "ambiguous time series keys '{}' and '{}'",
                    first, second
                )));
            }
        };

        match body.remove(&series_key) {
            Some(Value::Object(records)) => Ok(Self { series_key, records }),
            _ => Err(FetchError::FormatError(format!(
                "'{}' is not an object",
                series_key
            ))),
        }
    }

    pub fn series_key(&self) -> &str {
        &self.series_key
    }

    pub fn records(&self) -> &Map<String, Value> {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
pub trait SeriesProvider: Send + Sync {
    async fn fetch(&self, query: &ExternalQuery) -> Result<RawSeriesPayload, FetchError>;
}
