use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::external::price_provider::RawSeriesPayload;
use crate::models::{DateWindow, PricePoint};

pub const CLOSE_FIELD: &str = "4. close";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    #[error("record '{0}' is not an object")]
    NotAnObject(String),

    #[error("record '{0}' has no close field")]
    MissingClose(String),

    #[error("record '{key}' has non-numeric close {value}")]
    InvalidClose { key: String, value: String },

    #[error("'{0}' is not a timestamp")]
    InvalidTimestamp(String),

    #[error("records '{first}' and '{second}' share a timestamp")]
    DuplicateTimestamp { first: String, second: String },
}

// Numbered close fields such as "4. close" in the provider's other series shapes
fn close_field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\. close$").expect("close field pattern is valid"))
}

fn parse_timestamp(key: &str) -> Result<NaiveDateTime, ProcessingError> {
    NaiveDateTime::parse_from_str(key, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(key, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDate::parse_from_str(key, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|_| ProcessingError::InvalidTimestamp(key.to_string()))
}

fn close_value<'a>(record: &'a Map<String, Value>) -> Option<&'a Value> {
    record.get(CLOSE_FIELD).or_else(|| {
        record
            .iter()
            .find(|(field, _)| close_field_pattern().is_match(field))
            .map(|(_, value)| value)
    })
}

fn parse_close(key: &str, value: &Value) -> Result<f64, ProcessingError> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };

    match parsed {
        Some(close) if close.is_finite() => Ok(close),
        _ => Err(ProcessingError::InvalidClose {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Turns a provider series into closing prices sorted by ascending timestamp.
///
/// Every record must parse: a single bad timestamp or close fails the whole
/// series rather than leaving a gap. Two keys naming the same instant
/// (`2024-01-02` and `2024-01-02 00:00:00`) fail it too, so N records always
/// give N points before windowing. When `window` is given only points whose
/// calendar date falls inside it (both ends inclusive) are kept; an empty
/// result is valid.
pub fn normalize(
    payload: &RawSeriesPayload,
    window: Option<DateWindow>,
) -> Result<Vec<PricePoint>, ProcessingError> {
    let mut points = Vec::with_capacity(payload.record_count());
    let mut seen: HashMap<NaiveDateTime, &str> = HashMap::with_capacity(payload.record_count());

    for (key, record) in payload.records() {
        let timestamp = parse_timestamp(key)?;
        if let Some(first) = seen.insert(timestamp, key.as_str()) {
            return Err(ProcessingError::DuplicateTimestamp {
                first: first.to_string(),
                second: key.clone(),
            });
        }
        let record = record
            .as_object()
            .ok_or_else(|| ProcessingError::NotAnObject(key.clone()))?;
        let close = close_value(record).ok_or_else(|| ProcessingError::MissingClose(key.clone()))?;

        points.push(PricePoint {
            timestamp,
            close: parse_close(key, close)?,
        });
    }

    // Providers list newest first
    points.sort_by_key(|p| p.timestamp);

    if let Some(window) = window {
        points.retain(|p| window.contains(p.timestamp.date()));
    }

    Ok(points)
}
