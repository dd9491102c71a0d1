use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::ChartKind;

/// Sampling resolution of a requested time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Intraday,
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// Strict lookup of a form label ("Intraday", "Daily", ...). Case-sensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Intraday" => Some(Granularity::Intraday),
            "Daily" => Some(Granularity::Daily),
            "Weekly" => Some(Granularity::Weekly),
            "Monthly" => Some(Granularity::Monthly),
            _ => None,
        }
    }

    /// Lenient lookup used on the request path: anything unrecognized is
    /// treated as daily data.
    pub fn from_label_or_daily(label: &str) -> Self {
        Self::from_label(label).unwrap_or_else(|| {
            warn!("Unrecognized time series '{}', falling back to Daily", label);
            Granularity::Daily
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Intraday => "Intraday",
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        }
    }

    /// Provider-side interval label, also shown in chart titles.
    pub fn interval_label(self) -> &'static str {
        match self {
            Granularity::Intraday => "60min",
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        }
    }
}

/// Inclusive calendar-date range used to filter a normalized series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A validated-shape chart request. Symbol membership is checked later by the
/// chart pipeline, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchRequest {
    pub symbol: String,
    pub granularity: Granularity,
    pub chart_kind: ChartKind,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl WatchRequest {
    /// The filter window, present only when both ends are set.
    pub fn window(&self) -> Option<DateWindow> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(DateWindow { start, end }),
            _ => None,
        }
    }
}

/// Raw fields as submitted by the presentation layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchRequestForm {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub time_series: String,
    pub chart_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Invalid date format: {0}")]
    InvalidDate(String),
    #[error("Start date must not be after end date")]
    InvertedRange,
}

/// Parses an optional `YYYY-MM-DD` field. Blank input means "not set".
pub fn parse_date_field(value: Option<&str>) -> Result<Option<NaiveDate>, RequestError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| RequestError::InvalidDate(raw.to_string())),
    }
}

pub fn check_date_order(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), RequestError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(RequestError::InvertedRange),
        _ => Ok(()),
    }
}

impl TryFrom<WatchRequestForm> for WatchRequest {
    type Error = RequestError;

    fn try_from(form: WatchRequestForm) -> Result<Self, Self::Error> {
        let start_date = parse_date_field(form.start_date.as_deref())?;
        let end_date = parse_date_field(form.end_date.as_deref())?;
        check_date_order(start_date, end_date)?;

        Ok(WatchRequest {
            symbol: form.symbol,
            granularity: Granularity::from_label_or_daily(&form.time_series),
            chart_kind: ChartKind::from_label(form.chart_type.as_deref()),
            start_date,
            end_date,
        })
    }
}
