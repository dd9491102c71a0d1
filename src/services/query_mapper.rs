use crate::external::price_provider::{ExternalQuery, INTRADAY_FUNCTION};
use crate::models::Granularity;

/// Translates a chart request into the provider's request shape. Total: every
/// granularity has a mapping.
pub fn map_to_external_query(symbol: &str, granularity: Granularity, api_key: &str) -> ExternalQuery {
    let (function_name, interval_param) = match granularity {
        Granularity::Intraday => (
            INTRADAY_FUNCTION.to_string(),
            Some(Granularity::Intraday.interval_label().to_string()),
        ),
        other => (
            format!("TIME_SERIES_{}", other.interval_label().to_uppercase()),
            None,
        ),
    };

    ExternalQuery {
        function_name,
        symbol: symbol.to_string(),
        interval_param,
        api_key: api_key.to_string(),
    }
}
