use crate::external::price_provider::{ExternalQuery, FetchError, RawSeriesPayload, SeriesProvider};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn request_url(&self, query: &ExternalQuery) -> Result<Url, FetchError> {
        Url::parse_with_params(&self.base_url, query.query_pairs())
            .map_err(|e| FetchError::TransportFailure(format!("invalid provider url: {}", e)))
    }
}

#[async_trait]
impl SeriesProvider for AlphaVantageProvider {
    async fn fetch(&self, query: &ExternalQuery) -> Result<RawSeriesPayload, FetchError> {
        let url = self.request_url(query)?;
        debug!("Requesting {} for {}", query.function_name, query.symbol);

        // Single attempt with the client's default timeout
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::TransportFailure(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Alpha Vantage answered {} for {}", status, query.symbol);
            return Err(FetchError::TransportFailure(format!("status {}", status)));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FetchError::TransportFailure(e.without_url().to_string()))?;

        // Non-JSON 2xx bodies count as malformed answers
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| FetchError::FormatError(format!("response body is not JSON: {}", e)))?;

        RawSeriesPayload::from_json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    fn daily_query() -> ExternalQuery {
        ExternalQuery {
            function_name: "TIME_SERIES_DAILY".to_string(),
            symbol: "IBM".to_string(),
            interval_param: None,
            api_key: "demo".to_string(),
        }
    }

    // Serves `router` on an ephemeral port and returns its /query URL.
    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/query", addr)
    }

    #[test]
    fn test_request_url_for_intraday_and_daily() {
        let provider = AlphaVantageProvider::new(DEFAULT_BASE_URL);

        let url = provider.request_url(&daily_query()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.alphavantage.co/query?function=TIME_SERIES_DAILY&symbol=IBM&apikey=demo"
        );

        let intraday = ExternalQuery {
            function_name: "TIME_SERIES_INTRADAY".to_string(),
            interval_param: Some("60min".to_string()),
            ..daily_query()
        };
        let url = provider.request_url(&intraday).unwrap();
        assert_eq!(
            url.query(),
            Some("function=TIME_SERIES_INTRADAY&symbol=IBM&interval=60min&apikey=demo")
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_series_payload() {
        let router = Router::new().route(
            "/query",
            get(|| async {
                Json(json!({
                    "Meta Data": {},
                    "Time Series (Daily)": { "2024-01-02": { "4. close": "158.40" } }
                }))
            }),
        );
        let provider = AlphaVantageProvider::new(serve(router).await);

        let payload = provider.fetch(&daily_query()).await.unwrap();
        assert_eq!(payload.series_key(), "Time Series (Daily)");
        assert_eq!(payload.record_count(), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_transport_failure() {
        let router = Router::new().route(
            "/query",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let provider = AlphaVantageProvider::new(serve(router).await);

        let err = provider.fetch(&daily_query()).await.unwrap_err();
        assert!(matches!(err, FetchError::TransportFailure(_)));
    }

    #[tokio::test]
    async fn test_missing_series_key_is_format_error() {
        let router = Router::new().route(
            "/query",
            get(|| async { Json(json!({ "Information": "API rate limit reached" })) }),
        );
        let provider = AlphaVantageProvider::new(serve(router).await);

        let err = provider.fetch(&daily_query()).await.unwrap_err();
        assert!(matches!(err, FetchError::FormatError(_)));
    }

    #[tokio::test]
    async fn test_html_page_is_format_error() {
        let router = Router::new().route(
            "/query",
            get(|| async { "<html>Service page</html>" }),
        );
        let provider = AlphaVantageProvider::new(serve(router).await);

        let err = provider.fetch(&daily_query()).await.unwrap_err();
        assert!(matches!(err, FetchError::FormatError(_)));
    }

    #[tokio::test]
    async fn test_empty_body_is_format_error() {
        let router = Router::new().route("/query", get(|| async { "" }));
        let provider = AlphaVantageProvider::new(serve(router).await);

        let err = provider.fetch(&daily_query()).await.unwrap_err();
        assert!(matches!(err, FetchError::FormatError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure_without_key() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = AlphaVantageProvider::new(format!("http://{}/query", addr));
        let query = ExternalQuery {
            api_key: "SECRETKEY123".to_string(),
            ..daily_query()
        };

        let err = provider.fetch(&query).await.unwrap_err();
        assert!(matches!(err, FetchError::TransportFailure(_)));
        assert!(!err.to_string().contains("SECRETKEY123"));
        assert!(!err.to_string().contains("apikey"));
    }
}
