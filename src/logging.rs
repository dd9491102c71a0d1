use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("LOKI_ENABLED is true but LOKI_URL is not set")]
    MissingLokiUrl,

    #[error("invalid LOKI_URL: {0}")]
    InvalidLokiUrl(#[from] url::ParseError),

    #[cfg(feature = "loki")]
    #[error("loki layer: {0}")]
    Loki(#[from] tracing_loki::Error),

    #[error("subscriber already installed: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Where log lines go. Console output is always on; Loki shipping is opt-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub loki_url: Option<String>,
    pub loki_enabled: bool,
    pub service_name: String,
    pub environment: String,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            loki_url: None,
            loki_enabled: false,
            service_name: "stockwatch".to_string(),
            environment: "development".to_string(),
            filter: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            loki_url: lookup("LOKI_URL").filter(|v| !v.trim().is_empty()),
            loki_enabled: lookup("LOKI_ENABLED")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.loki_enabled),
            service_name: lookup("SERVICE_NAME").unwrap_or(defaults.service_name),
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            filter: lookup("RUST_LOG").unwrap_or(defaults.filter),
        }
    }

    /// The Loki endpoint to ship to, if shipping is switched on.
    pub fn loki_endpoint(&self) -> Result<Option<url::Url>, LoggingError> {
        if !self.loki_enabled {
            return Ok(None);
        }
        let raw = self.loki_url.as_deref().ok_or(LoggingError::MissingLokiUrl)?;
        Ok(Some(url::Url::parse(raw)?))
    }
}

/// Installs the global subscriber. Must run inside the tokio runtime when
/// Loki shipping is enabled.
pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let endpoint = config.loki_endpoint()?;

    #[cfg(feature = "loki")]
    {
        if let Some(endpoint) = endpoint {
            return init_with_loki(&config, endpoint);
        }
    }

    #[cfg(not(feature = "loki"))]
    {
        if endpoint.is_some() {
            eprintln!("LOKI_ENABLED is set but this build has no loki feature; logging to console only");
        }
    }

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!("📊 Console logging initialized for {} ({})", config.service_name, config.environment);
    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: &LoggingConfig, endpoint: url::Url) -> Result<(), LoggingError> {
    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(endpoint.clone())?;

    // Ships batches to Loki in the background
    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()?;

    tracing::info!("✅ Loki logging initialized at {}", endpoint);
    Ok(())
}
