use std::path::PathBuf;

use thiserror::Error;

use crate::external::alphavantage::DEFAULT_BASE_URL;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub api_key: String,
    pub provider_base_url: String,
    pub symbols_csv: PathBuf,
    pub bind_addr: String,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                value: raw,
            })?,
            None => 10,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            api_key: required("ALPHAVANTAGE_API_KEY")?,
            provider_base_url: lookup("ALPHAVANTAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            symbols_csv: lookup("SYMBOLS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("stocks.csv")),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/stockwatch"),
            ("ALPHAVANTAGE_API_KEY", "demo"),
        ]))
        .unwrap();

        assert_eq!(config.provider_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.symbols_csv, PathBuf::from("stocks.csv"));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 10);
    }

    #[test]
    fn test_missing_api_key() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/stockwatch"),
            ("ALPHAVANTAGE_API_KEY", "  "),
        ]))
        .unwrap_err();

        assert_eq!(err, ConfigError::Missing("ALPHAVANTAGE_API_KEY"));
    }

    #[test]
    fn test_invalid_pool_size() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/stockwatch"),
            ("ALPHAVANTAGE_API_KEY", "demo"),
            ("DB_MAX_CONNECTIONS", "lots"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { name: "DB_MAX_CONNECTIONS", .. }));
    }
}
