use axum::response::IntoResponse;
use http::StatusCode;
use thiserror::Error;

use crate::external::price_provider::FetchError;
use crate::models::RequestError;
use crate::services::chart_service::ChartError;
use crate::services::symbol_validator::SymbolError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("{0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
    #[error(transparent)]
    Chart(ChartError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Chart(ChartError::Symbol(_)) => StatusCode::BAD_REQUEST,
            AppError::Chart(ChartError::Fetch(_)) => StatusCode::BAD_GATEWAY,
            AppError::Chart(ChartError::Processing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        match self {
            AppError::NotFound => (status, "Not found").into_response(),
            AppError::Validation(msg) => (status, msg).into_response(),
            AppError::Chart(e) => (status, e.user_message()).into_response(),
            AppError::Db(_) => (status, "Internal server error").into_response(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}

impl From<RequestError> for AppError {
    fn from(value: RequestError) -> Self {
        AppError::Validation(value.to_string())
    }
}

impl From<SymbolError> for AppError {
    fn from(value: SymbolError) -> Self {
        AppError::Validation(value.to_string())
    }
}

impl From<ChartError> for AppError {
    fn from(value: ChartError) -> Self {
        AppError::Chart(value)
    }
}

impl From<FetchError> for AppError {
    fn from(value: FetchError) -> Self {
        AppError::Chart(ChartError::Fetch(value))
    }
}
