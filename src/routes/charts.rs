use axum::extract::State;
use axum::response::Html;
use axum::routing::post;
use axum::{Form, Router};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{WatchRequest, WatchRequestForm};
use crate::services::chart_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_chart))
}

pub async fn create_chart(
    State(state): State<AppState>,
    Form(form): Form<WatchRequestForm>,
) -> Result<Html<String>, AppError> {
    info!("POST /charts - Chart requested for '{}'", form.symbol);
    let request = WatchRequest::try_from(form).map_err(|e| {
        warn!("Rejected chart form: {}", e);
        e
    })?;

    let artifact = chart_service::build_chart(
        &request,
        &state.symbols,
        state.price_provider.as_ref(),
        state.chart_backend.as_ref(),
        &state.api_key,
    )
    .await?;

    info!(
        "Rendered {} chart for {} with {} points",
        artifact.figure.kind.label(),
        request.symbol,
        artifact.figure.points.len()
    );
    Ok(Html(artifact.markup))
}
