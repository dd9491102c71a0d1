use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ChartKind, CreateWatchRecord, UpdateWatchRecord, WatchRecord};
use crate::services::{chart_service, watch_record_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/:id", get(get_record).put(update_record).delete(delete_record))
        .route("/:id/chart", get(record_chart))
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    chart_type: Option<String>,
}

pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<WatchRecord>>, AppError> {
    info!("GET /watch-records - Listing watch records");
    let records = watch_record_service::list(state.records.as_ref()).await?;
    Ok(Json(records))
}

pub async fn create_record(
    State(state): State<AppState>,
    Json(data): Json<CreateWatchRecord>,
) -> Result<(StatusCode, Json<WatchRecord>), AppError> {
    info!("POST /watch-records - Creating watch record for {}", data.symbol);
    let record =
        watch_record_service::create(state.records.as_ref(), &state.symbols, data).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WatchRecord>, AppError> {
    info!("GET /watch-records/{} - Fetching watch record", id);
    let record = watch_record_service::get(state.records.as_ref(), id).await?;
    Ok(Json(record))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateWatchRecord>,
) -> Result<Json<WatchRecord>, AppError> {
    info!("PUT /watch-records/{} - Updating watch record", id);
    let record =
        watch_record_service::update(state.records.as_ref(), &state.symbols, id, data).await?;
    Ok(Json(record))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /watch-records/{} - Deleting watch record", id);
    watch_record_service::delete(state.records.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn record_chart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ChartParams>,
) -> Result<Html<String>, AppError> {
    info!("GET /watch-records/{}/chart - Rendering chart", id);
    let record = watch_record_service::get(state.records.as_ref(), id).await?;

    let artifact = chart_service::chart_for_record(
        &record,
        ChartKind::from_label(params.chart_type.as_deref()),
        &state.symbols,
        state.price_provider.as_ref(),
        state.chart_backend.as_ref(),
        &state.api_key,
    )
    .await?;

    Ok(Html(artifact.markup))
}
