use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{CreateWatchRecord, UpdateWatchRecord, WatchRecord};

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<WatchRecord>, sqlx::Error> {
    sqlx::query_as::<_, WatchRecord>(
        r#"
        SELECT id, symbol, time_series, start_date, end_date, created_at, updated_at
        FROM watch_records
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<WatchRecord>, sqlx::Error> {
    sqlx::query_as::<_, WatchRecord>(
        r#"
        SELECT id, symbol, time_series, start_date, end_date, created_at, updated_at
        FROM watch_records
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert(pool: &PgPool, data: &CreateWatchRecord) -> Result<WatchRecord, sqlx::Error> {
    sqlx::query_as::<_, WatchRecord>(
        r#"
        INSERT INTO watch_records (id, symbol, time_series, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, symbol, time_series, start_date, end_date, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&data.symbol)
    .bind(&data.time_series)
    .bind(data.start_date)
    .bind(data.end_date)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    data: &UpdateWatchRecord,
) -> Result<Option<WatchRecord>, sqlx::Error> {
    sqlx::query_as::<_, WatchRecord>(
        r#"
        UPDATE watch_records
        SET symbol = $2, time_series = $3, start_date = $4, end_date = $5, updated_at = NOW()
        WHERE id = $1
        RETURNING id, symbol, time_series, start_date, end_date, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&data.symbol)
    .bind(&data.time_series)
    .bind(data.start_date)
    .bind(data.end_date)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM watch_records WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
