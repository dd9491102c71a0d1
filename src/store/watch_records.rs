use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::watch_record_queries;
use crate::models::{CreateWatchRecord, UpdateWatchRecord, WatchRecord};

/// Durable CRUD for watch records. Each call commits on its own.
#[async_trait]
pub trait WatchRecordStore: Send + Sync {
    async fn list(&self) -> Result<Vec<WatchRecord>, sqlx::Error>;

    async fn get(&self, id: Uuid) -> Result<Option<WatchRecord>, sqlx::Error>;

    async fn create(&self, data: CreateWatchRecord) -> Result<WatchRecord, sqlx::Error>;

    /// `None` when no record has this id.
    async fn update(
        &self,
        id: Uuid,
        data: UpdateWatchRecord,
    ) -> Result<Option<WatchRecord>, sqlx::Error>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}

pub struct PgWatchRecordStore {
    pool: PgPool,
}

impl PgWatchRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WatchRecordStore for PgWatchRecordStore {
    async fn list(&self) -> Result<Vec<WatchRecord>, sqlx::Error> {
        watch_record_queries::fetch_all(&self.pool).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<WatchRecord>, sqlx::Error> {
        watch_record_queries::fetch_one(&self.pool, id).await
    }

    async fn create(&self, data: CreateWatchRecord) -> Result<WatchRecord, sqlx::Error> {
        watch_record_queries::insert(&self.pool, &data).await
    }

    async fn update(
        &self,
        id: Uuid,
        data: UpdateWatchRecord,
    ) -> Result<Option<WatchRecord>, sqlx::Error> {
        watch_record_queries::update(&self.pool, id, &data).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(watch_record_queries::delete(&self.pool, id).await? > 0)
    }
}
