//! Document store adapter: whole-record persistence keyed by (tenant, url).

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::error::DocumentStoreError;
use crate::models::{DocumentStoreConfig, WebContentRecord};

/// Key-value persistence for harvested records.
///
/// Upsert is atomic per key: the record body is written as a single JSONB
/// value, so a concurrent get never observes a partial record, and a later
/// harvest of the same key replaces the whole record.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upsert(&self, record: &WebContentRecord) -> Result<(), DocumentStoreError>;

    async fn get(
        &self,
        tenant_id: &str,
        url: &str,
    ) -> Result<Option<WebContentRecord>, DocumentStoreError>;

    async fn health_check(&self) -> Result<bool, DocumentStoreError>;
}

/// PostgreSQL-backed document store.
pub struct PgDocumentStore {
    pool: PgPool,
    table: String,
}

impl PgDocumentStore {
    pub async fn new(config: &DocumentStoreConfig) -> Result<Self, DocumentStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_max)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.url)
            .await
            .map_err(|e| DocumentStoreError::ConnectionError(e.to_string()))?;

        let store = Self {
            pool,
            table: config.table.clone(),
        };

        store.ensure_schema().await?;

        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), DocumentStoreError> {
        let create_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                tenant_id TEXT NOT NULL,
                url TEXT NOT NULL,
                record JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (tenant_id, url)
            )
            "#,
            self.table
        );

        sqlx::query(&create_table)
            .execute(&self.pool)
            .await
            .map_err(|e| DocumentStoreError::QueryError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn upsert(&self, record: &WebContentRecord) -> Result<(), DocumentStoreError> {
        let body = serde_json::to_value(record)
            .map_err(|e| DocumentStoreError::SerializeError(e.to_string()))?;

        let upsert = format!(
            r#"
            INSERT INTO {} (tenant_id, url, record, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (tenant_id, url)
            DO UPDATE SET record = EXCLUDED.record, updated_at = now()
            "#,
            self.table
        );

        sqlx::query(&upsert)
            .bind(&record.tenant_id)
            .bind(&record.url)
            .bind(&body)
            .execute(&self.pool)
            .await
            .map_err(|e| DocumentStoreError::QueryError(e.to_string()))?;

        Ok(())
    }

    async fn get(
        &self,
        tenant_id: &str,
        url: &str,
    ) -> Result<Option<WebContentRecord>, DocumentStoreError> {
        let select = format!(
            "SELECT record FROM {} WHERE tenant_id = $1 AND url = $2",
            self.table
        );

        let row = sqlx::query(&select)
            .bind(tenant_id)
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DocumentStoreError::QueryError(e.to_string()))?;

        match row {
            None => Ok(None),
            Some(row) => {
                let value: serde_json::Value = row
                    .try_get("record")
                    .map_err(|e| DocumentStoreError::QueryError(e.to_string()))?;
                serde_json::from_value(value)
                    .map(Some)
                    .map_err(|e| DocumentStoreError::DeserializeError(e.to_string()))
            }
        }
    }

    async fn health_check(&self) -> Result<bool, DocumentStoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| true)
            .map_err(|e| DocumentStoreError::ConnectionError(e.to_string()))
    }
}
