//! Durable document storage.
//!
//! The store holds three record kinds per document id: the metadata
//! record, the raw uploaded file, and the processing results. The
//! [`DocumentStore`] trait is the capability the rest of the system
//! consumes; [`SqliteStore`] is the production implementation, keeping
//! all three record kinds as columns of one row per document.

use async_trait::async_trait;
use chrono::Utc;
use shared_types::{DocumentMetadata, ProcessingResults};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Key-value persistence for documents, keyed by document id.
///
/// `get_*` returning `Ok(None)` means not-found, which callers must
/// keep distinct from an empty-but-present record. `delete` reports
/// whether anything was actually removed.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put_metadata(&self, id: &str, metadata: &DocumentMetadata) -> Result<()>;
    async fn get_metadata(&self, id: &str) -> Result<Option<DocumentMetadata>>;
    async fn put_file(&self, id: &str, bytes: &[u8], filename: &str) -> Result<()>;
    async fn get_file(&self, id: &str) -> Result<Option<(Vec<u8>, String)>>;
    async fn put_results(&self, id: &str, results: &ProcessingResults) -> Result<()>;
    async fn get_results(&self, id: &str) -> Result<Option<ProcessingResults>>;
    /// Ids of the most recently created documents, newest first.
    async fn list_ids(&self, limit: u32) -> Result<Vec<String>>;
    async fn delete(&self, id: &str) -> Result<bool>;
    /// Cheap connectivity probe for health checks.
    async fn healthcheck(&self) -> Result<()>;
}

/// SQLite-backed store. Metadata and results are stored as JSON text
/// columns, the raw file as a blob, all on one row per document so a
/// delete is a single statement.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect and run migrations.
    pub async fn connect(url: &str) -> Result<Self> {
        tracing::info!(url, "connecting to document store");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// A private in-memory store, used by tests. Single connection:
    /// every SQLite `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("running document store migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                metadata_json TEXT,
                file_data BLOB,
                file_name TEXT,
                results_json TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents(created_at)
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn put_metadata(&self, id: &str, metadata: &DocumentMetadata) -> Result<()> {
        let json = serde_json::to_string(metadata)?;
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO documents (id, metadata_json, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                metadata_json = excluded.metadata_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(&json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        tracing::debug!(document_id = id, "stored metadata");
        Ok(())
    }

    async fn get_metadata(&self, id: &str) -> Result<Option<DocumentMetadata>> {
        let row = sqlx::query("SELECT metadata_json FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row.and_then(|r| r.get::<Option<String>, _>("metadata_json")) {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put_file(&self, id: &str, bytes: &[u8], filename: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO documents (id, file_data, file_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                file_data = excluded.file_data,
                file_name = excluded.file_name,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(bytes)
        .bind(filename)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        tracing::debug!(document_id = id, size = bytes.len(), "stored original file");
        Ok(())
    }

    async fn get_file(&self, id: &str) -> Result<Option<(Vec<u8>, String)>> {
        let row = sqlx::query("SELECT file_data, file_name FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else { return Ok(None) };
        let data: Option<Vec<u8>> = row.get("file_data");
        let name: Option<String> = row.get("file_name");
        Ok(data.zip(name))
    }

    async fn put_results(&self, id: &str, results: &ProcessingResults) -> Result<()> {
        let json = serde_json::to_string(results)?;
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO documents (id, results_json, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                results_json = excluded.results_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(&json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        tracing::debug!(document_id = id, "stored processing results");
        Ok(())
    }

    async fn get_results(&self, id: &str) -> Result<Option<ProcessingResults>> {
        let row = sqlx::query("SELECT results_json FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row.and_then(|r| r.get::<Option<String>, _>("results_json")) {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn list_ids(&self, limit: u32) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT id FROM documents ORDER BY created_at DESC, id LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|r| r.get("id")).collect())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        tracing::info!(document_id = id, deleted, "delete requested");
        Ok(deleted)
    }

    async fn healthcheck(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
