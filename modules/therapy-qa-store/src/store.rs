// Postgres document store for QA records. Each record is kept whole as JSONB;
// the primary key on question_id is what makes inserts idempotent.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use therapy_qa_common::QaRecord;
use tracing::info;

use crate::error::Result;

/// What an idempotent insert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A record with the same question_id was already stored; nothing changed.
    Duplicate,
}

#[derive(Clone)]
pub struct QaStore {
    pool: PgPool,
}

impl QaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and verify the server answers within a few seconds.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        info!("Connected to Postgres document store");
        Ok(Self::new(pool))
    }

    /// Run the embedded SQL migrations (table, uniqueness, created_utc index).
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Store migrations applied");
        Ok(())
    }

    /// Whether a record with this key is already stored.
    pub async fn exists(&self, question_id: &str) -> Result<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM qa_records WHERE question_id = $1)",
        )
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }

    /// Insert unless a record with the same question_id exists. The conflict
    /// clause makes this safe against concurrent runs.
    pub async fn insert_if_absent(&self, record: &QaRecord) -> Result<InsertOutcome> {
        let document = serde_json::to_value(record)?;

        let inserted = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO qa_records (question_id, document, created_utc)
            VALUES ($1, $2, $3)
            ON CONFLICT (question_id) DO NOTHING
            RETURNING question_id
            "#,
        )
        .bind(&record.question_id)
        .bind(&document)
        .bind(record.more.created_utc)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match inserted {
            Some(_) => InsertOutcome::Inserted,
            None => InsertOutcome::Duplicate,
        })
    }

    /// Every stored document, oldest post first. Row bookkeeping columns are
    /// not part of the result.
    pub async fn all_documents(&self) -> Result<Vec<serde_json::Value>> {
        let rows = sqlx::query_scalar::<_, serde_json::Value>(
            r#"
            SELECT document FROM qa_records
            ORDER BY created_utc ASC, question_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count(&self) -> Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM qa_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
