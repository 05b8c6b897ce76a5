use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Idempotent schema for the cloud document store. One statement per entry.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS job_applications (
        id           UUID PRIMARY KEY,
        owner_id     TEXT NOT NULL,
        job_title    TEXT NOT NULL DEFAULT '',
        company      TEXT NOT NULL DEFAULT '',
        location     TEXT NOT NULL DEFAULT '',
        salary       TEXT NOT NULL DEFAULT '',
        job_url      TEXT NOT NULL DEFAULT '',
        status       TEXT NOT NULL DEFAULT 'saved'
                     CHECK (status IN ('saved', 'applied', 'interviewing', 'offer', 'rejected')),
        notes        TEXT NOT NULL DEFAULT '',
        applied_date DATE,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS job_applications_owner_idx \
     ON job_applications (owner_id, created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS cloud_resumes (
        id          UUID PRIMARY KEY,
        owner_id    TEXT NOT NULL,
        name        TEXT NOT NULL,
        target_job  TEXT NOT NULL DEFAULT '',
        content     TEXT NOT NULL DEFAULT '',
        is_primary  BOOLEAN NOT NULL DEFAULT FALSE,
        ats_score   INTEGER CHECK (ats_score BETWEEN 0 AND 100),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS cloud_resumes_owner_idx ON cloud_resumes (owner_id)",
    // At most one primary resume per owner.
    "CREATE UNIQUE INDEX IF NOT EXISTS cloud_resumes_one_primary_idx \
     ON cloud_resumes (owner_id) WHERE is_primary",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the document tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Schema statement failed: {}", statement.trim()))?;
    }
    info!("Database schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
