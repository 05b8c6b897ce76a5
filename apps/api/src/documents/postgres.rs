use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::models::JobApplicationRow;
use super::{
    ApplicationPatch, CloudResume, CloudResumePatch, DocumentStore, JobApplication,
    NewApplication, NewCloudResume,
};
use crate::errors::AppError;

/// PostgreSQL-backed document store. Schema: see `db::ensure_schema`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn save_application(
        &self,
        owner: &str,
        new: NewApplication,
    ) -> Result<JobApplication, AppError> {
        let applied_date = new.effective_applied_date(Utc::now().date_naive());
        let row = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            INSERT INTO job_applications
                (id, owner_id, job_title, company, location, salary, job_url,
                 status, notes, applied_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&new.job_title)
        .bind(&new.company)
        .bind(&new.location)
        .bind(&new.salary)
        .bind(&new.job_url)
        .bind(new.status.as_str())
        .bind(&new.notes)
        .bind(applied_date)
        .fetch_one(&self.pool)
        .await?;

        info!("Saved application {} for {owner}", row.id);
        row.try_into()
    }

    async fn list_applications(&self, owner: &str) -> Result<Vec<JobApplication>, AppError> {
        sqlx::query_as::<_, JobApplicationRow>(
            "SELECT * FROM job_applications WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(JobApplication::try_from)
        .collect()
    }

    async fn update_application(
        &self,
        owner: &str,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> Result<Option<JobApplication>, AppError> {
        // Moving to "applied" stamps today's date unless a date already exists.
        let row = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            UPDATE job_applications SET
                job_title    = COALESCE($3, job_title),
                company      = COALESCE($4, company),
                location     = COALESCE($5, location),
                salary       = COALESCE($6, salary),
                job_url      = COALESCE($7, job_url),
                status       = COALESCE($8, status),
                notes        = COALESCE($9, notes),
                applied_date = COALESCE($10, applied_date,
                                        CASE WHEN $8 = 'applied' THEN CURRENT_DATE END),
                updated_at   = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(patch.job_title)
        .bind(patch.company)
        .bind(patch.location)
        .bind(patch.salary)
        .bind(patch.job_url)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.notes)
        .bind(patch.applied_date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(JobApplication::try_from).transpose()
    }

    async fn delete_application(&self, owner: &str, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn save_resume(
        &self,
        owner: &str,
        new: NewCloudResume,
    ) -> Result<CloudResume, AppError> {
        let mut tx = self.pool.begin().await?;

        if new.is_primary {
            sqlx::query("UPDATE cloud_resumes SET is_primary = FALSE WHERE owner_id = $1")
                .bind(owner)
                .execute(&mut *tx)
                .await?;
        }

        let resume = sqlx::query_as::<_, CloudResume>(
            r#"
            INSERT INTO cloud_resumes (id, owner_id, name, target_job, content, is_primary)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&new.name)
        .bind(&new.target_job)
        .bind(&new.content)
        .bind(new.is_primary)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(resume)
    }

    async fn list_resumes(&self, owner: &str) -> Result<Vec<CloudResume>, AppError> {
        Ok(sqlx::query_as::<_, CloudResume>(
            "SELECT * FROM cloud_resumes WHERE owner_id = $1 ORDER BY created_at ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_resume(
        &self,
        owner: &str,
        id: Uuid,
        patch: CloudResumePatch,
    ) -> Result<Option<CloudResume>, AppError> {
        Ok(sqlx::query_as::<_, CloudResume>(
            r#"
            UPDATE cloud_resumes SET
                name       = COALESCE($3, name),
                target_job = COALESCE($4, target_job),
                content    = COALESCE($5, content),
                ats_score  = COALESCE($6, ats_score),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(patch.name)
        .bind(patch.target_job)
        .bind(patch.content)
        .bind(patch.ats_score.map(|s| s.clamp(0, 100)))
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_resume(&self, owner: &str, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cloud_resumes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_primary_resume(&self, owner: &str, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM cloud_resumes WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        // Clear first: the partial unique index allows one primary per owner.
        sqlx::query(
            "UPDATE cloud_resumes SET is_primary = FALSE, updated_at = NOW() \
             WHERE owner_id = $1 AND is_primary",
        )
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE cloud_resumes SET is_primary = TRUE, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Resume {id} is now primary for {owner}");
        Ok(true)
    }
}
