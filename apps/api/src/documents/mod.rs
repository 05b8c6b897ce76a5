//! Cloud document store: per-user job applications and resumes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;

pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod postgres;

pub use models::{
    ApplicationPatch, ApplicationStats, ApplicationStatus, CloudResume, CloudResumePatch,
    JobApplication, NewApplication, NewCloudResume,
};
pub use postgres::PgDocumentStore;

/// Every operation is scoped to `owner`; records of other owners are
/// invisible and report as not found.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save_application(
        &self,
        owner: &str,
        new: NewApplication,
    ) -> Result<JobApplication, AppError>;

    /// Newest first.
    async fn list_applications(&self, owner: &str) -> Result<Vec<JobApplication>, AppError>;

    async fn update_application(
        &self,
        owner: &str,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> Result<Option<JobApplication>, AppError>;

    async fn delete_application(&self, owner: &str, id: Uuid) -> Result<bool, AppError>;

    async fn application_stats(&self, owner: &str) -> Result<ApplicationStats, AppError> {
        let apps = self.list_applications(owner).await?;
        Ok(ApplicationStats::from_applications(&apps))
    }

    /// A primary `new` resume clears every other primary flag of the owner.
    async fn save_resume(&self, owner: &str, new: NewCloudResume)
        -> Result<CloudResume, AppError>;

    async fn list_resumes(&self, owner: &str) -> Result<Vec<CloudResume>, AppError>;

    async fn update_resume(
        &self,
        owner: &str,
        id: Uuid,
        patch: CloudResumePatch,
    ) -> Result<Option<CloudResume>, AppError>;

    async fn delete_resume(&self, owner: &str, id: Uuid) -> Result<bool, AppError>;

    /// Makes `id` the owner's only primary resume. `false` if `id` is unknown.
    async fn set_primary_resume(&self, owner: &str, id: Uuid) -> Result<bool, AppError>;
}
