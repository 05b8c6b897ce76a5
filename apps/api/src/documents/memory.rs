use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    ApplicationPatch, CloudResume, CloudResumePatch, DocumentStore, JobApplication,
    NewApplication, NewCloudResume,
};
use crate::errors::AppError;

/// In-memory stand-in for `PgDocumentStore` with the same ownership and
/// primary-flag rules.
#[derive(Default)]
pub struct MemoryDocumentStore {
    applications: Mutex<Vec<JobApplication>>,
    resumes: Mutex<Vec<CloudResume>>,
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn save_application(
        &self,
        owner: &str,
        new: NewApplication,
    ) -> Result<JobApplication, AppError> {
        let now = Utc::now();
        let app = JobApplication {
            id: Uuid::new_v4(),
            owner_id: owner.to_string(),
            applied_date: new.effective_applied_date(now.date_naive()),
            job_title: new.job_title,
            company: new.company,
            location: new.location,
            salary: new.salary,
            job_url: new.job_url,
            status: new.status,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };
        self.applications.lock().await.push(app.clone());
        Ok(app)
    }

    async fn list_applications(&self, owner: &str) -> Result<Vec<JobApplication>, AppError> {
        let mut apps: Vec<_> = self
            .applications
            .lock()
            .await
            .iter()
            .filter(|a| a.owner_id == owner)
            .cloned()
            .collect();
        apps.reverse();
        Ok(apps)
    }

    async fn update_application(
        &self,
        owner: &str,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> Result<Option<JobApplication>, AppError> {
        let mut apps = self.applications.lock().await;
        let Some(app) = apps.iter_mut().find(|a| a.id == id && a.owner_id == owner) else {
            return Ok(None);
        };
        patch.apply_to(app, Utc::now());
        Ok(Some(app.clone()))
    }

    async fn delete_application(&self, owner: &str, id: Uuid) -> Result<bool, AppError> {
        let mut apps = self.applications.lock().await;
        let before = apps.len();
        apps.retain(|a| !(a.id == id && a.owner_id == owner));
        Ok(apps.len() != before)
    }

    async fn save_resume(
        &self,
        owner: &str,
        new: NewCloudResume,
    ) -> Result<CloudResume, AppError> {
        let mut resumes = self.resumes.lock().await;
        if new.is_primary {
            for r in resumes.iter_mut().filter(|r| r.owner_id == owner) {
                r.is_primary = false;
            }
        }
        let now = Utc::now();
        let resume = CloudResume {
            id: Uuid::new_v4(),
            owner_id: owner.to_string(),
            name: new.name,
            target_job: new.target_job,
            content: new.content,
            is_primary: new.is_primary,
            ats_score: None,
            created_at: now,
            updated_at: now,
        };
        resumes.push(resume.clone());
        Ok(resume)
    }

    async fn list_resumes(&self, owner: &str) -> Result<Vec<CloudResume>, AppError> {
        Ok(self
            .resumes
            .lock()
            .await
            .iter()
            .filter(|r| r.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn update_resume(
        &self,
        owner: &str,
        id: Uuid,
        patch: CloudResumePatch,
    ) -> Result<Option<CloudResume>, AppError> {
        let mut resumes = self.resumes.lock().await;
        let Some(resume) = resumes.iter_mut().find(|r| r.id == id && r.owner_id == owner) else {
            return Ok(None);
        };
        patch.apply_to(resume, Utc::now());
        Ok(Some(resume.clone()))
    }

    async fn delete_resume(&self, owner: &str, id: Uuid) -> Result<bool, AppError> {
        let mut resumes = self.resumes.lock().await;
        let before = resumes.len();
        resumes.retain(|r| !(r.id == id && r.owner_id == owner));
        Ok(resumes.len() != before)
    }

    async fn set_primary_resume(&self, owner: &str, id: Uuid) -> Result<bool, AppError> {
        let mut resumes = self.resumes.lock().await;
        if !resumes.iter().any(|r| r.id == id && r.owner_id == owner) {
            return Ok(false);
        }
        let now = Utc::now();
        for r in resumes.iter_mut().filter(|r| r.owner_id == owner) {
            let target = r.id == id;
            if r.is_primary != target {
                r.is_primary = target;
                r.updated_at = now;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::ApplicationStatus;

    fn resume(name: &str, is_primary: bool) -> NewCloudResume {
        NewCloudResume {
            name: name.to_string(),
            is_primary,
            ..NewCloudResume::default()
        }
    }

    #[tokio::test]
    async fn test_set_primary_keeps_single_primary_per_owner() {
        let store = MemoryDocumentStore::default();
        let a = store.save_resume("u1", resume("A", true)).await.unwrap();
        let b = store.save_resume("u1", resume("B", false)).await.unwrap();
        store.save_resume("u2", resume("Other", true)).await.unwrap();

        assert!(store.set_primary_resume("u1", b.id).await.unwrap());
        let mine = store.list_resumes("u1").await.unwrap();
        assert_eq!(mine.iter().filter(|r| r.is_primary).count(), 1);
        assert!(mine.iter().find(|r| r.id == a.id).is_some_and(|r| !r.is_primary));

        // Other owners are untouched.
        let theirs = store.list_resumes("u2").await.unwrap();
        assert!(theirs[0].is_primary);
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_owner() {
        let store = MemoryDocumentStore::default();
        let app = store
            .save_application(
                "u1",
                NewApplication {
                    job_title: "SRE".to_string(),
                    status: ApplicationStatus::Applied,
                    ..NewApplication::default()
                },
            )
            .await
            .unwrap();
        assert!(app.applied_date.is_some());

        assert!(store.list_applications("u2").await.unwrap().is_empty());
        assert!(!store.delete_application("u2", app.id).await.unwrap());
        assert!(store
            .update_application("u2", app.id, ApplicationPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(store.delete_application("u1", app.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_stats_default_method_uses_listing() {
        let store = MemoryDocumentStore::default();
        for status in [ApplicationStatus::Offer, ApplicationStatus::Applied] {
            store
                .save_application(
                    "u1",
                    NewApplication {
                        status,
                        ..NewApplication::default()
                    },
                )
                .await
                .unwrap();
        }
        let stats = store.application_stats("u1").await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.offer, 1);
        assert_eq!(stats.response_rate, 50);
    }
}
