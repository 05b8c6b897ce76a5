use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StoredRecord;

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResume {
    pub id: Uuid,
    pub name: String,
    pub target_job: String,
    pub content: String,
    pub is_primary: bool,
    pub analysis_complete: bool,
    pub ats_score: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResume {
    pub name: String,
    #[serde(default)]
    pub target_job: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    pub name: Option<String>,
    pub target_job: Option<String>,
    pub content: Option<String>,
    pub is_primary: Option<bool>,
    pub analysis_complete: Option<bool>,
    pub ats_score: Option<u32>,
}

impl ResumePatch {
    pub fn analysis(ats_score: u32) -> Self {
        Self {
            analysis_complete: Some(true),
            ats_score: Some(ats_score),
            ..Self::default()
        }
    }
}

impl StoredRecord for StoredResume {
    type Draft = NewResume;
    type Patch = ResumePatch;
    const COLLECTION: &'static str = "resumes";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(draft: NewResume, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            target_job: draft.target_job,
            content: draft.content,
            is_primary: draft.is_primary,
            analysis_complete: false,
            ats_score: None,
            created_at: now,
            last_modified: now,
        }
    }

    fn apply(&mut self, patch: ResumePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(target_job) = patch.target_job {
            self.target_job = target_job;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(is_primary) = patch.is_primary {
            self.is_primary = is_primary;
        }
        if let Some(done) = patch.analysis_complete {
            self.analysis_complete = done;
        }
        if let Some(score) = patch.ats_score {
            self.ats_score = Some(score.min(100));
        }
    }

    fn patch_sets_primary(patch: &ResumePatch) -> bool {
        patch.is_primary == Some(true)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }

    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// External jobs (pasted in by the user)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalJob {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub url: String,
    pub description: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub analyzed: bool,
    pub match_score: Option<u32>,
    pub matched_skills: Option<Vec<String>>,
    pub missing_skills: Option<Vec<String>>,
    pub custom_resume: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExternalJob {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
}

/// Fields written back by the AI match and tailoring calls.
#[derive(Debug, Clone, Default)]
pub struct ExternalJobPatch {
    pub match_score: Option<u32>,
    pub matched_skills: Option<Vec<String>>,
    pub missing_skills: Option<Vec<String>>,
    pub custom_resume: Option<String>,
}

impl StoredRecord for ExternalJob {
    type Draft = NewExternalJob;
    type Patch = ExternalJobPatch;
    const COLLECTION: &'static str = "external_jobs";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(draft: NewExternalJob, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            company: draft.company,
            url: draft.url,
            description: draft.description,
            location: draft.location,
            salary: draft.salary,
            job_type: draft.job_type,
            created_at: now,
            analyzed: false,
            match_score: None,
            matched_skills: None,
            missing_skills: None,
            custom_resume: None,
        }
    }

    fn apply(&mut self, patch: ExternalJobPatch) {
        if let Some(score) = patch.match_score {
            self.match_score = Some(score.min(100));
            self.analyzed = true;
        }
        if patch.matched_skills.is_some() {
            self.matched_skills = patch.matched_skills;
        }
        if patch.missing_skills.is_some() {
            self.missing_skills = patch.missing_skills;
        }
        if patch.custom_resume.is_some() {
            self.custom_resume = patch.custom_resume;
        }
    }
}
