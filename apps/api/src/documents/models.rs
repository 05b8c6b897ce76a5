use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "saved",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "saved" => Ok(ApplicationStatus::Saved),
            "applied" => Ok(ApplicationStatus::Applied),
            "interviewing" => Ok(ApplicationStatus::Interviewing),
            "offer" => Ok(ApplicationStatus::Offer),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(AppError::Internal(anyhow::anyhow!(
                "Unknown application status '{other}' in storage"
            ))),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job applications
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: Uuid,
    pub owner_id: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub job_url: String,
    pub status: ApplicationStatus,
    pub notes: String,
    pub applied_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub owner_id: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub job_url: String,
    pub status: String,
    pub notes: String,
    pub applied_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<JobApplicationRow> for JobApplication {
    type Error = AppError;

    fn try_from(row: JobApplicationRow) -> Result<Self, AppError> {
        Ok(JobApplication {
            status: row.status.parse()?,
            id: row.id,
            owner_id: row.owner_id,
            job_title: row.job_title,
            company: row.company,
            location: row.location,
            salary: row.salary,
            job_url: row.job_url,
            notes: row.notes,
            applied_date: row.applied_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewApplication {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub job_url: String,
    pub status: ApplicationStatus,
    pub notes: String,
    pub applied_date: Option<NaiveDate>,
}

impl NewApplication {
    /// Applications created as already applied get today's date unless one
    /// was given.
    pub fn effective_applied_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.applied_date
            .or_else(|| (self.status == ApplicationStatus::Applied).then_some(today))
    }
}

/// Any status may follow any other; no transition rules are enforced.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_url: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
    pub applied_date: Option<NaiveDate>,
}

impl ApplicationPatch {
    pub fn apply_to(self, app: &mut JobApplication, now: DateTime<Utc>) {
        if let Some(v) = self.job_title {
            app.job_title = v;
        }
        if let Some(v) = self.company {
            app.company = v;
        }
        if let Some(v) = self.location {
            app.location = v;
        }
        if let Some(v) = self.salary {
            app.salary = v;
        }
        if let Some(v) = self.job_url {
            app.job_url = v;
        }
        if let Some(v) = self.notes {
            app.notes = v;
        }
        if let Some(status) = self.status {
            app.status = status;
        }
        if self.applied_date.is_some() {
            app.applied_date = self.applied_date;
        } else if app.applied_date.is_none() && self.status == Some(ApplicationStatus::Applied) {
            app.applied_date = Some(now.date_naive());
        }
        app.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: usize,
    pub saved: usize,
    pub applied: usize,
    pub interviewing: usize,
    pub offer: usize,
    pub rejected: usize,
    /// Share of submitted applications that got any answer, 0–100.
    pub response_rate: u32,
}

impl ApplicationStats {
    pub fn from_applications(apps: &[JobApplication]) -> Self {
        let mut stats = ApplicationStats {
            total: apps.len(),
            ..Self::default()
        };
        for app in apps {
            match app.status {
                ApplicationStatus::Saved => stats.saved += 1,
                ApplicationStatus::Applied => stats.applied += 1,
                ApplicationStatus::Interviewing => stats.interviewing += 1,
                ApplicationStatus::Offer => stats.offer += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
            }
        }

        let responded = stats.interviewing + stats.offer + stats.rejected;
        let submitted = stats.applied + responded;
        if submitted > 0 {
            stats.response_rate = ((responded as f64 / submitted as f64) * 100.0).round() as u32;
        }
        stats
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cloud resumes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CloudResume {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub target_job: String,
    pub content: String,
    pub is_primary: bool,
    pub ats_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewCloudResume {
    pub name: String,
    pub target_job: String,
    pub content: String,
    pub is_primary: bool,
}

/// Primary status changes go through `set_primary_resume`, not patches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudResumePatch {
    pub name: Option<String>,
    pub target_job: Option<String>,
    pub content: Option<String>,
    pub ats_score: Option<i32>,
}

impl CloudResumePatch {
    pub fn apply_to(self, resume: &mut CloudResume, now: DateTime<Utc>) {
        if let Some(v) = self.name {
            resume.name = v;
        }
        if let Some(v) = self.target_job {
            resume.target_job = v;
        }
        if let Some(v) = self.content {
            resume.content = v;
        }
        if let Some(v) = self.ats_score {
            resume.ats_score = Some(v.clamp(0, 100));
        }
        resume.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(status: ApplicationStatus) -> JobApplication {
        let now = Utc::now();
        JobApplication {
            id: Uuid::new_v4(),
            owner_id: "u".to_string(),
            job_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: String::new(),
            salary: String::new(),
            job_url: String::new(),
            status,
            notes: String::new(),
            applied_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            ApplicationStatus::Saved,
            ApplicationStatus::Applied,
            ApplicationStatus::Interviewing,
            ApplicationStatus::Offer,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
        assert!("ghosted".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_any_status_transition_is_allowed() {
        let mut app = application(ApplicationStatus::Rejected);
        ApplicationPatch {
            status: Some(ApplicationStatus::Saved),
            ..ApplicationPatch::default()
        }
        .apply_to(&mut app, Utc::now());
        assert_eq!(app.status, ApplicationStatus::Saved);
    }

    #[test]
    fn test_moving_to_applied_stamps_date_once() {
        let mut app = application(ApplicationStatus::Saved);
        let now = Utc::now();
        ApplicationPatch {
            status: Some(ApplicationStatus::Applied),
            ..ApplicationPatch::default()
        }
        .apply_to(&mut app, now);
        assert_eq!(app.applied_date, Some(now.date_naive()));

        let earlier = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        app.applied_date = Some(earlier);
        ApplicationPatch {
            status: Some(ApplicationStatus::Applied),
            ..ApplicationPatch::default()
        }
        .apply_to(&mut app, now);
        assert_eq!(app.applied_date, Some(earlier));
    }

    #[test]
    fn test_stats_counts_and_response_rate() {
        let apps = vec![
            application(ApplicationStatus::Saved),
            application(ApplicationStatus::Applied),
            application(ApplicationStatus::Applied),
            application(ApplicationStatus::Interviewing),
            application(ApplicationStatus::Rejected),
        ];
        let stats = ApplicationStats::from_applications(&apps);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.applied, 2);
        assert_eq!(stats.saved, 1);
        assert_eq!(stats.response_rate, 50);
    }

    #[test]
    fn test_new_application_defaults_to_saved() {
        let parsed: NewApplication =
            serde_json::from_str(r#"{"jobTitle": "SRE", "company": "Acme"}"#).unwrap();
        assert_eq!(parsed.status, ApplicationStatus::Saved);
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(parsed.effective_applied_date(today), None);
    }
}
