//! Job Search Client: JSearch (RapidAPI) listings mapped into `RealJob`.
//!
//! Search failures never reach the caller as errors: a non-2xx response, a
//! transport failure or an unexpected body all yield an empty result list.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod format;
pub mod handlers;

use format::{format_employment_type, format_location, format_posted_age, format_salary};

/// Provider pages fetched per search (JSearch returns ~10 listings per page).
const PROVIDER_PAGES: u32 = 3;
pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 50;

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("Job search is not configured: missing API key")]
    MissingApiKey,
}

/// A listing returned by the job-search service, in the shape the UI renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealJob {
    pub id: String,
    pub title: String,
    pub company: String,
    pub company_logo: Option<String>,
    pub location: String,
    pub job_type: String,
    pub description: String,
    pub apply_url: Option<String>,
    pub is_remote: bool,
    pub posted_at: Option<DateTime<Utc>>,
    /// "3 days ago"
    pub posted: String,
    /// "$80K - $120K/yr"
    pub salary: String,
    pub required_skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<RawListing>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawListing {
    job_id: String,
    job_title: String,
    employer_name: String,
    employer_logo: Option<String>,
    job_city: Option<String>,
    job_state: Option<String>,
    job_country: Option<String>,
    job_employment_type: Option<String>,
    job_description: String,
    job_apply_link: Option<String>,
    job_is_remote: Option<bool>,
    job_posted_at_datetime_utc: Option<String>,
    job_posted_at_timestamp: Option<i64>,
    job_min_salary: Option<f64>,
    job_max_salary: Option<f64>,
    job_salary_currency: Option<String>,
    job_salary_period: Option<String>,
    job_required_skills: Option<Vec<String>>,
}

impl RawListing {
    fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.job_posted_at_datetime_utc
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                self.job_posted_at_timestamp
                    .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            })
    }

    fn into_real_job(self, now: DateTime<Utc>) -> RealJob {
        let posted_at = self.posted_at();
        let is_remote = self.job_is_remote.unwrap_or(false);
        RealJob {
            location: format_location(
                &[
                    self.job_city.as_deref(),
                    self.job_state.as_deref(),
                    self.job_country.as_deref(),
                ],
                is_remote,
            ),
            job_type: format_employment_type(self.job_employment_type.as_deref()),
            salary: format_salary(
                self.job_min_salary,
                self.job_max_salary,
                self.job_salary_currency.as_deref(),
                self.job_salary_period.as_deref(),
            ),
            posted: format_posted_age(posted_at, now),
            posted_at,
            is_remote,
            id: self.job_id,
            title: self.job_title,
            company: self.employer_name,
            company_logo: self.employer_logo,
            description: self.job_description,
            apply_url: self.job_apply_link,
            required_skills: self.job_required_skills.unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
pub struct JobSearchClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    host: String,
}

impl JobSearchClient {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        host: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
        })
    }

    /// Searches for `query` near `location`. Only a missing API key is an error.
    pub async fn search(&self, query: &str, location: &str) -> Result<Vec<RealJob>, JobSearchError> {
        let api_key = self.api_key.as_deref().ok_or(JobSearchError::MissingApiKey)?;

        let full_query = match location.trim() {
            "" => query.trim().to_string(),
            loc => format!("{} in {loc}", query.trim()),
        };
        let num_pages = PROVIDER_PAGES.to_string();

        let response = match self
            .client
            .get(format!("{}/search", self.base_url))
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", &self.host)
            .query(&[
                ("query", full_query.as_str()),
                ("page", "1"),
                ("num_pages", num_pages.as_str()),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Job search request failed: {e}");
                return Ok(Vec::new());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Job search returned {status}: {body}");
            return Ok(Vec::new());
        }

        let parsed: SearchResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!("Job search returned an unreadable body: {e}");
                return Ok(Vec::new());
            }
        };

        let now = Utc::now();
        let jobs: Vec<RealJob> = parsed
            .data
            .into_iter()
            .filter(|l| !l.job_id.is_empty() && !l.job_title.is_empty())
            .map(|l| l.into_real_job(now))
            .collect();

        debug!("Job search '{full_query}' returned {} listings", jobs.len());
        Ok(jobs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// 1-based pagination. Page 0 is treated as page 1; pages past the end are
/// empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let items = items
        .iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect();

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}
