//! Resume-vs-job match estimate and resume tailoring.

use serde::{Deserialize, Serialize};

use crate::assistant::prompts::{JOB_MATCH_PROMPT, OPTIMIZE_RESUME_PROMPT};
use crate::llm_client::extract::{score, string_list};
use crate::llm_client::prompts::{truncate_chars, JSON_ONLY_SYSTEM, WRITER_SYSTEM};
use crate::llm_client::{parse_or_default, LlmError, TextGenerator};

const MAX_DESCRIPTION_CHARS: usize = 8_000;
const MAX_RESUME_CHARS: usize = 10_000;

/// The job side of a comparison.
#[derive(Debug, Clone, Copy)]
pub struct JobPosting<'a> {
    pub title: &'a str,
    pub company: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobMatch {
    #[serde(deserialize_with = "score")]
    pub match_score: u32,
    #[serde(deserialize_with = "score")]
    pub skills_match: u32,
    #[serde(deserialize_with = "score")]
    pub experience_match: u32,
    #[serde(deserialize_with = "string_list")]
    pub matched_skills: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub missing_skills: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub recommendations: Vec<String>,
}

/// Fixed placeholder percentages used when the model response is unusable.
impl Default for JobMatch {
    fn default() -> Self {
        Self {
            match_score: 75,
            skills_match: 70,
            experience_match: 80,
            matched_skills: Vec::new(),
            missing_skills: Vec::new(),
            recommendations: vec![
                "Review the job description and highlight your most relevant experience."
                    .to_string(),
            ],
        }
    }
}

fn fill_posting(template: &str, job: JobPosting<'_>, resume: &str) -> String {
    template
        .replace("{job_title}", job.title)
        .replace("{company}", job.company)
        .replace(
            "{job_description}",
            truncate_chars(job.description, MAX_DESCRIPTION_CHARS),
        )
        .replace("{resume}", truncate_chars(resume, MAX_RESUME_CHARS))
}

pub async fn match_job(
    llm: &dyn TextGenerator,
    resume: &str,
    job: JobPosting<'_>,
) -> Result<JobMatch, LlmError> {
    let prompt = fill_posting(JOB_MATCH_PROMPT, job, resume);
    let text = llm.generate(&prompt, Some(JSON_ONLY_SYSTEM)).await?;
    Ok(parse_or_default(&text))
}

/// Returns the resume rewritten for `job`.
pub async fn optimize_resume(
    llm: &dyn TextGenerator,
    resume: &str,
    job: JobPosting<'_>,
) -> Result<String, LlmError> {
    let prompt = fill_posting(OPTIMIZE_RESUME_PROMPT, job, resume);
    let text = llm.generate(&prompt, Some(WRITER_SYSTEM)).await?;
    let text = strip_code_fence(&text);
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(text.to_string())
}

/// Strips a surrounding ``` fence some models add around prose.
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("```text") up to the first newline.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
