//! ATS-style resume review.

use serde::{Deserialize, Serialize};

use crate::assistant::prompts::RESUME_ANALYSIS_PROMPT;
use crate::llm_client::extract::{score, string_list};
use crate::llm_client::prompts::{truncate_chars, JSON_ONLY_SYSTEM};
use crate::llm_client::{parse_or_default, LlmError, TextGenerator};

const MAX_RESUME_CHARS: usize = 12_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeAnalysis {
    #[serde(deserialize_with = "score")]
    pub ats_score: u32,
    #[serde(deserialize_with = "score")]
    pub overall_score: u32,
    #[serde(deserialize_with = "string_list")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub weaknesses: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub suggestions: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub keywords_found: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub missing_keywords: Vec<String>,
}

/// Used when the model response cannot be parsed.
impl Default for ResumeAnalysis {
    fn default() -> Self {
        Self {
            ats_score: 70,
            overall_score: 70,
            strengths: vec!["Resume content received and readable".to_string()],
            weaknesses: Vec::new(),
            suggestions: vec![
                "Detailed analysis is unavailable right now. Run the analysis again for tailored suggestions."
                    .to_string(),
            ],
            keywords_found: Vec::new(),
            missing_keywords: Vec::new(),
        }
    }
}

pub async fn analyze_resume(
    llm: &dyn TextGenerator,
    resume: &str,
    target_job: Option<&str>,
) -> Result<ResumeAnalysis, LlmError> {
    let target = target_job
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("Not specified (evaluate for general readiness)");

    let prompt = RESUME_ANALYSIS_PROMPT
        .replace("{target_job}", target)
        .replace("{resume}", truncate_chars(resume, MAX_RESUME_CHARS));

    let text = llm.generate(&prompt, Some(JSON_ONLY_SYSTEM)).await?;
    Ok(parse_or_default(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedGenerator;

    #[tokio::test]
    async fn test_parses_model_json() {
        let llm = ScriptedGenerator::replying(&[r#"```json
            {"atsScore": 82, "overallScore": 78, "strengths": ["Clear impact"],
             "weaknesses": ["No summary"], "suggestions": ["Add a summary"],
             "keywordsFound": ["Rust"], "missingKeywords": ["Kubernetes"]}
            ```"#]);

        let analysis = analyze_resume(&llm, "resume text", Some("Platform Engineer"))
            .await
            .unwrap();
        assert_eq!(analysis.ats_score, 82);
        assert_eq!(analysis.missing_keywords, vec!["Kubernetes"]);

        let prompts = llm.prompts();
        assert!(prompts[0].contains("Platform Engineer"));
        assert!(prompts[0].contains("resume text"));
    }

    #[tokio::test]
    async fn test_prose_response_falls_back_to_default() {
        let llm = ScriptedGenerator::replying(&["Your resume looks great overall!"]);
        let analysis = analyze_resume(&llm, "resume", None).await.unwrap();
        assert_eq!(analysis, ResumeAnalysis::default());
        assert_eq!(analysis.ats_score, 70);
    }

    #[tokio::test]
    async fn test_blank_target_job_uses_general_wording() {
        let llm = ScriptedGenerator::replying(&["{}"]);
        analyze_resume(&llm, "resume", Some("  ")).await.unwrap();
        assert!(llm.prompts()[0].contains("general readiness"));
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let llm = ScriptedGenerator::failing(500, "backend unavailable");
        let err = analyze_resume(&llm, "resume", None).await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
    }
}
