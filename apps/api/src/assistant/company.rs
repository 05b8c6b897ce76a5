use serde::{Deserialize, Deserializer, Serialize};

use crate::assistant::prompts::COMPANY_INSIGHT_PROMPT;
use crate::llm_client::extract::string_list;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{parse_or_default, LlmError, TextGenerator};

const UNKNOWN: &str = "Information not available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyInsight {
    pub company: String,
    pub overview: String,
    pub industry: String,
    pub size: String,
    pub culture: String,
    #[serde(deserialize_with = "string_list")]
    pub interview_tips: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub recent_news: Vec<String>,
    #[serde(deserialize_with = "rating")]
    pub glassdoor_rating: Option<f32>,
}

impl Default for CompanyInsight {
    fn default() -> Self {
        Self {
            company: String::new(),
            overview: UNKNOWN.to_string(),
            industry: UNKNOWN.to_string(),
            size: UNKNOWN.to_string(),
            culture: UNKNOWN.to_string(),
            interview_tips: vec![
                "Research the company's products and recent announcements before the interview."
                    .to_string(),
            ],
            recent_news: Vec::new(),
            glassdoor_rating: None,
        }
    }
}

/// Ratings outside 0–5 or non-numeric values are treated as unknown.
fn rating<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .map(|r| r as f32)
        .filter(|r| (0.0..=5.0).contains(r)))
}

pub async fn company_insight(
    llm: &dyn TextGenerator,
    company: &str,
) -> Result<CompanyInsight, LlmError> {
    let company = company.trim();
    let prompt = COMPANY_INSIGHT_PROMPT.replace("{company}", company);
    let text = llm.generate(&prompt, Some(JSON_ONLY_SYSTEM)).await?;

    let mut insight: CompanyInsight = parse_or_default(&text);
    if insight.company.trim().is_empty() {
        insight.company = company.to_string();
    }
    Ok(insight)
}
