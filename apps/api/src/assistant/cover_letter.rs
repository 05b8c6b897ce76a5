use serde::{Deserialize, Serialize};

use crate::assistant::job_match::strip_code_fence;
use crate::assistant::prompts::COVER_LETTER_PROMPT;
use crate::llm_client::prompts::{truncate_chars, WRITER_SYSTEM};
use crate::llm_client::{LlmError, TextGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverLetterTone {
    #[default]
    Professional,
    Enthusiastic,
    Confident,
    Conversational,
}

impl CoverLetterTone {
    fn instruction(self) -> &'static str {
        match self {
            CoverLetterTone::Professional => "professional and polished",
            CoverLetterTone::Enthusiastic => "warm and enthusiastic about the company's mission",
            CoverLetterTone::Confident => "confident and direct, leading with results",
            CoverLetterTone::Conversational => "friendly and conversational while staying respectful",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub resume: String,
    pub job_title: String,
    pub company: String,
    #[serde(default)]
    pub job_description: String,
    pub hiring_manager: Option<String>,
    #[serde(default)]
    pub tone: CoverLetterTone,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub content: String,
    pub tone: CoverLetterTone,
    pub word_count: usize,
}

pub async fn generate_cover_letter(
    llm: &dyn TextGenerator,
    request: &CoverLetterRequest,
) -> Result<CoverLetter, LlmError> {
    let hiring_manager = request
        .hiring_manager
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or("Not given");
    let description = if request.job_description.trim().is_empty() {
        "Not provided"
    } else {
        truncate_chars(&request.job_description, 8_000)
    };

    let prompt = COVER_LETTER_PROMPT
        .replace("{job_title}", &request.job_title)
        .replace("{company}", &request.company)
        .replace("{hiring_manager}", hiring_manager)
        .replace("{tone}", request.tone.instruction())
        .replace("{job_description}", description)
        .replace("{resume}", truncate_chars(&request.resume, 10_000));

    let text = llm.generate(&prompt, Some(WRITER_SYSTEM)).await?;
    let content = strip_code_fence(&text);
    if content.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    Ok(CoverLetter {
        word_count: content.split_whitespace().count(),
        content: content.to_string(),
        tone: request.tone,
    })
}
