//! Interview practice: question generation, a static question bank, and
//! answer grading.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assistant::prompts::{INTERVIEW_FEEDBACK_PROMPT, INTERVIEW_QUESTIONS_PROMPT};
use crate::llm_client::extract::{score, string_list};
use crate::llm_client::prompts::{truncate_chars, JSON_ONLY_SYSTEM};
use crate::llm_client::{parse_or_default, LlmError, TextGenerator};

pub const MAX_QUESTIONS: usize = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    #[default]
    Behavioral,
    Technical,
    Situational,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub question: String,
    #[serde(default)]
    pub category: QuestionCategory,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub tips: String,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

/// Items are kept raw so one malformed question does not discard the rest.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct QuestionList {
    questions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterviewFeedback {
    #[serde(deserialize_with = "score")]
    pub score: u32,
    #[serde(deserialize_with = "string_list")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub improvements: Vec<String>,
    pub sample_answer: String,
}

impl Default for InterviewFeedback {
    fn default() -> Self {
        Self {
            score: 70,
            strengths: vec!["You answered the question directly".to_string()],
            improvements: vec![
                "Structure the answer as Situation, Task, Action, Result and quantify the outcome."
                    .to_string(),
            ],
            sample_answer: String::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static question bank
// ────────────────────────────────────────────────────────────────────────────

const BEHAVIORAL: &[(&str, &str)] = &[
    ("Tell me about yourself.", "Keep it to two minutes: present, past, and why this role."),
    ("Describe a time you disagreed with a teammate. How did you resolve it?", "Show you listened, used data, and kept the relationship intact."),
    ("Tell me about a project you are proud of.", "Explain your specific contribution and the measurable result."),
    ("Describe a time you failed. What did you learn?", "Own the mistake and show what you changed afterwards."),
    ("Tell me about a time you had to learn something quickly.", "Name the resources you used and how fast you became productive."),
];

const TECHNICAL: &[(&str, &str)] = &[
    ("Walk me through how you would design a URL shortener.", "Cover the API, storage, key generation and scaling reads."),
    ("How do you debug a production issue you cannot reproduce locally?", "Mention logs, metrics, narrowing the blast radius and safe experiments."),
    ("Explain the difference between a process and a thread.", "Talk about memory isolation, scheduling and communication costs."),
    ("How would you make a slow database query faster?", "Start from the query plan; discuss indexes, data shape and caching."),
    ("What happens when you type a URL into a browser and press Enter?", "DNS, TCP/TLS, HTTP, server work, and rendering, at the depth asked."),
];

const SITUATIONAL: &[(&str, &str)] = &[
    ("You are given a deadline you believe is unrealistic. What do you do?", "Quantify the gap, propose scope options, and escalate early."),
    ("A stakeholder asks for a feature that conflicts with the roadmap. How do you respond?", "Understand the underlying need before negotiating priorities."),
    ("You discover a bug you shipped last week. What are your next steps?", "Assess impact, communicate, fix, and prevent recurrence."),
    ("A new teammate is struggling to onboard. How would you help?", "Pair with them, document gaps, and check in regularly."),
    ("You have two urgent tasks from two managers. How do you prioritize?", "Clarify impact and deadlines, and make the trade-off visible."),
];

/// The full static bank, optionally filtered to one category.
pub fn question_bank(category: Option<QuestionCategory>) -> Vec<InterviewQuestion> {
    let sections = [
        (QuestionCategory::Behavioral, BEHAVIORAL),
        (QuestionCategory::Technical, TECHNICAL),
        (QuestionCategory::Situational, SITUATIONAL),
    ];

    sections
        .into_iter()
        .filter(|(cat, _)| category.map_or(true, |wanted| wanted == *cat))
        .flat_map(|(cat, entries)| {
            entries.iter().map(move |(question, tips)| InterviewQuestion {
                question: question.to_string(),
                category: cat,
                difficulty: default_difficulty(),
                tips: tips.to_string(),
            })
        })
        .collect()
}

/// Interleaves categories so a short fallback set still mixes question kinds.
fn bank_sample(count: usize) -> Vec<InterviewQuestion> {
    let mut columns: Vec<_> = [
        QuestionCategory::Behavioral,
        QuestionCategory::Technical,
        QuestionCategory::Situational,
    ]
    .into_iter()
    .map(|c| question_bank(Some(c)).into_iter())
    .collect();

    let mut picked = Vec::with_capacity(count);
    while picked.len() < count {
        let before = picked.len();
        for column in columns.iter_mut() {
            if picked.len() == count {
                break;
            }
            if let Some(q) = column.next() {
                picked.push(q);
            }
        }
        if picked.len() == before {
            break;
        }
    }
    picked
}

// ────────────────────────────────────────────────────────────────────────────
// LLM-backed operations
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_interview_questions(
    llm: &dyn TextGenerator,
    role: &str,
    level: &str,
    count: usize,
) -> Result<Vec<InterviewQuestion>, LlmError> {
    let count = count.clamp(1, MAX_QUESTIONS);
    let level = if level.trim().is_empty() { "mid-level" } else { level.trim() };

    let prompt = INTERVIEW_QUESTIONS_PROMPT
        .replace("{count}", &count.to_string())
        .replace("{level}", level)
        .replace("{role}", role.trim());

    let text = llm.generate(&prompt, Some(JSON_ONLY_SYSTEM)).await?;
    let mut questions: Vec<InterviewQuestion> = parse_or_default::<QuestionList>(&text)
        .questions
        .into_iter()
        .filter_map(|item| serde_json::from_value::<InterviewQuestion>(item).ok())
        .filter(|q| !q.question.trim().is_empty())
        .collect();

    if questions.is_empty() {
        info!("No usable generated questions for '{role}'; serving the static bank");
        return Ok(bank_sample(count));
    }
    questions.truncate(count);
    Ok(questions)
}

pub async fn evaluate_interview_answer(
    llm: &dyn TextGenerator,
    question: &str,
    answer: &str,
) -> Result<InterviewFeedback, LlmError> {
    let prompt = INTERVIEW_FEEDBACK_PROMPT
        .replace("{question}", truncate_chars(question, 1_000))
        .replace("{answer}", truncate_chars(answer, 6_000));

    let text = llm.generate(&prompt, Some(JSON_ONLY_SYSTEM)).await?;
    Ok(parse_or_default(&text))
}
