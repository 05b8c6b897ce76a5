//! AI-assisted career tasks. Every task sends one prompt through the injected
//! `TextGenerator` and falls back to documented defaults when the response
//! cannot be parsed.

pub mod company;
pub mod cover_letter;
pub mod handlers;
pub mod interview;
pub mod job_match;
pub mod prompts;
pub mod resume_analysis;

pub use company::{company_insight, CompanyInsight};
pub use cover_letter::{generate_cover_letter, CoverLetter, CoverLetterRequest};
pub use interview::{
    evaluate_interview_answer, generate_interview_questions, question_bank, InterviewFeedback,
    InterviewQuestion, QuestionCategory,
};
pub use job_match::{match_job, optimize_resume, JobPosting};
pub use resume_analysis::{analyze_resume, ResumeAnalysis};
