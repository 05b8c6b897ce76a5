use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::assistant::{
    analyze_resume, company_insight, evaluate_interview_answer, generate_cover_letter,
    generate_interview_questions, match_job, optimize_resume, question_bank, CompanyInsight,
    CoverLetter, CoverLetterRequest, InterviewFeedback, InterviewQuestion, JobPosting,
    QuestionCategory, ResumeAnalysis,
};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::local_store::{ExternalJob, ExternalJobPatch, ResumePatch, StoredResume};
use crate::state::AppState;

const DEFAULT_QUESTION_COUNT: usize = 5;

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Stored resume analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ResumeAnalysisResponse {
    pub resume: StoredResume,
    pub analysis: ResumeAnalysis,
}

/// POST /api/v1/resumes/:id/analyze
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeAnalysisResponse>, AppError> {
    let owner = current.uid();
    let resume = state
        .resumes
        .get(owner, id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    require("Resume content", &resume.content)?;

    let analysis =
        analyze_resume(state.llm.as_ref(), &resume.content, Some(resume.target_job.as_str())).await?;

    // The record may have been deleted while the model was answering.
    let resume = state
        .resumes
        .update(owner, id, ResumePatch::analysis(analysis.ats_score))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    info!("Analyzed resume {id} for {owner}: ATS {}", analysis.ats_score);
    Ok(Json(ResumeAnalysisResponse { resume, analysis }))
}

// ────────────────────────────────────────────────────────────────────────────
// External job match and tailoring
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSelection {
    pub resume_id: Option<Uuid>,
}

/// The explicitly selected resume, else the owner's primary one.
async fn resolve_resume(
    state: &AppState,
    owner: &str,
    selection: &ResumeSelection,
) -> Result<StoredResume, AppError> {
    let resume = match selection.resume_id {
        Some(id) => state
            .resumes
            .get(owner, id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?,
        None => state.resumes.primary(owner).await.ok_or_else(|| {
            AppError::Validation(
                "Add or select a primary resume before analyzing jobs".to_string(),
            )
        })?,
    };
    require("Resume content", &resume.content)?;
    Ok(resume)
}

async fn load_job(state: &AppState, owner: &str, id: Uuid) -> Result<ExternalJob, AppError> {
    state
        .external_jobs
        .get(owner, id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

fn posting(job: &ExternalJob) -> JobPosting<'_> {
    JobPosting {
        title: &job.title,
        company: &job.company,
        description: &job.description,
    }
}

/// POST /api/v1/external-jobs/:id/analyze?resumeId=
///
/// Analysis runs once per job; an analyzed job is returned as stored.
pub async fn handle_analyze_external_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Query(selection): Query<ResumeSelection>,
) -> Result<Json<ExternalJob>, AppError> {
    let owner = current.uid();
    let job = load_job(&state, owner, id).await?;
    if job.analyzed {
        return Ok(Json(job));
    }
    let resume = resolve_resume(&state, owner, &selection).await?;

    let result = match_job(state.llm.as_ref(), &resume.content, posting(&job)).await?;
    let patch = ExternalJobPatch {
        match_score: Some(result.match_score),
        matched_skills: Some(result.matched_skills),
        missing_skills: Some(result.missing_skills),
        custom_resume: None,
    };

    let job = state
        .external_jobs
        .update(owner, id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    info!(
        "Matched job {id} against resume {} for {owner}: {:?}",
        resume.id, job.match_score
    );
    Ok(Json(job))
}

/// POST /api/v1/external-jobs/:id/tailor?resumeId=
pub async fn handle_tailor_external_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Query(selection): Query<ResumeSelection>,
) -> Result<Json<ExternalJob>, AppError> {
    let owner = current.uid();
    let job = load_job(&state, owner, id).await?;
    let resume = resolve_resume(&state, owner, &selection).await?;

    let tailored = optimize_resume(state.llm.as_ref(), &resume.content, posting(&job)).await?;
    let patch = ExternalJobPatch {
        custom_resume: Some(tailored),
        ..ExternalJobPatch::default()
    };

    state
        .external_jobs
        .update(owner, id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letters
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cover-letters
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    _current: CurrentUser,
    Json(req): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetter>, AppError> {
    require("resume", &req.resume)?;
    require("jobTitle", &req.job_title)?;
    require("company", &req.company)?;

    let letter = generate_cover_letter(state.llm.as_ref(), &req).await?;
    Ok(Json(letter))
}

// ────────────────────────────────────────────────────────────────────────────
// Interview practice
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestionsRequest {
    pub role: String,
    #[serde(default)]
    pub level: String,
    #[serde(default = "default_question_count")]
    pub count: usize,
}

fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

#[derive(Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<InterviewQuestion>,
}

/// POST /api/v1/interview/questions
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    _current: CurrentUser,
    Json(req): Json<InterviewQuestionsRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    require("role", &req.role)?;
    let questions =
        generate_interview_questions(state.llm.as_ref(), &req.role, &req.level, req.count).await?;
    Ok(Json(QuestionsResponse { questions }))
}

#[derive(Debug, Deserialize)]
pub struct BankQuery {
    pub category: Option<QuestionCategory>,
}

/// GET /api/v1/interview/bank?category=
pub async fn handle_question_bank(
    _current: CurrentUser,
    Query(params): Query<BankQuery>,
) -> Json<QuestionsResponse> {
    Json(QuestionsResponse {
        questions: question_bank(params.category),
    })
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub question: String,
    pub answer: String,
}

/// POST /api/v1/interview/feedback
pub async fn handle_interview_feedback(
    State(state): State<AppState>,
    _current: CurrentUser,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<InterviewFeedback>, AppError> {
    require("question", &req.question)?;
    require("answer", &req.answer)?;
    let feedback = evaluate_interview_answer(state.llm.as_ref(), &req.question, &req.answer).await?;
    Ok(Json(feedback))
}

// ────────────────────────────────────────────────────────────────────────────
// Company research
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/companies/:name/insight
pub async fn handle_company_insight(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(name): Path<String>,
) -> Result<Json<CompanyInsight>, AppError> {
    require("company", &name)?;
    let insight = company_insight(state.llm.as_ref(), &name).await?;
    Ok(Json(insight))
}
