use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::local_store::{ExternalJob, NewExternalJob, NewResume, ResumePatch, StoredResume};
use crate::state::AppState;

fn resume_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Json<Vec<StoredResume>> {
    Json(state.resumes.list(current.uid()).await)
}

/// POST /api/v1/resumes
pub async fn handle_add_resume(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<NewResume>,
) -> Result<(StatusCode, Json<StoredResume>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let resume = state.resumes.add(current.uid(), req).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ResumePatch>,
) -> Result<Json<StoredResume>, AppError> {
    state
        .resumes
        .update(current.uid(), id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| resume_not_found(id))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.resumes.delete(current.uid(), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(resume_not_found(id))
    }
}

/// POST /api/v1/resumes/:id/primary
pub async fn handle_set_primary_resume(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredResume>, AppError> {
    state
        .resumes
        .set_primary(current.uid(), id)
        .await?
        .map(Json)
        .ok_or_else(|| resume_not_found(id))
}

// ────────────────────────────────────────────────────────────────────────────
// External jobs
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/external-jobs
pub async fn handle_list_external_jobs(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Json<Vec<ExternalJob>> {
    Json(state.external_jobs.list(current.uid()).await)
}

/// POST /api/v1/external-jobs
pub async fn handle_add_external_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<NewExternalJob>,
) -> Result<(StatusCode, Json<ExternalJob>), AppError> {
    if req.title.trim().is_empty() || req.company.trim().is_empty() {
        return Err(AppError::Validation(
            "title and company are required".to_string(),
        ));
    }
    let job = state.external_jobs.add(current.uid(), req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// DELETE /api/v1/external-jobs/:id
pub async fn handle_delete_external_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.external_jobs.delete(current.uid(), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Job {id} not found")))
    }
}
