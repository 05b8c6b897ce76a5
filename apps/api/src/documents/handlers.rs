use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::documents::{
    ApplicationPatch, ApplicationStats, CloudResume, CloudResumePatch, JobApplication,
    NewApplication, NewCloudResume,
};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<JobApplication>>, AppError> {
    let apps = state.documents.list_applications(current.uid()).await?;
    Ok(Json(apps))
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<NewApplication>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    if req.job_title.trim().is_empty() || req.company.trim().is_empty() {
        return Err(AppError::Validation(
            "jobTitle and company are required".to_string(),
        ));
    }
    let app = state.documents.save_application(current.uid(), req).await?;
    Ok((StatusCode::CREATED, Json(app)))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ApplicationPatch>,
) -> Result<Json<JobApplication>, AppError> {
    state
        .documents
        .update_application(current.uid(), id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.documents.delete_application(current.uid(), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Application {id} not found")))
    }
}

/// GET /api/v1/applications/stats
pub async fn handle_application_stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApplicationStats>, AppError> {
    let stats = state.documents.application_stats(current.uid()).await?;
    Ok(Json(stats))
}

// ────────────────────────────────────────────────────────────────────────────
// Cloud resumes
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/cloud-resumes
pub async fn handle_list_cloud_resumes(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<CloudResume>>, AppError> {
    let resumes = state.documents.list_resumes(current.uid()).await?;
    Ok(Json(resumes))
}

/// POST /api/v1/cloud-resumes
pub async fn handle_create_cloud_resume(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<NewCloudResume>,
) -> Result<(StatusCode, Json<CloudResume>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let resume = state.documents.save_resume(current.uid(), req).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// PATCH /api/v1/cloud-resumes/:id
pub async fn handle_update_cloud_resume(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<CloudResumePatch>,
) -> Result<Json<CloudResume>, AppError> {
    state
        .documents
        .update_resume(current.uid(), id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// DELETE /api/v1/cloud-resumes/:id
pub async fn handle_delete_cloud_resume(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.documents.delete_resume(current.uid(), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Resume {id} not found")))
    }
}

/// POST /api/v1/cloud-resumes/:id/primary
pub async fn handle_set_primary_cloud_resume(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.documents.set_primary_resume(current.uid(), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Resume {id} not found")))
    }
}
