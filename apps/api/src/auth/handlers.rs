use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::auth::{AuthUser, CurrentUser, Session};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub id_token: String,
}

/// POST /api/v1/auth/session
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    if request.id_token.trim().is_empty() {
        return Err(AppError::Validation("idToken cannot be empty".to_string()));
    }
    let session = state.auth.sign_in(&request.id_token).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// DELETE /api/v1/auth/session
pub async fn handle_sign_out(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<StatusCode, AppError> {
    state.auth.sign_out(&current.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(current: CurrentUser) -> Json<AuthUser> {
    Json(current.user)
}
