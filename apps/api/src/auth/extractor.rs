use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

/// The signed-in user, resolved from `Authorization: Bearer <session token>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: AuthUser,
    pub token: String,
}

impl CurrentUser {
    /// Owner key for per-user collections.
    pub fn uid(&self) -> &str {
        &self.user.uid
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?.to_string();
        let user = state
            .auth
            .current_user(&token)
            .await
            .ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser { user, token })
    }
}
