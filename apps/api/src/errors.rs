use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::job_search::JobSearchError;
use crate::llm_client::{user_facing_message, LlmError};
use crate::local_store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// A required external-service key is missing. Carries a user-facing message.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// External AI call failed. Carries a user-facing message.
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Capacity { .. } => AppError::CapacityExceeded(e.to_string()),
            StoreError::Write(_) | StoreError::Serialize(_) => AppError::Storage(e.to_string()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        let message = user_facing_message(&e).to_string();
        match e {
            LlmError::MissingApiKey => AppError::Configuration(message),
            other => {
                tracing::error!("LLM call failed: {other}");
                AppError::Llm(message)
            }
        }
    }
}

impl From<JobSearchError> for AppError {
    fn from(e: JobSearchError) -> Self {
        match e {
            JobSearchError::MissingApiKey => AppError::Configuration(
                "Job search is not configured. Add a JSearch API key to enable it.".to_string(),
            ),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidToken(reason) => {
                tracing::warn!("Rejected sign-in token: {reason}");
                AppError::Unauthorized
            }
            AuthError::Provider(e) => AppError::Internal(anyhow::anyhow!(
                "Identity provider request failed: {e}"
            )),
            AuthError::Storage(e) => AppError::Storage(e.to_string()),
            AuthError::Serialize(e) => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::CapacityExceeded(msg) => {
                (StatusCode::CONFLICT, "CAPACITY_EXCEEDED", msg.clone())
            }
            AppError::Configuration(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CONFIGURATION_ERROR",
                msg.clone(),
            ),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORAGE_ERROR",
                    "Your changes could not be saved. Please try again.".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_maps_to_conflict() {
        let err: AppError = StoreError::Capacity {
            collection: "resumes",
            max: 5,
        }
        .into();
        assert!(matches!(err, AppError::CapacityExceeded(ref m) if m.contains("maximum 5")));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let err: AppError = LlmError::MissingApiKey.into();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_llm_failure_hides_provider_details() {
        let err: AppError = LlmError::Api {
            status: 429,
            message: "quota exhausted for project 1234".to_string(),
        }
        .into();
        match &err {
            AppError::Llm(msg) => assert!(!msg.contains("1234")),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
