use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::job_search::{paginate, Page, RealJob, DEFAULT_PER_PAGE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn first_page() -> usize {
    1
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

/// GET /api/v1/jobs/search?query=&location=&page=&perPage=
pub async fn handle_search(
    State(state): State<AppState>,
    _current: CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<RealJob>>, AppError> {
    if params.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let jobs = state
        .job_search
        .search(&params.query, &params.location)
        .await?;

    Ok(Json(paginate(&jobs, params.page, params.per_page)))
}
