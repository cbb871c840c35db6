//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db::{Page, Pagination};
use crate::errors::AppError;
use crate::jobs::models::{JobInput, JobRow, JobType};
use crate::jobs::store::{self, JobFilter};
use crate::state::AppState;
use crate::validation::non_blank;

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub q: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub category: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Page<JobRow>>, AppError> {
    let pagination = Pagination::new(params.page, params.per_page);
    let filter = JobFilter {
        q: non_blank(params.q),
        location: non_blank(params.location),
        job_type: params.job_type,
        category: non_blank(params.category),
    };
    let (items, total) = store::list_jobs(&state.db, &filter, pagination).await?;
    Ok(Json(Page::new(items, pagination, total)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(store::get_job(&state.db, id).await?))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<JobInput>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    auth.require_admin()?;
    let job = store::insert_job(&state.db, &input.validate()?).await?;
    info!("Job {} posted by {}", job.id, auth.id);
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<JobInput>,
) -> Result<Json<JobRow>, AppError> {
    auth.require_admin()?;
    Ok(Json(store::update_job(&state.db, id, &input.validate()?).await?))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    store::delete_job(&state.db, id).await?;
    info!("Job {id} deleted by {}", auth.id);
    Ok(StatusCode::NO_CONTENT)
}
