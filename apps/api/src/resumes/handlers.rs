//! Axum route handlers for the resume builder and ATS scoring.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::resumes::ats::{parse_keyword_list, score_resume, AtsReport};
use crate::resumes::models::{ResumeData, ResumeInput, ResumeRow};
use crate::resumes::store::{self, ResumeWrite};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AtsScoreRequest {
    #[serde(default)]
    pub resume: ResumeData,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsQuery {
    pub keywords: Option<String>,
}

/// POST /api/v1/resumes/ats-score
///
/// Scores an unsaved resume. Public so the builder can preview as the user types.
pub async fn handle_ats_preview(
    Json(req): Json<AtsScoreRequest>,
) -> Result<Json<AtsReport>, AppError> {
    Ok(Json(score_resume(&req.resume, &req.keywords)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(store::list_for_user(&state.db, auth.id).await?))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ResumeInput>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let title = input.validated_title()?;
    let report = score_resume(&input.data, &[]);
    let resume = store::insert(
        &state.db,
        auth.id,
        ResumeWrite {
            title: &title,
            template: input.template,
            data: &input.data,
            ats_score: report.score as i32,
        },
    )
    .await?;
    info!(
        "Resume {} created for user {} (ats {})",
        resume.id, auth.id, resume.ats_score
    );
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(store::get_owned(&state.db, id, auth.id).await?))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<ResumeInput>,
) -> Result<Json<ResumeRow>, AppError> {
    let title = input.validated_title()?;
    let report = score_resume(&input.data, &[]);
    let resume = store::update_owned(
        &state.db,
        id,
        auth.id,
        ResumeWrite {
            title: &title,
            template: input.template,
            data: &input.data,
            ats_score: report.score as i32,
        },
    )
    .await?;
    Ok(Json(resume))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::delete_owned(&state.db, id, auth.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/resumes/:id/ats-score?keywords=a,b
pub async fn handle_resume_ats(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<KeywordsQuery>,
) -> Result<Json<AtsReport>, AppError> {
    let resume = store::get_owned(&state.db, id, auth.id).await?;
    let keywords = parse_keyword_list(params.keywords.as_deref());
    Ok(Json(score_resume(&resume.data, &keywords)))
}
