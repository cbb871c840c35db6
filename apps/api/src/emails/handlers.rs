//! Axum route handlers for the email builder.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::emails::models::{SavedEmailInput, SavedEmailRow};
use crate::emails::templates::{catalog, find_template, render, EmailTemplate, RenderedEmail};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

/// GET /api/v1/email-templates
pub async fn handle_list_templates() -> Json<Vec<EmailTemplate>> {
    Json(catalog())
}

/// POST /api/v1/email-templates/:id/render
pub async fn handle_render_template(
    Path(id): Path<String>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderedEmail>, AppError> {
    let template =
        find_template(&id).ok_or_else(|| AppError::NotFound(format!("Template '{id}' not found")))?;
    Ok(Json(render(&template, &req.fields)))
}

/// GET /api/v1/emails
pub async fn handle_list_emails(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SavedEmailRow>>, AppError> {
    let rows = sqlx::query_as::<_, SavedEmailRow>(
        "SELECT * FROM saved_emails WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(auth.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// POST /api/v1/emails
pub async fn handle_create_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SavedEmailInput>,
) -> Result<(StatusCode, Json<SavedEmailRow>), AppError> {
    let email = input.validate()?;
    let row = sqlx::query_as::<_, SavedEmailRow>(
        r#"
        INSERT INTO saved_emails (id, user_id, template_id, subject, body)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth.id)
    .bind(&email.template_id)
    .bind(&email.subject)
    .bind(&email.body)
    .fetch_one(&state.db)
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/emails/:id
pub async fn handle_get_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SavedEmailRow>, AppError> {
    let row = sqlx::query_as::<_, SavedEmailRow>(
        "SELECT * FROM saved_emails WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(auth.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Email {id} not found")))?;
    Ok(Json(row))
}

/// PUT /api/v1/emails/:id
pub async fn handle_update_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<SavedEmailInput>,
) -> Result<Json<SavedEmailRow>, AppError> {
    let email = input.validate()?;
    let row = sqlx::query_as::<_, SavedEmailRow>(
        r#"
        UPDATE saved_emails
        SET template_id = $3, subject = $4, body = $5, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(auth.id)
    .bind(&email.template_id)
    .bind(&email.subject)
    .bind(&email.body)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Email {id} not found")))?;
    Ok(Json(row))
}

/// DELETE /api/v1/emails/:id
pub async fn handle_delete_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM saved_emails WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Email {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
