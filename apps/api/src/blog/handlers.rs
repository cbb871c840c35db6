//! Axum route handlers for the Blog API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::blog::models::{BlogPostInput, BlogPostRow};
use crate::blog::store;
use crate::db::{Page, Pagination};
use crate::errors::AppError;
use crate::state::AppState;
use crate::validation::non_blank;

#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    pub tag: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/v1/blog
pub async fn handle_list_posts(
    State(state): State<AppState>,
    Query(params): Query<BlogListQuery>,
) -> Result<Json<Page<BlogPostRow>>, AppError> {
    let pagination = Pagination::new(params.page, params.per_page);
    let tag = non_blank(params.tag);
    let (items, total) = store::list_published(&state.db, tag.as_deref(), pagination).await?;
    Ok(Json(Page::new(items, pagination, total)))
}

/// GET /api/v1/blog/:slug
///
/// Admins can preview drafts; everyone else only sees published posts.
pub async fn handle_get_post(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPostRow>, AppError> {
    let include_drafts = auth.is_some_and(|a| a.require_admin().is_ok());
    Ok(Json(store::get_by_slug(&state.db, &slug, include_drafts).await?))
}

/// POST /api/v1/blog
pub async fn handle_create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<BlogPostInput>,
) -> Result<(StatusCode, Json<BlogPostRow>), AppError> {
    auth.require_admin()?;
    let post = store::insert_post(&state.db, &input.validate()?).await?;
    info!("Blog post '{}' created by {}", post.slug, auth.id);
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/v1/blog/:slug
pub async fn handle_update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(input): Json<BlogPostInput>,
) -> Result<Json<BlogPostRow>, AppError> {
    auth.require_admin()?;
    Ok(Json(
        store::update_post(&state.db, &slug, &input.validate()?).await?,
    ))
}

/// DELETE /api/v1/blog/:slug
pub async fn handle_delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    store::delete_post(&state.db, &slug).await?;
    info!("Blog post '{slug}' deleted by {}", auth.id);
    Ok(StatusCode::NO_CONTENT)
}
