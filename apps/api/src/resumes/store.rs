use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resumes::models::{ResumeData, ResumeRow, ResumeTemplate};

pub struct ResumeWrite<'a> {
    pub title: &'a str,
    pub template: ResumeTemplate,
    pub data: &'a ResumeData,
    pub ats_score: i32,
}

pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
    Ok(sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Fetches a resume owned by `user_id`. Other users' resumes read as not found.
pub async fn get_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

pub async fn insert(
    pool: &PgPool,
    user_id: Uuid,
    write: ResumeWrite<'_>,
) -> Result<ResumeRow, AppError> {
    Ok(sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, title, template, data, ats_score)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(write.title)
    .bind(write.template.as_str())
    .bind(Json(write.data))
    .bind(write.ats_score)
    .fetch_one(pool)
    .await?)
}

pub async fn update_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    write: ResumeWrite<'_>,
) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET title = $3, template = $4, data = $5, ats_score = $6, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(write.title)
    .bind(write.template.as_str())
    .bind(Json(write.data))
    .bind(write.ats_score)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

pub async fn delete_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(())
}
