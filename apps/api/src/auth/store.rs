use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::models::{Role, UserRow};
use crate::errors::{conflict_on_unique, AppError};

pub async fn insert_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "An account with this email already exists"))
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, AppError> {
    Ok(
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, AppError> {
    Ok(
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Stores a reset token digest, replacing any earlier outstanding token.
pub async fn store_reset_token(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE users
        SET reset_token_hash = $1, reset_token_expires_at = $2, updated_at = NOW()
        WHERE id = $3
        "#,
    )
    .bind(token_hash)
    .bind(expires_at)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Finds the user owning a still-live reset token.
pub async fn find_by_live_reset_token(
    pool: &PgPool,
    token_hash: &str,
    now: DateTime<Utc>,
) -> Result<Option<UserRow>, AppError> {
    Ok(sqlx::query_as::<_, UserRow>(
        "SELECT * FROM users WHERE reset_token_hash = $1 AND reset_token_expires_at > $2",
    )
    .bind(token_hash)
    .bind(now)
    .fetch_optional(pool)
    .await?)
}

/// Sets the new password and clears the token in one statement.
/// Returns `false` if the token was consumed concurrently.
pub async fn consume_reset_token(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: &str,
    new_password_hash: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $1,
            reset_token_hash = NULL,
            reset_token_expires_at = NULL,
            updated_at = NOW()
        WHERE id = $2 AND reset_token_hash = $3
        "#,
    )
    .bind(new_password_hash)
    .bind(user_id)
    .bind(token_hash)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}
