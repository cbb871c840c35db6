//! Axum route handlers for the Auth API.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::auth::extractor::AuthUser;
use crate::auth::models::{Role, UserProfile, UserRow};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::store;
use crate::auth::tokens::{hash_reset_token, reset_token_is_live, ResetToken};
use crate::errors::AppError;
use crate::mail::OutgoingEmail;
use crate::state::AppState;
use crate::validation::{check_password, normalize_email, require_text};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_RESET_TOKEN: &str = "Password reset token is invalid or has expired";
const FORGOT_PASSWORD_ACK: &str =
    "If an account exists for that email, a password reset link has been sent";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let name = require_text("name", &req.name)?;
    let email = normalize_email(&req.email)?;
    check_password(&req.password)?;

    let password_hash = hash_password(&req.password).await?;
    let user = store::insert_user(&state.db, &name, &email, &password_hash, Role::User).await?;
    info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(session_for(&state, user)?)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&req.email)?;
    if req.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    let user = store::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;
    if !verify_password(&req.password, &user.password_hash).await {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    Ok(Json(session_for(&state, user)?))
}

/// GET /api/v1/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let user = store::find_by_id(&state.db, auth.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
    Ok(Json(user.into()))
}

/// POST /api/v1/auth/forgot-password
///
/// Always answers with the same message so the endpoint cannot be used to
/// probe which emails are registered.
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = normalize_email(&req.email)?;

    if let Some(user) = store::find_by_email(&state.db, &email).await? {
        let outcome = send_reset_link(&state, &user).await;
        return Ok(Json(acknowledge_reset_request(&user, outcome)));
    }

    Ok(Json(MessageResponse {
        message: FORGOT_PASSWORD_ACK.to_string(),
    }))
}

async fn send_reset_link(state: &AppState, user: &UserRow) -> Result<(), AppError> {
    let token = ResetToken::generate(Utc::now());
    store::store_reset_token(&state.db, user.id, &token.hash, token.expires_at).await?;

    let link = format!("{}/reset-password/{}", state.config.frontend_url, token.raw);
    state
        .mailer
        .send(OutgoingEmail {
            to: user.email.clone(),
            subject: "Reset your CareerDesk password".to_string(),
            body: reset_email_body(&user.name, &link),
            reply_to: None,
        })
        .await
}

/// Failures after the account lookup are only logged; the reply must match the
/// one given for unknown emails.
fn acknowledge_reset_request(user: &UserRow, outcome: Result<(), AppError>) -> MessageResponse {
    match outcome {
        Ok(()) => info!("Password reset requested for user {}", user.id),
        Err(e) => error!("Failed to issue password reset for user {}: {e}", user.id),
    }
    MessageResponse {
        message: FORGOT_PASSWORD_ACK.to_string(),
    }
}

/// POST /api/v1/auth/reset-password
pub async fn handle_reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.token.trim().is_empty() {
        return Err(AppError::Validation(INVALID_RESET_TOKEN.to_string()));
    }
    check_password(&req.password)?;

    let now = Utc::now();
    let token_hash = hash_reset_token(&req.token);
    let user = store::find_by_live_reset_token(&state.db, &token_hash, now)
        .await?
        .filter(|u| reset_token_is_live(u.reset_token_expires_at, now))
        .ok_or_else(|| AppError::Validation(INVALID_RESET_TOKEN.to_string()))?;

    let password_hash = hash_password(&req.password).await?;
    if !store::consume_reset_token(&state.db, user.id, &token_hash, &password_hash).await? {
        return Err(AppError::Validation(INVALID_RESET_TOKEN.to_string()));
    }

    info!("Password reset completed for user {}", user.id);
    Ok(Json(MessageResponse {
        message: "Password has been reset".to_string(),
    }))
}

fn session_for(state: &AppState, user: UserRow) -> Result<AuthResponse, AppError> {
    let token = state.jwt.issue(user.id, &user.email, user.role())?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

fn reset_email_body(name: &str, link: &str) -> String {
    format!(
        "Hi {name},\n\n\
         We received a request to reset your password. Use the link below within the next hour:\n\n\
         {link}\n\n\
         If you did not ask for this, you can ignore this email and your password will stay the same.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_email_contains_link() {
        let body = reset_email_body("Jane", "http://localhost:3000/reset-password/abc");
        assert!(body.starts_with("Hi Jane,"));
        assert!(body.contains("http://localhost:3000/reset-password/abc"));
        assert!(body.contains("hour"));
    }

    fn user() -> UserRow {
        UserRow {
            id: uuid::Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: String::new(),
            role: "user".to_string(),
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_reset_request_failures_keep_the_generic_reply() {
        let stored = acknowledge_reset_request(&user(), Ok(()));
        let db_failed =
            acknowledge_reset_request(&user(), Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let mail_failed =
            acknowledge_reset_request(&user(), Err(AppError::Mail("SMTP send failed".to_string())));

        assert_eq!(stored.message, FORGOT_PASSWORD_ACK);
        assert_eq!(db_failed.message, FORGOT_PASSWORD_ACK);
        assert_eq!(mail_failed.message, FORGOT_PASSWORD_ACK);
    }
}
