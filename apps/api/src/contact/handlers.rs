//! Axum route handlers for the contact form and newsletter sign-up.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::contact::models::{notification_body, ContactInput, ContactMessageRow, SubscriberRow};
use crate::errors::AppError;
use crate::mail::OutgoingEmail;
use crate::state::AppState;
use crate::validation::normalize_email;

/// POST /api/v1/contact
///
/// The message is persisted first; the inbox notification is best-effort.
pub async fn handle_submit_contact(
    State(state): State<AppState>,
    Json(input): Json<ContactInput>,
) -> Result<(StatusCode, Json<ContactMessageRow>), AppError> {
    let contact = input.validate()?;

    let row = sqlx::query_as::<_, ContactMessageRow>(
        r#"
        INSERT INTO contact_messages (id, name, email, phone, subject, message, service)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(&contact.subject)
    .bind(&contact.message)
    .bind(&contact.service)
    .fetch_one(&state.db)
    .await?;

    info!("Stored contact message {}", row.id);

    if let Some(inbox) = &state.config.contact_inbox {
        let outgoing = OutgoingEmail {
            to: inbox.clone(),
            subject: format!("[Contact] {}", row.subject),
            body: notification_body(&row),
            reply_to: Some(row.email.clone()),
        };
        if let Err(e) = state.mailer.send(outgoing).await {
            warn!("Contact notification for {} not delivered: {e}", row.id);
        }
    }

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/contact
pub async fn handle_list_contacts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ContactMessageRow>>, AppError> {
    auth.require_admin()?;
    let rows = sqlx::query_as::<_, ContactMessageRow>(
        "SELECT * FROM contact_messages ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// POST /api/v1/newsletter
///
/// 201 for a new subscriber, 200 if the address was already on the list.
pub async fn handle_subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscriberRow>), AppError> {
    let email = normalize_email(&req.email)?;

    let inserted = sqlx::query_as::<_, SubscriberRow>(
        r#"
        INSERT INTO newsletter_subscribers (id, email)
        VALUES ($1, $2)
        ON CONFLICT (email) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;

    if let Some(row) = inserted {
        info!("New newsletter subscriber {}", row.id);
        return Ok((StatusCode::CREATED, Json(row)));
    }

    let existing = sqlx::query_as::<_, SubscriberRow>(
        "SELECT * FROM newsletter_subscribers WHERE email = $1",
    )
    .bind(&email)
    .fetch_one(&state.db)
    .await?;
    Ok((StatusCode::OK, Json(existing)))
}
