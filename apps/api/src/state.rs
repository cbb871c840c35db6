use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::tokens::JwtKeys;
use crate::config::Config;
use crate::mail::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Signing/verification keys for session tokens, derived once from `JWT_SECRET`.
    pub jwt: JwtKeys,
    /// Pluggable mail backend. SMTP when configured, log-only otherwise.
    pub mailer: Arc<dyn Mailer>,
}
