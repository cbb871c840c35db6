mod auth;
mod blog;
mod config;
mod contact;
mod db;
mod emails;
mod errors;
mod jobs;
mod mail;
mod resumes;
mod routes;
mod state;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::tokens::JwtKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::mail::{LogMailer, Mailer, SmtpMailer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerDesk API v{}", env!("CARGO_PKG_VERSION"));

    // rustls needs a process-wide crypto provider before lettre opens TLS
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize mailer (SMTP if configured, log-only otherwise)
    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            info!("SMTP mailer configured for {}:{}", smtp.host, smtp.port);
            Arc::new(SmtpMailer::new(smtp, config.mail_from.clone())?)
        }
        None => {
            warn!("SMTP_HOST not set; outgoing email will only be logged");
            Arc::new(LogMailer)
        }
    };

    let jwt = JwtKeys::new(&config.jwt_secret, config.jwt_ttl_hours);
    let cors = build_cors(&config)?;

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        jwt,
        mailer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Restricts CORS to the website origin when `CORS_ORIGIN` is set.
fn build_cors(config: &Config) -> Result<CorsLayer> {
    let Some(origin) = &config.cors_origin else {
        warn!("CORS_ORIGIN not set; allowing any origin");
        return Ok(CorsLayer::permissive());
    };

    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("CORS_ORIGIN '{origin}' is not a valid header value"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}
