use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub port: u16,
    pub rust_log: String,
    /// Base URL of the website, used to build links in outbound mail.
    pub frontend_url: String,
    pub cors_origin: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub mail_from: String,
    /// Where contact-form notifications go. `None` disables them.
    pub contact_inbox: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let smtp = match optional_env("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse::<u16>()
                    .context("SMTP_PORT must be a valid port number")?,
                username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
                password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            }),
            None => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            jwt_ttl_hours: std::env::var("JWT_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse::<i64>()
                .context("JWT_TTL_HOURS must be an integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            cors_origin: optional_env("CORS_ORIGIN"),
            smtp,
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@careerdesk.local".to_string()),
            contact_inbox: optional_env("CONTACT_INBOX"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
