//! Outbound mail. Every email the API sends goes through `Mailer`.
//!
//! `AppState` holds an `Arc<dyn Mailer>`, chosen at startup: `SmtpMailer` when
//! `SMTP_HOST` is set, `LogMailer` otherwise.

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::config::SmtpConfig;
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub reply_to: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError>;
}

// ── SMTP ────────────────────────────────────────────────────────────

pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, from: String) -> Result<Self, AppError> {
        let mut builder = SmtpTransport::starttls_relay(&config.host)
            .map_err(|e| AppError::Mail(format!("SMTP relay error: {e}")))?
            .port(config.port);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, AppError> {
        let mut builder = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| AppError::Mail(format!("Invalid from address: {e}")))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| AppError::Mail(format!("Invalid to address: {e}")))?)
            .subject(email.subject.clone());

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(
                reply_to
                    .parse()
                    .map_err(|e| AppError::Mail(format!("Invalid reply-to address: {e}")))?,
            );
        }

        builder
            .body(email.body.clone())
            .map_err(|e| AppError::Mail(format!("Failed to build email: {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        let message = self.build_message(&email)?;
        let transport = self.transport.clone();

        // lettre's SmtpTransport is blocking
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| AppError::Mail(format!("SMTP task failed: {e}")))?
            .map_err(|e| AppError::Mail(format!("SMTP send failed: {e}")))?;

        info!("Email sent to {}", email.to);
        Ok(())
    }
}

// ── Log-only ────────────────────────────────────────────────────────

/// Development mailer: writes the message to the log instead of sending it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        info!(
            to = %email.to,
            subject = %email.subject,
            "SMTP not configured; email not sent:\n{}",
            email.body
        );
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Captures outgoing mail so tests can assert on it.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp() -> SmtpMailer {
        let _ = rustls::crypto::ring::default_provider().install_default();
        SmtpMailer::new(
            &SmtpConfig {
                host: "smtp.example.com".to_string(),
                port: 587,
                username: "user".to_string(),
                password: "secret".to_string(),
            },
            "CareerDesk <no-reply@example.com>".to_string(),
        )
        .unwrap()
    }

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            to: to.to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
            reply_to: Some("visitor@example.com".to_string()),
        }
    }

    #[test]
    fn test_build_message_valid() {
        assert!(smtp().build_message(&email("jane@example.com")).is_ok());
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let err = smtp().build_message(&email("not an address")).unwrap_err();
        assert!(matches!(err, AppError::Mail(msg) if msg.contains("to address")));
    }

    #[tokio::test]
    async fn test_log_mailer_never_fails() {
        assert!(LogMailer.send(email("jane@example.com")).await.is_ok());
    }
}
