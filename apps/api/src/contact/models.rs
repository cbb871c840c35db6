use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::validation::{non_blank, normalize_email, require_text};

pub const MAX_MESSAGE_CHARS: usize = 5000;
pub const DEFAULT_SUBJECT: &str = "General enquiry";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessageRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub service: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriberRow {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    /// Which service the visitor is asking about (resume review, coaching, …).
    #[serde(default)]
    pub service: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub service: Option<String>,
}

impl ContactInput {
    pub fn validate(self) -> Result<ValidContact, AppError> {
        let name = require_text("name", &self.name)?;
        let email = normalize_email(&self.email)?;
        let message = require_text("message", &self.message)?;
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::Validation(format!(
                "message cannot exceed {MAX_MESSAGE_CHARS} characters"
            )));
        }
        Ok(ValidContact {
            name,
            email,
            phone: non_blank(self.phone),
            subject: non_blank(self.subject).unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            message,
            service: non_blank(self.service),
        })
    }
}

/// Plain-text notification sent to the site inbox for a new enquiry.
pub fn notification_body(msg: &ContactMessageRow) -> String {
    let mut body = format!(
        "New contact form submission\n\nFrom: {} <{}>\n",
        msg.name, msg.email
    );
    if let Some(phone) = &msg.phone {
        body.push_str(&format!("Phone: {phone}\n"));
    }
    if let Some(service) = &msg.service {
        body.push_str(&format!("Service: {service}\n"));
    }
    body.push_str(&format!("Subject: {}\n\n{}\n", msg.subject, msg.message));
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ContactInput {
        ContactInput {
            name: " Jane ".into(),
            email: "Jane@Example.com".into(),
            phone: Some("  ".into()),
            subject: None,
            message: "I'd like a resume review.".into(),
            service: Some("resume_review".into()),
        }
    }

    #[test]
    fn test_validate_defaults_subject() {
        let c = input().validate().unwrap();
        assert_eq!(c.name, "Jane");
        assert_eq!(c.email, "jane@example.com");
        assert_eq!(c.subject, DEFAULT_SUBJECT);
        assert_eq!(c.phone, None);
    }

    #[test]
    fn test_validate_message_limits() {
        let mut c = input();
        c.message = "   ".into();
        assert!(c.validate().is_err());

        let mut c = input();
        c.message = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(c.validate().is_err());

        let mut c = input();
        c.message = "a".repeat(MAX_MESSAGE_CHARS);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_notification_body() {
        let row = ContactMessageRow {
            id: Uuid::new_v4(),
            name: "Jane".into(),
            email: "jane@example.com".into(),
            phone: None,
            subject: "Coaching".into(),
            message: "Hello".into(),
            service: Some("coaching".into()),
            created_at: Utc::now(),
        };
        let body = notification_body(&row);
        assert!(body.contains("From: Jane <jane@example.com>"));
        assert!(body.contains("Service: coaching"));
        assert!(!body.contains("Phone:"));
        assert!(body.trim_end().ends_with("Hello"));
    }
}
