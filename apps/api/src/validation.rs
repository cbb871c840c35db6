//! Request-field checks shared by every handler that accepts user input.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email regex is valid")
    })
}

/// Trims and lower-cases an email, rejecting anything that is not `local@domain.tld`.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::Validation("email is required".to_string()));
    }
    if !email_regex().is_match(&email) {
        return Err(AppError::Validation(format!("'{email}' is not a valid email address")));
    }
    Ok(email)
}

/// Returns the trimmed value, or a validation error naming `field` if blank.
pub fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

pub fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Treats blank optional strings as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Jane.Doe@Example.COM ").unwrap(),
            "jane.doe@example.com"
        );
    }

    #[test]
    fn test_normalize_email_accepts_plus_and_subdomain() {
        assert!(normalize_email("jane+jobs@mail.example.co.uk").is_ok());
    }

    #[test]
    fn test_normalize_email_rejects_garbage() {
        for bad in ["", "   ", "jane", "jane@", "@example.com", "jane@example", "ja ne@example.com"] {
            assert!(normalize_email(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("title", "  Engineer ").unwrap(), "Engineer");
        let err = require_text("title", "   ").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "title cannot be empty"));
    }

    #[test]
    fn test_password_length_counts_chars() {
        assert!(check_password("short").is_err());
        assert!(check_password("longenough").is_ok());
        assert!(check_password("ééééééé").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" x ".into())), Some("x".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
