//! Session JWTs and password-reset tokens.
//!
//! Reset flow: `ResetToken::generate()` yields a raw token (mailed to the user)
//! and its SHA-256 digest (stored). Lookup hashes the presented token and only
//! matches rows whose expiry is still in the future; success clears both fields.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::models::Role;
use crate::errors::AppError;

pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;
const RESET_TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 keys derived from `JWT_SECRET`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    pub fn issue(&self, user_id: Uuid, email: &str, role: Role) -> Result<String, AppError> {
        self.issue_at(user_id, email, role, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected session token: {e}");
                AppError::Unauthorized("Invalid or expired session token".to_string())
            })
    }
}

/// A freshly minted password-reset token. Only `hash` is ever persisted.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub raw: String,
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    pub fn generate(now: DateTime<Utc>) -> Self {
        let mut bytes = [0u8; RESET_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let raw: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        let hash = hash_reset_token(&raw);
        Self {
            raw,
            hash,
            expires_at: now + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        }
    }
}

pub fn hash_reset_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A stored token is usable only while `now` is strictly before its expiry.
pub fn reset_token_is_live(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(expires_at, Some(exp) if now < exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_shape() {
        let now = Utc::now();
        let token = ResetToken::generate(now);
        assert_eq!(token.raw.len(), RESET_TOKEN_BYTES * 2);
        assert!(token.raw.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token.hash, hash_reset_token(&token.raw));
        assert_ne!(token.raw, token.hash);
        assert_eq!(token.expires_at - now, Duration::hours(1));
    }

    #[test]
    fn test_reset_tokens_are_unique() {
        let now = Utc::now();
        assert_ne!(ResetToken::generate(now).raw, ResetToken::generate(now).raw);
    }

    #[test]
    fn test_hash_ignores_surrounding_whitespace() {
        assert_eq!(hash_reset_token("abc"), hash_reset_token(" abc\n"));
    }

    #[test]
    fn test_reset_token_expiry_boundary() {
        let now = Utc::now();
        let token = ResetToken::generate(now);
        assert!(reset_token_is_live(Some(token.expires_at), now));
        assert!(reset_token_is_live(
            Some(token.expires_at),
            now + Duration::minutes(59)
        ));
        assert!(!reset_token_is_live(Some(token.expires_at), token.expires_at));
        assert!(!reset_token_is_live(None, now));
    }

    #[test]
    fn test_jwt_issue_and_verify() {
        let keys = JwtKeys::new("test-secret", 24);
        let id = Uuid::new_v4();
        let token = keys.issue(id, "jane@example.com", Role::User).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_jwt_wrong_secret_rejected() {
        let token = JwtKeys::new("secret-a", 1)
            .issue(Uuid::new_v4(), "a@example.com", Role::Admin)
            .unwrap();
        let err = JwtKeys::new("secret-b", 1).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_jwt_expired_rejected() {
        let keys = JwtKeys::new("test-secret", 1);
        let issued = Utc::now() - Duration::hours(3);
        let token = keys
            .issue_at(Uuid::new_v4(), "a@example.com", Role::User, issued)
            .unwrap();
        assert!(keys.verify(&token).is_err());
    }
}
