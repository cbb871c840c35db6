#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Unknown role strings degrade to `User`.
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }
}

/// The user as returned to clients. Never carries credentials.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        let role = row.role();
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("superuser"), Role::User);
        assert_eq!(Role::parse(Role::Admin.as_str()), Role::Admin);
    }

    #[test]
    fn test_profile_serialization_omits_secrets() {
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: "admin".into(),
            reset_token_hash: Some("deadbeef".into()),
            reset_token_expires_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(UserProfile::from(row)).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("reset_token_hash").is_none());
    }
}
