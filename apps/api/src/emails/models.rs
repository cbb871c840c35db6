use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::emails::templates::find_template;
use crate::errors::AppError;
use crate::validation::{non_blank, require_text};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedEmailRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_id: Option<String>,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedEmailInput {
    #[serde(default)]
    pub template_id: Option<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidEmail {
    pub template_id: Option<String>,
    pub subject: String,
    pub body: String,
}

impl SavedEmailInput {
    pub fn validate(self) -> Result<ValidEmail, AppError> {
        let subject = require_text("subject", &self.subject)?;
        let body = require_text("body", &self.body)?;
        let template_id = non_blank(self.template_id);
        if let Some(id) = &template_id {
            if find_template(id).is_none() {
                return Err(AppError::Validation(format!("Unknown template '{id}'")));
            }
        }
        Ok(ValidEmail {
            template_id,
            subject,
            body,
        })
    }
}
