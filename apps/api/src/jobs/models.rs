use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::validation::{non_blank, require_text};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Remote => "remote",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub category: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub description: String,
    pub requirements: Vec<String>,
    pub apply_url: Option<String>,
    pub is_active: bool,
    pub posted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of POST /jobs and PUT /jobs/:id.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInput {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub apply_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A `JobInput` that passed validation, with text fields trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    pub category: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub description: String,
    pub requirements: Vec<String>,
    pub apply_url: Option<String>,
    pub is_active: bool,
}

impl JobInput {
    pub fn validate(self) -> Result<ValidJob, AppError> {
        let title = require_text("title", &self.title)?;
        let company = require_text("company", &self.company)?;
        let location = require_text("location", &self.location)?;
        let description = require_text("description", &self.description)?;

        for (field, value) in [("salary_min", self.salary_min), ("salary_max", self.salary_max)] {
            if matches!(value, Some(v) if v < 0) {
                return Err(AppError::Validation(format!("{field} cannot be negative")));
            }
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(AppError::Validation(
                    "salary_min cannot exceed salary_max".to_string(),
                ));
            }
        }

        let requirements = self
            .requirements
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        Ok(ValidJob {
            title,
            company,
            location,
            job_type: self.job_type,
            category: non_blank(self.category)
                .map(|c| c.to_lowercase())
                .unwrap_or_else(|| "general".to_string()),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            description,
            requirements,
            apply_url: non_blank(self.apply_url),
            is_active: self.is_active,
        })
    }
}
