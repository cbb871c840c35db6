use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::validation::require_text;

// Resume document as edited in the builder. Every field is optional on the
// wire so half-finished drafts can be saved and scored.

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExperienceItem {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EducationItem {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectItem {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CertificationItem {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectItem>,
    pub certifications: Vec<CertificationItem>,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResumeTemplate {
    #[default]
    Classic,
    Modern,
    Minimal,
    Executive,
}

impl ResumeTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeTemplate::Classic => "classic",
            ResumeTemplate::Modern => "modern",
            ResumeTemplate::Minimal => "minimal",
            ResumeTemplate::Executive => "executive",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub data: Json<ResumeData>,
    pub ats_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of POST /resumes and PUT /resumes/:id.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeInput {
    pub title: String,
    #[serde(default)]
    pub template: ResumeTemplate,
    #[serde(default)]
    pub data: ResumeData,
}

impl ResumeInput {
    /// Returns the trimmed title; the template is already constrained by serde.
    pub fn validated_title(&self) -> Result<String, AppError> {
        require_text("title", &self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_deserializes() {
        let data: ResumeData = serde_json::from_value(serde_json::json!({
            "personal_info": { "full_name": "Jane Doe" },
            "experience": [{ "title": "Engineer" }],
            "skills": ["Rust"]
        }))
        .unwrap();
        assert_eq!(data.personal_info.full_name, "Jane Doe");
        assert_eq!(data.personal_info.email, "");
        assert_eq!(data.experience[0].title, "Engineer");
        assert!(data.experience[0].achievements.is_empty());
        assert!(data.education.is_empty());
    }

    #[test]
    fn test_template_defaults_to_classic() {
        let input: ResumeInput =
            serde_json::from_value(serde_json::json!({ "title": "My CV" })).unwrap();
        assert_eq!(input.template, ResumeTemplate::Classic);
        assert_eq!(input.data, ResumeData::default());
    }

    #[test]
    fn test_unknown_template_rejected() {
        let parsed: Result<ResumeInput, _> =
            serde_json::from_value(serde_json::json!({ "title": "x", "template": "fancy" }));
        assert!(parsed.is_err());
    }
}
