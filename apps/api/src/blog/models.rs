use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::validation::{non_blank, require_text};

pub const WORDS_PER_MINUTE: usize = 200;
pub const EXCERPT_MAX_CHARS: usize = 160;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogPostRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    pub reading_minutes: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostInput {
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidPost {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    pub reading_minutes: i32,
}

impl BlogPostInput {
    pub fn validate(self) -> Result<ValidPost, AppError> {
        let title = require_text("title", &self.title)?;
        let content = require_text("content", &self.content)?;
        let author = require_text("author", &self.author)?;
        if slugify(&title).is_empty() {
            return Err(AppError::Validation(
                "title must contain at least one letter or digit".to_string(),
            ));
        }

        let mut tags: Vec<String> = self
            .tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();

        let excerpt = non_blank(self.excerpt).unwrap_or_else(|| make_excerpt(&content));
        let reading_minutes = reading_minutes(&content);

        Ok(ValidPost {
            title,
            excerpt,
            content,
            author,
            tags,
            cover_image: non_blank(self.cover_image),
            published: self.published,
            reading_minutes,
        })
    }
}

/// Lower-case ASCII alphanumerics; every other run collapses to one `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// First free slug among `base`, `base-2`, `base-3`, …
pub fn unique_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.iter().any(|s| s == candidate))
        .unwrap_or_else(|| base.to_string())
}

pub fn reading_minutes(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as i32
}

/// Up to `EXCERPT_MAX_CHARS` characters, cut on a word boundary, with an ellipsis if truncated.
pub fn make_excerpt(content: &str) -> String {
    let normalized = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= EXCERPT_MAX_CHARS {
        return normalized;
    }
    let mut excerpt = String::new();
    for word in normalized.split(' ') {
        let extra = if excerpt.is_empty() { 0 } else { 1 };
        if excerpt.chars().count() + extra + word.chars().count() > EXCERPT_MAX_CHARS {
            break;
        }
        if extra == 1 {
            excerpt.push(' ');
        }
        excerpt.push_str(word);
    }
    if excerpt.is_empty() {
        excerpt = normalized.chars().take(EXCERPT_MAX_CHARS).collect();
    }
    excerpt.push('…');
    excerpt
}
