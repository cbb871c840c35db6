//! ATS (Applicant Tracking System) readiness score.
//!
//! A fixed point table over presence, length and count checks on the resume
//! sections, plus a bonus for target keywords. One linear pass, no state. The
//! raw total can reach 115; the reported score is capped at 100.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::resumes::models::ResumeData;

pub const MAX_SCORE: u32 = 100;

const PERSONAL_NAME: u32 = 5;
const PERSONAL_EMAIL: u32 = 5;
const PERSONAL_PHONE: u32 = 5;
const PERSONAL_LOCATION: u32 = 3;
const PERSONAL_LINK: u32 = 2;

const SUMMARY_PRESENT: u32 = 5;
const SUMMARY_DETAILED: u32 = 5;
const SUMMARY_DETAILED_CHARS: usize = 150;

const EXPERIENCE_PRESENT: u32 = 15;
const EXPERIENCE_DEPTH: u32 = 5;
const EXPERIENCE_DEPTH_ENTRIES: usize = 3;
const EXPERIENCE_ENTRY_DETAIL: u32 = 2;
const EXPERIENCE_ENTRY_DETAIL_CAP: u32 = 10;
const EXPERIENCE_DESCRIPTION_CHARS: usize = 50;
const EXPERIENCE_MIN_ACHIEVEMENTS: usize = 2;

const EDUCATION_PRESENT: u32 = 10;

/// Cumulative (minimum skill count, points) tiers.
const SKILL_TIERS: &[(usize, u32)] = &[(1, 5), (5, 5), (10, 5)];

const PROJECTS_PRESENT: u32 = 5;
const CERTIFICATIONS_PRESENT: u32 = 5;

const KEYWORD_POINTS: u32 = 2;
const KEYWORD_CAP: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtsSection {
    pub section: String,
    pub earned: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    /// Capped score, 0 to 100.
    pub score: u32,
    pub max_score: u32,
    /// Uncapped sum of `breakdown`.
    pub raw_total: u32,
    pub breakdown: Vec<AtsSection>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

fn present(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Scores a resume against the fixed point table and an optional keyword list.
pub fn score_resume(data: &ResumeData, keywords: &[String]) -> AtsReport {
    let mut breakdown = Vec::with_capacity(8);
    let mut suggestions = Vec::new();

    // Personal info
    let info = &data.personal_info;
    let mut earned = 0;
    for (value, points, label) in [
        (&info.full_name, PERSONAL_NAME, "full name"),
        (&info.email, PERSONAL_EMAIL, "email address"),
        (&info.phone, PERSONAL_PHONE, "phone number"),
        (&info.location, PERSONAL_LOCATION, "location"),
    ] {
        if present(value) {
            earned += points;
        } else {
            suggestions.push(format!("Add your {label} to the contact section"));
        }
    }
    if present(&info.linkedin) || present(&info.website) {
        earned += PERSONAL_LINK;
    } else {
        suggestions.push("Add a LinkedIn profile or personal website link".to_string());
    }
    breakdown.push(section(
        "personal_info",
        earned,
        PERSONAL_NAME + PERSONAL_EMAIL + PERSONAL_PHONE + PERSONAL_LOCATION + PERSONAL_LINK,
    ));

    // Summary
    let summary_len = data.summary.trim().chars().count();
    let mut earned = 0;
    if summary_len > 0 {
        earned += SUMMARY_PRESENT;
        if summary_len >= SUMMARY_DETAILED_CHARS {
            earned += SUMMARY_DETAILED;
        } else {
            suggestions.push(format!(
                "Expand your summary to at least {SUMMARY_DETAILED_CHARS} characters"
            ));
        }
    } else {
        suggestions.push("Add a professional summary".to_string());
    }
    breakdown.push(section("summary", earned, SUMMARY_PRESENT + SUMMARY_DETAILED));

    // Experience
    let mut earned = 0;
    let entries = data.experience.len();
    if entries >= 1 {
        earned += EXPERIENCE_PRESENT;
    } else {
        suggestions.push("Add at least one work experience entry".to_string());
    }
    if entries >= EXPERIENCE_DEPTH_ENTRIES {
        earned += EXPERIENCE_DEPTH;
    } else if entries >= 1 {
        suggestions.push(format!(
            "List at least {EXPERIENCE_DEPTH_ENTRIES} positions to show career progression"
        ));
    }
    let detailed = data
        .experience
        .iter()
        .filter(|e| {
            e.description.trim().chars().count() >= EXPERIENCE_DESCRIPTION_CHARS
                || e.achievements.iter().filter(|a| present(a)).count()
                    >= EXPERIENCE_MIN_ACHIEVEMENTS
        })
        .count() as u32;
    let detail_points = (detailed * EXPERIENCE_ENTRY_DETAIL).min(EXPERIENCE_ENTRY_DETAIL_CAP);
    earned += detail_points;
    if entries >= 1 && detail_points < EXPERIENCE_ENTRY_DETAIL_CAP {
        if (detailed as usize) < entries {
            suggestions.push(format!(
                "Describe each role in at least {EXPERIENCE_DESCRIPTION_CHARS} characters or list {EXPERIENCE_MIN_ACHIEVEMENTS}+ achievements"
            ));
        } else {
            suggestions.push(format!(
                "Add more detailed roles: up to {} described positions count toward your score",
                EXPERIENCE_ENTRY_DETAIL_CAP / EXPERIENCE_ENTRY_DETAIL
            ));
        }
    }
    breakdown.push(section(
        "experience",
        earned,
        EXPERIENCE_PRESENT + EXPERIENCE_DEPTH + EXPERIENCE_ENTRY_DETAIL_CAP,
    ));

    // Education
    let earned = if data.education.is_empty() {
        suggestions.push("Add your education".to_string());
        0
    } else {
        EDUCATION_PRESENT
    };
    breakdown.push(section("education", earned, EDUCATION_PRESENT));

    // Skills
    let skill_count = data.skills.iter().filter(|s| present(s)).count();
    let earned: u32 = SKILL_TIERS
        .iter()
        .filter(|(min, _)| skill_count >= *min)
        .map(|(_, points)| points)
        .sum();
    let skills_max: u32 = SKILL_TIERS.iter().map(|(_, points)| points).sum();
    if let Some((next, _)) = SKILL_TIERS.iter().find(|(min, _)| skill_count < *min) {
        if *next <= 1 {
            suggestions.push("Add a skills section with your key skills".to_string());
        } else {
            suggestions.push(format!("List at least {next} relevant skills"));
        }
    }
    breakdown.push(section("skills", earned, skills_max));

    // Projects and certifications
    let earned = if data.projects.is_empty() {
        suggestions.push("Showcase at least one project".to_string());
        0
    } else {
        PROJECTS_PRESENT
    };
    breakdown.push(section("projects", earned, PROJECTS_PRESENT));

    let earned = if data.certifications.is_empty() {
        suggestions.push("Add relevant certifications".to_string());
        0
    } else {
        CERTIFICATIONS_PRESENT
    };
    breakdown.push(section("certifications", earned, CERTIFICATIONS_PRESENT));

    // Keywords
    let (matched_keywords, missing_keywords) = match_keywords(data, keywords);
    let earned = (matched_keywords.len() as u32 * KEYWORD_POINTS).min(KEYWORD_CAP);
    if !missing_keywords.is_empty() {
        suggestions.push(format!(
            "Work these job keywords into your resume: {}",
            missing_keywords.join(", ")
        ));
    } else if matched_keywords.is_empty() {
        suggestions.push("Check your resume against the keywords of a job description".to_string());
    } else if earned < KEYWORD_CAP {
        suggestions.push("Cover more of the job description's keywords".to_string());
    }
    breakdown.push(section("keywords", earned, KEYWORD_CAP));

    let raw_total: u32 = breakdown.iter().map(|s| s.earned).sum();

    AtsReport {
        score: raw_total.min(MAX_SCORE),
        max_score: MAX_SCORE,
        raw_total,
        breakdown,
        matched_keywords,
        missing_keywords,
        suggestions,
    }
}

fn section(name: &str, earned: u32, max: u32) -> AtsSection {
    AtsSection {
        section: name.to_string(),
        earned,
        max,
    }
}

/// Splits the normalized, de-duplicated keywords into (found, not found).
fn match_keywords(data: &ResumeData, keywords: &[String]) -> (Vec<String>, Vec<String>) {
    let wanted: BTreeSet<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if wanted.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let corpus = resume_text(data).to_lowercase();
    wanted.into_iter().partition(|k| corpus.contains(k.as_str()))
}

/// Every free-text field of the resume, newline-joined.
fn resume_text(data: &ResumeData) -> String {
    let info = &data.personal_info;
    let mut parts: Vec<&str> = vec![
        info.full_name.as_str(),
        info.email.as_str(),
        info.phone.as_str(),
        info.location.as_str(),
        info.linkedin.as_str(),
        info.website.as_str(),
        data.summary.as_str(),
    ];
    for e in &data.experience {
        parts.extend([
            e.title.as_str(),
            e.company.as_str(),
            e.location.as_str(),
            e.description.as_str(),
        ]);
        parts.extend(e.achievements.iter().map(String::as_str));
    }
    for e in &data.education {
        parts.extend([e.institution.as_str(), e.degree.as_str(), e.field.as_str()]);
    }
    parts.extend(data.skills.iter().map(String::as_str));
    for p in &data.projects {
        parts.extend([p.name.as_str(), p.description.as_str(), p.link.as_str()]);
        parts.extend(p.technologies.iter().map(String::as_str));
    }
    for c in &data.certifications {
        parts.extend([c.name.as_str(), c.issuer.as_str(), c.date.as_str()]);
    }
    parts.extend(data.languages.iter().map(String::as_str));
    parts.join("\n")
}

/// Parses a comma-separated `keywords` query parameter.
pub fn parse_keyword_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
