//! Built-in email templates for the email builder.
//!
//! Placeholders are written `{{key}}`. Rendering substitutes the supplied
//! fields and leaves unknown placeholders untouched so the user can see what
//! is still missing.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct EmailTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub subject: &'static str,
    pub body: &'static str,
    pub placeholders: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
    pub missing: Vec<String>,
}

const TEMPLATES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "cover_letter",
        "Cover Letter",
        "application",
        "Application for {{job_title}} at {{company}}",
        "Dear {{hiring_manager}},\n\n\
         I am writing to apply for the {{job_title}} position at {{company}}. \
         With {{years_experience}} years of experience in {{field}}, I am confident I can contribute from day one.\n\n\
         {{highlight}}\n\n\
         I would welcome the opportunity to discuss how my background fits your team.\n\n\
         Sincerely,\n{{your_name}}",
    ),
    (
        "follow_up",
        "Application Follow-up",
        "application",
        "Following up on my {{job_title}} application",
        "Dear {{hiring_manager}},\n\n\
         I applied for the {{job_title}} role at {{company}} on {{application_date}} and wanted to reiterate my interest. \
         Please let me know if there is anything else I can provide.\n\n\
         Best regards,\n{{your_name}}",
    ),
    (
        "thank_you",
        "Interview Thank You",
        "interview",
        "Thank you for the {{job_title}} interview",
        "Dear {{interviewer_name}},\n\n\
         Thank you for taking the time to speak with me about the {{job_title}} position at {{company}}. \
         I especially enjoyed discussing {{discussion_topic}}.\n\n\
         I look forward to hearing from you.\n\n\
         Kind regards,\n{{your_name}}",
    ),
    (
        "networking",
        "Networking Introduction",
        "networking",
        "Introduction from {{your_name}}",
        "Hi {{contact_name}},\n\n\
         {{mutual_connection}} suggested I reach out. I work in {{field}} and admire what {{company}} is doing. \
         Would you be open to a short call in the coming weeks?\n\n\
         Thanks,\n{{your_name}}",
    ),
    (
        "resignation",
        "Resignation Letter",
        "career_change",
        "Resignation — {{your_name}}",
        "Dear {{manager_name}},\n\n\
         Please accept this letter as formal notice of my resignation from my role as {{job_title}} at {{company}}. \
         My last day will be {{last_day}}.\n\n\
         Thank you for the support and opportunities during my time here.\n\n\
         Sincerely,\n{{your_name}}",
    ),
    (
        "job_offer_acceptance",
        "Job Offer Acceptance",
        "offer",
        "Offer acceptance — {{job_title}}",
        "Dear {{hiring_manager}},\n\n\
         I am delighted to accept the offer for the {{job_title}} position at {{company}}. \
         As discussed, my start date will be {{start_date}}.\n\n\
         Thank you again for this opportunity.\n\n\
         Best regards,\n{{your_name}}",
    ),
];

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([a-z0-9_]+)\s*\}\}").expect("placeholder regex is valid"))
}

/// Distinct placeholder keys in order of first appearance.
pub fn placeholders(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for cap in placeholder_regex().captures_iter(text) {
        let key = cap[1].to_string();
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen
}

fn build(entry: &(&'static str, &'static str, &'static str, &'static str, &'static str)) -> EmailTemplate {
    let (id, name, category, subject, body) = *entry;
    let mut keys = placeholders(subject);
    for key in placeholders(body) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    EmailTemplate {
        id,
        name,
        category,
        subject,
        body,
        placeholders: keys,
    }
}

pub fn catalog() -> Vec<EmailTemplate> {
    TEMPLATES.iter().map(build).collect()
}

pub fn find_template(id: &str) -> Option<EmailTemplate> {
    TEMPLATES.iter().find(|t| t.0 == id).map(build)
}

/// Substitutes `{{key}}` occurrences; blank values count as missing.
pub fn render_text(text: &str, fields: &HashMap<String, String>, missing: &mut BTreeSet<String>) -> String {
    placeholder_regex()
        .replace_all(text, |caps: &regex::Captures| {
            let key = &caps[1];
            match fields.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                Some(value) => value.to_string(),
                None => {
                    missing.insert(key.to_string());
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

pub fn render(template: &EmailTemplate, fields: &HashMap<String, String>) -> RenderedEmail {
    let mut missing = BTreeSet::new();
    let subject = render_text(template.subject, fields, &mut missing);
    let body = render_text(template.body, fields, &mut missing);
    RenderedEmail {
        subject,
        body,
        missing: missing.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_catalog_ids_unique_and_have_placeholders() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 6);
        let mut ids: Vec<_> = catalog.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
        assert!(catalog.iter().all(|t| t.placeholders.contains(&"your_name".to_string())));
    }

    #[test]
    fn test_placeholders_order_and_dedup() {
        assert_eq!(
            placeholders("{{a}} and {{ b }} then {{a}}"),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_render_complete() {
        let t = find_template("thank_you").unwrap();
        let out = render(
            &t,
            &fields(&[
                ("interviewer_name", "Sam"),
                ("job_title", "Data Analyst"),
                ("company", "Initech"),
                ("discussion_topic", "the reporting roadmap"),
                ("your_name", "Jane"),
            ]),
        );
        assert_eq!(out.subject, "Thank you for the Data Analyst interview");
        assert!(out.body.starts_with("Dear Sam,"));
        assert!(out.body.ends_with("Jane"));
        assert!(out.missing.is_empty());
    }

    #[test]
    fn test_render_reports_missing_and_keeps_placeholder() {
        let t = find_template("follow_up").unwrap();
        let out = render(&t, &fields(&[("job_title", "Designer"), ("your_name", "  ")]));
        assert_eq!(out.subject, "Following up on my Designer application");
        assert!(out.body.contains("{{company}}"));
        assert_eq!(
            out.missing,
            vec!["application_date", "company", "hiring_manager", "your_name"]
        );
    }

    #[test]
    fn test_unknown_template() {
        assert!(find_template("breakup_letter").is_none());
    }
}
