pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::blog::handlers as blog;
use crate::contact::handlers as contact;
use crate::emails::handlers as emails;
use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route(
            "/api/v1/auth/forgot-password",
            post(auth::handle_forgot_password),
        )
        .route(
            "/api/v1/auth/reset-password",
            post(auth::handle_reset_password),
        )
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Blog
        .route(
            "/api/v1/blog",
            get(blog::handle_list_posts).post(blog::handle_create_post),
        )
        .route(
            "/api/v1/blog/:slug",
            get(blog::handle_get_post)
                .put(blog::handle_update_post)
                .delete(blog::handle_delete_post),
        )
        // Contact / newsletter
        .route(
            "/api/v1/contact",
            get(contact::handle_list_contacts).post(contact::handle_submit_contact),
        )
        .route("/api/v1/newsletter", post(contact::handle_subscribe))
        // Resume builder
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/v1/resumes/ats-score",
            post(resumes::handle_ats_preview),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/ats-score",
            get(resumes::handle_resume_ats),
        )
        // Email builder
        .route(
            "/api/v1/email-templates",
            get(emails::handle_list_templates),
        )
        .route(
            "/api/v1/email-templates/:id/render",
            post(emails::handle_render_template),
        )
        .route(
            "/api/v1/emails",
            get(emails::handle_list_emails).post(emails::handle_create_email),
        )
        .route(
            "/api/v1/emails/:id",
            get(emails::handle_get_email)
                .put(emails::handle_update_email)
                .delete(emails::handle_delete_email),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::models::Role;
    use crate::auth::tokens::JwtKeys;
    use crate::config::Config;
    use crate::mail::testing::RecordingMailer;

    const SECRET: &str = "router-test-secret";

    /// State with a pool that never connects; only routes that fail or
    /// answer before touching the database are exercised here.
    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/careerdesk_test".to_string(),
            jwt_secret: SECRET.to_string(),
            jwt_ttl_hours: 1,
            port: 0,
            rust_log: "debug".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            cors_origin: None,
            smtp: None,
            mail_from: "no-reply@example.com".to_string(),
            contact_inbox: None,
        };
        AppState {
            db: PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap(),
            jwt: JwtKeys::new(SECRET, 1),
            config,
            mailer: Arc::new(RecordingMailer::default()),
        }
    }

    fn bearer(role: Role) -> String {
        let token = JwtKeys::new(SECRET, 1)
            .issue(Uuid::new_v4(), "someone@example.com", role)
            .unwrap();
        format!("Bearer {token}")
    }

    fn json_request(method: &str, uri: &str, body: Value, auth: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(req: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(test_state()).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "careerdesk-api");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let req = json_request(
            "POST",
            "/api/v1/auth/register",
            json!({ "name": "Jane", "email": "not-an-email", "password": "longenough" }),
            None,
        );
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let req = json_request(
            "POST",
            "/api/v1/auth/register",
            json!({ "name": "Jane", "email": "jane@example.com", "password": "short" }),
            None,
        );
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reset_password_requires_token() {
        let req = json_request(
            "POST",
            "/api/v1/auth/reset-password",
            json!({ "token": "  ", "password": "newpassword" }),
            None,
        );
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Password reset token is invalid or has expired"
        );
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let req = Request::builder()
            .uri("/api/v1/resumes")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_protected_route_rejects_forged_token() {
        let forged = JwtKeys::new("other-secret", 1)
            .issue(Uuid::new_v4(), "x@example.com", Role::Admin)
            .unwrap();
        let req = Request::builder()
            .uri("/api/v1/emails")
            .header(header::AUTHORIZATION, format!("Bearer {forged}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_job_posting_is_admin_only() {
        let req = json_request(
            "POST",
            "/api/v1/jobs",
            json!({
                "title": "Engineer", "company": "Acme", "location": "Remote",
                "job_type": "full_time", "description": "Build things"
            }),
            Some(bearer(Role::User)),
        );
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_admin_job_validation_runs_before_db() {
        let req = json_request(
            "POST",
            "/api/v1/jobs",
            json!({
                "title": "Engineer", "company": "Acme", "location": "Remote",
                "job_type": "contract", "description": "Build things",
                "salary_min": 90000, "salary_max": 50000
            }),
            Some(bearer(Role::Admin)),
        );
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ats_preview_is_public() {
        let req = json_request(
            "POST",
            "/api/v1/resumes/ats-score",
            json!({
                "resume": {
                    "personal_info": { "full_name": "Jane Doe", "email": "jane@example.com" },
                    "skills": ["Rust", "SQL"]
                },
                "keywords": ["rust", "terraform"]
            }),
            None,
        );
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        // name 5 + email 5 + skills 5 + one keyword 2
        assert_eq!(body["score"], 17);
        assert_eq!(body["matched_keywords"], json!(["rust"]));
        assert_eq!(body["missing_keywords"], json!(["terraform"]));
    }

    #[tokio::test]
    async fn test_email_templates() {
        let req = Request::builder()
            .uri("/api/v1/email-templates")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(6));

        let req = json_request(
            "POST",
            "/api/v1/email-templates/networking/render",
            json!({ "fields": { "your_name": "Jane" } }),
            None,
        );
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subject"], "Introduction from Jane");

        let req = json_request(
            "POST",
            "/api/v1/email-templates/unknown/render",
            json!({}),
            None,
        );
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_contact_validation() {
        let req = json_request(
            "POST",
            "/api/v1/contact",
            json!({ "name": "Jane", "email": "jane@example.com", "message": "" }),
            None,
        );
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
