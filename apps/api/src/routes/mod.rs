pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::assistant::handlers as assistant;
use crate::auth::handlers as auth;
use crate::documents::handlers as documents;
use crate::job_search::handlers as job_search;
use crate::local_store::{handlers as local, import};
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route(
            "/api/v1/auth/session",
            post(auth::handle_sign_in).delete(auth::handle_sign_out),
        )
        .route("/api/v1/auth/me", get(auth::handle_me))
        // Local resumes
        .route(
            "/api/v1/resumes",
            get(local::handle_list_resumes).post(local::handle_add_resume),
        )
        .route(
            "/api/v1/resumes/import",
            post(import::handle_import_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/resumes/:id",
            patch(local::handle_update_resume).delete(local::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/primary",
            post(local::handle_set_primary_resume),
        )
        .route(
            "/api/v1/resumes/:id/analyze",
            post(assistant::handle_analyze_resume),
        )
        // External jobs
        .route(
            "/api/v1/external-jobs",
            get(local::handle_list_external_jobs).post(local::handle_add_external_job),
        )
        .route(
            "/api/v1/external-jobs/:id",
            delete(local::handle_delete_external_job),
        )
        .route(
            "/api/v1/external-jobs/:id/analyze",
            post(assistant::handle_analyze_external_job),
        )
        .route(
            "/api/v1/external-jobs/:id/tailor",
            post(assistant::handle_tailor_external_job),
        )
        // Job search
        .route("/api/v1/jobs/search", get(job_search::handle_search))
        // Assistant
        .route("/api/v1/cover-letters", post(assistant::handle_cover_letter))
        .route(
            "/api/v1/interview/questions",
            post(assistant::handle_interview_questions),
        )
        .route("/api/v1/interview/bank", get(assistant::handle_question_bank))
        .route(
            "/api/v1/interview/feedback",
            post(assistant::handle_interview_feedback),
        )
        .route(
            "/api/v1/companies/:name/insight",
            get(assistant::handle_company_insight),
        )
        // Cloud documents
        .route(
            "/api/v1/applications",
            get(documents::handle_list_applications).post(documents::handle_create_application),
        )
        .route(
            "/api/v1/applications/stats",
            get(documents::handle_application_stats),
        )
        .route(
            "/api/v1/applications/:id",
            patch(documents::handle_update_application)
                .delete(documents::handle_delete_application),
        )
        .route(
            "/api/v1/cloud-resumes",
            get(documents::handle_list_cloud_resumes).post(documents::handle_create_cloud_resume),
        )
        .route(
            "/api/v1/cloud-resumes/:id",
            patch(documents::handle_update_cloud_resume)
                .delete(documents::handle_delete_cloud_resume),
        )
        .route(
            "/api/v1/cloud-resumes/:id/primary",
            post(documents::handle_set_primary_cloud_resume),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::ScriptedGenerator;

    fn app_with(llm: Arc<ScriptedGenerator>) -> Router {
        build_router(AppState::for_tests(llm))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn sign_in(app: &Router, uid: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/auth/session",
            None,
            Some(json!({ "idToken": format!("valid:{uid}") })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_needs_no_session() {
        let app = app_with(Arc::new(ScriptedGenerator::replying(&["{}"])));
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "gradindstud-api");
        assert_eq!(body["features"]["jobSearch"], false);
    }

    #[tokio::test]
    async fn test_requests_without_session_are_unauthorized() {
        let app = app_with(Arc::new(ScriptedGenerator::replying(&["{}"])));
        let (status, body) = send(&app, Method::GET, "/api/v1/resumes", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, _) = send(&app, Method::GET, "/api/v1/auth/me", Some("bogus"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/auth/session",
            None,
            Some(json!({ "idToken": "forged" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_out_invalidates_session() {
        let app = app_with(Arc::new(ScriptedGenerator::replying(&["{}"])));
        let token = sign_in(&app, "ada").await;

        let (status, me) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["uid"], "ada");

        let (status, _) =
            send(&app, Method::DELETE, "/api/v1/auth/session", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_session_is_unauthorized() {
        let app = app_with(Arc::new(ScriptedGenerator::replying(&["{}"])));
        let token = sign_in(&app, "grace").await;

        tokio::time::advance(std::time::Duration::from_secs(3601)).await;
        let (status, body) =
            send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_sixth_resume_is_rejected_and_nothing_is_written() {
        let app = app_with(Arc::new(ScriptedGenerator::replying(&["{}"])));
        let token = sign_in(&app, "u1").await;

        for i in 0..5 {
            let (status, _) = send(
                &app,
                Method::POST,
                "/api/v1/resumes",
                Some(&token),
                Some(json!({ "name": format!("Resume {i}"), "content": "text" })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes",
            Some(&token),
            Some(json!({ "name": "One too many" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CAPACITY_EXCEEDED");

        let (_, list) = send(&app, Method::GET, "/api/v1/resumes", Some(&token), None).await;
        assert_eq!(list.as_array().unwrap().len(), 5);

        // Another user has their own collection.
        let other = sign_in(&app, "u2").await;
        let (_, list) = send(&app, Method::GET, "/api/v1/resumes", Some(&other), None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_external_job_is_analyzed_once_against_primary_resume() {
        let llm = Arc::new(ScriptedGenerator::replying(&[
            r#"{"matchScore": 82, "skillsMatch": 80, "experienceMatch": 85,
                "matchedSkills": ["Rust"], "missingSkills": ["Kafka"],
                "recommendations": ["Mention streaming"]}"#,
        ]));
        let app = app_with(Arc::clone(&llm));
        let token = sign_in(&app, "u1").await;

        let (_, job) = send(
            &app,
            Method::POST,
            "/api/v1/external-jobs",
            Some(&token),
            Some(json!({ "title": "Backend Engineer", "company": "Acme",
                         "description": "Rust and Kafka", "type": "Full-time" })),
        )
        .await;
        let analyze = format!("/api/v1/external-jobs/{}/analyze", job["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::POST, &analyze, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("primary resume"));

        send(
            &app,
            Method::POST,
            "/api/v1/resumes",
            Some(&token),
            Some(json!({ "name": "Main", "content": "Rust developer", "isPrimary": true })),
        )
        .await;

        let (status, analyzed) = send(&app, Method::POST, &analyze, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(analyzed["analyzed"], true);
        assert_eq!(analyzed["matchScore"], 82);
        assert_eq!(analyzed["missingSkills"], json!(["Kafka"]));
        assert_eq!(analyzed["type"], "Full-time");

        let (_, again) = send(&app, Method::POST, &analyze, Some(&token), None).await;
        assert_eq!(again, analyzed);
        assert_eq!(llm.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_resume_stores_score() {
        let llm = Arc::new(ScriptedGenerator::replying(&[
            r#"{"atsScore": 91, "overallScore": 88, "strengths": ["Clear"]}"#,
        ]));
        let app = app_with(llm);
        let token = sign_in(&app, "u1").await;

        let (_, resume) = send(
            &app,
            Method::POST,
            "/api/v1/resumes",
            Some(&token),
            Some(json!({ "name": "Main", "content": "Rust developer" })),
        )
        .await;
        let uri = format!("/api/v1/resumes/{}/analyze", resume["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::POST, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["atsScore"], 91);
        assert_eq!(body["resume"]["atsScore"], 91);
        assert_eq!(body["resume"]["analysisComplete"], true);
    }

    #[tokio::test]
    async fn test_ai_failures_surface_user_facing_message() {
        let app = app_with(Arc::new(ScriptedGenerator::failing(
            429,
            "Resource has been exhausted (e.g. check quota).",
        )));
        let token = sign_in(&app, "u1").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/cover-letters",
            Some(&token),
            Some(json!({ "resume": "Rust developer", "jobTitle": "SRE", "company": "Acme" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body["error"]["message"],
            "AI usage quota exceeded. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_job_search_without_key_is_a_configuration_error() {
        let app = app_with(Arc::new(ScriptedGenerator::replying(&["{}"])));
        let token = sign_in(&app, "u1").await;
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/jobs/search?query=rust",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_application_lifecycle_and_stats() {
        let app = app_with(Arc::new(ScriptedGenerator::replying(&["{}"])));
        let token = sign_in(&app, "u1").await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/v1/applications",
            Some(&token),
            Some(json!({ "jobTitle": "SRE", "company": "Acme" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "saved");
        assert!(created["appliedDate"].is_null());

        let uri = format!("/api/v1/applications/{}", created["id"].as_str().unwrap());
        let (status, updated) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "status": "interviewing" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "interviewing");

        let (_, stats) =
            send(&app, Method::GET, "/api/v1/applications/stats", Some(&token), None).await;
        assert_eq!(stats["total"], 1);
        assert_eq!(stats["interviewing"], 1);
        assert_eq!(stats["responseRate"], 100);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_question_bank_filters_by_category() {
        let app = app_with(Arc::new(ScriptedGenerator::replying(&["{}"])));
        let token = sign_in(&app, "u1").await;
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/interview/bank?category=situational",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 5);
        assert!(questions.iter().all(|q| q["category"] == "situational"));
    }
}
