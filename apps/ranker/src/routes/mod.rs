pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/status", get(handlers::handle_status))
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list_resumes)
                .post(handlers::handle_upload_resumes)
                .put(handlers::handle_replace_resumes),
        )
        .route("/api/v1/resumes/:id", delete(handlers::handle_delete_resume))
        .route(
            "/api/v1/job-description",
            get(handlers::handle_get_job_description).put(handlers::handle_save_job_description),
        )
        .route(
            "/api/v1/job-description/enhance",
            post(handlers::handle_enhance_job_description),
        )
        .route(
            "/api/v1/analysis",
            get(handlers::handle_get_results).post(handlers::handle_run_analysis),
        )
        .route(
            "/api/v1/analysis/export",
            get(handlers::handle_export_results),
        )
        .route("/api/v1/data", delete(handlers::handle_clear_all))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::scoring::Scorer;
    use crate::screening::Session;
    use crate::storage::{MemoryStore, Repository};

    async fn app(llm: Arc<ScriptedGenerator>) -> Router {
        let repository = Repository::new(Arc::new(MemoryStore::default()));
        let session = Session::restore(repository, Scorer::new(llm)).await.unwrap();
        build_router(AppState {
            session: Arc::new(session),
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn upload_request(files: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, content) in files {
            body.push_str(&format!(
                "--BOUNDARY\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str("--BOUNDARY--\r\n");
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/resumes")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    fn as_json(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    fn reply_for(resume_id: &str, file_name: &str, overall: u32) -> String {
        json!({
            "candidates": [{
                "resumeId": resume_id,
                "fileName": file_name,
                "overallScore": overall,
                "technicalScore": 90,
                "experienceScore": 80,
                "culturalScore": 85,
                "matchPercentage": 85,
                "reasoning": "Deep Rust experience",
                "keyStrengths": ["Rust"],
                "keyWeaknesses": [],
                "recommendations": ["Technical interview"]
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(Arc::new(ScriptedGenerator::default())).await;
        let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body)["status"], "ok");
    }

    #[tokio::test]
    async fn test_full_screening_flow() {
        let llm = Arc::new(ScriptedGenerator::default());
        let app = app(llm.clone()).await;

        let (status, body) = send(&app, upload_request(&[("alice.txt", "Alice, Rust 8y")])).await;
        assert_eq!(status, StatusCode::CREATED);
        let resumes = as_json(&body);
        let resume_id = resumes[0]["id"].as_str().unwrap().to_string();
        assert_eq!(resumes[0]["fileName"], "alice.txt");

        let (status, _) = send(
            &app,
            json_request(
                Method::PUT,
                "/api/v1/job-description",
                json!({"title": "Eng", "company": "Acme", "content": "Build things", "requirements": ["Rust", " "]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        llm.push_reply(&reply_for(&resume_id, "alice.txt", 85));
        let (status, body) = send(&app, empty_request(Method::POST, "/api/v1/analysis")).await;
        assert_eq!(status, StatusCode::OK);
        let result = &as_json(&body)["result"];
        assert_eq!(result["totalCandidates"], 1);
        assert_eq!(result["averageScore"], 85.0);

        let (status, body) = send(
            &app,
            empty_request(Method::GET, "/api/v1/analysis?sort_by=technical&tier=elite"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ranked = as_json(&body);
        assert_eq!(ranked["candidates"][0]["tier"], "elite");
        assert_eq!(ranked["candidates"][0]["resumeId"], resume_id.as_str());

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api/v1/analysis/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Eng_analysis_results.csv\""
        );
        let csv = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let csv = String::from_utf8(csv.to_vec()).unwrap();
        assert!(csv.starts_with("Candidate,Overall Score,Technical,Experience,Cultural,Match %"));
        assert!(csv.contains("alice.txt,85,90,80,85,85"));

        let (status, _) = send(&app, empty_request(Method::DELETE, "/api/v1/data")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, empty_request(Method::GET, "/api/v1/status")).await;
        let status_body = as_json(&body);
        assert_eq!(status_body["resume_count"], 0);
        assert_eq!(status_body["has_job_description"], false);
        assert_eq!(status_body["busy"], false);
    }

    #[tokio::test]
    async fn test_analysis_before_setup_is_unprocessable() {
        let llm = Arc::new(ScriptedGenerator::default());
        let app = app(llm.clone()).await;

        let (status, body) = send(&app, empty_request(Method::POST, "/api/v1/analysis")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(as_json(&body)["error"]["code"], "PRECONDITION_NOT_MET");
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_is_bad_gateway() {
        let llm = Arc::new(ScriptedGenerator::default());
        let app = app(llm.clone()).await;
        send(&app, upload_request(&[("bob.txt", "Bob")])).await;
        send(
            &app,
            json_request(
                Method::PUT,
                "/api/v1/job-description",
                json!({"title": "Eng", "company": "Acme", "content": "Build things"}),
            ),
        )
        .await;

        llm.push_failure(500);
        let (status, body) = send(&app, empty_request(Method::POST, "/api/v1/analysis")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(as_json(&body)["error"]["code"], "AI_ERROR");

        let (_, body) = send(&app, empty_request(Method::GET, "/api/v1/status")).await;
        let status_body = as_json(&body);
        assert_eq!(status_body["busy"], false);
        assert_eq!(status_body["resume_count"], 1);
        assert_eq!(status_body["result_count"], 0);
    }

    #[tokio::test]
    async fn test_save_job_description_requires_fields() {
        let app = app(Arc::new(ScriptedGenerator::default())).await;
        let (status, body) = send(
            &app,
            json_request(
                Method::PUT,
                "/api/v1/job-description",
                json!({"title": "Eng", "company": "", "content": "x"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(as_json(&body)["error"]["message"]
            .as_str()
            .unwrap()
            .contains("company"));

        let (status, _) =
            send(&app, empty_request(Method::GET, "/api/v1/job-description")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_replace_resumes_rejects_duplicate_ids() {
        let app = app(Arc::new(ScriptedGenerator::default())).await;
        let resume = json!({
            "id": "r1",
            "fileName": "a.txt",
            "content": "Alice",
            "uploadDate": "2026-01-05T10:00:00Z",
            "size": 5,
            "type": "text/plain"
        });

        let (status, body) = send(
            &app,
            json_request(Method::PUT, "/api/v1/resumes", json!([resume.clone()])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body)[0]["id"], "r1");

        let (status, _) = send(
            &app,
            json_request(Method::PUT, "/api/v1/resumes", json!([resume.clone(), resume])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_replace_resumes_rejects_blank_content() {
        let app = app(Arc::new(ScriptedGenerator::default())).await;
        let resume = json!({
            "id": "r1",
            "fileName": "a.txt",
            "content": "   ",
            "uploadDate": "2026-01-05T10:00:00Z",
            "size": 3,
            "type": "text/plain"
        });

        let (status, body) = send(
            &app,
            json_request(Method::PUT, "/api/v1/resumes", json!([resume])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(as_json(&body)["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_rank_query_values_are_json_validation_errors() {
        let app = app(Arc::new(ScriptedGenerator::default())).await;

        for uri in [
            "/api/v1/analysis?sort_by=salary",
            "/api/v1/analysis?tier=mythic",
            "/api/v1/analysis/export?sort_by=salary",
        ] {
            let (status, body) = send(&app, empty_request(Method::GET, uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let body = as_json(&body);
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
            assert!(body["error"]["message"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_delete_unknown_resume_is_not_found() {
        let app = app(Arc::new(ScriptedGenerator::default())).await;
        let (status, _) =
            send(&app, empty_request(Method::DELETE, "/api/v1/resumes/missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let app = app(Arc::new(ScriptedGenerator::default())).await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/resumes")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=B")
            .body(Body::from(
                "--B\r\nContent-Disposition: form-data; name=\"files\"; filename=\"cv.docx\"\r\nContent-Type: application/vnd.openxmlformats-officedocument.wordprocessingml.document\r\n\r\nPK\r\n--B--\r\n",
            ))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, empty_request(Method::GET, "/api/v1/resumes")).await;
        assert_eq!(as_json(&body).as_array().unwrap().len(), 0);
    }
}
