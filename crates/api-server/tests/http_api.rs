use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use campaign_agents::WorkflowEngine;
use campaign_api::{router, AppState};
use campaign_core::config::AppConfig;
use campaign_llm::{GenerationEngine, ScriptedGenerator};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(engine: GenerationEngine) -> Router {
    let config = AppConfig::default();
    let workflow = Arc::new(WorkflowEngine::from_config(&config, engine, None));
    router(AppState::new(workflow, "test-node"), &config.api)
}

fn stub_app() -> Router {
    app_with(GenerationEngine::unavailable())
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_campaign(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/run-campaign")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn run_campaign_with_stub_backend() {
    let request = post_campaign(
        serde_json::json!({"intent_brief": "Launch a new fitness tracker"}).to_string(),
    );
    let response = stub_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let state = body_json(response).await;
    assert_eq!(state["intent_brief"], "Launch a new fitness tracker");
    let segments = state["audience_segments"].as_array().unwrap();
    let content = state["content"].as_array().unwrap();
    assert!(!segments.is_empty());
    assert_eq!(content.len(), segments.len());
    assert_eq!(state["review_task"]["status"], "pending");
    assert!(state["review_task"]["id"].as_str().unwrap().starts_with("TASK-"));
    assert!(state.get("next").is_none());
}

#[tokio::test]
async fn run_campaign_with_scripted_backend() {
    let backend = ScriptedGenerator::new(|prompt: &str| {
        Ok(if prompt.contains("delivery channel") {
            "email".to_string()
        } else if prompt.contains("audience segments") {
            "Runners, Cyclists".to_string()
        } else {
            "<p style=\"margin:0\">Move more</p>".to_string()
        })
    });
    let app = app_with(GenerationEngine::new(Arc::new(backend)));

    let response = app
        .oneshot(post_campaign(r#"{"intent_brief": "Launch"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let state = body_json(response).await;
    assert_eq!(state["audience_segments"], serde_json::json!(["Runners", "Cyclists"]));
    assert_eq!(state["content"][0]["channel"], "email");
    assert_eq!(state["content"][1]["segment"], "Cyclists");
}

#[tokio::test]
async fn missing_brief_is_rejected() {
    for body in [r#"{}"#, r#"{"intent_brief": "   "}"#, r#"{"intent_brief": null}"#, "not json"] {
        let response = stub_app().oneshot(post_campaign(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let error = body_json(response).await;
        assert_eq!(error["error"], "intent_brief is required");
    }
}

#[tokio::test]
async fn hello_and_root() {
    let response = stub_app()
        .oneshot(Request::builder().uri("/api/hello").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Backend is running!");

    let response = stub_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let banner = body_json(response).await;
    assert_eq!(banner["message"], "Campaign Manager Backend API");
    assert_eq!(banner["status"], "active");
}

#[tokio::test]
async fn health_reports_node() {
    let response = stub_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let health = body_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["node_id"], "test-node");
}

#[tokio::test]
async fn cors_allows_configured_origin_only() {
    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/run-campaign")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = stub_app()
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );

    let denied = stub_app()
        .oneshot(preflight("http://evil.example"))
        .await
        .unwrap();
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}
