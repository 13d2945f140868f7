mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use common::{StubProvider, NAVBAR_REPLY};
use vibe_uigen::classify::FRAMEWORK_SPECIFIC_MESSAGE;
use vibe_uigen::config::PersistMode;
use vibe_uigen::history::{History, MemoryHistory};
use vibe_uigen::pipeline::{Generator, PipelineSettings};
use vibe_uigen::server::{router, AppState, GENERATE_FAILED};

fn app(stub: StubProvider, history: Option<Arc<dyn History>>) -> Router {
    let settings = PipelineSettings { persist: PersistMode::Inline, ..PipelineSettings::default() };
    router(AppState {
        generator: Arc::new(Generator::new(Box::new(stub), history, settings)),
        shutdown: CancellationToken::new(),
    })
}

async fn post_generate(app: Router, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_history(app: Router) -> (StatusCode, Value) {
    let req = Request::builder().uri("/api/history").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn generate_returns_html_document() {
    let (status, body) = post_generate(
        app(StubProvider::replying(NAVBAR_REPLY), None),
        json!({ "prompt": "Create a responsive navigation bar" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "html");
    assert!(body["code"].as_str().unwrap().starts_with("<!DOCTYPE html>"));
}

#[tokio::test]
async fn rejected_prompt_is_bad_request_with_text() {
    let (status, body) = post_generate(
        app(StubProvider::replying(NAVBAR_REPLY), None),
        json!({ "prompt": "Build this in React with useState" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "code": FRAMEWORK_SPECIFIC_MESSAGE, "language": "text" }));
}

#[tokio::test]
async fn missing_prompt_is_treated_as_empty() {
    let (status, body) = post_generate(app(StubProvider::replying(NAVBAR_REPLY), None), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["language"], "text");
}

#[tokio::test]
async fn service_failure_is_opaque_server_error() {
    let (status, body) = post_generate(
        app(StubProvider::failing(), None),
        json!({ "prompt": "Create a pricing table" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERATE_FAILED }));
}

#[tokio::test]
async fn unreadable_body_gets_json_error() {
    let app = app(StubProvider::replying(NAVBAR_REPLY), None);
    let req = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": GENERATE_FAILED }));
}

#[tokio::test]
async fn history_lists_newest_first_with_page_limit() {
    let history = Arc::new(MemoryHistory::new());
    for i in 0..22 {
        history.append(&format!("create card {i}"), "<html></html>", "html").unwrap();
    }
    let (status, body) = get_history(app(StubProvider::failing(), Some(history as Arc<dyn History>))).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 20);
    assert_eq!(entries[0]["prompt"], "create card 21");
    assert!(entries[0].get("createdAt").is_some());
    assert!(entries[0].get("id").is_some());
}

#[tokio::test]
async fn history_is_empty_when_disabled() {
    let (status, body) = get_history(app(StubProvider::failing(), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn generated_documents_show_up_in_history() {
    let history: Arc<dyn History> = Arc::new(MemoryHistory::new());
    let app = app(StubProvider::replying(NAVBAR_REPLY), Some(history.clone()));

    let (status, _) = post_generate(app.clone(), json!({ "prompt": "Create a footer" })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_history(app).await;
    assert_eq!(body[0]["prompt"], "Create a footer");
    assert_eq!(body[0]["language"], "html");
}
