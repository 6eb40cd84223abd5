use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service;

use rest_error_mapper::api::{handlers::AppStateInner, routes::create_router};

// Helper to create test app
fn create_test_app() -> axum::Router {
    create_router(Arc::new(AppStateInner::new("test-instance")))
}

// Helper to send a request and return status, content type and raw body
async fn send(
    app: &mut axum::Router,
    request: Request<Body>,
) -> (StatusCode, Option<String>, String) {
    let response = app.call(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

fn post_item(body: Value, accept: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/items")
        .header("content-type", "application/json");
    if let Some(accept) = accept {
        builder = builder.header("accept", accept);
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut app = create_test_app();
    let (status, _, body) = send(&mut app, get("/health")).await;

    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "rest-error-mapper");
    assert_eq!(body["instance_id"], "test-instance");
}

#[tokio::test]
async fn test_validation_failure_json() {
    let mut app = create_test_app();
    let (status, content_type, body) = send(
        &mut app,
        post_item(json!({"id": "", "name": "widget"}), Some("application/json")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(
        body,
        r#"{"message":"id must not be blank","exceptionClassName":null}"#
    );
}

#[tokio::test]
async fn test_validation_failure_xml() {
    let mut app = create_test_app();
    let (status, content_type, body) = send(
        &mut app,
        post_item(json!({"id": "", "name": "widget"}), Some("application/xml")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/xml"));
    assert_eq!(body, "<error><message>id must not be blank</message></error>");
}

#[tokio::test]
async fn test_validation_failure_without_accept_defaults_to_json() {
    let mut app = create_test_app();
    let (status, content_type, body) =
        send(&mut app, post_item(json!({"id": "1", "name": ""}), None)).await;

    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body["message"], "name must not be blank");
    assert!(body["exceptionClassName"].is_null());
}

#[tokio::test]
async fn test_malformed_json_is_rejected_before_validation() {
    let mut app = create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/items")
        .header("content-type", "application/json")
        .body(Body::from("{\"id\":"))
        .unwrap();

    let (status, content_type, _) = send(&mut app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_ne!(content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_create_then_get_item() {
    let mut app = create_test_app();
    let (status, _, _) = send(
        &mut app,
        post_item(json!({"id": "42", "name": "widget"}), None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) = send(&mut app, get("/items/42")).await;
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "42", "name": "widget"}));
}

#[tokio::test]
async fn test_duplicate_item_is_conflict() {
    let mut app = create_test_app();
    let item = json!({"id": "7", "name": "widget"});
    send(&mut app, post_item(item.clone(), None)).await;

    let (status, _, body) = send(&mut app, post_item(item, None)).await;
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Item already exists: 7");
    assert_eq!(body["exceptionClassName"], "InvalidState");
}

#[tokio::test]
async fn test_missing_item_declares_not_found() {
    let mut app = create_test_app();
    let (status, content_type, body) = send(&mut app, get("/items/missing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(
        body,
        r#"{"message":"Item not found: missing","exceptionClassName":"NotFound"}"#
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let mut app = create_test_app();
    send(&mut app, get("/items/missing")).await;

    let (status, _, body) = send(&mut app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http_requests_total"));
}
