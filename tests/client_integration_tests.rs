use axum::{http::StatusCode, routing::get, Router};
use std::sync::Arc;

use rest_error_mapper::api::handlers::{AppStateInner, Item};
use rest_error_mapper::api::routes::create_router;
use rest_error_mapper::client::{
    kinds, ClientError, DecodeError, ErrorMappingClient, ExceptionRegistry, MapperError,
};
use rest_error_mapper::config::ClientConfig;

// Serve the demo router plus an endpoint answering with a non-record body
async fn spawn_server() -> String {
    let app = create_router(Arc::new(AppStateInner::new("client-tests"))).merge(
        Router::new().route(
            "/broken",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        ),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn client() -> ErrorMappingClient {
    let config = ClientConfig {
        base_url: spawn_server().await,
        timeout_ms: 5_000,
        user_agent: "rest-error-mapper-tests".to_string(),
    };
    ErrorMappingClient::new(&config, Arc::new(ExceptionRegistry::with_defaults())).unwrap()
}

fn item(id: &str, name: &str) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
    }
}

#[tokio::test]
async fn test_created_item_round_trips() {
    let client = client().await;

    let created: Item = client.post_json("/items", &item("1", "widget")).await.unwrap();
    assert_eq!(created, item("1", "widget"));

    let fetched: Item = client.get_json("/items/1").await.unwrap();
    assert_eq!(fetched, item("1", "widget"));
}

#[tokio::test]
async fn test_missing_item_raises_not_found_with_response() {
    let client = client().await;

    let err = client.get_json::<Item>("/items/nope").await.unwrap_err();
    let exception = err.remote().expect("remote exception");

    assert_eq!(exception.kind(), kinds::NOT_FOUND);
    assert_eq!(exception.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(
        exception.response().unwrap().body_text(),
        r#"{"message":"Item not found: nope","exceptionClassName":"NotFound"}"#
    );
}

#[tokio::test]
async fn test_validation_failure_raises_generic_error() {
    let client = client().await;

    let err = client
        .post_json::<_, Item>("/items", &item("", "widget"))
        .await
        .unwrap_err();
    let exception = err.remote().expect("remote exception");

    assert_eq!(exception.kind(), kinds::SERVER_ERROR);
    assert_eq!(exception.message(), "id must not be blank");
}

#[tokio::test]
async fn test_conflict_raises_simple_type_with_message() {
    let client = client().await;
    let _: Item = client.post_json("/items", &item("9", "widget")).await.unwrap();

    let err = client
        .post_json::<_, Item>("/items", &item("9", "widget"))
        .await
        .unwrap_err();
    let exception = err.remote().expect("remote exception");

    assert_eq!(exception.kind(), kinds::INVALID_STATE);
    assert_eq!(exception.message(), "Item already exists: 9");
    assert!(exception.response().is_none());
}

#[tokio::test]
async fn test_plain_text_error_is_unmappable() {
    let client = client().await;

    let err = client.get_json::<Item>("/broken").await.unwrap_err();

    match err {
        ClientError::Mapping(MapperError::Decode(DecodeError::UnsupportedContentType {
            content_type,
        })) => {
            assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
