//! Route tests for the HTTP boundary, driven through the router with a
//! mock-backed previewer.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use link_preview::{MockFetcher, Previewer, StaticResolver, UrlGuard};
use serde_json::Value;
use server_core::server::build_app;
use tower::ServiceExt;

const PAGE: &str = r#"<html><head>
    <title>Example</title>
    <meta property="og:image" content="/cover.png">
</head></html>"#;

fn app() -> Router {
    let fetcher = MockFetcher::new()
        .with_page("https://a.example/", PAGE)
        .with_page("https://b.example/", PAGE)
        .with_status("https://gone.example/", 410);
    let resolver = StaticResolver::new()
        .with_host("a.example", &["93.184.216.1"])
        .with_host("b.example", &["93.184.216.2"])
        .with_host("gone.example", &["93.184.216.3"])
        .with_host("internal.example", &["169.254.169.254"]);
    let guard = UrlGuard::with_resolver(Arc::new(resolver));

    build_app(Previewer::new(guard, Arc::new(fetcher)), "*").unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_single_url_returns_record() {
    let (status, json) = send(app(), Method::POST, "/extract", r#"{"url":"https://a.example/"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Example");
    assert_eq!(json["images"][0], "https://a.example/cover.png");
    assert_eq!(json["sitename"], serde_json::json!([]));
    assert_eq!(json["favicon"], "https://a.example/favicon.ico");
    assert_eq!(json["domain"], "a.example");
    assert_eq!(json["url"], "https://a.example/");
    assert!(json["duration"].is_u64());
}

#[tokio::test]
async fn test_single_url_failure_is_500() {
    let (status, json) = send(
        app(),
        Method::POST,
        "/extract",
        r#"{"url":"http://internal.example/latest/meta-data"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("169.254.169.254"));
}

#[tokio::test]
async fn test_batch_preserves_order_and_isolates_errors() {
    let (status, json) = send(
        app(),
        Method::POST,
        "/extract",
        r#"{"urls":["https://b.example/","https://gone.example/","https://a.example/"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);

    let results = json["results"].as_array().unwrap();
    assert_eq!(results[0]["url"], "https://b.example/");
    assert_eq!(results[0]["title"], "Example");
    assert_eq!(results[1]["url"], "https://gone.example/");
    assert_eq!(results[1]["error"], "HTTP error: 410");
    assert_eq!(results[1].as_object().unwrap().len(), 2);
    assert_eq!(results[2]["url"], "https://a.example/");
    assert!(results[2].get("error").is_none());
}

#[tokio::test]
async fn test_body_without_content_type_accepted() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/extract")
        .body(Body::from(r#"{"url":"https://a.example/"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["title"], "Example");
}

#[tokio::test]
async fn test_previewer_cap_rejects_with_400() {
    let guard = UrlGuard::with_resolver(Arc::new(StaticResolver::new()));
    let previewer = Previewer::new(guard, Arc::new(MockFetcher::new())).with_max_batch_size(3);
    let app = build_app(previewer, "*").unwrap();

    let urls: Vec<String> = (0..4).map(|i| format!("https://s{}.example/", i)).collect();
    let body = serde_json::json!({ "urls": urls }).to_string();
    let (status, json) = send(app, Method::POST, "/extract", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Maximum 3 URLs allowed per request");
}

#[tokio::test]
async fn test_missing_urls_rejected() {
    let (status, json) = send(app(), Method::POST, "/extract", r#"{}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "At least one URL is required (use 'url' or 'urls' field)"
    );
}

#[tokio::test]
async fn test_too_many_urls_rejected() {
    let urls: Vec<String> = (0..6).map(|i| format!("https://s{}.example/", i)).collect();
    let body = serde_json::json!({ "urls": urls }).to_string();

    let (status, json) = send(app(), Method::POST, "/extract", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Maximum 5 URLs allowed per request");
}

#[tokio::test]
async fn test_invalid_json_rejected() {
    let (status, json) = send(app(), Method::POST, "/extract", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid JSON body");
}

#[tokio::test]
async fn test_get_extract_not_allowed() {
    let (status, json) = send(app(), Method::GET, "/extract", "").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["error"], "Method not allowed. Use POST.");
}

#[tokio::test]
async fn test_health_and_root() {
    let (status, json) = send(app(), Method::GET, "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");

    let (status, json) = send(app(), Method::GET, "/", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "metadata.party");
    assert!(json["endpoints"]["POST /extract"].is_string());

    let (status, _) = send(app(), Method::GET, "/nope", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_headers_applied() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "https://chat.example")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_invalid_origin_config_is_error() {
    let previewer = Previewer::new(UrlGuard::new(), Arc::new(MockFetcher::new()));
    assert!(build_app(previewer, "bad\norigin").is_err());
}
