//! Watchlist API Integration Tests

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;

use ipo_data_proxy::{
    AppState, MarketDataService, ResponseCache, UpstreamClient, UpstreamSettings, create_router,
};

fn app() -> axum::Router {
    // Watchlist routes never touch the upstream
    let upstream = UpstreamClient::new(&UpstreamSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: None,
    })
    .unwrap();
    let service = MarketDataService::new(Arc::new(upstream), None, ResponseCache::default());
    create_router(AppState::new(Arc::new(service)))
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn add_toggle_remove_flow() {
    let app = app();

    let response = send(
        &app,
        "POST",
        "/api/watchlist",
        Some(json!({"id": "RDDT", "name": "Reddit Inc"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let item = json_body(response).await;
    assert_eq!(item["id"], "RDDT");
    assert_eq!(item["favorite"], false);

    let response = send(&app, "POST", "/api/watchlist/RDDT/favorite", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["favorite"], true);

    let response = send(&app, "GET", "/api/watchlist", None).await;
    let list = json_body(response).await;
    assert_eq!(list["items"].as_array().unwrap().len(), 1);
    assert_eq!(list["items"][0]["favorite"], true);

    let response = send(&app, "DELETE", "/api/watchlist/RDDT", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "DELETE", "/api/watchlist/RDDT", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list = json_body(send(&app, "GET", "/api/watchlist", None).await).await;
    assert!(list["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_add_keeps_original_entry() {
    let app = app();

    send(
        &app,
        "POST",
        "/api/watchlist",
        Some(json!({"id": "ARM", "name": "Arm Holdings"})),
    )
    .await;
    send(&app, "POST", "/api/watchlist/ARM/favorite", None).await;

    let response = send(
        &app,
        "POST",
        "/api/watchlist",
        Some(json!({"id": "ARM", "name": "Renamed"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let item = json_body(response).await;
    assert_eq!(item["name"], "Arm Holdings");
    assert_eq!(item["favorite"], true);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();

    let response = send(&app, "POST", "/api/watchlist", Some(json!({"name": "no id"}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}
