mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use song_vocab::models::SearchResult;
use song_vocab::server::{create_router, AppState};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(dir: &TempDir) -> Router {
    let search = Arc::new(StubSearch::with_results(vec![SearchResult::new(
        "Imagine Lyrics by John Lennon",
        IMAGINE_URL,
        "",
    )]));
    let fetcher = Arc::new(StubFetcher::new().page(IMAGINE_URL, IMAGINE_PAGE));
    create_router(AppState::new(agent(search, fetcher, dir.path())))
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_root_reports_status() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "API is running");
}

#[tokio::test]
async fn test_agent_then_vocabulary() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, body) = post(
        app.clone(),
        "/api/agent",
        json!({ "message_request": "find lyrics for Imagine by John Lennon" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(body["song_title"], "Imagine");
    assert_eq!(body["artist"], "John Lennon");
    assert_eq!(body["romanized_lyrics"], "");
    assert!(body["lyrics_path"].as_str().unwrap().ends_with(".txt"));

    let handler_id = body["handler_id"].as_str().unwrap().to_string();
    let (status, vocab) = post(app, "/api/get_vocabulary", json!({ "handler_id": handler_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vocab["vocabulary"], body["vocabulary"]);
    assert_eq!(vocab["vocabulary"][0]["term"], "imagine");
}

#[tokio::test]
async fn test_unknown_handler_is_not_found() {
    let dir = TempDir::new().unwrap();
    let (status, body) = post(
        app(&dir),
        "/api/get_vocabulary",
        json!({ "handler_id": "no-such-handler" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body["error"]["message"].as_str().unwrap().contains("no-such-handler"));
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (status, body) = post(app(&dir), "/api/agent", json!({ "message_request": "   " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_concurrent_requests_are_both_registered() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (first, second) = tokio::join!(
        post(
            app.clone(),
            "/api/agent",
            json!({ "message_request": "Imagine by John Lennon" })
        ),
        post(
            app.clone(),
            "/api/agent",
            json!({ "message_request": "lyrics for Imagine by John Lennon" })
        ),
    );
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);

    let first_id = first.1["handler_id"].as_str().unwrap().to_string();
    let second_id = second.1["handler_id"].as_str().unwrap().to_string();
    assert_ne!(first_id, second_id);
    assert_ne!(first.1["lyrics_path"], second.1["lyrics_path"]);

    for id in [first_id, second_id] {
        let (status, _) = post(app.clone(), "/api/get_vocabulary", json!({ "handler_id": id })).await;
        assert_eq!(status, StatusCode::OK);
    }
}
