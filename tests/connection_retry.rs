use reqwest::StatusCode;
use std::time::Duration;

mod common;

use common::TestApp;

#[tokio::test]
async fn persistent_connection_failure_is_500_after_three_attempts() {
    // ---
    let app = TestApp::new();
    app.repository.set_unavailable(true);
    let server = app.spawn().await;

    let (status, body) = server.get_json("/products").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
    assert_eq!(body["error"], "Database unavailable");

    assert_eq!(app.repository.connect_calls(), 3);
    // Pauses only between attempts, never after the last one.
    assert_eq!(app.sleeper.naps(), [Duration::from_secs(1); 2]);
}

#[tokio::test]
async fn transient_failure_recovers_on_retry() {
    // ---
    let app = TestApp::new();
    let product = app.repository.insert("Desk", 250.0, 2);
    app.repository.fail_next_connects(1);
    let server = app.spawn().await;

    let (status, body) = server.get_json(&format!("/products/{}", product.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Desk");

    assert_eq!(app.repository.connect_calls(), 2);
    assert_eq!(app.sleeper.naps(), [Duration::from_secs(1)]);

    let snapshot = app.metrics.snapshot();
    assert_eq!(snapshot.request_count, 1);
    assert_eq!(snapshot.error_count, 0);
}

#[tokio::test]
async fn failure_on_last_attempt_still_succeeds_within_budget() {
    // ---
    let app = TestApp::new();
    app.repository.fail_next_connects(2);
    let server = app.spawn().await;

    let res = server
        .create(serde_json::json!({ "name": "Chair", "price": 120.0, "quantity": 6 }))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(app.repository.connect_calls(), 3);
}

#[tokio::test]
async fn every_request_gets_a_fresh_retry_budget() {
    // ---
    let app = TestApp::new();
    app.repository.set_unavailable(true);
    let server = app.spawn().await;

    for _ in 0..2 {
        let (status, _) = server.get_json("/products").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
    assert_eq!(app.repository.connect_calls(), 6);

    app.repository.set_unavailable(false);
    let (status, _) = server.get_json("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.repository.connect_calls(), 7);
}
