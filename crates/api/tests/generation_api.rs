//! Integration tests for the generation job lifecycle over HTTP:
//! start, poll, cancel, results.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    app, body_json, build_test_app, get_session, post_json_session, ready_session,
    wait_for_terminal, MockProvider,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: a fresh session polls as idle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_is_idle_before_any_job() {
    let app = app();
    let token = common::create_session(&app).await;

    let json = body_json(get_session(&app, "/api/v1/generation/status", &token).await).await;
    assert_eq!(json["data"]["status"], "idle");
    assert_eq!(json["data"]["progress"], 0);
    assert!(json["data"]["error"].is_null());
}

// ---------------------------------------------------------------------------
// Test: happy path start -> done -> four results
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_run_produces_four_results() {
    let app = app();
    let token = ready_session(&app).await;

    let response = post_json_session(
        &app,
        "/api/v1/generation/start",
        &token,
        json!({ "prompts": ["add a hat", "", "sunglasses", ""] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = wait_for_terminal(&app, &token).await;
    assert_eq!(json["data"]["status"], "done");
    assert_eq!(json["data"]["progress"], 100);

    let response = get_session(&app, "/api/v1/results", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let images = json["data"]["images"].as_array().unwrap();
    assert_eq!(images.len(), 4);
    for image in images {
        assert!(image
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }
}

// ---------------------------------------------------------------------------
// Test: starting without a capture is MISSING_INPUT
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_without_capture_is_missing_input() {
    let app = app();
    let token = common::create_session(&app).await;

    let response =
        post_json_session(&app, "/api/v1/generation/start", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "MISSING_INPUT");
}

// ---------------------------------------------------------------------------
// Test: results before the job finishes are NOT_READY
// ---------------------------------------------------------------------------

#[tokio::test]
async fn results_before_done_are_not_ready() {
    let app = app();
    let token = ready_session(&app).await;

    let response = get_session(&app, "/api/v1/results", &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_READY");
}

// ---------------------------------------------------------------------------
// Test: cancel before the job starts leaves a canceled record
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancel_without_job_reports_canceled() {
    let app = app();
    let token = common::create_session(&app).await;

    let response = post_json_session(&app, "/api/v1/generation/cancel", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["accepted"], true);

    let json = body_json(get_session(&app, "/api/v1/generation/status", &token).await).await;
    assert_eq!(json["data"]["status"], "canceled");
}

// ---------------------------------------------------------------------------
// Test: provider failure surfaces through the status poll
// ---------------------------------------------------------------------------

#[tokio::test]
async fn provider_failure_is_reported_in_status() {
    let app = build_test_app(Arc::new(MockProvider::failing_from(3)));
    let token = ready_session(&app).await;

    let response =
        post_json_session(&app, "/api/v1/generation/start", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = wait_for_terminal(&app, &token).await;
    assert_eq!(json["data"]["status"], "failed");
    assert_eq!(json["data"]["progress"], 50);
    assert!(json["data"]["error"]
        .as_str()
        .unwrap()
        .contains("mock transform failure"));

    // No partial results leak out.
    let response = get_session(&app, "/api/v1/results", &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Test: a finished job can be restarted and succeeds again
// ---------------------------------------------------------------------------

#[tokio::test]
async fn done_job_can_be_restarted() {
    let app = app();
    let token = ready_session(&app).await;

    for _ in 0..2 {
        let response =
            post_json_session(&app, "/api/v1/generation/start", &token, json!({})).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let json = wait_for_terminal(&app, &token).await;
        assert_eq!(json["data"]["status"], "done");
    }
}
