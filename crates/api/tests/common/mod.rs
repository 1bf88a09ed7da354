//! Shared helpers for API integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! over an in-process mock transform provider, and provides small request
//! helpers around `tower::ServiceExt::oneshot`.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::BodyExt;
use tower::ServiceExt;

use booth_api::config::ServerConfig;
use booth_api::router::build_app_router;
use booth_api::session_token::SESSION_TOKEN_HEADER;
use booth_api::state::AppState;
use booth_provider::{ProviderError, TransformProvider};
use booth_session::{GenerationEngine, SessionStore};

/// Minimal PNG signature; enough for format sniffing on upload.
pub const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Transform provider that returns a fixed PNG payload immediately.
///
/// Optionally fails from a given 1-based call number onward, to exercise
/// the failure path over HTTP.
pub struct MockProvider {
    calls: AtomicUsize,
    fail_from: Option<usize>,
}

impl MockProvider {
    pub fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_from: None,
        }
    }

    pub fn failing_from(call: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_from: Some(call),
        }
    }
}

#[async_trait]
impl TransformProvider for MockProvider {
    async fn transform(
        &self,
        _image: &[u8],
        _mime: &str,
        _instruction: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(fail_from) = self.fail_from {
            if call >= fail_from {
                return Err(ProviderError::Api {
                    status: 500,
                    message: "mock transform failure".into(),
                });
            }
        }
        Ok(PNG_MAGIC.to_vec())
    }
}

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        session_ttl_secs: 600,
        sweep_interval_secs: 60,
        gen_size: "1024x1024".to_string(),
    }
}

/// Build the full application router over the given transform provider.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(provider: Arc<dyn TransformProvider>) -> Router {
    let config = test_config();
    let store = Arc::new(SessionStore::new());
    let engine = GenerationEngine::new(store, provider);

    let state = AppState {
        engine,
        config: Arc::new(config.clone()),
    };

    build_app_router(state, &config)
}

/// Build a test app backed by an always-succeeding provider.
pub fn app() -> Router {
    build_test_app(Arc::new(MockProvider::succeeding()))
}

/// Captured photo as a data URL, ready for `POST /api/v1/capture`.
pub fn png_data_url() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(PNG_MAGIC))
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get_session(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(SESSION_TOKEN_HEADER, token)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json_session(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header(SESSION_TOKEN_HEADER, token)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Issue a fresh session token via the API.
pub async fn create_session(app: &Router) -> String {
    let response = post_json(app, "/api/v1/session", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

/// Walk the session through capture + style so a job can start.
pub async fn ready_session(app: &Router) -> String {
    let token = create_session(app).await;

    let response = post_json_session(
        app,
        "/api/v1/capture",
        &token,
        serde_json::json!({ "image_data": png_data_url() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_session(
        app,
        "/api/v1/style",
        &token,
        serde_json::json!({ "style": "cartoonize" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    token
}

/// Poll `GET /generation/status` until the job reaches a terminal state.
///
/// Tests run on the current-thread runtime, so the spawned job only makes
/// progress while we await; bounded so a stuck job fails loudly instead of
/// hanging.
pub async fn wait_for_terminal(app: &Router, token: &str) -> serde_json::Value {
    for _ in 0..10_000 {
        let response = get_session(app, "/api/v1/generation/status", token).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        match json["data"]["status"].as_str() {
            Some("done") | Some("canceled") | Some("failed") => return json,
            _ => tokio::task::yield_now().await,
        }
    }
    panic!("generation job never reached a terminal state");
}
