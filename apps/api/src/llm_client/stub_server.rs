//! Local stand-in for the `generateContent` endpoint, bound to an ephemeral port.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::json;

pub const STUB_API_KEY: &str = "test-key-123";

/// What the stub saw on its last request.
#[derive(Debug, Default, Clone)]
pub struct SeenRequest {
    pub api_key: Option<String>,
    pub body: String,
}

struct Upstream {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    seen: Mutex<Option<SeenRequest>>,
}

pub struct StubServer {
    pub url: String,
    upstream: Arc<Upstream>,
}

impl StubServer {
    pub fn last_request(&self) -> Option<SeenRequest> {
        self.upstream
            .seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

async fn generate(
    State(upstream): State<Arc<Upstream>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *upstream.seen.lock().unwrap_or_else(|e| e.into_inner()) = Some(SeenRequest { api_key, body });

    (
        upstream.status,
        [(header::CONTENT_TYPE, upstream.content_type)],
        upstream.body.clone(),
    )
}

pub async fn spawn(status: StatusCode, content_type: &'static str, body: String) -> StubServer {
    let upstream = Arc::new(Upstream {
        status,
        content_type,
        body,
        seen: Mutex::new(None),
    });
    let app = Router::new()
        .route("/generate", post(generate))
        .with_state(Arc::clone(&upstream));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        url: format!("http://{addr}/generate"),
        upstream,
    }
}

/// Wraps `text` as the first candidate's only part.
pub fn candidate_envelope(text: &str) -> String {
    json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
    .to_string()
}

pub async fn spawn_json(status: StatusCode, body: String) -> StubServer {
    spawn(status, "application/json", body).await
}
