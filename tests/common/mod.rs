//! Shared test helpers: an in-process stub of the upstream services.

#![allow(dead_code)]

use apix_catalog::config::Config;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Canned upstream responses keyed by request path, plus a log of every
/// request received (`path?query`).
#[derive(Default)]
pub struct StubUpstream {
    responses: Mutex<HashMap<String, (StatusCode, Value)>>,
    requests: Mutex<Vec<String>>,
}

impl StubUpstream {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, path: &str, body: Value) {
        self.respond_with(path, StatusCode::OK, body);
    }

    pub fn respond_with(&self, path: &str, status: StatusCode, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose path equals `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.split('?').next() == Some(path))
            .count()
    }

    pub fn total_hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn handle(State(stub): State<Arc<StubUpstream>>, uri: Uri) -> Response {
    stub.requests.lock().unwrap().push(uri.to_string());
    let canned = stub.responses.lock().unwrap().get(uri.path()).cloned();
    match canned {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve `stub` on an ephemeral port and return its base URL.
pub async fn serve_stub(stub: Arc<StubUpstream>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(handle).with_state(stub);
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

/// Config pointing every endpoint at the stub:
/// remote registry under `/registry`, manifest at `/local.json`, samples
/// under `/samples`.
pub fn stub_config(base: &str) -> Config {
    Config::from_endpoints(
        format!("{}/registry", base),
        format!("{}/local.json", base),
        format!("{}/samples", base),
    )
    .unwrap()
}

/// Base URL of a port nothing listens on.
pub fn dead_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
