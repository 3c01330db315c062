//! Catalog HTTP server.
//!
//! Serves the catalog operations to the UI as JSON. Every upstream failure is
//! absorbed by the catalog, so the only error responses are for malformed
//! path parameters.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/apis` | Merged catalog (cached for the server's lifetime) |
//! | `GET` | `/apis/remote` | Remote registry entries |
//! | `GET` | `/apis/local` | Local manifest entries |
//! | `GET` | `/apis/{id}/resources` | `{ "resources": {...} }` |
//! | `GET` | `/apis/uids/{uid}/latest` | `{ "data": id \| null }` |
//! | `GET` | `/samples?platform=a,b` | `{ "data": [...] }` or `null` |
//! | `GET` | `/sources` | Configured upstreams |
//! | `GET` | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "invalid API id: abc" } }
//! ```
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the UI can be hosted
//! separately.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::models::{AggregateResult, ApiId, PartialResult};
use crate::sources::{get_sources, SourceStatus};

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    catalog: Arc<Catalog>,
}

/// Starts the catalog server on `[server].bind`.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let catalog = Arc::new(Catalog::new(config)?);
    run_server_with_catalog(config, catalog).await
}

/// Starts the server over an existing catalog (custom sources, shared cache).
pub async fn run_server_with_catalog(config: &Config, catalog: Arc<Catalog>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(Arc::new(config.clone()), catalog);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Catalog server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router without binding. Useful for serving on a listener the
/// caller already owns.
pub fn router(config: Arc<Config>, catalog: Arc<Catalog>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/apis", get(handle_all_apis))
        .route("/apis/remote", get(handle_remote_apis))
        .route("/apis/local", get(handle_local_apis))
        .route("/apis/{id}/resources", get(handle_resources))
        .route("/apis/uids/{uid}/latest", get(handle_latest))
        .route("/samples", get(handle_samples))
        .route("/sources", get(handle_sources))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { config, catalog })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

// ============ Handlers ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn handle_all_apis(State(state): State<AppState>) -> Json<Arc<AggregateResult>> {
    Json(state.catalog.get_all_apis().await)
}

async fn handle_remote_apis(State(state): State<AppState>) -> Json<PartialResult> {
    Json(state.catalog.get_remote_apis().await.into_value())
}

async fn handle_local_apis(State(state): State<AppState>) -> Json<PartialResult> {
    Json(state.catalog.get_local_apis().await.into_value())
}

async fn handle_resources(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let api_id: ApiId = id
        .parse()
        .map_err(|_| bad_request(format!("invalid API id: {}", id)))?;
    let bundle = state.catalog.get_remote_api_resources(api_id).await.into_value();
    Ok(Json(json!({ "resources": bundle })))
}

async fn handle_latest(State(state): State<AppState>, Path(uid): Path<String>) -> Json<Value> {
    let latest = state
        .catalog
        .get_latest_remote_api_id_for_api_uid(&uid)
        .await
        .into_value();
    Json(json!({ "data": latest }))
}

#[derive(Deserialize)]
struct SamplesQuery {
    platform: Option<String>,
}

async fn handle_samples(
    State(state): State<AppState>,
    Query(query): Query<SamplesQuery>,
) -> Json<Value> {
    let samples = state
        .catalog
        .get_samples(query.platform.as_deref())
        .await
        .into_value();
    match samples {
        Some(samples) => Json(json!({ "data": samples })),
        None => Json(Value::Null),
    }
}

async fn handle_sources(State(state): State<AppState>) -> Json<Vec<SourceStatus>> {
    Json(get_sources(&state.config))
}
