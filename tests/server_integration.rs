//! HTTP server tests: the router served on an ephemeral port, backed by a
//! catalog pointed at a stub upstream.

mod common;

use apix_catalog::catalog::Catalog;
use apix_catalog::server::router;
use common::{serve_stub, stub_config, StubUpstream};
use serde_json::{json, Value};
use std::sync::Arc;

/// Start the catalog server and return its base URL.
async fn start_server(stub: Arc<StubUpstream>) -> String {
    let upstream = serve_stub(stub).await;
    let config = Arc::new(stub_config(&upstream));
    let catalog = Arc::new(Catalog::new(&config).unwrap());
    let app = router(config, catalog);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

async fn get(url: &str) -> (u16, Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.unwrap();
    (status, body)
}

fn seeded_stub() -> Arc<StubUpstream> {
    let stub = StubUpstream::new();
    stub.respond(
        "/registry/apis",
        json!([{
            "id": 3,
            "name": "Remote",
            "tags": [{"category": "display", "name": "swagger"},
                     {"category": "product", "name": "vSphere"}]
        }]),
    );
    stub.respond(
        "/local.json",
        json!({"apis": [{"name": "Local", "url": "doc.raml"}]}),
    );
    stub
}

#[tokio::test]
async fn test_health() {
    let base = start_server(StubUpstream::new()).await;

    let (status, body) = get(&format!("{}/health", base)).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_all_apis_wire_shape_and_caching() {
    let stub = seeded_stub();
    let base = start_server(stub.clone()).await;

    let (status, body) = get(&format!("{}/apis", base)).await;
    assert_eq!(status, 200);

    let apis = body["apis"].as_array().unwrap();
    assert_eq!(apis.len(), 2);
    assert_eq!(apis[0]["id"], 3);
    assert_eq!(apis[0]["type"], "swagger");
    assert_eq!(apis[0]["source"], "remote");
    assert_eq!(apis[1]["id"], 10_000);
    assert_eq!(apis[1]["type"], "raml");
    assert_eq!(body["filters"]["products"], json!(["vSphere"]));
    assert_eq!(body["filters"]["sources"], json!(["remote", "local"]));
    assert_eq!(body["health"][0]["status"]["state"], "complete");

    let (_, again) = get(&format!("{}/apis", base)).await;
    assert_eq!(again["apis"], body["apis"]);
    assert_eq!(stub.hits("/registry/apis"), 1);
}

#[tokio::test]
async fn test_single_source_routes() {
    let base = start_server(seeded_stub()).await;

    let (_, remote) = get(&format!("{}/apis/remote", base)).await;
    assert_eq!(remote["apis"][0]["name"], "Remote");
    assert_eq!(remote["filters"]["sources"], json!(["remote"]));

    let (_, local) = get(&format!("{}/apis/local", base)).await;
    assert_eq!(local["apis"][0]["name"], "Local");
    assert_eq!(local["apis"][0]["id"], 10_000);
}

#[tokio::test]
async fn test_resources_route() {
    let stub = StubUpstream::new();
    stub.respond(
        "/registry/apis/3/resources",
        json!([{"resource_type": "SDK", "name": "SDK", "version": "1",
                "web_url": "w", "download_url": "d"}]),
    );
    let base = start_server(stub).await;

    let (status, body) = get(&format!("{}/apis/3/resources", base)).await;

    assert_eq!(status, 200);
    assert_eq!(body["resources"]["sdks"][0]["title"], "SDK 1");
    assert_eq!(body["resources"]["sdks"][0]["webUrl"], "w");
    assert!(body["resources"].get("docs").is_none());
}

#[tokio::test]
async fn test_resources_rejects_non_numeric_id() {
    let stub = StubUpstream::new();
    let base = start_server(stub.clone()).await;

    let (status, body) = get(&format!("{}/apis/abc/resources", base)).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(stub.total_hits(), 0);
}

#[tokio::test]
async fn test_latest_route() {
    let stub = StubUpstream::new();
    stub.respond("/registry/apis/uids/vra", json!([{"id": 5}, {"id": 9}]));
    let base = start_server(stub).await;

    let (_, body) = get(&format!("{}/apis/uids/vra/latest", base)).await;
    assert_eq!(body, json!({"data": 9}));

    let (_, missing) = get(&format!("{}/apis/uids/nope/latest", base)).await;
    assert_eq!(missing, json!({"data": null}));
}

#[tokio::test]
async fn test_samples_route() {
    let stub = StubUpstream::new();
    stub.respond("/samples/search/samples", json!([{"name": "S1"}]));
    let base = start_server(stub.clone()).await;

    let (_, none) = get(&format!("{}/samples", base)).await;
    assert_eq!(none, Value::Null);
    assert_eq!(stub.total_hits(), 0);

    let (_, body) = get(&format!("{}/samples?platform=ios", base)).await;
    assert_eq!(body["data"][0]["title"], "S1");
    assert_eq!(body["data"][0]["platform"], "ios");
    assert_eq!(body["data"][0]["favoriteCount"], 0);
}

#[tokio::test]
async fn test_sources_route() {
    let base = start_server(StubUpstream::new()).await;

    let (_, body) = get(&format!("{}/sources", base)).await;

    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["remote", "local", "samples"]);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let base = start_server(StubUpstream::new()).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/health", base))
        .header("Origin", "http://ui.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
