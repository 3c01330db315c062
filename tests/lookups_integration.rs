//! Resource, sample and version lookups against a stub upstream.

mod common;

use apix_catalog::catalog::Catalog;
use apix_catalog::models::FetchStatus;
use axum::http::StatusCode;
use common::{dead_base, serve_stub, stub_config, StubUpstream};
use serde_json::json;
use std::sync::Arc;

async fn catalog_over(stub: Arc<StubUpstream>) -> Catalog {
    let base = serve_stub(stub).await;
    Catalog::new(&stub_config(&base)).unwrap()
}

#[tokio::test]
async fn test_resources_partition_and_overview() {
    let stub = StubUpstream::new();
    stub.respond(
        "/registry/apis/42/resources",
        json!([
            {"resource_type": "SDK", "name": "Java SDK", "version": "1.0",
             "web_url": "https://w/sdk", "download_url": "https://d/sdk.zip"},
            {"resource_type": "DOC", "name": "Guide", "version": "2",
             "web_url": "https://w/guide", "download_url": "https://d/guide.pdf",
             "categories": ["API_OVERVIEW"]},
            {"resource_type": "VIDEO", "name": "Intro"}
        ]),
    );
    let catalog = catalog_over(stub.clone()).await;

    let fetched = catalog.get_remote_api_resources(42).await;

    assert_eq!(fetched.status, FetchStatus::Complete);
    let bundle = fetched.value;
    assert_eq!(bundle.sdks.len(), 1);
    assert_eq!(bundle.sdks[0].title, "Java SDK 1.0");
    assert_eq!(bundle.docs.len(), 1);
    let overview = bundle.overview.expect("overview doc");
    assert_eq!(overview.title, "Guide 2");
    assert_eq!(overview.web_url, "https://d/guide.pdf");
    assert_eq!(stub.requests(), vec!["/registry/apis/42/resources"]);
}

#[tokio::test]
async fn test_resources_failure_yields_empty_bundle() {
    let stub = StubUpstream::new();
    let catalog = catalog_over(stub).await;

    // Nothing registered for this path: the stub answers 404.
    let fetched = catalog.get_remote_api_resources(7).await;

    assert!(fetched.status.is_failed());
    assert!(fetched.value.is_empty());
    assert!(fetched.value.overview.is_none());
    assert_eq!(serde_json::to_value(&fetched.value).unwrap(), json!({}));
}

#[tokio::test]
async fn test_samples_absent_platform_issues_no_request() {
    let stub = StubUpstream::new();
    let catalog = catalog_over(stub.clone()).await;

    let fetched = catalog.get_samples(None).await;

    assert_eq!(fetched.status, FetchStatus::Skipped);
    assert!(fetched.value.is_none());
    assert_eq!(stub.total_hits(), 0);
}

#[tokio::test]
async fn test_samples_query_and_projection() {
    let stub = StubUpstream::new();
    stub.respond(
        "/samples/search/samples",
        json!([{
            "name": "Deploy VM",
            "webUrl": "https://code/s/1",
            "downloadUrl": "https://code/s/1.zip",
            "author": {"communitiesUser": "jdoe"},
            "created": 1500000000000u64,
            "lastUpdated": "2017-08-01",
            "tags": [{"name": "vra"}, {"name": "python"}],
            "readmeHtml": "<p>hi</p>",
            "favoriteCount": 3
        }]),
    );
    let catalog = catalog_over(stub.clone()).await;

    let fetched = catalog.get_samples(Some("ios,android")).await;

    assert_eq!(
        stub.requests(),
        vec!["/samples/search/samples?platform=ios&platform=android&summary=true"]
    );
    let samples = fetched.value.expect("samples");
    assert_eq!(samples.len(), 1);
    let sample = &samples[0];
    assert_eq!(sample.title, "Deploy VM");
    assert_eq!(sample.platform, "ios,android");
    assert_eq!(sample.contributor, "jdoe");
    assert_eq!(sample.tags, vec!["vra", "python"]);
    assert_eq!(sample.created_date, json!(1500000000000u64));
    assert_eq!(sample.favorite_count, 3);
}

#[tokio::test]
async fn test_samples_empty_result_is_none() {
    let stub = StubUpstream::new();
    stub.respond("/samples/search/samples", json!([]));
    let catalog = catalog_over(stub.clone()).await;

    let fetched = catalog.get_samples(Some("ios")).await;

    assert_eq!(fetched.status, FetchStatus::Complete);
    assert!(fetched.value.is_none());
    assert_eq!(stub.hits("/samples/search/samples"), 1);
}

#[tokio::test]
async fn test_samples_server_error_is_failed_none() {
    let stub = StubUpstream::new();
    stub.respond_with(
        "/samples/search/samples",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "down"}),
    );
    let catalog = catalog_over(stub).await;

    let fetched = catalog.get_samples(Some("ios")).await;

    assert!(fetched.status.is_failed());
    assert!(fetched.value.is_none());
}

#[tokio::test]
async fn test_latest_is_last_listed_instance() {
    let stub = StubUpstream::new();
    stub.respond(
        "/registry/apis/uids/vra",
        json!([{"id": 5, "version": "7.2"}, {"id": 9, "version": "7.3"}]),
    );
    stub.respond("/registry/apis/uids/empty", json!([]));
    let catalog = catalog_over(stub).await;

    let latest = catalog.get_latest_remote_api_id_for_api_uid("vra").await;
    assert_eq!(latest.status, FetchStatus::Complete);
    assert_eq!(latest.value, Some(9));

    let none = catalog.get_latest_remote_api_id_for_api_uid("empty").await;
    assert_eq!(none.status, FetchStatus::Complete);
    assert_eq!(none.value, None);
}

#[tokio::test]
async fn test_latest_encodes_uid_as_one_segment() {
    let stub = StubUpstream::new();
    stub.respond("/registry/apis/uids/a%2Fb%20c", json!([{"id": 4}]));
    let catalog = catalog_over(stub.clone()).await;

    let latest = catalog.get_latest_remote_api_id_for_api_uid("a/b c").await;

    assert_eq!(latest.value, Some(4));
    assert_eq!(stub.requests(), vec!["/registry/apis/uids/a%2Fb%20c"]);
}

#[tokio::test]
async fn test_lookups_absorb_unreachable_upstream() {
    let catalog = Catalog::new(&stub_config(&dead_base())).unwrap();

    let resources = catalog.get_remote_api_resources(1).await;
    assert!(resources.status.is_failed());
    assert!(resources.value.is_empty());

    let latest = catalog.get_latest_remote_api_id_for_api_uid("vra").await;
    assert!(latest.status.is_failed());
    assert_eq!(latest.value, None);

    let samples = catalog.get_samples(Some("ios")).await;
    assert!(samples.status.is_failed());
    assert!(samples.value.is_none());
}
