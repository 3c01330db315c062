//! Local manifest source.
//!
//! Fetches the statically hosted manifest at `{local_apis}`:
//!
//! ```json
//! { "apis": [
//!   { "name": "Local API", "url": "specs/local.json",
//!     "products": ["vSphere"], "languages": ["Go"] }
//! ] }
//! ```
//!
//! Entries are numbered `LOCAL_ID_BASE + index` in manifest order, and a
//! missing `type` is inferred from the URL suffix.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::client::{FetchResult, UpstreamClient};
use crate::models::{ApiSourceKind, Fetched, FilterSet, PartialResult};
use crate::normalize::normalize_local;
use crate::source_remote::json_kind;
use crate::traits::ApiSource;

/// The local manifest as an [`ApiSource`].
pub struct LocalManifestSource {
    client: UpstreamClient,
}

impl LocalManifestSource {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApiSource for LocalManifestSource {
    fn name(&self) -> &str {
        "local"
    }

    fn kind(&self) -> ApiSourceKind {
        ApiSourceKind::Local
    }

    fn description(&self) -> &str {
        "Static local API manifest"
    }

    async fn fetch(&self) -> Fetched<PartialResult> {
        fetch_local_apis(&self.client).await
    }
}

/// Fetch and normalize the local manifest. Never fails.
pub async fn fetch_local_apis(client: &UpstreamClient) -> Fetched<PartialResult> {
    match request_manifest(client).await {
        Ok(body) => {
            let partial = build_local_partial(body);
            info!(source = "local", count = partial.apis.len(), "Fetched APIs");
            Fetched::complete(partial)
        }
        Err(e) => {
            warn!(source = "local", error = %e, "Local API manifest unavailable");
            Fetched::failed_empty(e.to_string())
        }
    }
}

async fn request_manifest(client: &UpstreamClient) -> FetchResult<Value> {
    let url = client.local_url()?;
    client.get_json(url).await
}

/// Normalize a decoded manifest body (`{"apis": [...]}`).
pub fn build_local_partial(body: Value) -> PartialResult {
    let records = match body {
        Value::Object(mut map) => match map.remove("apis") {
            Some(Value::Array(records)) => records,
            Some(other) => {
                warn!(
                    source = "local",
                    kind = json_kind(&other),
                    "Manifest 'apis' is not an array"
                );
                Vec::new()
            }
            None => Vec::new(),
        },
        other => {
            warn!(
                source = "local",
                kind = json_kind(&other),
                "Expected a manifest object"
            );
            Vec::new()
        }
    };

    let apis: Vec<_> = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| normalize_local(record, index))
        .collect();
    let filters = FilterSet::from_entries(&apis);
    PartialResult { apis, filters }
}
