//! Remote API registry source.
//!
//! Fetches `GET {remote_apis}/apis`, a JSON array of registry records
//! classified by tags:
//!
//! ```json
//! [{
//!   "id": 42,
//!   "name": "vRealize Automation API",
//!   "version": "7.3",
//!   "api_uid": "vra",
//!   "api_ref_doc_url": "https://…/swagger.json",
//!   "tags": [
//!     {"category": "display", "name": "swagger"},
//!     {"category": "product", "name": "vRA"},
//!     {"category": "programming-language", "name": "Java"}
//!   ]
//! }]
//! ```
//!
//! See [`crate::normalize`] for the classification rules.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::client::{FetchResult, UpstreamClient};
use crate::models::{ApiSourceKind, Fetched, FilterSet, PartialResult};
use crate::normalize::normalize_remote;
use crate::traits::ApiSource;

/// The remote registry as an [`ApiSource`].
pub struct RemoteRegistrySource {
    client: UpstreamClient,
}

impl RemoteRegistrySource {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApiSource for RemoteRegistrySource {
    fn name(&self) -> &str {
        "remote"
    }

    fn kind(&self) -> ApiSourceKind {
        ApiSourceKind::Remote
    }

    fn description(&self) -> &str {
        "API registry service"
    }

    async fn fetch(&self) -> Fetched<PartialResult> {
        fetch_remote_apis(&self.client).await
    }
}

/// Fetch and normalize the remote registry. Never fails; see
/// [`Fetched`] for how failures are reported.
pub async fn fetch_remote_apis(client: &UpstreamClient) -> Fetched<PartialResult> {
    match request_remote_apis(client).await {
        Ok(records) => {
            let partial = build_remote_partial(records);
            info!(source = "remote", count = partial.apis.len(), "Fetched APIs");
            Fetched::complete(partial)
        }
        Err(e) => {
            warn!(source = "remote", error = %e, "Remote API registry unavailable");
            Fetched::failed_empty(e.to_string())
        }
    }
}

async fn request_remote_apis(client: &UpstreamClient) -> FetchResult<Value> {
    let url = client.remote_url("apis")?;
    client.get_json(url).await
}

/// Normalize a decoded `/apis` body. A body that is not an array yields no
/// entries.
pub fn build_remote_partial(body: Value) -> PartialResult {
    let records = match body {
        Value::Array(records) => records,
        Value::Null => Vec::new(),
        other => {
            warn!(
                source = "remote",
                kind = json_kind(&other),
                "Expected an array of APIs"
            );
            Vec::new()
        }
    };

    let apis: Vec<_> = records.into_iter().map(normalize_remote).collect();
    let filters = FilterSet::from_entries(&apis);
    PartialResult { apis, filters }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
