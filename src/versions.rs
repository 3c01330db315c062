//! Latest API instance lookup.
//!
//! `GET {remote_apis}/apis/uids/{uid}` lists every registered instance of an
//! API. The registry returns them oldest first, so the latest instance is the
//! last element. No version strings are compared; if the registry changes its
//! ordering, this lookup changes with it.

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{FetchResult, UpstreamClient};
use crate::models::{ApiId, Fetched};
use crate::normalize::lenient::{value_to_id, value_to_string};

/// Resolve the id of the latest instance of `api_uid`.
pub async fn fetch_latest_api_id(client: &UpstreamClient, api_uid: &str) -> Fetched<Option<ApiId>> {
    match request_instances(client, api_uid).await {
        Ok(body) => {
            let latest = latest_instance_id(api_uid, &body);
            Fetched::complete(latest)
        }
        Err(e) => {
            warn!(api_uid, error = %e, "Failed to list API instances");
            Fetched::failed(None, e.to_string())
        }
    }
}

async fn request_instances(client: &UpstreamClient, api_uid: &str) -> FetchResult<Value> {
    let url = client.remote_segments_url(&["apis", "uids", api_uid])?;
    client.get_json(url).await
}

/// Id of the last instance in `body`, or `None` for an empty list.
pub fn latest_instance_id(api_uid: &str, body: &Value) -> Option<ApiId> {
    let instances = match body.as_array() {
        Some(instances) if !instances.is_empty() => instances,
        _ => {
            debug!(api_uid, "API has no instances");
            return None;
        }
    };

    for instance in instances {
        debug!(
            api_uid,
            id = %instance.get("id").map(value_to_string).unwrap_or_default(),
            version = %instance.get("version").map(value_to_string).unwrap_or_default(),
            "API instance"
        );
    }

    instances
        .last()
        .and_then(|last| last.get("id"))
        .and_then(value_to_id)
}
