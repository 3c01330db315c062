//! SDK and documentation resources for a single remote API.
//!
//! `GET {remote_apis}/apis/{id}/resources` returns a flat list of resource
//! records. Records with `resource_type` `SDK` or `DOC` are projected into
//! [`Resource`]s; anything else is ignored. The first doc whose first
//! category is [`OVERVIEW_CATEGORY`] becomes the bundle's overview and links
//! straight to its download URL.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{FetchResult, UpstreamClient};
use crate::models::{ApiId, Fetched, Resource, ResourceBundle, Tag};
use crate::normalize::lenient;

pub const OVERVIEW_CATEGORY: &str = "API_OVERVIEW";

const RESOURCE_SDK: &str = "SDK";
const RESOURCE_DOC: &str = "DOC";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResourceRecord {
    #[serde(deserialize_with = "lenient::string")]
    resource_type: String,
    #[serde(deserialize_with = "lenient::string")]
    name: String,
    #[serde(deserialize_with = "lenient::string")]
    version: String,
    #[serde(deserialize_with = "lenient::string")]
    web_url: String,
    #[serde(deserialize_with = "lenient::string")]
    download_url: String,
    #[serde(deserialize_with = "lenient::string_list")]
    categories: Vec<String>,
    #[serde(deserialize_with = "lenient::tags")]
    tags: Vec<Tag>,
}

impl ResourceRecord {
    fn into_resource(self) -> Resource {
        Resource {
            title: format!("{} {}", self.name, self.version),
            web_url: self.web_url,
            download_url: self.download_url,
            categories: self.categories,
            tags: self.tags,
        }
    }
}

/// Fetch the resources of one API. A failed request yields an empty bundle.
pub async fn fetch_api_resources(
    client: &UpstreamClient,
    api_id: ApiId,
) -> Fetched<ResourceBundle> {
    match request_resources(client, api_id).await {
        Ok(body) => Fetched::complete(build_bundle(body)),
        Err(e) => {
            warn!(api_id, error = %e, "Failed to fetch API resources");
            Fetched::failed_empty(e.to_string())
        }
    }
}

async fn request_resources(client: &UpstreamClient, api_id: ApiId) -> FetchResult<Value> {
    let id = api_id.to_string();
    let url = client.remote_segments_url(&["apis", id.as_str(), "resources"])?;
    client.get_json(url).await
}

/// Partition a decoded resources body into SDKs and docs.
pub fn build_bundle(body: Value) -> ResourceBundle {
    let records = match body {
        Value::Array(records) => records,
        _ => Vec::new(),
    };

    let mut bundle = ResourceBundle::default();
    for record in records {
        let record: ResourceRecord = match serde_json::from_value(record) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Skipping malformed resource record");
                continue;
            }
        };
        match record.resource_type.as_str() {
            RESOURCE_SDK => bundle.sdks.push(record.into_resource()),
            RESOURCE_DOC => bundle.docs.push(record.into_resource()),
            _ => {}
        }
    }

    if !bundle.is_empty() {
        debug!(
            sdks = bundle.sdks.len(),
            docs = bundle.docs.len(),
            "Resolved API resources"
        );
    }

    let overview = bundle
        .docs
        .iter_mut()
        .find(|doc| doc.categories.first().map(String::as_str) == Some(OVERVIEW_CATEGORY));
    if let Some(doc) = overview {
        doc.web_url = doc.download_url.clone();
        bundle.overview = Some(doc.clone());
    }

    bundle
}
