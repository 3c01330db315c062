//! Core data models used throughout the catalog.
//!
//! Raw upstream records are deserialized into the private record types of
//! [`crate::normalize`]; everything in this module is the normalized shape
//! handed to callers and serialized to the UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric API identifier.
pub type ApiId = u64;

/// First id of the synthetic local id space.
///
/// Local entries are numbered `LOCAL_ID_BASE + index`; remote ids must stay
/// strictly below it. The remote fetcher drops any remote id that does not.
pub const LOCAL_ID_BASE: ApiId = 10_000;

/// Provenance of an [`ApiEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiSourceKind {
    Remote,
    Local,
}

impl ApiSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiSourceKind::Remote => "remote",
            ApiSourceKind::Local => "local",
        }
    }
}

impl fmt::Display for ApiSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEntry {
    /// `None` when the upstream record had no usable numeric id.
    pub id: Option<ApiId>,
    pub name: String,
    pub version: String,
    pub api_uid: String,
    pub description: String,
    pub url: String,
    /// Documentation flavour: `swagger`, `raml`, `html`, ...
    #[serde(rename = "type")]
    pub api_type: String,
    pub products: Vec<String>,
    pub languages: Vec<String>,
    pub source: ApiSourceKind,
}

/// Deduplicated facet lists, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    pub products: Vec<String>,
    pub languages: Vec<String>,
    pub types: Vec<String>,
    pub sources: Vec<String>,
}

/// Entries and facets produced by a single source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialResult {
    pub apis: Vec<ApiEntry>,
    pub filters: FilterSet,
}

/// The merged catalog across all sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub apis: Vec<ApiEntry>,
    pub filters: FilterSet,
    /// One report per source, in merge order.
    pub health: Vec<SourceReport>,
}

impl AggregateResult {
    /// True when at least one source failed while building this result.
    pub fn is_degraded(&self) -> bool {
        self.health.iter().any(|r| r.status.is_failed())
    }
}

/// Outcome of one source fetch inside an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub status: FetchStatus,
    pub entries: usize,
    pub fetched_at: DateTime<Utc>,
}

/// How a best-effort fetch ended.
///
/// Every fetch resolves with a usable value; the status records whether that
/// value reflects the upstream (`Complete`), no request was needed
/// (`Skipped`), or the request failed and the value is a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum FetchStatus {
    Complete,
    Skipped,
    Failed(String),
}

impl FetchStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchStatus::Failed(_))
    }
}

/// A best-effort value paired with the status of the fetch that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub status: FetchStatus,
}

impl<T> Fetched<T> {
    pub fn complete(value: T) -> Self {
        Self {
            value,
            status: FetchStatus::Complete,
        }
    }

    pub fn skipped(value: T) -> Self {
        Self {
            value,
            status: FetchStatus::Skipped,
        }
    }

    pub fn failed(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            status: FetchStatus::Failed(reason.into()),
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Default> Fetched<T> {
    /// A failed fetch carrying the empty placeholder value.
    pub fn failed_empty(reason: impl Into<String>) -> Self {
        Self::failed(T::default(), reason)
    }
}

/// Category tag attached to remote records and resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
}

/// A downloadable SDK or documentation item for one API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub title: String,
    #[serde(rename = "webUrl")]
    pub web_url: String,
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
    pub categories: Vec<String>,
    pub tags: Vec<Tag>,
}

/// SDKs and docs for one API. Empty lists are omitted on the wire so that a
/// bundle without resources serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceBundle {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sdks: Vec<Resource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<Resource>,
}

impl ResourceBundle {
    pub fn is_empty(&self) -> bool {
        self.sdks.is_empty() && self.docs.is_empty()
    }
}

/// A code sample from the sample exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub title: String,
    pub platform: String,
    pub web_url: String,
    pub download_url: String,
    pub contributor: String,
    pub created_date: serde_json::Value,
    pub last_updated: serde_json::Value,
    pub tags: Vec<String>,
    pub snippet: String,
    pub favorite_count: u64,
}
