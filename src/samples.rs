//! Code samples from the sample exchange.
//!
//! Searches `GET {sample_exchange}/search/samples` with one `platform`
//! query pair per requested platform followed by `summary=true`:
//!
//! ```text
//! /search/samples?platform=ios&platform=android&summary=true
//! ```
//!
//! Both "no platform requested" and "no samples found" resolve to `None`.

use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{FetchResult, UpstreamClient};
use crate::models::{Fetched, Sample};
use crate::normalize::lenient::{value_to_id, value_to_string};

/// Split a comma-separated platform list. Blank segments are dropped.
pub fn split_platforms(csv: &str) -> Vec<&str> {
    csv.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Build the search URL, or `None` when no platform was given.
pub fn sample_search_url(client: &UpstreamClient, platform_csv: &str) -> FetchResult<Option<Url>> {
    let platforms = split_platforms(platform_csv);
    if platforms.is_empty() {
        return Ok(None);
    }

    let mut url = client.sample_url("search/samples")?;
    {
        let mut query = url.query_pairs_mut();
        for platform in platforms {
            query.append_pair("platform", platform);
        }
        query.append_pair("summary", "true");
    }
    Ok(Some(url))
}

/// Search samples for the given platforms.
///
/// No request is issued when `platform_csv` is absent or blank. A failed
/// request is logged and resolves to `None`.
pub async fn fetch_samples(
    client: &UpstreamClient,
    platform_csv: Option<&str>,
) -> Fetched<Option<Vec<Sample>>> {
    let platform_csv = match platform_csv {
        Some(p) => p,
        None => return Fetched::skipped(None),
    };

    let url = match sample_search_url(client, platform_csv) {
        Ok(Some(url)) => url,
        Ok(None) => return Fetched::skipped(None),
        Err(e) => {
            warn!(error = %e, "Invalid sample search URL");
            return Fetched::failed(None, e.to_string());
        }
    };

    match client.get_json::<Value>(url).await {
        Ok(body) => {
            let samples = build_samples(body, platform_csv);
            debug!(platform = platform_csv, count = samples.len(), "Fetched samples");
            if samples.is_empty() {
                Fetched::complete(None)
            } else {
                Fetched::complete(Some(samples))
            }
        }
        Err(e) => {
            warn!(platform = platform_csv, error = %e, "Sample search failed");
            Fetched::failed(None, e.to_string())
        }
    }
}

/// Project a decoded search body into samples. `platform` is copied into
/// every sample as requested.
pub fn build_samples(body: Value, platform: &str) -> Vec<Sample> {
    let records = match body {
        Value::Array(records) => records,
        _ => return Vec::new(),
    };

    records
        .iter()
        .map(|record| sample_from_record(record, platform))
        .collect()
}

fn sample_from_record(record: &Value, platform: &str) -> Sample {
    let field = |key: &str| record.get(key).map(value_to_string).unwrap_or_default();

    let tags = record
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.get("name"))
                .map(value_to_string)
                .collect()
        })
        .unwrap_or_default();

    Sample {
        title: field("name"),
        platform: platform.to_string(),
        web_url: field("webUrl"),
        download_url: field("downloadUrl"),
        contributor: record
            .get("author")
            .and_then(|a| a.get("communitiesUser"))
            .map(value_to_string)
            .unwrap_or_default(),
        created_date: record.get("created").cloned().unwrap_or(Value::Null),
        last_updated: record.get("lastUpdated").cloned().unwrap_or(Value::Null),
        tags,
        snippet: field("readmeHtml"),
        favorite_count: record
            .get("favoriteCount")
            .and_then(value_to_id)
            .unwrap_or(0),
    }
}
