//! Upstream endpoint listing.
//!
//! Reports which upstream services the catalog is configured to use. Used by
//! both the `apix sources` CLI command and the `GET /sources` HTTP endpoint.
//!
//! | Upstream | Used by |
//! |----------|---------|
//! | `remote` | catalog entries, resources, latest-version lookup |
//! | `local` | catalog entries |
//! | `samples` | sample search |

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::models::LOCAL_ID_BASE;

/// One configured upstream service.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub name: String,
    pub url: String,
    /// Whether the upstream contributes entries to `get_all_apis`.
    pub aggregated: bool,
    pub notes: Option<String>,
}

pub fn get_sources(config: &Config) -> Vec<SourceStatus> {
    let endpoints = &config.endpoints;
    vec![
        SourceStatus {
            name: "remote".to_string(),
            url: endpoints.remote_apis.clone(),
            aggregated: true,
            notes: Some("GET /apis, /apis/{id}/resources, /apis/uids/{uid}".to_string()),
        },
        SourceStatus {
            name: "local".to_string(),
            url: endpoints.local_apis.clone(),
            aggregated: true,
            notes: Some(format!("ids from {}", LOCAL_ID_BASE)),
        },
        SourceStatus {
            name: "samples".to_string(),
            url: endpoints.sample_exchange.clone(),
            aggregated: false,
            notes: Some("GET /search/samples".to_string()),
        },
    ]
}

/// CLI entry point for `apix sources`.
pub fn list_sources(config: &Config) -> Result<()> {
    let sources = get_sources(config);

    println!("{:<10} {:<11} URL", "SOURCE", "AGGREGATED");
    for s in &sources {
        println!("{:<10} {:<11} {}", s.name, s.aggregated, s.url);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_all_three_upstreams() {
        let config = Config::from_endpoints(
            "http://registry.test/",
            "http://static.test/local.json",
            "http://samples.test",
        )
        .unwrap();

        let sources = get_sources(&config);
        let names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["remote", "local", "samples"]);
        assert_eq!(sources[0].url, "http://registry.test");
        assert!(!sources[2].aggregated);
    }
}
