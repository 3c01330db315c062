//! The catalog facade: aggregation, caching and the secondary lookups.
//!
//! [`Catalog::get_all_apis`] is the only cached operation. On the first call
//! every registered source is fetched concurrently, the partial results are
//! merged in registration order (remote before local for the built-in
//! sources), and the merged [`AggregateResult`] is stored in the session
//! cache. Later calls return the same `Arc` without touching the network
//! until [`Catalog::invalidate`] is called.
//!
//! Racing first calls are serialized by a fill lock, so the pipeline runs
//! once; a cache hit never waits on the lock.
//!
//! ```rust,no_run
//! # async fn example() -> anyhow::Result<()> {
//! use apix_catalog::catalog::Catalog;
//! use apix_catalog::config::Config;
//!
//! let config = Config::from_endpoints(
//!     "https://apix.example.com/api/v1",
//!     "https://apix.example.com/local.json",
//!     "https://code.example.com/samples/api/v1",
//! )?;
//! let catalog = Catalog::new(&config)?;
//! let all = catalog.get_all_apis().await;
//! println!("{} APIs, products: {:?}", all.apis.len(), all.filters.products);
//! # Ok(())
//! # }
//! ```

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{SessionCache, ALL_APIS_KEY};
use crate::client::UpstreamClient;
use crate::config::Config;
use crate::models::{
    AggregateResult, ApiId, ApiSourceKind, Fetched, PartialResult, ResourceBundle, Sample,
    SourceReport,
};
use crate::resources::fetch_api_resources;
use crate::samples::fetch_samples;
use crate::source_local::LocalManifestSource;
use crate::source_remote::RemoteRegistrySource;
use crate::traits::SourceRegistry;
use crate::versions::fetch_latest_api_id;

pub struct Catalog {
    client: UpstreamClient,
    sources: SourceRegistry,
    cache: Arc<SessionCache<AggregateResult>>,
    fill_lock: Mutex<()>,
}

impl Catalog {
    /// Catalog over the built-in remote and local sources.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = UpstreamClient::new(config)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: UpstreamClient) -> Self {
        let mut sources = SourceRegistry::new();
        sources.register(Box::new(RemoteRegistrySource::new(client.clone())));
        sources.register(Box::new(LocalManifestSource::new(client.clone())));
        Self::with_parts(client, sources, Arc::new(SessionCache::new()))
    }

    /// Catalog with explicit sources and cache.
    ///
    /// The client is still used for resources, samples and version lookups.
    pub fn with_parts(
        client: UpstreamClient,
        sources: SourceRegistry,
        cache: Arc<SessionCache<AggregateResult>>,
    ) -> Self {
        Self {
            client,
            sources,
            cache,
            fill_lock: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &UpstreamClient {
        &self.client
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn cache(&self) -> &Arc<SessionCache<AggregateResult>> {
        &self.cache
    }

    /// All APIs from all sources, merged and cached for the session.
    pub async fn get_all_apis(&self) -> Arc<AggregateResult> {
        if let Some(cached) = self.cache.get(ALL_APIS_KEY).await {
            debug!("Catalog cache hit");
            return cached;
        }

        let _guard = self.fill_lock.lock().await;
        // Another caller may have filled the cache while we waited.
        if let Some(cached) = self.cache.get(ALL_APIS_KEY).await {
            return cached;
        }

        let partials = join_all(self.sources.sources().iter().map(|source| async move {
            let fetched = source.fetch().await;
            (source.name().to_string(), fetched)
        }))
        .await;

        let result = Arc::new(merge_partials(partials));
        if result.is_degraded() {
            warn!("Catalog built with missing sources");
        }
        info!(
            apis = result.apis.len(),
            products = result.filters.products.len(),
            "Catalog built"
        );

        self.cache.put(ALL_APIS_KEY, result.clone()).await;
        result
    }

    /// Entries from the remote registry only. Not cached.
    pub async fn get_remote_apis(&self) -> Fetched<PartialResult> {
        self.fetch_kind(ApiSourceKind::Remote).await
    }

    /// Entries from the local manifest only. Not cached.
    pub async fn get_local_apis(&self) -> Fetched<PartialResult> {
        self.fetch_kind(ApiSourceKind::Local).await
    }

    async fn fetch_kind(&self, kind: ApiSourceKind) -> Fetched<PartialResult> {
        match self.sources.find_kind(kind) {
            Some(source) => source.fetch().await,
            None => Fetched::skipped(PartialResult::default()),
        }
    }

    pub async fn get_remote_api_resources(&self, api_id: ApiId) -> Fetched<ResourceBundle> {
        fetch_api_resources(&self.client, api_id).await
    }

    pub async fn get_samples(&self, platform_csv: Option<&str>) -> Fetched<Option<Vec<Sample>>> {
        fetch_samples(&self.client, platform_csv).await
    }

    pub async fn get_latest_remote_api_id_for_api_uid(
        &self,
        api_uid: &str,
    ) -> Fetched<Option<ApiId>> {
        fetch_latest_api_id(&self.client, api_uid).await
    }

    /// Drop the cached catalog so the next [`get_all_apis`](Self::get_all_apis)
    /// fetches again.
    pub async fn invalidate(&self) -> bool {
        self.cache.invalidate(ALL_APIS_KEY).await
    }
}

/// Merge per-source partial results in the given order.
///
/// Facet lists are folded with first-occurrence deduplication and entry
/// lists are concatenated.
pub fn merge_partials<I>(partials: I) -> AggregateResult
where
    I: IntoIterator<Item = (String, Fetched<PartialResult>)>,
{
    let mut result = AggregateResult::default();
    for (name, fetched) in partials {
        let Fetched { value, status } = fetched;
        result.health.push(SourceReport {
            source: name,
            status,
            entries: value.apis.len(),
            fetched_at: Utc::now(),
        });
        result.filters.merge(&value.filters);
        result.apis.extend(value.apis);
    }
    result
}
