//! Source extension trait.
//!
//! Every upstream that contributes catalog entries implements [`ApiSource`].
//! The built-in sources are the remote registry
//! ([`crate::source_remote::RemoteRegistrySource`]) and the local manifest
//! ([`crate::source_local::LocalManifestSource`]); programs embedding the
//! catalog may register their own.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              SourceRegistry              │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐  │
//! │  │  remote  │ │  local   │ │  custom  │  │
//! │  └──────────┘ └──────────┘ └──────────┘  │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!     Catalog::get_all_apis() → merge in registration order
//! ```

use async_trait::async_trait;

use crate::models::{ApiSourceKind, Fetched, PartialResult};

/// A catalog source producing normalized entries and their facets.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use apix_catalog::models::{ApiSourceKind, Fetched, PartialResult};
/// use apix_catalog::traits::ApiSource;
///
/// struct Empty;
///
/// #[async_trait]
/// impl ApiSource for Empty {
///     fn name(&self) -> &str { "empty" }
///     fn kind(&self) -> ApiSourceKind { ApiSourceKind::Local }
///
///     async fn fetch(&self) -> Fetched<PartialResult> {
///         Fetched::complete(PartialResult::default())
///     }
/// }
/// ```
#[async_trait]
pub trait ApiSource: Send + Sync {
    /// Instance name, used in logs and health reports.
    fn name(&self) -> &str;

    /// Provenance stamped on this source's entries.
    fn kind(&self) -> ApiSourceKind;

    fn description(&self) -> &str {
        ""
    }

    /// Fetch and normalize every entry of this source.
    ///
    /// Must not fail: an unreachable upstream resolves with an empty
    /// [`PartialResult`] and a failed status.
    async fn fetch(&self) -> Fetched<PartialResult>;
}

/// Ordered collection of sources. Merge order is registration order.
pub struct SourceRegistry {
    sources: Vec<Box<dyn ApiSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register(&mut self, source: Box<dyn ApiSource>) {
        self.sources.push(source);
    }

    pub fn sources(&self) -> &[Box<dyn ApiSource>] {
        &self.sources
    }

    /// First registered source of the given kind.
    pub fn find_kind(&self, kind: ApiSourceKind) -> Option<&dyn ApiSource> {
        self.sources
            .iter()
            .find(|s| s.kind() == kind)
            .map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
