//! # apix-catalog
//!
//! An API catalog aggregator. Fetches API metadata from two upstream
//! services (a remote API registry and a local static manifest), normalizes
//! the records into one [`models::ApiEntry`] shape, deduplicates the filter
//! facets, and caches the combined result for the session.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐   ┌───────────┐   ┌──────────┐
//! │   Sources    │──▶│ Normalizer │──▶│  Facets   │──▶│ Catalog  │
//! │ remote/local │   │  per record│   │  dedup    │   │ + cache  │
//! └──────────────┘   └────────────┘   └───────────┘   └────┬─────┘
//!                                                          │
//!                                  ┌───────────────────────┤
//!                                  ▼                       ▼
//!                             ┌──────────┐           ┌──────────┐
//!                             │   CLI    │           │   HTTP   │
//!                             │  (apix)  │           │  server  │
//!                             └──────────┘           └──────────┘
//! ```
//!
//! ## Failure model
//!
//! No operation fails because an upstream is down. Each fetch resolves with
//! a placeholder value (empty list, empty bundle, `None`) and a
//! [`models::FetchStatus`] saying whether the value is real or degraded.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`models`] | Catalog data types and the `Fetched` wrapper |
//! | [`client`] | Shared HTTP client and `FetchError` |
//! | [`normalize`] | Raw record → `ApiEntry`, type inference |
//! | [`facets`] | First-occurrence facet deduplication |
//! | [`traits`] | `ApiSource` trait and `SourceRegistry` |
//! | [`source_remote`] | Remote API registry source |
//! | [`source_local`] | Local manifest source |
//! | [`cache`] | Session cache |
//! | [`catalog`] | Aggregation and the public operations |
//! | [`resources`] | SDK/doc resources for one API |
//! | [`samples`] | Sample exchange search |
//! | [`versions`] | Latest API instance lookup |
//! | [`sources`] | Configured upstream listing |
//! | [`export`] | JSON export |
//! | [`server`] | HTTP server (Axum) with CORS |

pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod export;
pub mod facets;
pub mod models;
pub mod normalize;
pub mod resources;
pub mod samples;
pub mod server;
pub mod source_local;
pub mod source_remote;
pub mod sources;
pub mod traits;
pub mod versions;

pub use catalog::Catalog;
pub use models::{AggregateResult, ApiEntry, FetchStatus, Fetched, FilterSet};
pub use traits::{ApiSource, SourceRegistry};
