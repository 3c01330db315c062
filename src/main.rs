//! # apix CLI
//!
//! Command-line front end for the API catalog. Every command prints JSON on
//! stdout; logs go to stderr and are filtered with `RUST_LOG`.
//!
//! ## Usage
//!
//! ```bash
//! apix --config ./config/apix.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `apix apis` | Merged catalog from all sources |
//! | `apix apis --source remote` | Remote registry entries only |
//! | `apix resources <id>` | SDKs and docs for one API |
//! | `apix samples <platforms>` | Code samples for comma-separated platforms |
//! | `apix latest <uid>` | Id of the latest instance of an API |
//! | `apix sources` | Configured upstream services |
//! | `apix export` | Write the merged catalog to a file |
//! | `apix serve` | Serve the catalog over HTTP |

use apix_catalog::catalog::Catalog;
use apix_catalog::config;
use apix_catalog::export;
use apix_catalog::models::ApiId;
use apix_catalog::server;
use apix_catalog::sources;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// apix: aggregate API metadata from a remote registry and a local manifest.
#[derive(Parser)]
#[command(
    name = "apix",
    about = "API catalog aggregator",
    version,
    long_about = "Fetches API metadata from a remote API registry and a local static manifest, \
    normalizes it into one catalog with deduplicated filter facets, and serves it as JSON."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/apix.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print catalog entries and filter facets.
    Apis {
        /// Which sources to include.
        #[arg(long, value_enum, default_value_t = SourceSelector::All)]
        source: SourceSelector,
    },

    /// Print SDK and documentation resources for one API.
    Resources {
        /// Numeric API id from the remote registry.
        id: ApiId,
    },

    /// Search code samples.
    Samples {
        /// Comma-separated platform list, e.g. `ios,android`.
        platforms: String,
    },

    /// Print the id of the latest instance of an API.
    Latest {
        /// API uid as listed in the registry.
        uid: String,
    },

    /// List configured upstream services.
    Sources,

    /// Write the merged catalog as JSON.
    Export {
        /// Output file. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Serve the catalog over HTTP on `[server].bind`.
    Serve,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceSelector {
    All,
    Remote,
    Local,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Apis { source } => {
            let catalog = Catalog::new(&cfg)?;
            match source {
                SourceSelector::All => print_json(catalog.get_all_apis().await.as_ref())?,
                SourceSelector::Remote => print_json(&catalog.get_remote_apis().await.value)?,
                SourceSelector::Local => print_json(&catalog.get_local_apis().await.value)?,
            }
        }
        Commands::Resources { id } => {
            let catalog = Catalog::new(&cfg)?;
            let bundle = catalog.get_remote_api_resources(id).await.into_value();
            print_json(&serde_json::json!({ "resources": bundle }))?;
        }
        Commands::Samples { platforms } => {
            let catalog = Catalog::new(&cfg)?;
            match catalog.get_samples(Some(&platforms)).await.into_value() {
                Some(samples) => print_json(&serde_json::json!({ "data": samples }))?,
                None => print_json(&serde_json::Value::Null)?,
            }
        }
        Commands::Latest { uid } => {
            let catalog = Catalog::new(&cfg)?;
            let latest = catalog
                .get_latest_remote_api_id_for_api_uid(&uid)
                .await
                .into_value();
            print_json(&serde_json::json!({ "data": latest }))?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Export { output } => {
            let catalog = Catalog::new(&cfg)?;
            export::run_export(&catalog, output.as_deref()).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
