//! Export the merged catalog as JSON.
//!
//! Produces the same document `GET /apis` serves, so the catalog can be
//! published as a static file next to the UI.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::catalog::Catalog;

/// Fetch the catalog and write it as pretty JSON.
///
/// If `output` is `Some`, writes to that file path (creating parent
/// directories). Otherwise writes to stdout for piping.
pub async fn run_export(catalog: &Catalog, output: Option<&Path>) -> Result<()> {
    let result = catalog.get_all_apis().await;
    let json = serde_json::to_string_pretty(result.as_ref())?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)?;
            info!(
                apis = result.apis.len(),
                products = result.filters.products.len(),
                languages = result.filters.languages.len(),
                path = %path.display(),
                "Exported catalog"
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
