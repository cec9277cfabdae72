use crate::fetcher::Fetcher;
use anyhow::Context;
use item_catalog::{CatalogEntry, CatalogSet};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything a run needs, with paths already resolved.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root. Only used to shorten paths in log lines.
    pub root: PathBuf,
    pub catalogs: CatalogSet,
    pub output_dir: PathBuf,
    pub timeout: Duration,
}

fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

pub async fn run(config: &Config) -> Result<(), anyhow::Error> {
    let client = Fetcher::client_builder(config.timeout).build()?;
    run_with_client(config, client).await
}

/// Fetches every asset of every catalog, in order. Missing catalogs and
/// failed downloads are logged and skipped; unreadable catalogs and write
/// failures stop the run.
pub async fn run_with_client(config: &Config, client: Client) -> Result<(), anyhow::Error> {
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("could not create {}", config.output_dir.display()))?;

    let fetcher = Fetcher::new(client, &config.output_dir);

    for entry in config.catalogs.iter() {
        let catalog = match entry? {
            CatalogEntry::Missing(path) => {
                info!("Skipping missing file: {}", path.display());
                continue;
            }
            CatalogEntry::Loaded(catalog) => catalog,
        };

        info!(
            "Processing {}",
            relative_to(catalog.path(), &config.root).display()
        );

        for asset in catalog.assets() {
            if !asset.id.is_plain_file_stem() {
                warn!("Skipping {}: id is not a valid file name", asset.id);
                continue;
            }

            debug!(id = %asset.id, image = %asset.image, "fetching");
            match fetcher.fetch(&asset).await {
                Ok(path) => info!("Saved {}", path.display()),
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => warn!("Failed {}: {}", asset.id, e),
            }
        }
    }

    Ok(())
}
