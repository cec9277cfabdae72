use item_catalog::ItemAsset;
use reqwest::{Client, ClientBuilder};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid url {value}: not a string")]
    NotAString { value: String },
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Fatal errors abort the whole run. Everything else only skips the item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Write { .. })
    }
}

/// Downloads item images into a single output directory.
pub struct Fetcher {
    client: Client,
    output_dir: PathBuf,
}

impl Fetcher {
    pub fn client_builder(timeout: Duration) -> ClientBuilder {
        Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
    }

    pub fn new(client: Client, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }

    pub fn destination(&self, asset: &ItemAsset<'_>) -> PathBuf {
        self.output_dir.join(asset.file_name())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Fetches the asset's image and saves it as `<id>.webp`, replacing any
    /// previous file. The file is only touched once the whole body is in.
    pub async fn fetch(&self, asset: &ItemAsset<'_>) -> Result<PathBuf, FetchError> {
        let url = asset.url().ok_or_else(|| FetchError::NotAString {
            value: asset.image.to_string(),
        })?;
        let body = self.download(url).await?;

        let path = self.destination(asset);
        tokio::fs::write(&path, &body)
            .await
            .map_err(|source| FetchError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}
