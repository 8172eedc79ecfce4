//! Where the catalog document is loaded from.

use crate::i18n::{LoadError, TranslationCatalog};
use crate::retry::{with_retry_if, RetryConfig};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// Relative location the landing page serves its catalog from.
pub const DEFAULT_CATALOG_PATH: &str = "./i18n/translations.json";

/// A static catalog document, remote or on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

impl CatalogSource {
    /// `http://` and `https://` locations are URLs; everything else is a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            CatalogSource::Url(location.to_string())
        } else {
            CatalogSource::File(PathBuf::from(location))
        }
    }

    /// Fetch and parse the catalog.
    ///
    /// URL sources are retried on 5xx, 429 and transport errors according
    /// to `retry`; files are read once.
    pub async fn load(
        &self,
        client: &reqwest::Client,
        retry: &RetryConfig,
    ) -> Result<TranslationCatalog, LoadError> {
        let text = match self {
            CatalogSource::Url(url) => {
                with_retry_if(
                    retry,
                    "Catalog fetch",
                    || fetch_text(client, url),
                    LoadError::is_transient,
                )
                .await?
            }
            CatalogSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
        };

        debug!("Read {} bytes of catalog from {}", text.len(), self);
        let catalog = TranslationCatalog::from_json(&text)?;
        info!(
            "Loaded translation catalog from {} ({} languages)",
            self,
            catalog.languages().count()
        );
        Ok(catalog)
    }
}

impl Default for CatalogSource {
    fn default() -> Self {
        CatalogSource::File(PathBuf::from(DEFAULT_CATALOG_PATH))
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Url(url) => write!(f, "{}", url),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, LoadError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| LoadError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Http {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(|source| LoadError::Request {
        url: url.to_string(),
        source,
    })
}
