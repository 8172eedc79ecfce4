//! Runtime configuration read from environment variables.
//!
//! Every variable is optional; see [`Config::from_env`] for the defaults.

use crate::i18n::{CatalogSource, HostLanguages, LanguageRegistry, DEFAULT_CATALOG_PATH};
use crate::preference::LANGUAGE_PREFERENCE_KEY;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Catalog
    pub catalog_source: CatalogSource,
    pub fetch_timeout: Duration,

    // Languages
    pub supported_languages: Option<Vec<String>>,
    pub default_language: String,
    pub host_languages: Option<Vec<String>>,

    // Preference slot
    pub preference_file: PathBuf,
    pub preference_key: String,
}

impl Config {
    /// Read the configuration from the environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CATALOG_SOURCE` | `./i18n/translations.json` (URL or path) |
    /// | `FETCH_TIMEOUT_SECS` | `10` |
    /// | `SUPPORTED_LANGUAGES` | all shipped languages (comma list) |
    /// | `DEFAULT_LANGUAGE` | `en-US` |
    /// | `HOST_LANGUAGES` | POSIX locale variables (comma list) |
    /// | `PREFERENCE_FILE` | `./.siegemind/preferences.json` |
    /// | `PREFERENCE_KEY` | `siegemind-language` |
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Catalog
            catalog_source: CatalogSource::parse(
                &std::env::var("CATALOG_SOURCE").unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string()),
            ),
            fetch_timeout: Duration::from_secs(
                std::env::var("FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),

            // Languages
            supported_languages: std::env::var("SUPPORTED_LANGUAGES")
                .ok()
                .map(|v| split_list(&v))
                .filter(|list| !list.is_empty()),
            default_language: std::env::var("DEFAULT_LANGUAGE")
                .unwrap_or_else(|_| "en-US".to_string()),
            host_languages: std::env::var("HOST_LANGUAGES")
                .ok()
                .map(|v| split_list(&v))
                .filter(|list| !list.is_empty()),

            // Preference slot
            preference_file: std::env::var("PREFERENCE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./.siegemind/preferences.json")),
            preference_key: std::env::var("PREFERENCE_KEY")
                .unwrap_or_else(|_| LANGUAGE_PREFERENCE_KEY.to_string()),
        })
    }

    /// Registry for the configured language set.
    pub fn registry(&self) -> Result<LanguageRegistry> {
        let registry = match &self.supported_languages {
            Some(codes) => LanguageRegistry::restricted(codes, &self.default_language),
            None => LanguageRegistry::new(
                LanguageRegistry::landing_page().list().to_vec(),
                &self.default_language,
            ),
        };
        registry.context("Invalid SUPPORTED_LANGUAGES / DEFAULT_LANGUAGE")
    }

    /// Explicit host languages if configured, else the POSIX environment.
    pub fn host_languages(&self) -> HostLanguages {
        match &self.host_languages {
            Some(tags) => HostLanguages::new(tags.iter().cloned()),
            None => HostLanguages::from_env(),
        }
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.fetch_timeout)
            .build()
            .context("Failed to build HTTP client")
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
