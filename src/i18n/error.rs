//! Errors raised while loading catalogs and switching languages.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a usable translation catalog.
///
/// Never fatal: the store keeps running without a catalog and every lookup
/// degrades to the caller's fallback text or the raw key.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to request catalog from {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog request to {url} returned HTTP {status}")]
    Http {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is malformed: {0}")]
    Malformed(String),
}

impl LoadError {
    /// Whether another attempt could succeed (5xx, 429, transport errors).
    pub fn is_transient(&self) -> bool {
        match self {
            LoadError::Request { .. } => true,
            LoadError::Http { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            LoadError::Io { .. } | LoadError::Malformed(_) => false,
        }
    }
}

/// Errors from language selection and registry construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum I18nError {
    #[error("language {0} is not supported")]
    UnsupportedLanguage(String),

    #[error("language registry has no languages")]
    EmptyRegistry,
}
