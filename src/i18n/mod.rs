//! Internationalization (i18n) for the landing page.
//!
//! # Architecture
//!
//! - `registry`: the closed set of supported languages and the default
//! - `catalog`: immutable nested translation data with dotted-key lookup
//! - `detect`: host language preferences and auto-detection
//! - `source`: where the catalog document is loaded from
//! - `store`: `TranslationStore`, the only owner of the active language
//!
//! # Example
//!
//! ```rust,no_run
//! use siegemind_i18n::i18n::{CatalogSource, HostLanguages, LanguageRegistry, TranslationStore};
//! use siegemind_i18n::preference::FilePreferences;
//!
//! # async fn run() {
//! let mut store = TranslationStore::new(
//!     LanguageRegistry::landing_page(),
//!     FilePreferences::new("preferences.json"),
//! );
//! let _ = store
//!     .initialize(&reqwest::Client::new(), &CatalogSource::default(), &HostLanguages::from_env())
//!     .await;
//!
//! let title = store.resolve("hero.title", "SiegeMind");
//! # let _ = title;
//! # }
//! ```

mod catalog;
pub mod detect;
mod error;
mod registry;
mod source;
mod store;

pub use catalog::TranslationCatalog;
pub use detect::{match_host_languages, HostLanguages};
pub use error::{I18nError, LoadError};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use source::{CatalogSource, DEFAULT_CATALOG_PATH};
pub use store::{LanguageChanged, LanguageOrigin, SelectorOption, TranslationStore};
