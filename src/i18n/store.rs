//! The translation store: catalog, active language and change notification.
//!
//! # Lifecycle
//!
//! 1. [`TranslationStore::new`] builds a store that resolves nothing yet:
//!    active language is the registry default and there is no catalog.
//! 2. [`TranslationStore::initialize`] loads the catalog once and picks the
//!    active language (saved preference, then host preferences, then the
//!    default). A failed load leaves the store in degraded mode.
//! 3. [`TranslationStore::set_active_language`] is the only way to change
//!    the language afterwards. Each change is persisted and broadcast.
//!
//! `resolve` is total: absent data returns the caller's fallback text, or
//! the key itself, never an error.

use crate::i18n::{
    match_host_languages, CatalogSource, HostLanguages, I18nError, LanguageRegistry, LoadError,
    TranslationCatalog,
};
use crate::preference::{PreferenceStore, LANGUAGE_PREFERENCE_KEY};
use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Capacity of the change notification channel.
const CHANNEL_CAPACITY: usize = 16;

/// Broadcast each time the active language changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageChanged {
    pub language: String,
}

/// One entry of the language selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOption {
    pub code: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// How the current active language was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageOrigin {
    /// Not initialized yet, or the catalog failed to load
    Default,
    /// Restored from the preference slot
    Saved,
    /// Matched against host preferences
    Detected,
    /// Host preferences matched nothing
    Fallback,
    /// Set through `set_active_language`
    Chosen,
}

/// Owner of the catalog, the active language and the preference slot.
///
/// Mutation goes through `&mut self`; wrap the store yourself to share it
/// across tasks.
pub struct TranslationStore {
    registry: LanguageRegistry,
    catalog: Option<TranslationCatalog>,
    active: &'static str,
    origin: LanguageOrigin,
    preferences: Box<dyn PreferenceStore>,
    preference_key: String,
    retry: RetryConfig,
    events: broadcast::Sender<LanguageChanged>,
}

impl TranslationStore {
    /// Create an uninitialized store.
    ///
    /// # Arguments
    /// * `registry` - Supported languages and the default
    /// * `preferences` - Where the chosen language is saved
    ///
    /// # Returns
    /// A store whose active language is the registry default and which has no
    /// catalog until [`TranslationStore::initialize`] runs.
    pub fn new(registry: LanguageRegistry, preferences: impl PreferenceStore + 'static) -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            active: registry.default_code(),
            registry,
            catalog: None,
            origin: LanguageOrigin::Default,
            preferences: Box::new(preferences),
            preference_key: LANGUAGE_PREFERENCE_KEY.to_string(),
            retry: RetryConfig::catalog_fetch(),
            events,
        }
    }

    /// Store the language under a different preference key.
    pub fn with_preference_key(mut self, key: impl Into<String>) -> Self {
        self.preference_key = key.into();
        self
    }

    /// Override the retry schedule for remote catalogs.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Load the catalog and choose the active language.
    ///
    /// # Arguments
    /// * `client` - HTTP client used for `CatalogSource::Url`
    /// * `source` - Where to load the catalog from
    /// * `host` - Host language preferences, consulted when nothing is saved
    ///
    /// # Errors
    /// Returns the `LoadError` when the catalog cannot be loaded. On failure the error is logged and returned, the store keeps no
    /// catalog and the active language falls back to the default.
    pub async fn initialize(
        &mut self,
        client: &reqwest::Client,
        source: &CatalogSource,
        host: &HostLanguages,
    ) -> Result<(), LoadError> {
        match source.load(client, &self.retry).await {
            Ok(catalog) => {
                self.install(catalog, host);
                Ok(())
            }
            Err(e) => {
                error!("Failed to load translations from {}: {}", source, e);
                self.catalog = None;
                self.active = self.registry.default_code();
                self.origin = LanguageOrigin::Default;
                Err(e)
            }
        }
    }

    /// Initialize from an already loaded catalog.
    pub fn initialize_with(&mut self, catalog: TranslationCatalog, host: &HostLanguages) {
        self.install(catalog, host);
    }

    fn install(&mut self, catalog: TranslationCatalog, host: &HostLanguages) {
        let default = self.registry.default_code();
        for code in self.registry.codes().filter(|code| *code != default) {
            let missing = catalog.missing_keys(code, default);
            if !missing.is_empty() {
                debug!(
                    "{} is missing {} keys present in {}, they will fall back",
                    code,
                    missing.len(),
                    default
                );
            }
        }
        self.catalog = Some(catalog);

        let (active, origin) = self.choose_language(host);
        self.active = active;
        self.origin = origin;
        info!("Active language: {} ({:?})", active, origin);
    }

    fn choose_language(&self, host: &HostLanguages) -> (&'static str, LanguageOrigin) {
        if let Some(saved) = self.preferences.get(&self.preference_key) {
            match self.registry.get_by_code(&saved) {
                Some(config) => return (config.code, LanguageOrigin::Saved),
                None => warn!("Ignoring saved language {}: not supported", saved),
            }
        }

        match match_host_languages(&self.registry, host) {
            Some(code) => (code, LanguageOrigin::Detected),
            None => (self.registry.default_code(), LanguageOrigin::Fallback),
        }
    }

    /// Best available display string for a dotted key.
    ///
    /// # Arguments
    /// * `key` - Dot-separated path (e.g., "hero.title")
    /// * `fallback` - Text to use when no language has the key; may be empty
    ///
    /// # Returns
    /// The active language's string, else the default language's, else
    /// `fallback` if non-empty, else `key` unchanged.
    pub fn resolve(&self, key: &str, fallback: &str) -> String {
        if let Some(text) = self.lookup(key) {
            return text.to_string();
        }

        if fallback.is_empty() {
            key.to_string()
        } else {
            fallback.to_string()
        }
    }

    /// `resolve` with no fallback text.
    pub fn t(&self, key: &str) -> String {
        self.resolve(key, "")
    }

    /// Catalog string for `key` in the active or default language.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let catalog = self.catalog.as_ref()?;

        catalog.lookup(self.active, key.split('.')).or_else(|| {
            let default = self.registry.default_code();
            if self.active == default {
                None
            } else {
                catalog.lookup(default, key.split('.'))
            }
        })
    }

    /// Switch to `language`, persist it and notify subscribers.
    ///
    /// # Arguments
    /// * `language` - Supported code (e.g., "es-ES"), matched case-sensitively
    ///
    /// # Errors
    /// `I18nError::UnsupportedLanguage` if `language` is not in the registry.
    /// Unsupported languages are logged and rejected without touching any
    /// state. A failure to persist is logged; the switch still happens.
    pub fn set_active_language(&mut self, language: &str) -> Result<(), I18nError> {
        let Some(config) = self.registry.get_by_code(language) else {
            warn!("Language {} is not supported", language);
            return Err(I18nError::UnsupportedLanguage(language.to_string()));
        };
        let code = config.code;

        self.active = code;
        self.origin = LanguageOrigin::Chosen;

        if let Err(e) = self.preferences.set(&self.preference_key, code) {
            error!("Failed to save language preference {}: {}", code, e);
        }

        // No receivers is not an error for us
        let receivers = self
            .events
            .send(LanguageChanged {
                language: code.to_string(),
            })
            .unwrap_or(0);
        info!("Language changed to {} ({} listeners)", code, receivers);

        Ok(())
    }

    /// Receive a `LanguageChanged` event for every later language change.
    pub fn subscribe(&self) -> broadcast::Receiver<LanguageChanged> {
        self.events.subscribe()
    }

    /// Code of the language `resolve` currently reads from.
    pub fn active_language(&self) -> &str {
        self.active
    }

    /// Code of the fallback language.
    pub fn default_language(&self) -> &str {
        self.registry.default_code()
    }

    /// Supported codes in registry order (an owned copy).
    pub fn supported_languages(&self) -> Vec<String> {
        self.registry.codes().map(str::to_string).collect()
    }

    /// Whether a catalog is loaded.
    pub fn is_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    /// How the active language was last chosen.
    pub fn origin(&self) -> LanguageOrigin {
        self.origin
    }

    /// Language selector entries with the active one flagged.
    pub fn selector(&self) -> Vec<SelectorOption> {
        self.registry
            .list()
            .iter()
            .map(|lang| SelectorOption {
                code: lang.code,
                label: lang.label,
                active: lang.code == self.active,
            })
            .collect()
    }

    /// Short label of the active language ("PT", "EN", ...).
    pub fn active_label(&self) -> &'static str {
        self.registry
            .get_by_code(self.active)
            .map(|lang| lang.label)
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for TranslationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationStore")
            .field("active", &self.active)
            .field("origin", &self.origin)
            .field("loaded", &self.catalog.is_some())
            .field("preference_key", &self.preference_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::MemoryPreferences;
    use serde_json::json;

    // ==================== Helper Functions ====================

    fn catalog() -> TranslationCatalog {
        TranslationCatalog::from_value(json!({
            "en-US": {
                "nav": { "home": "Home", "roadmap": "Roadmap" },
                "hero": { "title": "Master Siege", "joinBeta": "Join the beta" }
            },
            "pt-BR": {
                "nav": { "home": "Início" },
                "hero": { "title": { "nested": "not a leaf" } }
            },
            "es-ES": {
                "nav": { "home": "Inicio", "roadmap": "Hoja de ruta" }
            }
        }))
        .unwrap()
    }

    fn store_with(prefs: MemoryPreferences) -> TranslationStore {
        TranslationStore::new(LanguageRegistry::landing_page(), prefs)
    }

    fn loaded_store(active: &str) -> TranslationStore {
        let prefs = MemoryPreferences::with_entry(LANGUAGE_PREFERENCE_KEY, active);
        let mut store = store_with(prefs);
        store.initialize_with(catalog(), &HostLanguages::default());
        store
    }

    // ==================== resolve Tests ====================

    #[test]
    fn test_resolve_active_language() {
        let store = loaded_store("es-ES");
        assert_eq!(store.t("nav.roadmap"), "Hoja de ruta");
    }

    #[test]
    fn test_resolve_falls_back_to_default_language() {
        let store = loaded_store("pt-BR");
        assert_eq!(store.t("nav.roadmap"), "Roadmap");
    }

    #[test]
    fn test_resolve_non_string_leaf_falls_back() {
        let store = loaded_store("pt-BR");
        assert_eq!(store.t("hero.title"), "Master Siege");
    }

    #[test]
    fn test_resolve_missing_everywhere_uses_fallback_text() {
        let store = loaded_store("pt-BR");
        assert_eq!(store.resolve("footer.copyright", "© SiegeMind"), "© SiegeMind");
    }

    #[test]
    fn test_resolve_missing_everywhere_returns_key() {
        let store = loaded_store("pt-BR");
        assert_eq!(store.resolve("footer.copyright", ""), "footer.copyright");
    }

    #[test]
    fn test_resolve_default_language_does_not_retry() {
        let store = loaded_store("en-US");
        assert_eq!(store.t("nav.home"), "Home");
        assert_eq!(store.lookup("nav.missing"), None);
    }

    #[test]
    fn test_resolve_before_initialize_degrades() {
        let store = store_with(MemoryPreferences::new());
        assert!(!store.is_loaded());
        assert_eq!(store.t("nav.home"), "nav.home");
        assert_eq!(store.resolve("nav.home", "Home"), "Home");
    }

    #[test]
    fn test_resolve_empty_key() {
        let store = loaded_store("en-US");
        assert_eq!(store.t(""), "");
        assert_eq!(store.resolve("", "fallback"), "fallback");
    }

    #[test]
    fn test_resolve_partial_catalog_example() {
        let catalog = TranslationCatalog::from_value(json!({
            "en-US": { "a": { "b": "Hello" } },
            "pt-BR": {}
        }))
        .unwrap();
        let prefs = MemoryPreferences::with_entry(LANGUAGE_PREFERENCE_KEY, "pt-BR");
        let mut store = store_with(prefs);
        store.initialize_with(catalog, &HostLanguages::default());

        assert_eq!(store.active_language(), "pt-BR");
        assert_eq!(store.t("a.b"), "Hello");
        assert_eq!(store.resolve("a.c", "X"), "X");
        assert_eq!(store.t("a.c"), "a.c");
    }

    // ==================== initialization Tests ====================

    #[test]
    fn test_initialize_prefers_saved_language() {
        let prefs = MemoryPreferences::with_entry(LANGUAGE_PREFERENCE_KEY, "es-ES");
        let mut store = store_with(prefs);
        store.initialize_with(catalog(), &HostLanguages::new(["pt-BR"]));

        assert_eq!(store.active_language(), "es-ES");
        assert_eq!(store.origin(), LanguageOrigin::Saved);
    }

    #[test]
    fn test_initialize_ignores_unsupported_saved_language() {
        let prefs = MemoryPreferences::with_entry(LANGUAGE_PREFERENCE_KEY, "fr-FR");
        let mut store = store_with(prefs);
        store.initialize_with(catalog(), &HostLanguages::new(["pt-BR"]));

        assert_eq!(store.active_language(), "pt-BR");
        assert_eq!(store.origin(), LanguageOrigin::Detected);
    }

    #[test]
    fn test_initialize_detects_from_host() {
        let mut store = store_with(MemoryPreferences::new());
        store.initialize_with(catalog(), &HostLanguages::new(["fr-FR", "pt"]));

        assert_eq!(store.active_language(), "pt-BR");
    }

    #[test]
    fn test_initialize_no_match_uses_default() {
        let mut store = store_with(MemoryPreferences::new());
        store.initialize_with(catalog(), &HostLanguages::new(["de-DE"]));

        assert_eq!(store.active_language(), "en-US");
        assert_eq!(store.origin(), LanguageOrigin::Fallback);
    }

    #[test]
    fn test_custom_preference_key() {
        let prefs = MemoryPreferences::with_entry("lang", "es-ES");
        let mut store = store_with(prefs.clone()).with_preference_key("lang");
        store.initialize_with(catalog(), &HostLanguages::default());
        assert_eq!(store.active_language(), "es-ES");

        store.set_active_language("pt-BR").unwrap();
        assert_eq!(prefs.get("lang"), Some("pt-BR".to_string()));
        assert_eq!(prefs.get(LANGUAGE_PREFERENCE_KEY), None);
    }

    // ==================== set_active_language Tests ====================

    #[test]
    fn test_set_supported_language_persists() {
        let prefs = MemoryPreferences::new();
        let mut store = store_with(prefs.clone());
        store.initialize_with(catalog(), &HostLanguages::default());

        store.set_active_language("es-ES").unwrap();

        assert_eq!(store.active_language(), "es-ES");
        assert_eq!(prefs.get(LANGUAGE_PREFERENCE_KEY), Some("es-ES".to_string()));
        assert_eq!(store.t("nav.home"), "Inicio");
    }

    #[test]
    fn test_set_unsupported_language_is_noop() {
        let prefs = MemoryPreferences::new();
        let mut store = store_with(prefs.clone());
        store.initialize_with(catalog(), &HostLanguages::new(["pt-BR"]));

        let result = store.set_active_language("fr-FR");

        assert_eq!(result, Err(I18nError::UnsupportedLanguage("fr-FR".to_string())));
        assert_eq!(store.active_language(), "pt-BR");
        assert_eq!(store.origin(), LanguageOrigin::Detected);
        assert_eq!(prefs.writes(), 0);
    }

    #[test]
    fn test_set_language_marks_origin_chosen() {
        let mut store = store_with(MemoryPreferences::new());
        store.initialize_with(catalog(), &HostLanguages::new(["pt-BR"]));
        assert_eq!(store.origin(), LanguageOrigin::Detected);

        store.set_active_language("es-ES").unwrap();

        assert_eq!(store.origin(), LanguageOrigin::Chosen);
    }

    #[test]
    fn test_set_language_is_case_sensitive() {
        let mut store = loaded_store("en-US");
        assert!(store.set_active_language("pt-br").is_err());
        assert_eq!(store.active_language(), "en-US");
    }

    #[test]
    fn test_set_language_notifies_subscribers() {
        let mut store = loaded_store("en-US");
        let mut rx = store.subscribe();

        store.set_active_language("pt-BR").unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            LanguageChanged {
                language: "pt-BR".to_string()
            }
        );
    }

    #[test]
    fn test_unsupported_language_does_not_notify() {
        let mut store = loaded_store("en-US");
        let mut rx = store.subscribe();

        let _ = store.set_active_language("de-DE");

        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn test_set_same_language_still_notifies() {
        let mut store = loaded_store("en-US");
        let mut rx = store.subscribe();

        store.set_active_language("en-US").unwrap();

        assert_eq!(rx.try_recv().unwrap().language, "en-US");
    }

    #[test]
    fn test_set_language_without_subscribers() {
        let mut store = loaded_store("en-US");
        assert!(store.set_active_language("es-ES").is_ok());
    }

    // ==================== accessor Tests ====================

    #[test]
    fn test_supported_languages_is_a_copy() {
        let store = loaded_store("en-US");
        let mut languages = store.supported_languages();
        languages.push("fr-FR".to_string());

        assert_eq!(store.supported_languages(), vec!["pt-BR", "en-US", "es-ES"]);
    }

    #[test]
    fn test_selector_flags_active() {
        let store = loaded_store("es-ES");
        let selector = store.selector();

        assert_eq!(selector.len(), 3);
        assert_eq!(
            selector.iter().filter(|o| o.active).map(|o| o.label).collect::<Vec<_>>(),
            vec!["ES"]
        );
        assert_eq!(store.active_label(), "ES");
    }

    #[test]
    fn test_debug_does_not_dump_catalog() {
        let store = loaded_store("en-US");
        let debug = format!("{:?}", store);
        assert!(debug.contains("en-US"));
        assert!(!debug.contains("Master Siege"));
    }
}
