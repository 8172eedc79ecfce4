//! Language registry: the closed set of languages the page can be shown in.
//!
//! Unlike a process-wide singleton, a registry is built explicitly and handed
//! to the [`TranslationStore`](crate::i18n::TranslationStore) that owns it.
//! Registry order matters: primary-subtag detection picks the first
//! supported code that matches.

use crate::i18n::I18nError;

/// Configuration for a supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// BCP 47 language tag (e.g., "pt-BR", "en-US")
    pub code: &'static str,

    /// Short label shown in the language selector (e.g., "PT", "EN")
    pub label: &'static str,

    /// English name of the language (e.g., "Portuguese")
    pub name: &'static str,
}

/// Supported languages plus the default used for fallback resolution.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
    default_code: &'static str,
}

impl LanguageRegistry {
    /// Build a registry from an ordered language list and a default code.
    ///
    /// # Arguments
    /// * `languages` - Supported languages, in detection order
    /// * `default_code` - Code of the fallback language (must be in `languages`)
    ///
    /// # Errors
    /// Returns `I18nError::EmptyRegistry` if `languages` is empty and
    /// `I18nError::UnsupportedLanguage` if `default_code` is not in the list.
    pub fn new(languages: Vec<LanguageConfig>, default_code: &str) -> Result<Self, I18nError> {
        if languages.is_empty() {
            return Err(I18nError::EmptyRegistry);
        }

        let default_code = languages
            .iter()
            .find(|lang| lang.code == default_code)
            .map(|lang| lang.code)
            .ok_or_else(|| I18nError::UnsupportedLanguage(default_code.to_string()))?;

        Ok(Self {
            languages,
            default_code,
        })
    }

    /// The landing page's languages: Portuguese, English (default), Spanish.
    pub fn landing_page() -> Self {
        Self {
            languages: shipped_languages(),
            default_code: "en-US",
        }
    }

    /// Restrict the shipped languages to `codes` (kept in shipped order).
    ///
    /// # Arguments
    /// * `codes` - Language codes to keep (e.g., from `SUPPORTED_LANGUAGES`)
    /// * `default_code` - Code of the fallback language
    ///
    /// # Errors
    /// Fails if any code is unknown, if nothing is left, or if the default
    /// is not among the remaining languages.
    pub fn restricted<S: AsRef<str>>(codes: &[S], default_code: &str) -> Result<Self, I18nError> {
        let shipped = shipped_languages();

        if let Some(unknown) = codes
            .iter()
            .map(|code| code.as_ref())
            .find(|code| !shipped.iter().any(|lang| lang.code == *code))
        {
            return Err(I18nError::UnsupportedLanguage(unknown.to_string()));
        }

        let languages = shipped
            .into_iter()
            .filter(|lang| codes.iter().any(|code| code.as_ref() == lang.code))
            .collect();

        Self::new(languages, default_code)
    }

    /// Get a language configuration by its code.
    ///
    /// # Arguments
    /// * `code` - BCP 47 tag (e.g., "pt-BR"), matched exactly and case-sensitively
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language is supported
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all languages.
    ///
    /// # Returns
    /// A slice of every language configuration, in registry order.
    pub fn list(&self) -> &[LanguageConfig] {
        &self.languages
    }

    /// Supported codes, in registry order.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.languages.iter().map(|lang| lang.code)
    }

    /// Code of the fallback language.
    pub fn default_code(&self) -> &'static str {
        self.default_code
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::landing_page()
    }
}

fn shipped_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "pt-BR",
            label: "PT",
            name: "Portuguese",
        },
        LanguageConfig {
            code: "en-US",
            label: "EN",
            name: "English",
        },
        LanguageConfig {
            code: "es-ES",
            label: "ES",
            name: "Spanish",
        },
    ]
}
