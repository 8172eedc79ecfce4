//! Host language signal and auto-detection against the registry.

use crate::i18n::LanguageRegistry;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

/// POSIX locale: `ll[_CC][.codeset][@modifier]`
static POSIX_LOCALE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Ordered language preferences reported by the host environment.
///
/// Always a sequence, even when the host reports a single tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostLanguages {
    tags: Vec<String>,
}

impl HostLanguages {
    /// Preferences in the given order.
    ///
    /// Entries are trimmed. Blank entries, entries with an empty primary
    /// subtag (`-US`) and repeats are dropped, so no tag can prefix-match
    /// every supported code.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into().trim().to_string();
            if tag.is_empty() || tag.starts_with('-') || normalized.contains(&tag) {
                continue;
            }
            normalized.push(tag);
        }
        Self { tags: normalized }
    }

    /// Accept either a single tag or an array of tags.
    ///
    /// Non-string array items are ignored; any other shape yields no
    /// preferences.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(tag) => Self::new([tag.as_str()]),
            Value::Array(items) => Self::new(items.iter().filter_map(Value::as_str)),
            _ => Self::default(),
        }
    }

    /// Read preferences from `LANGUAGE`, `LC_ALL`, `LC_MESSAGES` and `LANG`.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Like [`HostLanguages::from_env`] with an injectable variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut raw: Vec<String> = Vec::new();

        if let Some(list) = lookup("LANGUAGE") {
            raw.extend(list.split(':').map(str::to_string));
        }
        for name in ["LC_ALL", "LC_MESSAGES", "LANG"] {
            if let Some(value) = lookup(name) {
                raw.push(value);
            }
        }

        let languages = Self::new(raw.iter().filter_map(|value| posix_to_bcp47(value)));
        debug!("Host language preferences from environment: {:?}", languages.tags);
        languages
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Convert a POSIX locale (`pt_BR.UTF-8`) into a language tag (`pt-BR`).
///
/// Returns `None` for `C`, `POSIX` and anything unparseable.
pub fn posix_to_bcp47(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "C" || value == "POSIX" || value.starts_with("C.") {
        return None;
    }

    let regex = POSIX_LOCALE_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{2,3})(?:[_-]([A-Za-z]{2}|[0-9]{3}))?(?:\.[^@]*)?(?:@.*)?$")
            .expect("Invalid POSIX locale regex")
    });

    let caps = regex.captures(value)?;
    let language = caps.get(1)?.as_str().to_lowercase();
    match caps.get(2) {
        Some(region) => Some(format!("{}-{}", language, region.as_str().to_uppercase())),
        None => Some(language),
    }
}

/// Pick the supported language that best matches the host preferences.
///
/// Each tag is tried in order: an exact match wins, otherwise the first
/// supported code (registry order) starting with the tag's primary subtag.
/// Returns `None` when nothing matches.
pub fn match_host_languages(
    registry: &LanguageRegistry,
    host: &HostLanguages,
) -> Option<&'static str> {
    for tag in host.tags() {
        if let Some(config) = registry.get_by_code(tag) {
            return Some(config.code);
        }

        let primary = tag.split('-').next().unwrap_or(tag);
        if let Some(code) = registry.codes().find(|code| code.starts_with(primary)) {
            return Some(code);
        }
    }
    None
}
