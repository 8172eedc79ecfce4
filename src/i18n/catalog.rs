//! Immutable nested translation catalog.
//!
//! The document maps each language code to an arbitrarily nested object of
//! string leaves:
//!
//! ```json
//! { "en-US": { "hero": { "title": "Master your game" } }, "pt-BR": {} }
//! ```
//!
//! Partial languages are fine. Arrays are traversed by decimal index
//! (`download.requirements.0`). Non-string leaves never resolve.

use crate::i18n::LoadError;
use serde_json::{Map, Value};

/// Parsed translation data for every language in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationCatalog {
    languages: Map<String, Value>,
}

impl TranslationCatalog {
    /// Parse a catalog document.
    ///
    /// # Errors
    /// `LoadError::Malformed` if the text is not JSON, the top level is not
    /// an object, or any language entry is not an object.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| LoadError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Build a catalog from an already parsed document.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        let Value::Object(languages) = value else {
            return Err(LoadError::Malformed(
                "top level must be an object keyed by language".to_string(),
            ));
        };

        if let Some((code, _)) = languages.iter().find(|(_, tree)| !tree.is_object()) {
            return Err(LoadError::Malformed(format!(
                "entry for language {} must be an object",
                code
            )));
        }

        Ok(Self { languages })
    }

    /// Walk `segments` through the language's subtree.
    ///
    /// Returns the leaf only when every segment exists and the final node is
    /// a string.
    pub fn lookup<'a, I>(&self, language: &str, segments: I) -> Option<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut node = self.languages.get(language)?;
        for segment in segments {
            node = match node {
                Value::Object(children) => children.get(segment)?,
                Value::Array(items) => items.get(array_index(segment)?)?,
                _ => return None,
            };
        }
        node.as_str()
    }

    /// Whether the document has an entry for `language`.
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Language codes present in the document.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Dotted keys of every string leaf under `language`, sorted.
    pub fn keys(&self, language: &str) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(tree) = self.languages.get(language) {
            collect_keys(tree, &mut String::new(), &mut keys);
        }
        keys.sort();
        keys
    }

    /// Keys present as strings in `reference` but missing from `language`.
    ///
    /// Used to log how partial a translation is after loading.
    pub fn missing_keys(&self, language: &str, reference: &str) -> Vec<String> {
        self.keys(reference)
            .into_iter()
            .filter(|key| self.lookup(language, key.split('.')).is_none())
            .collect()
    }
}

/// Parse an array segment written exactly as `collect_keys` writes it.
///
/// Leading zeros, signs and whitespace are rejected, so `01` and `+1` do
/// not name element 1.
fn array_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

fn collect_keys(node: &Value, prefix: &mut String, out: &mut Vec<String>) {
    match node {
        Value::Object(children) => {
            for (name, child) in children {
                let len = prefix.len();
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(name);
                collect_keys(child, prefix, out);
                prefix.truncate(len);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let len = prefix.len();
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(&index.to_string());
                collect_keys(child, prefix, out);
                prefix.truncate(len);
            }
        }
        Value::String(_) if !prefix.is_empty() => out.push(prefix.clone()),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TranslationCatalog {
        TranslationCatalog::from_value(json!({
            "en-US": {
                "meta": { "title": "SiegeMind" },
                "hero": {
                    "title": "Master <span>Siege</span>",
                    "stats": { "currentUsers": "Current users" }
                },
                "download": { "requirements": ["Windows 10", "8GB RAM"] },
                "count": 3
            },
            "pt-BR": {
                "meta": { "title": "SiegeMind BR" }
            }
        }))
        .unwrap()
    }

    // ==================== Parsing Tests ====================

    #[test]
    fn test_from_json_valid() {
        let catalog = TranslationCatalog::from_json(r#"{"en-US": {"a": "b"}}"#).unwrap();
        assert!(catalog.has_language("en-US"));
        assert!(!catalog.has_language("pt-BR"));
    }

    #[test]
    fn test_from_json_invalid_json() {
        let result = TranslationCatalog::from_json("{not json");
        assert!(matches!(result, Err(LoadError::Malformed(_))));
    }

    #[test]
    fn test_from_json_top_level_array() {
        let result = TranslationCatalog::from_json(r#"["en-US"]"#);
        assert!(matches!(result, Err(LoadError::Malformed(_))));
    }

    #[test]
    fn test_from_json_language_entry_not_object() {
        let result = TranslationCatalog::from_json(r#"{"en-US": "hello"}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("en-US"));
    }

    #[test]
    fn test_empty_document_is_valid() {
        let catalog = TranslationCatalog::from_json("{}").unwrap();
        assert_eq!(catalog.languages().count(), 0);
    }

    // ==================== lookup Tests ====================

    #[test]
    fn test_lookup_nested_string() {
        let catalog = sample();
        assert_eq!(
            catalog.lookup("en-US", "hero.stats.currentUsers".split('.')),
            Some("Current users")
        );
    }

    #[test]
    fn test_lookup_missing_segment() {
        let catalog = sample();
        assert_eq!(catalog.lookup("en-US", "hero.subtitle".split('.')), None);
    }

    #[test]
    fn test_lookup_object_leaf_is_none() {
        let catalog = sample();
        assert_eq!(catalog.lookup("en-US", "hero".split('.')), None);
    }

    #[test]
    fn test_lookup_number_leaf_is_none() {
        let catalog = sample();
        assert_eq!(catalog.lookup("en-US", "count".split('.')), None);
    }

    #[test]
    fn test_lookup_through_string_is_none() {
        let catalog = sample();
        assert_eq!(catalog.lookup("en-US", "meta.title.extra".split('.')), None);
    }

    #[test]
    fn test_lookup_indexes_arrays() {
        let catalog = sample();
        assert_eq!(
            catalog.lookup("en-US", "download.requirements.1".split('.')),
            Some("8GB RAM")
        );
        assert_eq!(catalog.lookup("en-US", "download.requirements.2".split('.')), None);
        assert_eq!(catalog.lookup("en-US", "download.requirements.x".split('.')), None);
    }

    #[test]
    fn test_lookup_rejects_non_canonical_indices() {
        let catalog = sample();
        assert_eq!(
            catalog.lookup("en-US", "download.requirements.0".split('.')),
            Some("Windows 10")
        );
        for key in [
            "download.requirements.01",
            "download.requirements.+1",
            "download.requirements.00",
            "download.requirements. 1",
            "download.requirements.",
        ] {
            assert_eq!(catalog.lookup("en-US", key.split('.')), None, "{}", key);
        }
    }

    #[test]
    fn test_lookup_unknown_language() {
        let catalog = sample();
        assert_eq!(catalog.lookup("es-ES", "meta.title".split('.')), None);
    }

    // ==================== keys Tests ====================

    #[test]
    fn test_keys_lists_string_leaves() {
        let catalog = sample();
        assert_eq!(
            catalog.keys("en-US"),
            vec![
                "download.requirements.0",
                "download.requirements.1",
                "hero.stats.currentUsers",
                "hero.title",
                "meta.title"
            ]
        );
    }

    #[test]
    fn test_missing_keys_against_reference() {
        let catalog = sample();
        assert_eq!(
            catalog.missing_keys("pt-BR", "en-US"),
            vec![
                "download.requirements.0",
                "download.requirements.1",
                "hero.stats.currentUsers",
                "hero.title"
            ]
        );
        assert!(catalog.missing_keys("en-US", "en-US").is_empty());
    }
}
