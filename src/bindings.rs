//! Declarative mapping from page regions to translation keys.
//!
//! Presentation code never walks the catalog itself: it declares which
//! region shows which key and calls [`BindingSet::apply_all`] whenever the
//! language changes.

use crate::i18n::TranslationStore;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// How a resolved string is written into its region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// Plain text content
    Text,
    /// Markup content (catalog strings may contain inline tags)
    Html,
    /// A named attribute, e.g. `content` on a meta tag
    Attribute(String),
}

/// One region bound to one translation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Selector or logical region identifier
    pub target: String,
    pub key: String,
    pub fallback: String,
    pub kind: BindingKind,
    /// Skip the region when the key resolves in neither language
    pub optional: bool,
}

impl Binding {
    /// Bind a region's text content to a key.
    ///
    /// # Arguments
    /// * `target` - Selector or logical region name (e.g., ".hero-title")
    /// * `key` - Dotted translation key (e.g., "hero.title")
    pub fn text(target: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            key: key.into(),
            fallback: String::new(),
            kind: BindingKind::Text,
            optional: false,
        }
    }

    /// Like [`Binding::text`], but the value is written as markup.
    pub fn html(target: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind: BindingKind::Html,
            ..Self::text(target, key)
        }
    }

    /// Bind one attribute of a region to a key.
    ///
    /// # Arguments
    /// * `target` - Selector or logical region name
    /// * `attribute` - Attribute to write (e.g., "content")
    /// * `key` - Dotted translation key
    pub fn attribute(
        target: impl Into<String>,
        attribute: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            kind: BindingKind::Attribute(attribute.into()),
            ..Self::text(target, key)
        }
    }

    /// Text shown when neither language has the key.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Receives resolved strings for page regions.
pub trait RenderSink {
    fn render(&mut self, target: &str, kind: &BindingKind, value: &str);
}

/// A rendered region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRegion {
    pub kind: BindingKind,
    pub value: String,
}

/// In-memory sink keyed by target, in target order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    #[serde(rename = "lang")]
    pub language: String,
    pub regions: BTreeMap<String, RenderedRegion>,
}

impl RenderedPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value written to `target`, if any.
    pub fn value(&self, target: &str) -> Option<&str> {
        self.regions.get(target).map(|region| region.value.as_str())
    }
}

impl RenderSink for RenderedPage {
    fn render(&mut self, target: &str, kind: &BindingKind, value: &str) {
        self.regions.insert(
            target.to_string(),
            RenderedRegion {
                kind: kind.clone(),
                value: value.to_string(),
            },
        );
    }
}

/// Ordered collection of bindings.
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, binding: Binding) -> &mut Self {
        self.bindings.push(binding);
        self
    }

    /// Bind `{target_prefix}:{i}` to `{key_prefix}.{name}` for each name.
    pub fn push_list<S: AsRef<str>>(&mut self, target_prefix: &str, key_prefix: &str, names: &[S]) {
        for (index, name) in names.iter().enumerate() {
            self.push(Binding::text(
                format!("{}:{}", target_prefix, index),
                format!("{}.{}", key_prefix, name.as_ref()),
            ));
        }
    }

    /// Bind `count` indexed entries (`{key_prefix}.0` ...) as optional text.
    pub fn push_indexed(&mut self, target_prefix: &str, key_prefix: &str, count: usize) {
        for index in 0..count {
            self.push(
                Binding::text(
                    format!("{}:{}", target_prefix, index),
                    format!("{}.{}", key_prefix, index),
                )
                .optional(),
            );
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Resolve every binding through `store` and write it to `sink`.
    ///
    /// # Arguments
    /// * `store` - Source of translated strings for the active language
    /// * `sink` - Receives one `render` call per written region
    ///
    /// # Returns
    /// The number of regions written. Optional bindings whose key resolves in
    /// neither language (and which have no fallback) are skipped.
    pub fn apply_all<S: RenderSink + ?Sized>(&self, store: &TranslationStore, sink: &mut S) -> usize {
        let mut written = 0;
        for binding in &self.bindings {
            let value = if binding.optional {
                match store.lookup(&binding.key) {
                    Some(text) => text.to_string(),
                    None if !binding.fallback.is_empty() => binding.fallback.clone(),
                    None => continue,
                }
            } else {
                store.resolve(&binding.key, &binding.fallback)
            };
            sink.render(&binding.target, &binding.kind, &value);
            written += 1;
        }

        debug!(
            "Applied {}/{} bindings for {}",
            written,
            self.bindings.len(),
            store.active_language()
        );
        written
    }

    /// The SiegeMind landing page.
    pub fn landing_page() -> Self {
        let mut set = Self::new();

        // Meta tags
        set.push(Binding::text("title", "meta.title"));
        for (selector, key) in [
            (r#"meta[name="description"]"#, "meta.description"),
            (r#"meta[name="keywords"]"#, "meta.keywords"),
            (r#"meta[property="og:title"]"#, "meta.title"),
            (r#"meta[property="og:description"]"#, "meta.description"),
            (r#"meta[name="twitter:title"]"#, "meta.title"),
            (r#"meta[name="twitter:description"]"#, "meta.description"),
        ] {
            set.push(Binding::attribute(selector, "content", key));
        }

        // Navigation
        set.push(Binding::text(r##".nav-link[href="#home"]"##, "nav.home"));
        set.push(Binding::text(r##".nav-link[href="#how-it-works"]"##, "nav.howItWorks"));
        set.push(Binding::text(r##".nav-link[href="#roadmap"]"##, "nav.roadmap"));
        set.push(Binding::text(".nav-cta", "nav.joinBeta"));

        // Hero
        set.push(Binding::html(".hero-title", "hero.title"));
        set.push(Binding::html(".hero-subtitle", "hero.subtitle"));
        set.push(Binding::text(".hero-buttons .btn-primary", "hero.joinBeta"));
        set.push_list(
            ".hero-features .feature-item span",
            "hero.features",
            &["personalizedInsights", "performanceDashboard", "veteranProfessionals"],
        );
        set.push_list(
            ".stat-label",
            "hero.stats",
            &["currentUsers", "matchesStudied", "insightsGenerated"],
        );

        // How it works
        set.push(Binding::text("#how-it-works .section-title", "howItWorks.title"));
        set.push(Binding::text("#how-it-works .section-subtitle", "howItWorks.subtitle"));
        for (index, step) in ["dataCollection", "dataProcessing", "aiAnalysis", "actionableInsights"]
            .iter()
            .enumerate()
        {
            set.push(Binding::text(
                format!(".step-card:{} .step-title", index),
                format!("howItWorks.steps.{}.title", step),
            ));
            set.push(Binding::text(
                format!(".step-card:{} .step-description", index),
                format!("howItWorks.steps.{}.description", step),
            ));
        }

        // Testimonials
        set.push(Binding::text(".testimonials .section-title", "testimonials.title"));
        set.push(Binding::text(".testimonials .section-subtitle", "testimonials.subtitle"));
        set.push_list(".testimonial-text", "testimonials.reviews", &["alex", "mike", "sarah"]);

        // Roadmap
        set.push(Binding::html("#roadmap .section-title", "roadmap.title"));
        set.push(Binding::text("#roadmap .section-subtitle", "roadmap.subtitle"));
        set.push_list(
            ".roadmap-status",
            "roadmap.status",
            &["current", "next", "future", "future"],
        );
        for (index, phase) in ["core", "enhanced", "team", "advanced"].iter().enumerate() {
            set.push(Binding::text(
                format!(".roadmap-title:{}", index),
                format!("roadmap.phases.{}.title", phase),
            ));
        }

        // Download
        set.push(Binding::html(".download-title", "download.title"));
        set.push(Binding::text(".download-subtitle", "download.subtitle"));
        set.push(Binding::text(".download-info h3:0", "download.systemRequirements"));
        set.push_indexed(".requirements-list li", "download.requirements", 4);
        set.push(Binding::text(".download-info h3:1", "download.whatsIncluded"));
        set.push_indexed(".included-list li", "download.included", 4);
        set.push(Binding::text(".download .btn-primary", "download.downloadButton"));

        // Footer
        set.push(Binding::text(".footer-description", "footer.description"));
        set.push_list(".footer-column h4", "footer", &["product", "support"]);
        set.push(Binding::text(r##".footer a[href="#how-it-works"]"##, "footer.links.howItWorks"));
        set.push(Binding::text(r##".footer a[href="#roadmap"]"##, "footer.links.roadmap"));
        set.push(Binding::text(r##".footer a[href="#download"]"##, "footer.links.download"));
        set.push(Binding::text(".footer-bottom p", "footer.copyright"));

        set
    }
}

/// Apply `bindings` to a fresh [`RenderedPage`] tagged with the active language.
pub fn render_page(bindings: &BindingSet, store: &TranslationStore) -> RenderedPage {
    let mut page = RenderedPage::new();
    page.language = store.active_language().to_string();
    bindings.apply_all(store, &mut page);
    page
}
