use anyhow::Result;
use siegemind_i18n::bindings::{render_page, BindingSet};
use siegemind_i18n::config::Config;
use siegemind_i18n::i18n::TranslationStore;
use siegemind_i18n::preference::FilePreferences;
use tracing::{info, warn};

/// Render the landing page's translated regions as JSON.
///
/// Usage: `siegemind-i18n [LANGUAGE]`. When a language is given it becomes
/// the saved choice before rendering.
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("siegemind_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let client = config.http_client()?;

    let mut store = TranslationStore::new(
        config.registry()?,
        FilePreferences::new(&config.preference_file),
    )
    .with_preference_key(config.preference_key.clone());

    // A failed load is already logged; the page renders raw keys instead
    let _ = store
        .initialize(&client, &config.catalog_source, &config.host_languages())
        .await;

    let bindings = BindingSet::landing_page();
    let mut page = render_page(&bindings, &store);
    let mut changes = store.subscribe();

    if let Some(language) = std::env::args().nth(1) {
        if store.set_active_language(&language).is_err() {
            warn!(
                "Keeping {}; supported languages: {}",
                store.active_language(),
                store.supported_languages().join(", ")
            );
        }
    }

    while let Ok(event) = changes.try_recv() {
        info!("Re-applying bindings for {}", event.language);
        page = render_page(&bindings, &store);
    }

    info!(
        "Rendered {} regions in {} ({})",
        page.regions.len(),
        page.language,
        store.active_label()
    );
    println!("{}", serde_json::to_string_pretty(&page)?);

    Ok(())
}
