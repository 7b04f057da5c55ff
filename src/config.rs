use crate::error::Result;
use crate::mt::cache::{DEFAULT_MAX_CACHE_SIZE, TranslationCache};
use crate::mt::deepl::DeeplProvider;
use crate::mt::google_translate::{GoogleCloudProvider, GoogleTranslateProvider};
use crate::mt::mock::{MockMode, MockTranslator};
use crate::mt::orchestrator::TranslationOrchestrator;
use crate::mt::registry::ProviderRegistry;
use crate::mt::translator::BASELINE_PROVIDER_KEY;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Operator settings. The core only reads them.
#[derive(Clone)]
pub struct Config {
    // Providers
    pub selected_provider: String,
    pub google_api_key: Option<String>,
    pub deepl_auth_key: Option<String>,

    // Pipeline
    pub cache_enabled: bool,
    pub max_cache_size: usize,
    pub translation_interval: Duration,

    // Run
    pub overwrite_existing: bool,
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selected_provider: BASELINE_PROVIDER_KEY.to_string(),
            google_api_key: None,
            deepl_auth_key: None,
            cache_enabled: true,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            translation_interval: Duration::ZERO,
            overwrite_existing: false,
            export_dir: None,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset; malformed numbers and
    /// booleans fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            selected_provider: get("L10N_PROVIDER")
                .map(|value| value.trim().to_string())
                .unwrap_or(defaults.selected_provider),
            google_api_key: get("GOOGLE_TRANSLATE_API_KEY"),
            deepl_auth_key: get("DEEPL_AUTH_KEY"),

            cache_enabled: get("L10N_CACHE_ENABLED")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.cache_enabled),
            max_cache_size: get("L10N_MAX_CACHE_SIZE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_cache_size),
            translation_interval: get("L10N_TRANSLATION_INTERVAL_MS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.translation_interval),

            overwrite_existing: get("L10N_OVERWRITE_EXISTING")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.overwrite_existing),
            export_dir: get("L10N_EXPORT_DIR").map(PathBuf::from),
        }
    }

    /// Register every provider the configuration allows and select the configured one.
    ///
    /// The keyless Google provider is always present as the baseline. Providers that
    /// need credentials are registered only when their key is set.
    pub fn build_registry(&self) -> Result<Arc<ProviderRegistry>> {
        let registry = ProviderRegistry::new(Arc::new(GoogleTranslateProvider::new()?));

        if let Some(key) = &self.google_api_key {
            registry.register(Arc::new(GoogleCloudProvider::new(key.clone())?));
        }
        if let Some(key) = &self.deepl_auth_key {
            registry.register(Arc::new(DeeplProvider::new(key.clone())?));
        }
        if self.selected_provider == "mock" {
            registry.register(Arc::new(MockTranslator::new(MockMode::Suffix)));
        }

        registry.select(&self.selected_provider)?;
        debug!(providers = ?registry.keys(), selected = %self.selected_provider, "Built provider registry");
        Ok(Arc::new(registry))
    }

    pub fn build_orchestrator(&self) -> Result<TranslationOrchestrator> {
        let cache = Arc::new(TranslationCache::new(self.max_cache_size));
        Ok(TranslationOrchestrator::new(self.build_registry()?, cache)
            .with_cache_enabled(self.cache_enabled)
            .with_interval(self.translation_interval))
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "***");
        f.debug_struct("Config")
            .field("selected_provider", &self.selected_provider)
            .field("google_api_key", &mask(&self.google_api_key))
            .field("deepl_auth_key", &mask(&self.deepl_auth_key))
            .field("cache_enabled", &self.cache_enabled)
            .field("max_cache_size", &self.max_cache_size)
            .field("translation_interval", &self.translation_interval)
            .field("overwrite_existing", &self.overwrite_existing)
            .field("export_dir", &self.export_dir)
            .finish()
    }
}
