//! The pipeline wrapped around every provider call
//!
//! `translate` looks in the cache, resolves a provider (with fallback), calls it,
//! runs the interceptor chain, stores the result and then pauses for the configured
//! interval so consecutive calls respect provider quotas.

use crate::language::Language;
use crate::mt::cache::{CacheKey, TranslationCache};
use crate::mt::error::TranslationFailure;
use crate::mt::interceptor::InterceptorChain;
use crate::mt::registry::ProviderRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct TranslationOrchestrator {
    registry: Arc<ProviderRegistry>,
    cache: Arc<TranslationCache>,
    interceptors: InterceptorChain,
    cache_enabled: bool,
    interval: Duration,
}

impl TranslationOrchestrator {
    /// Caching on, default interceptor chain, no pause between calls.
    pub fn new(registry: Arc<ProviderRegistry>, cache: Arc<TranslationCache>) -> Self {
        Self {
            registry,
            cache,
            interceptors: InterceptorChain::default(),
            cache_enabled: true,
            interval: Duration::ZERO,
        }
    }

    pub fn with_interceptors(mut self, interceptors: InterceptorChain) -> Self {
        self.interceptors = interceptors;
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Fixed pause after every provider call.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    pub async fn translate(
        &self,
        from: &Language,
        to: &Language,
        text: &str,
    ) -> Result<String, TranslationFailure> {
        let key = CacheKey::new(from, to, text);
        if self.cache_enabled {
            if let Some(cached) = self.cache.get(&key) {
                debug!(from = from.code(), to = to.code(), text, "Cache hit");
                return Ok(cached);
            }
        }

        let resolution = self.registry.resolve_for_translation(from, to, text)?;
        let provider = resolution.provider;

        debug!(
            provider = provider.key(),
            from = resolution.from.translation_code(),
            to = resolution.to.translation_code(),
            text,
            "Translating"
        );
        let translated = provider
            .translate(&resolution.from, &resolution.to, text)
            .await
            .map_err(|source| TranslationFailure::Provider {
                provider: provider.name().to_string(),
                from: from.code().to_string(),
                to: to.code().to_string(),
                text: text.to_string(),
                source,
            })?;

        let result = self.interceptors.apply(translated);
        debug!(result = %result, "Translated");

        if self.cache_enabled {
            self.cache.put(key, result.clone());
        }

        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }

        Ok(result)
    }
}
