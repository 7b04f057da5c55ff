//! Provider registry with selection and one-hop fallback

use crate::language::Language;
use crate::mt::error::{UnknownProviderError, UnsupportedLanguagePairError};
use crate::mt::translator::Provider;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

/// Provider chosen for one translation call, with the languages it resolved.
#[derive(Clone)]
pub struct Resolution {
    pub provider: Arc<dyn Provider>,
    /// Source language carrying the provider's translation code
    pub from: Language,
    /// Target language carrying the provider's translation code
    pub to: Language,
    /// True when the selected provider could not serve the pair
    pub fallback: bool,
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolution")
            .field("provider", &self.provider.key())
            .field("from", &self.from)
            .field("to", &self.to)
            .field("fallback", &self.fallback)
            .finish()
    }
}

struct Inner {
    providers: Vec<Arc<dyn Provider>>,
    selected: String,
}

/// All configured providers plus the operator's current selection.
///
/// Safe to share between runs: lookups take a read lock, `register` and `select`
/// take the write lock. The lock is only held while cloning handles, never across
/// a provider call.
pub struct ProviderRegistry {
    inner: RwLock<Inner>,
}

impl ProviderRegistry {
    /// Create a registry holding `baseline`, which starts out selected.
    pub fn new(baseline: Arc<dyn Provider>) -> Self {
        let selected = baseline.key().to_string();
        Self {
            inner: RwLock::new(Inner {
                providers: vec![baseline],
                selected,
            }),
        }
    }

    /// Add a provider, replacing any provider registered under the same key.
    pub fn register(&self, provider: Arc<dyn Provider>) {
        let mut inner = self.inner.write();
        match inner
            .providers
            .iter_mut()
            .find(|existing| existing.key() == provider.key())
        {
            Some(existing) => *existing = provider,
            None => inner.providers.push(provider),
        }
    }

    pub fn select(&self, key: &str) -> Result<(), UnknownProviderError> {
        let mut inner = self.inner.write();
        if !inner.providers.iter().any(|provider| provider.key() == key) {
            return Err(UnknownProviderError(key.to_string()));
        }
        inner.selected = key.to_string();
        Ok(())
    }

    pub fn selected_key(&self) -> String {
        self.inner.read().selected.clone()
    }

    pub fn selected(&self) -> Option<Arc<dyn Provider>> {
        let inner = self.inner.read();
        Self::find(&inner, &inner.selected)
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn Provider>> {
        Self::find(&self.inner.read(), key)
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> Vec<String> {
        self.inner
            .read()
            .providers
            .iter()
            .map(|provider| provider.key().to_string())
            .collect()
    }

    fn find(inner: &Inner, key: &str) -> Option<Arc<dyn Provider>> {
        inner
            .providers
            .iter()
            .find(|provider| provider.key() == key)
            .cloned()
    }

    /// Pick the provider for one call.
    ///
    /// The selected provider is used when it resolves both languages. Otherwise its
    /// fallback provider is tried once; the fallback's own fallback is never followed.
    pub fn resolve_for_translation(
        &self,
        from: &Language,
        to: &Language,
        text: &str,
    ) -> Result<Resolution, UnsupportedLanguagePairError> {
        let (selected, fallback) = {
            let inner = self.inner.read();
            let selected = Self::find(&inner, &inner.selected);
            let fallback = selected
                .as_ref()
                .and_then(|provider| Self::find(&inner, provider.fallback_provider_key()));
            (selected, fallback)
        };

        if let Some(provider) = selected.as_ref() {
            if let Some(resolution) = Self::resolve_with(provider, from, to, false) {
                return Ok(resolution);
            }
        }

        let fallback = fallback.filter(|candidate| {
            selected
                .as_ref()
                .is_none_or(|provider| provider.key() != candidate.key())
        });
        if let Some(provider) = fallback.as_ref() {
            if let Some(resolution) = Self::resolve_with(provider, from, to, true) {
                warn!(
                    from = from.code(),
                    to = to.code(),
                    fallback = provider.key(),
                    "Selected provider does not support language pair, using fallback"
                );
                return Ok(resolution);
            }
        }

        Err(UnsupportedLanguagePairError {
            from: from.code().to_string(),
            to: to.code().to_string(),
            text: text.to_string(),
        })
    }

    fn resolve_with(
        provider: &Arc<dyn Provider>,
        from: &Language,
        to: &Language,
        fallback: bool,
    ) -> Option<Resolution> {
        let to = provider.resolve_language(to)?;
        let from = provider.resolve_language(from)?;
        Some(Resolution {
            provider: Arc::clone(provider),
            from,
            to,
            fallback,
        })
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.keys())
            .field("selected", &self.selected_key())
            .finish()
    }
}
