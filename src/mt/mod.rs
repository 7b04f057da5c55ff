/// Machine Translation Module
///
/// This module provides the provider abstraction and the call pipeline used by the
/// document translator.
///
/// # Overview
///
/// The MT module consists of several components working together:
///
/// 1. **Provider trait & providers** - Capability contract plus Google, Google Cloud, DeepL and mock backends
/// 2. **Registry** - Holds providers, tracks the selected one and resolves one-hop fallback
/// 3. **Cache** - Bounded LRU cache keyed by language pair and source text
/// 4. **Interceptors** - Text fixes applied to every provider result
/// 5. **Orchestrator** - Runs cache lookup, provider call, interceptors and rate-limit pause
///
/// # Example
///
/// ```ignore
/// use android_l10n::Language;
/// use android_l10n::mt::{
///     GoogleTranslateProvider, ProviderRegistry, TranslationCache, TranslationOrchestrator,
/// };
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let registry = Arc::new(ProviderRegistry::new(Arc::new(GoogleTranslateProvider::new()?)));
///     let orchestrator = TranslationOrchestrator::new(registry, Arc::new(TranslationCache::default()));
///
///     let translated = orchestrator
///         .translate(&Language::ENGLISH, &Language::FRENCH, "Hello")
///         .await?;
///     println!("{}", translated);
///     Ok(())
/// }
/// ```
pub mod cache;
pub mod deepl;
pub mod error;
pub mod google_translate;
pub mod interceptor;
pub mod mock;
pub mod orchestrator;
pub mod registry;
pub mod translator;

pub use cache::{CacheKey, DEFAULT_MAX_CACHE_SIZE, TranslationCache};
pub use deepl::DeeplProvider;
pub use error::{
    MtResult, ProviderError, TranslationFailure, UnknownProviderError,
    UnsupportedLanguagePairError,
};
pub use google_translate::{GoogleCloudProvider, GoogleTranslateProvider};
pub use interceptor::{
    EscapeCharactersInterceptor, HtmlEntityInterceptor, InterceptorChain, TranslationInterceptor,
};
pub use mock::{MockMode, MockTranslator};
pub use orchestrator::TranslationOrchestrator;
pub use registry::{ProviderRegistry, Resolution};
pub use translator::{BASELINE_PROVIDER_KEY, Provider};
