//! Machine Translation provider trait
//!
//! This module defines the `Provider` trait for backend abstraction. A provider
//! declares which languages it handles, how it spells each of them on the wire,
//! and which other provider should take over when a language pair is out of reach.
//!
//! # Example
//!
//! ```ignore
//! use android_l10n::Language;
//! use android_l10n::mt::{GoogleTranslateProvider, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::new();
//!     let to = provider.resolve_language(&Language::CHINESE_SIMPLIFIED).unwrap();
//!     let result = provider.translate(&Language::ENGLISH, &to, "Hello, world!").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::language::Language;
use crate::mt::error::{MtResult, ProviderError};
use async_trait::async_trait;

/// Key of the baseline provider every other provider falls back to by default.
pub const BASELINE_PROVIDER_KEY: &str = "google";

/// Generic trait for machine translation providers
///
/// Implementations differ only in how they build the outbound request and parse
/// the response. All of them must:
///
/// - return an empty string for empty input without any network call
/// - surface non-2xx or malformed responses as errors, never as empty text
/// - leave shared state alone (network I/O is the only side effect)
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier used for selection and fallback (e.g. `"deepl"`).
    fn key(&self) -> &str;

    /// Human readable name for logging.
    fn name(&self) -> &str;

    /// Languages this provider translates into and from, carrying this provider's
    /// translation codes. Stable for the life of the instance.
    fn supported_languages(&self) -> &[Language];

    /// The provider's own instance of `requested`, if supported.
    ///
    /// Matching is by identity (`code`); the returned copy carries the translation
    /// code this provider expects, which may differ from the catalog default.
    fn resolve_language(&self, requested: &Language) -> Option<Language> {
        self.supported_languages()
            .iter()
            .find(|lang| *lang == requested)
            .copied()
    }

    /// Provider to consult when this one cannot serve a language pair.
    fn fallback_provider_key(&self) -> &str {
        BASELINE_PROVIDER_KEY
    }

    /// Translate `text` between two languages already resolved against this provider.
    async fn translate(&self, from: &Language, to: &Language, text: &str) -> MtResult<String>;
}

/// Turn a non-2xx response into `ProviderError::Network` carrying status and body.
pub(crate) async fn ensure_success(response: reqwest::Response) -> MtResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ProviderError::Network(format!("API error ({}): {}", status, body)))
}

/// HTTP client shared by the real providers.
pub(crate) fn http_client() -> MtResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| ProviderError::Config(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        languages: Vec<Language>,
    }

    #[async_trait]
    impl Provider for Fixed {
        fn key(&self) -> &str {
            "fixed"
        }

        fn name(&self) -> &str {
            "Fixed"
        }

        fn supported_languages(&self) -> &[Language] {
            &self.languages
        }

        async fn translate(&self, _from: &Language, _to: &Language, text: &str) -> MtResult<String> {
            Ok(text.to_string())
        }
    }

    #[test]
    fn test_resolve_language_substitutes_translation_code() {
        let provider = Fixed {
            languages: vec![
                Language::ENGLISH,
                Language::INDONESIAN.with_translation_code("ID"),
            ],
        };
        let resolved = provider.resolve_language(&Language::INDONESIAN).unwrap();
        assert_eq!(resolved.translation_code(), "ID");
        assert_eq!(resolved, Language::INDONESIAN);
    }

    #[test]
    fn test_resolve_language_unsupported() {
        let provider = Fixed {
            languages: vec![Language::ENGLISH],
        };
        assert!(provider.resolve_language(&Language::JAPANESE).is_none());
    }

    #[test]
    fn test_default_fallback_is_baseline() {
        let provider = Fixed { languages: vec![] };
        assert_eq!(provider.fallback_provider_key(), BASELINE_PROVIDER_KEY);
    }
}
