//! Mock provider for testing
//!
//! This module provides a deterministic, API-free provider for exercising the
//! translation pipeline without API keys or network access. It records every
//! request it serves so tests can assert on call counts and on the translation
//! codes that reached the provider.
//!
//! # Example
//!
//! ```ignore
//! use android_l10n::Language;
//! use android_l10n::mt::{MockMode, MockTranslator, Provider};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate(&Language::ENGLISH, &Language::FRENCH, "hello").await.unwrap();
//!     assert_eq!(result, "hello_fr");
//! }
//! ```

use crate::language::Language;
use crate::mt::error::{MtResult, ProviderError};
use crate::mt::translator::{BASELINE_PROVIDER_KEY, Provider};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append the target translation code: "hello" → "hello_fr"
    Suffix,

    /// Use predefined mappings for realistic translations
    /// (text, target translation code) → translation, falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Reverse the order of whitespace-separated words
    Reorder,

    /// Fail every call with a network error carrying this message
    Error(String),

    /// Return input unchanged
    NoOp,
}

/// One request served by the mock: (from code, to code, text), using translation codes.
pub type MockRequest = (String, String, String);

/// Mock provider that simulates various translation scenarios
#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    key: String,
    languages: Vec<Language>,
    fallback_key: String,
    calls: AtomicUsize,
    requests: Mutex<Vec<MockRequest>>,
}

impl MockTranslator {
    /// Create a mock registered as `"mock"` that supports the whole catalog.
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            delay_ms: 0,
            key: "mock".to_string(),
            languages: Language::all().to_vec(),
            fallback_key: BASELINE_PROVIDER_KEY.to_string(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a MockTranslator with simulated network delay
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new(mode)
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    /// Restrict the supported languages (and their translation codes).
    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_fallback(mut self, key: &str) -> Self {
        self.fallback_key = key.to_string();
        self
    }

    /// Number of non-empty translation requests served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests served so far, in order.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    /// Internal helper to apply the simulated delay
    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    /// Apply translation logic based on the mode
    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Reorder => {
                let words: Vec<&str> = text.split_whitespace().rev().collect();
                Ok(words.join(" "))
            }
            MockMode::Error(msg) => Err(ProviderError::Network(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl Provider for MockTranslator {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        "Mock Translator"
    }

    fn supported_languages(&self) -> &[Language] {
        &self.languages
    }

    fn fallback_provider_key(&self) -> &str {
        &self.fallback_key
    }

    async fn translate(&self, from: &Language, to: &Language, text: &str) -> MtResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push((
            from.translation_code().to_string(),
            to.translation_code().to_string(),
            text.to_string(),
        ));

        self.apply_delay().await;
        self.apply_translation(text, to.translation_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN: Language = Language::ENGLISH;
    const FR: Language = Language::FRENCH;

    // ========== Suffix Mode Tests ==========

    #[tokio::test]
    async fn test_suffix_single_translation() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let result = mock.translate(&EN, &FR, "hello").await.unwrap();
        assert_eq!(result, "hello_fr");
    }

    #[tokio::test]
    async fn test_suffix_uses_translation_code() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let to = Language::CHINESE_SIMPLIFIED;
        assert_eq!(mock.translate(&EN, &to, "hello").await.unwrap(), "hello_zh-CN");
    }

    #[tokio::test]
    async fn test_empty_text_short_circuits() {
        let mock = MockTranslator::new(MockMode::Error("should not be called".to_string()));
        let result = mock.translate(&EN, &FR, "").await.unwrap();
        assert_eq!(result, "");
        assert_eq!(mock.call_count(), 0);
    }

    // ========== Mapping Mode Tests ==========

    #[tokio::test]
    async fn test_mapping_single_translation() {
        let mut map = HashMap::new();
        map.insert(
            ("hello".to_string(), "fr".to_string()),
            "bonjour".to_string(),
        );

        let mock = MockTranslator::new(MockMode::Mappings(map));
        let result = mock.translate(&EN, &FR, "hello").await.unwrap();
        assert_eq!(result, "bonjour");
    }

    #[tokio::test]
    async fn test_mapping_fallback_to_suffix() {
        let mock = MockTranslator::new(MockMode::Mappings(HashMap::new()));
        let result = mock.translate(&EN, &FR, "unknown").await.unwrap();
        assert_eq!(result, "unknown_fr");
    }

    // ========== Reorder / Error / NoOp ==========

    #[tokio::test]
    async fn test_reorder_multiple_words() {
        let mock = MockTranslator::new(MockMode::Reorder);
        let result = mock
            .translate(&EN, &Language::JAPANESE, "one two three four")
            .await
            .unwrap();
        assert_eq!(result, "four three two one");
    }

    #[tokio::test]
    async fn test_error_mode_returns_network_error() {
        let mock = MockTranslator::new(MockMode::Error("API unavailable".to_string()));
        match mock.translate(&EN, &FR, "hello").await {
            Err(ProviderError::Network(msg)) => assert_eq!(msg, "API unavailable"),
            other => panic!("Expected Network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_noop_returns_unchanged() {
        let mock = MockTranslator::new(MockMode::NoOp);
        let result = mock.translate(&EN, &FR, "Hello world").await.unwrap();
        assert_eq!(result, "Hello world");
    }

    // ========== Bookkeeping ==========

    #[tokio::test]
    async fn test_requests_are_recorded() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let deepl_style = Language::INDONESIAN.with_translation_code("ID");
        mock.translate(&EN, &deepl_style, "a").await.unwrap();
        mock.translate(&EN, &FR, "b").await.unwrap();

        assert_eq!(mock.call_count(), 2);
        assert_eq!(
            mock.requests(),
            vec![
                ("en".to_string(), "ID".to_string(), "a".to_string()),
                ("en".to_string(), "fr".to_string(), "b".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_delay_adds_latency() {
        let mock = MockTranslator::with_delay(MockMode::Suffix, 50);
        let start = std::time::Instant::now();
        let _ = mock.translate(&EN, &FR, "hello").await.unwrap();
        assert!(start.elapsed().as_millis() >= 50);
    }

    #[test]
    fn test_builder_settings() {
        let mock = MockTranslator::new(MockMode::NoOp)
            .with_key("primary")
            .with_languages(vec![EN])
            .with_fallback("secondary");
        assert_eq!(mock.key(), "primary");
        assert_eq!(mock.supported_languages(), &[EN]);
        assert_eq!(mock.fallback_provider_key(), "secondary");
        assert!(mock.resolve_language(&FR).is_none());
    }
}
