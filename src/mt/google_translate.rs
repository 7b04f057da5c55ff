//! Google Translate providers for machine translation
//!
//! Two flavours are available:
//!
//! - [`GoogleTranslateProvider`] (key `"google"`) talks to the public web endpoint and
//!   needs no credentials. It is the baseline provider every other provider falls
//!   back to.
//! - [`GoogleCloudProvider`] (key `"google-api"`) uses the Google Cloud Translation
//!   API v2 and needs an API key from https://console.cloud.google.com/
//!
//! # Example
//!
//! ```ignore
//! use android_l10n::Language;
//! use android_l10n::mt::{GoogleCloudProvider, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleCloudProvider::from_env()?;
//!     let result = provider
//!         .translate(&Language::ENGLISH, &Language::FRENCH, "Hello, world!")
//!         .await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::language::Language;
use crate::mt::error::{MtResult, ProviderError};
use crate::mt::translator::{BASELINE_PROVIDER_KEY, Provider, ensure_success, http_client};
use async_trait::async_trait;
use serde_json::json;

/// Keyless Google Translate web endpoint
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Host serving `/translate_a/single`
    base_url: String,
}

impl GoogleTranslateProvider {
    pub const KEY: &'static str = BASELINE_PROVIDER_KEY;

    const DEFAULT_BASE_URL: &'static str = "https://translate.googleapis.com";

    pub fn new() -> MtResult<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the provider at another host (used by tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// The endpoint answers with nested arrays; the translation is split into
    /// sentences at `[0][i][0]`.
    fn extract_translation(json: &serde_json::Value) -> MtResult<String> {
        let sentences = json[0].as_array().ok_or_else(|| {
            ProviderError::Parse("Invalid response: missing sentence array".to_string())
        })?;

        let parts: Vec<&str> = sentences
            .iter()
            .filter_map(|sentence| sentence[0].as_str())
            .collect();
        if parts.is_empty() {
            return Err(ProviderError::Parse(
                "Invalid response: no translated sentences".to_string(),
            ));
        }
        Ok(parts.concat())
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl Provider for GoogleTranslateProvider {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn name(&self) -> &str {
        "Google Translate"
    }

    fn supported_languages(&self) -> &[Language] {
        Language::all()
    }

    async fn translate(&self, from: &Language, to: &Language, text: &str) -> MtResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let url = reqwest::Url::parse_with_params(
            &format!("{}/translate_a/single", self.base_url),
            &[
                ("client", "gtx"),
                ("sl", from.translation_code()),
                ("tl", to.translation_code()),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| ProviderError::Config(format!("Invalid base URL: {}", e)))?;

        let response = ensure_success(self.client.get(url).send().await?).await?;
        let json: serde_json::Value = response.json().await?;
        Self::extract_translation(&json)
    }
}

/// Google Cloud Translation API v2 provider
#[derive(Clone)]
pub struct GoogleCloudProvider {
    /// API key for authentication
    api_key: String,
    client: reqwest::Client,
    /// Base URL for Google Translate API
    base_url: String,
}

impl GoogleCloudProvider {
    pub const KEY: &'static str = "google-api";

    /// Create a provider with an explicit API key
    ///
    /// Fails with `ProviderError::Config` if the key is blank.
    pub fn new(api_key: String) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::Config("API key cannot be empty".to_string()));
        }

        Ok(Self {
            api_key,
            client: http_client()?,
            base_url: "https://translation.googleapis.com/language/translate/v2".to_string(),
        })
    }

    /// Create a provider from the `GOOGLE_TRANSLATE_API_KEY` environment variable
    pub fn from_env() -> MtResult<Self> {
        let api_key = std::env::var("GOOGLE_TRANSLATE_API_KEY").map_err(|_| {
            ProviderError::Config(
                "GOOGLE_TRANSLATE_API_KEY environment variable not set".to_string(),
            )
        })?;

        Self::new(api_key)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

impl std::fmt::Debug for GoogleCloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCloudProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl Provider for GoogleCloudProvider {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn name(&self) -> &str {
        "Google Cloud Translation"
    }

    fn supported_languages(&self) -> &[Language] {
        Language::all()
    }

    async fn translate(&self, from: &Language, to: &Language, text: &str) -> MtResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let url = reqwest::Url::parse_with_params(&self.base_url, &[("key", &self.api_key)])
            .map_err(|e| ProviderError::Config(format!("Invalid base URL: {}", e)))?;

        let body = json!({
            "q": [text],
            "source": from.translation_code(),
            "target": to.translation_code(),
            "format": "text"
        });

        let response = ensure_success(self.client.post(url).json(&body).send().await?).await?;
        let json: serde_json::Value = response.json().await?;

        json["data"]["translations"][0]["translatedText"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ProviderError::Parse(
                    "Invalid API response: missing 'data.translations[0].translatedText'"
                        .to_string(),
                )
            })
    }
}
