//! DeepL provider
//!
//! Uses the DeepL REST API v2. Authentication keys ending in `:fx` belong to the
//! free plan and are served from a different host.
//!
//! DeepL covers a smaller set of languages than Google and spells some of them its
//! own way, so the provider carries its own language list. Requests omit the
//! source language and let DeepL detect it.

use crate::language::Language;
use crate::mt::error::{MtResult, ProviderError};
use crate::mt::translator::{Provider, ensure_success, http_client};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Resource codes DeepL can translate, with its translation code where it differs.
const SUPPORTED: &[(&str, Option<&str>)] = &[
    ("bg", None),
    ("cs", None),
    ("da", None),
    ("de", None),
    ("el", None),
    ("en", None),
    ("es", None),
    ("et", None),
    ("fi", None),
    ("fr", None),
    ("hu", None),
    ("in", Some("ID")),
    ("it", None),
    ("ja", None),
    ("lt", None),
    ("lv", None),
    ("nl", None),
    ("pl", None),
    ("pt", None),
    ("ro", None),
    ("ru", None),
    ("sk", None),
    ("sl", None),
    ("sv", None),
    ("tr", None),
    ("zh", None),
    ("zh-rCN", Some("ZH")),
];

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: [&'a str; 1],
    target_lang: String,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[allow(dead_code)]
    detected_source_language: Option<String>,
    text: String,
}

#[derive(Clone)]
pub struct DeeplProvider {
    auth_key: String,
    client: reqwest::Client,
    base_url: String,
    languages: Vec<Language>,
}

impl DeeplProvider {
    pub const KEY: &'static str = "deepl";

    const FREE_HOST: &'static str = "https://api-free.deepl.com";
    const PRO_HOST: &'static str = "https://api.deepl.com";

    /// Fails with `ProviderError::Config` if the key is blank.
    pub fn new(auth_key: String) -> MtResult<Self> {
        if auth_key.trim().is_empty() {
            return Err(ProviderError::Config(
                "DeepL auth key cannot be empty".to_string(),
            ));
        }

        let base_url = if auth_key.ends_with(":fx") {
            Self::FREE_HOST
        } else {
            Self::PRO_HOST
        };

        let languages = SUPPORTED
            .iter()
            .filter_map(|(code, translation_code)| {
                let language = Language::lookup(code)?;
                Some(match translation_code {
                    Some(translation_code) => language.with_translation_code(*translation_code),
                    None => language,
                })
            })
            .collect();

        Ok(Self {
            auth_key,
            client: http_client()?,
            base_url: base_url.to_string(),
            languages,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for DeeplProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeeplProvider")
            .field("auth_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl Provider for DeeplProvider {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn name(&self) -> &str {
        "DeepL"
    }

    fn supported_languages(&self) -> &[Language] {
        &self.languages
    }

    async fn translate(&self, _from: &Language, to: &Language, text: &str) -> MtResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let request = TranslateRequest {
            text: [text],
            target_lang: to.translation_code().to_uppercase(),
        };

        let response = self
            .client
            .post(format!("{}/v2/translate", self.base_url))
            .header("Authorization", format!("DeepL-Auth-Key {}", self.auth_key))
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let body: TranslateResponse = response.json().await?;
        body.translations
            .into_iter()
            .next()
            .map(|translation| translation.text)
            .ok_or_else(|| ProviderError::Parse("DeepL returned no translations".to_string()))
    }
}
