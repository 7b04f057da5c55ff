//! Error types for the Machine Translation module
use thiserror::Error;

/// A single provider call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport failure or non-2xx response
    #[error("network error: {0}")]
    Network(String),
    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    Parse(String),
    /// The provider cannot translate into or from this language
    #[error("{language} is not supported by {provider}")]
    Unsupported { provider: String, language: String },
    /// Missing or invalid credentials
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Parse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Neither the selected provider nor its fallback supports the language pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{from} -> {to} is not supported by the selected or fallback provider (text: {text:?})")]
pub struct UnsupportedLanguagePairError {
    pub from: String,
    pub to: String,
    pub text: String,
}

/// Failure of one `TranslationOrchestrator::translate` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationFailure {
    #[error(transparent)]
    UnsupportedPair(#[from] UnsupportedLanguagePairError),
    #[error("{provider} failed to translate {from} -> {to} (text: {text:?}): {source}")]
    Provider {
        provider: String,
        from: String,
        to: String,
        text: String,
        #[source]
        source: ProviderError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown translation provider '{0}'")]
pub struct UnknownProviderError(pub String);

/// Result type for provider calls
pub type MtResult<T> = Result<T, ProviderError>;
