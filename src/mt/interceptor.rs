//! Post-processing applied to every provider result
//!
//! Interceptors are pure `text -> text` transforms. The chain runs them in order on
//! each successful translation before it is cached, whichever provider produced it.

use regex::Regex;
use std::sync::LazyLock;

pub trait TranslationInterceptor: Send + Sync {
    fn process(&self, text: &str) -> String;
}

static HTML_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(?:#39|#x27|apos|#34|quot);").expect("valid entity regex"));

/// Decodes the quote entities web backends put into their output.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlEntityInterceptor;

impl TranslationInterceptor for HtmlEntityInterceptor {
    fn process(&self, text: &str) -> String {
        HTML_ENTITY
            .replace_all(text, |caps: &regex::Captures| match &caps[0] {
                "&#34;" | "&quot;" => "\"",
                _ => "'",
            })
            .into_owned()
    }
}

static SPLIT_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\ ([nt])").expect("valid escape regex"));

/// Makes provider output valid Android string resource text.
///
/// Repairs `\ n` and `\ t` escapes that providers split with a space, and
/// backslash-escapes quotes that are not already escaped.
#[derive(Debug, Default, Clone, Copy)]
pub struct EscapeCharactersInterceptor;

impl TranslationInterceptor for EscapeCharactersInterceptor {
    fn process(&self, text: &str) -> String {
        let repaired = SPLIT_ESCAPE.replace_all(text, r"\$1");

        let mut out = String::with_capacity(repaired.len());
        let mut escaping = false;
        for c in repaired.chars() {
            if (c == '\'' || c == '"') && !escaping {
                out.push('\\');
            }
            escaping = c == '\\' && !escaping;
            out.push(c);
        }
        out
    }
}

/// Ordered interceptors; the default chain decodes entities, then escapes.
pub struct InterceptorChain {
    interceptors: Vec<Box<dyn TranslationInterceptor>>,
}

impl InterceptorChain {
    /// A chain that leaves text untouched.
    pub fn empty() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    pub fn with(mut self, interceptor: impl TranslationInterceptor + 'static) -> Self {
        self.push(interceptor);
        self
    }

    pub fn push(&mut self, interceptor: impl TranslationInterceptor + 'static) {
        self.interceptors.push(Box::new(interceptor));
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn apply(&self, text: String) -> String {
        self.interceptors
            .iter()
            .fold(text, |text, interceptor| interceptor.process(&text))
    }
}

impl Default for InterceptorChain {
    fn default() -> Self {
        Self::empty()
            .with(HtmlEntityInterceptor)
            .with(EscapeCharactersInterceptor)
    }
}

impl std::fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("len", &self.interceptors.len())
            .finish()
    }
}
