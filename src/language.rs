//! Languages known to the translator
//!
//! A [`Language`] is identified by its Android resource `code` (the suffix of a
//! `values-<code>` directory, e.g. `fr` or `zh-rCN`). Each language also carries a
//! `translation_code`, the code sent to a provider. Providers that spell a language
//! differently return a copy with their own translation code from
//! [`Provider::resolve_language`](crate::mt::Provider::resolve_language); identity never
//! changes.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A language that can appear as a translation source or target.
///
/// Equality and hashing use `code` only.
#[derive(Debug, Clone, Copy)]
pub struct Language {
    code: &'static str,
    name: &'static str,
    english_name: &'static str,
    translation_code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language::new("en", "English", "English", "en");
    pub const FRENCH: Language = Language::new("fr", "Français", "French", "fr");
    pub const GERMAN: Language = Language::new("de", "Deutsch", "German", "de");
    pub const SPANISH: Language = Language::new("es", "Español", "Spanish", "es");
    pub const ITALIAN: Language = Language::new("it", "Italiano", "Italian", "it");
    pub const JAPANESE: Language = Language::new("ja", "日本語", "Japanese", "ja");
    pub const KOREAN: Language = Language::new("ko", "한국어", "Korean", "ko");
    pub const RUSSIAN: Language = Language::new("ru", "Русский", "Russian", "ru");
    pub const INDONESIAN: Language = Language::new("in", "Indonesia", "Indonesian", "id");
    pub const HEBREW: Language = Language::new("iw", "עברית", "Hebrew", "iw");
    pub const CHINESE: Language = Language::new("zh", "中文", "Chinese", "zh");
    pub const CHINESE_SIMPLIFIED: Language =
        Language::new("zh-rCN", "简体中文", "Chinese Simplified", "zh-CN");
    pub const CHINESE_TRADITIONAL: Language =
        Language::new("zh-rTW", "繁體中文", "Chinese Traditional", "zh-TW");

    pub const fn new(
        code: &'static str,
        name: &'static str,
        english_name: &'static str,
        translation_code: &'static str,
    ) -> Self {
        Self {
            code,
            name,
            english_name,
            translation_code,
        }
    }

    /// Returns a copy of this language that a provider addresses as `translation_code`.
    pub const fn with_translation_code(self, translation_code: &'static str) -> Self {
        Self {
            translation_code,
            ..self
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Native display name
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn english_name(&self) -> &'static str {
        self.english_name
    }

    pub fn translation_code(&self) -> &'static str {
        self.translation_code
    }

    /// Look up a catalog language by its resource code.
    ///
    /// Exact matches win; otherwise the comparison ignores ASCII case, so
    /// `zh-rcn` finds `zh-rCN`.
    pub fn lookup(code: &str) -> Option<Language> {
        CATALOG
            .iter()
            .find(|lang| lang.code == code)
            .or_else(|| CATALOG.iter().find(|lang| lang.code.eq_ignore_ascii_case(code)))
            .copied()
    }

    /// Every language in the built-in catalog, in display order.
    pub fn all() -> &'static [Language] {
        CATALOG
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.english_name, self.code)
    }
}

// Translation codes default to the Google spelling; other providers override them.
const CATALOG: &[Language] = &[
    Language::new("sq", "Shqip", "Albanian", "sq"),
    Language::new("ar", "العربية", "Arabic", "ar"),
    Language::new("am", "አማርኛ", "Amharic", "am"),
    Language::new("az", "Azərbaycan", "Azerbaijani", "az"),
    Language::new("ga", "Gaeilge", "Irish", "ga"),
    Language::new("et", "Eesti", "Estonian", "et"),
    Language::new("eu", "Euskara", "Basque", "eu"),
    Language::new("be", "Беларуская", "Belarusian", "be"),
    Language::new("bg", "Български", "Bulgarian", "bg"),
    Language::new("is", "Íslenska", "Icelandic", "is"),
    Language::new("pl", "Polski", "Polish", "pl"),
    Language::new("bs", "Bosanski", "Bosnian", "bs"),
    Language::new("fa", "فارسی", "Persian", "fa"),
    Language::new("da", "Dansk", "Danish", "da"),
    Language::GERMAN,
    Language::RUSSIAN,
    Language::FRENCH,
    Language::new("tl", "Filipino", "Filipino", "tl"),
    Language::new("fi", "Suomi", "Finnish", "fi"),
    Language::new("ka", "ქართული", "Georgian", "ka"),
    Language::KOREAN,
    Language::new("nl", "Nederlands", "Dutch", "nl"),
    Language::new("ca", "Català", "Catalan", "ca"),
    Language::new("cs", "Čeština", "Czech", "cs"),
    Language::new("hr", "Hrvatski", "Croatian", "hr"),
    Language::new("lv", "Latviešu", "Latvian", "lv"),
    Language::new("lt", "Lietuvių", "Lithuanian", "lt"),
    Language::new("ro", "Română", "Romanian", "ro"),
    Language::new("ms", "Bahasa Melayu", "Malay", "ms"),
    Language::new("bn", "বাংলা", "Bengali", "bn"),
    Language::new("nb", "Norsk bokmål", "Norwegian", "no"),
    Language::new("pt", "Português", "Portuguese", "pt"),
    Language::new("pt-rBR", "Português (Brasil)", "Portuguese (Brazil)", "pt"),
    Language::JAPANESE,
    Language::new("sv", "Svenska", "Swedish", "sv"),
    Language::new("sr", "Српски", "Serbian", "sr"),
    Language::new("sk", "Slovenčina", "Slovak", "sk"),
    Language::new("sl", "Slovenščina", "Slovenian", "sl"),
    Language::new("sw", "Kiswahili", "Swahili", "sw"),
    Language::new("th", "ไทย", "Thai", "th"),
    Language::new("tr", "Türkçe", "Turkish", "tr"),
    Language::new("uk", "Українська", "Ukrainian", "uk"),
    Language::SPANISH,
    Language::HEBREW,
    Language::new("el", "Ελληνικά", "Greek", "el"),
    Language::new("hu", "Magyar", "Hungarian", "hu"),
    Language::ITALIAN,
    Language::new("hi", "हिन्दी", "Hindi", "hi"),
    Language::INDONESIAN,
    Language::ENGLISH,
    Language::new("vi", "Tiếng Việt", "Vietnamese", "vi"),
    Language::CHINESE,
    Language::CHINESE_SIMPLIFIED,
    Language::CHINESE_TRADITIONAL,
];
