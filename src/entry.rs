//! Entries of an Android values document
//!
//! Every top-level child of `<resources>` becomes one [`Entry`]. Entries keep the
//! literal text they were parsed from, split just enough to reach the translatable
//! text leaves, so writing an entry back reproduces its source bytes unless a leaf
//! was replaced.

use std::fmt;

/// A piece of a text-bearing element body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Character data of the element or of a styling tag inside it, as written in
    /// the file (escapes intact).
    Text(String),
    /// Styling tags themselves, whole `<xliff:g>` placeholders, CDATA and comments.
    Markup(String),
}

impl Segment {
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text(text) | Segment::Markup(text) => text,
        }
    }
}

/// One `<string>` or `<item>` element: its start tag, body segments and end tag.
///
/// A self-closing element has its whole text in `open`, no segments and an empty `close`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextValue {
    pub open: String,
    pub segments: Vec<Segment>,
    pub close: String,
}

impl TextValue {
    pub fn new(open: impl Into<String>, segments: Vec<Segment>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            segments,
            close: close.into(),
        }
    }

    /// The element body without its tags.
    pub fn inner_text(&self) -> String {
        self.segments.iter().map(Segment::as_str).collect()
    }

    /// Text leaves, in document order.
    pub fn leaves(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Text(text) => Some(text.as_str()),
            Segment::Markup(_) => None,
        })
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&self.open);
        for segment in &self.segments {
            out.push_str(segment.as_str());
        }
        out.push_str(&self.close);
    }
}

/// CLDR plural category of a `<plurals>` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn from_quantity(quantity: &str) -> Option<Self> {
        match quantity {
            "zero" => Some(Self::Zero),
            "one" => Some(Self::One),
            "two" => Some(Self::Two),
            "few" => Some(Self::Few),
            "many" => Some(Self::Many),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupChild {
    Item {
        /// Set for `<plurals>` items, `None` for `<string-array>` items.
        quantity: Option<PluralCategory>,
        value: TextValue,
    },
    /// Whitespace or comments between items.
    Filler(String),
}

/// A `<string-array>` or `<plurals>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub open: String,
    pub children: Vec<GroupChild>,
    pub close: String,
}

impl Group {
    pub fn items(&self) -> impl Iterator<Item = (Option<PluralCategory>, &TextValue)> {
        self.children.iter().filter_map(|child| match child {
            GroupChild::Item { quantity, value } => Some((*quantity, value)),
            GroupChild::Filler(_) => None,
        })
    }

    fn write_body(&self, out: &mut String) {
        for child in &self.children {
            match child {
                GroupChild::Item { value, .. } => value.write_to(out),
                GroupChild::Filler(text) => out.push_str(text),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Scalar(TextValue),
    ArrayGroup(Group),
    PluralGroup(Group),
    /// Any other resource element (`<color>`, `<dimen>`, ...), never translated.
    Other(String),
    /// Whitespace, comments and other non-element content between resources.
    Verbatim(String),
}

/// One top-level node of a values document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: Option<String>,
    translatable: bool,
    kind: EntryKind,
}

impl Entry {
    pub fn new(name: Option<String>, translatable: bool, kind: EntryKind) -> Self {
        Self {
            name,
            translatable,
            kind,
        }
    }

    /// A `<string>` entry whose body is `text` (already escaped for XML).
    pub fn string(name: &str, text: &str, translatable: bool) -> Self {
        let open = if translatable {
            format!("<string name=\"{name}\">")
        } else {
            format!("<string name=\"{name}\" translatable=\"false\">")
        };
        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Text(text.to_string())]
        };
        Self::new(
            Some(name.to_string()),
            translatable,
            EntryKind::Scalar(TextValue::new(open, segments, "</string>")),
        )
    }

    /// A `<string-array>` entry with one `<item>` per element of `items`.
    pub fn string_array(name: &str, items: &[&str]) -> Self {
        let children = items
            .iter()
            .map(|item| GroupChild::Item {
                quantity: None,
                value: TextValue::new("<item>", vec![Segment::Text(item.to_string())], "</item>"),
            })
            .collect();
        Self::new(
            Some(name.to_string()),
            true,
            EntryKind::ArrayGroup(Group {
                open: format!("<string-array name=\"{name}\">"),
                children,
                close: "</string-array>".to_string(),
            }),
        )
    }

    /// A `<plurals>` entry with one `<item quantity=...>` per pair.
    pub fn plurals(name: &str, items: &[(PluralCategory, &str)]) -> Self {
        let children = items
            .iter()
            .map(|(quantity, text)| GroupChild::Item {
                quantity: Some(*quantity),
                value: TextValue::new(
                    format!("<item quantity=\"{quantity}\">"),
                    vec![Segment::Text(text.to_string())],
                    "</item>",
                ),
            })
            .collect();
        Self::new(
            Some(name.to_string()),
            true,
            EntryKind::PluralGroup(Group {
                open: format!("<plurals name=\"{name}\">"),
                children,
                close: "</plurals>".to_string(),
            }),
        )
    }

    pub fn verbatim(text: impl Into<String>) -> Self {
        Self::new(None, true, EntryKind::Verbatim(text.into()))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_translatable(&self) -> bool {
        self.translatable
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut EntryKind {
        &mut self.kind
    }

    /// True for resource elements, false for the whitespace and comments between them.
    pub fn is_element(&self) -> bool {
        !matches!(self.kind, EntryKind::Verbatim(_))
    }

    /// Whether the entry holds text a provider could translate.
    pub fn has_translatable_text(&self) -> bool {
        self.translatable
            && match &self.kind {
                EntryKind::Scalar(value) => value.leaves().any(|leaf| !is_blank(leaf)),
                EntryKind::ArrayGroup(group) | EntryKind::PluralGroup(group) => group
                    .items()
                    .any(|(_, value)| value.leaves().any(|leaf| !is_blank(leaf))),
                EntryKind::Other(_) | EntryKind::Verbatim(_) => false,
            }
    }

    /// The element body without the entry's own tags.
    pub fn inner_text(&self) -> String {
        match &self.kind {
            EntryKind::Scalar(value) => value.inner_text(),
            EntryKind::ArrayGroup(group) | EntryKind::PluralGroup(group) => {
                let mut out = String::new();
                group.write_body(&mut out);
                out
            }
            EntryKind::Other(raw) | EntryKind::Verbatim(raw) => raw.clone(),
        }
    }

    /// Appends the literal text of the entry.
    pub fn write_to(&self, out: &mut String) {
        match &self.kind {
            EntryKind::Scalar(value) => value.write_to(out),
            EntryKind::ArrayGroup(group) | EntryKind::PluralGroup(group) => {
                out.push_str(&group.open);
                group.write_body(out);
                out.push_str(&group.close);
            }
            EntryKind::Other(raw) | EntryKind::Verbatim(raw) => out.push_str(raw),
        }
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

/// Empty, or nothing but spaces and line breaks.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
