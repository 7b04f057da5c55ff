//! Per-language document translation and the merge policy
//!
//! [`DocumentTreeTranslator`] walks the source entries in order and produces the
//! entries of one target document. Each named entry is either reused from the
//! existing target document or retranslated leaf by leaf through the
//! [`TranslationOrchestrator`].

use crate::entry::{Entry, EntryKind, GroupChild, Segment, TextValue, is_blank};
use crate::language::Language;
use crate::mt::error::TranslationFailure;
use crate::mt::orchestrator::TranslationOrchestrator;
use quick_xml::escape::{partial_escape, unescape};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeInputError {
    #[error("{0} has no text to translate")]
    NothingToTranslate(String),
}

/// Fails unless at least one entry holds translatable, non-blank text.
pub fn ensure_translatable(entries: &[Entry], label: &str) -> Result<(), MergeInputError> {
    if entries.iter().any(Entry::has_translatable_text) {
        Ok(())
    } else {
        Err(MergeInputError::NothingToTranslate(label.to_string()))
    }
}

/// Names of entries whose source text changed since the last translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySet(HashSet<String>);

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for DirtySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    Reuse,
    Retranslate,
}

/// Reuse iff overwriting is off, the entry is named, not dirty, and already translated.
pub fn merge_decision(
    entry: &Entry,
    existing: Option<&Entry>,
    overwrite_existing: bool,
    dirty: &DirtySet,
) -> MergeDecision {
    match (entry.name(), existing) {
        (Some(name), Some(_)) if !overwrite_existing && !dirty.contains(name) => {
            MergeDecision::Reuse
        }
        _ => MergeDecision::Retranslate,
    }
}

/// Entries of one translated target document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedDocument {
    pub entries: Vec<Entry>,
    /// Named elements copied from the existing target document
    pub reused: usize,
    /// Elements produced from the source
    pub retranslated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOutcome {
    Complete(TranslatedDocument),
    /// Cancellation was observed before a leaf call; nothing should be written.
    Cancelled,
}

pub struct DocumentTreeTranslator<'a> {
    orchestrator: &'a TranslationOrchestrator,
    source_language: Language,
    cancel: CancellationToken,
}

impl<'a> DocumentTreeTranslator<'a> {
    pub fn new(orchestrator: &'a TranslationOrchestrator, source_language: Language) -> Self {
        Self {
            orchestrator,
            source_language,
            cancel: CancellationToken::new(),
        }
    }

    /// Checked before every leaf call.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Build the target document for `to`.
    ///
    /// Untranslatable entries are dropped, non-element content is copied, and every
    /// other entry is reused or retranslated per [`merge_decision`]. The output keeps
    /// the source order. The first failing leaf aborts the whole document.
    pub async fn translate(
        &self,
        source: &[Entry],
        existing: Option<&[Entry]>,
        to: &Language,
        overwrite_existing: bool,
        dirty: &DirtySet,
    ) -> Result<TreeOutcome, TranslationFailure> {
        let mut by_name: HashMap<&str, &Entry> = HashMap::new();
        for entry in existing.unwrap_or_default() {
            if let Some(name) = entry.name() {
                by_name.entry(name).or_insert(entry);
            }
        }

        let mut document = TranslatedDocument {
            entries: Vec::with_capacity(source.len()),
            reused: 0,
            retranslated: 0,
        };

        for entry in source {
            if !entry.is_element() {
                document.entries.push(entry.clone());
                continue;
            }
            if !entry.is_translatable() {
                continue;
            }

            let existing = entry.name().and_then(|name| by_name.get(name).copied());
            match (merge_decision(entry, existing, overwrite_existing, dirty), existing) {
                (MergeDecision::Reuse, Some(existing)) => {
                    debug!(name = entry.name(), to = to.code(), "Reusing existing translation");
                    document.entries.push(existing.clone());
                    document.reused += 1;
                }
                _ => match self.translate_entry(entry, to).await? {
                    ControlFlow::Continue(translated) => {
                        document.entries.push(translated);
                        document.retranslated += 1;
                    }
                    ControlFlow::Break(()) => return Ok(TreeOutcome::Cancelled),
                },
            }
        }

        Ok(TreeOutcome::Complete(document))
    }

    async fn translate_entry(
        &self,
        entry: &Entry,
        to: &Language,
    ) -> Result<ControlFlow<(), Entry>, TranslationFailure> {
        let mut translated = entry.clone();
        match translated.kind_mut() {
            EntryKind::Scalar(value) => {
                if self.translate_value(value, to).await?.is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            }
            EntryKind::ArrayGroup(group) | EntryKind::PluralGroup(group) => {
                for child in group.children.iter_mut() {
                    if let GroupChild::Item { value, .. } = child {
                        if self.translate_value(value, to).await?.is_break() {
                            return Ok(ControlFlow::Break(()));
                        }
                    }
                }
            }
            EntryKind::Other(_) | EntryKind::Verbatim(_) => {}
        }
        Ok(ControlFlow::Continue(translated))
    }

    /// Replace every non-blank text leaf of `value` in place.
    ///
    /// Leaves are unescaped before the call and the result has `&`, `<` and `>`
    /// escaped again, so the rendered element stays well-formed.
    async fn translate_value(
        &self,
        value: &mut TextValue,
        to: &Language,
    ) -> Result<ControlFlow<()>, TranslationFailure> {
        for segment in value.segments.iter_mut() {
            let Segment::Text(text) = segment else {
                continue;
            };
            if is_blank(text) {
                continue;
            }
            if self.cancel.is_cancelled() {
                return Ok(ControlFlow::Break(()));
            }
            // Providers see plain text; the file gets markup-safe text back
            let plain = unescape(text).map_or_else(|_| text.clone(), Cow::into_owned);
            let translated = self
                .orchestrator
                .translate(&self.source_language, to, &plain)
                .await?;
            *text = partial_escape(translated.as_str()).into_owned();
        }
        Ok(ControlFlow::Continue(()))
    }
}
