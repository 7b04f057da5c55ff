//! One translation run over all target languages
//!
//! A run reads the source document once, then for each target language in order
//! merges and translates, writes the result and forwards it to the export sink.
//! Languages are processed one at a time on a single worker task.

use crate::changes::ChangeTracker;
use crate::error::{Error, Result};
use crate::export::ExportSink;
use crate::language::Language;
use crate::mt::orchestrator::TranslationOrchestrator;
use crate::resources::DocumentStore;
use crate::tree::{DocumentTreeTranslator, TreeOutcome, ensure_translatable};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source_language: Language,
    /// Explicitly requested targets, processed before the languages found on disk
    pub targets: Vec<Language>,
    pub overwrite_existing: bool,
}

impl RunOptions {
    pub fn new(source_language: Language) -> Self {
        Self {
            source_language,
            targets: Vec::new(),
            overwrite_existing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReport {
    pub language: Language,
    pub reused: usize,
    pub retranslated: usize,
    /// Where the target document was written, if it was
    pub written_to: Option<PathBuf>,
    pub write_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Completed languages, in processing order
    pub languages: Vec<LanguageReport>,
    pub cancelled: bool,
    pub export_path: Option<PathBuf>,
}

/// Configured targets first, then on-disk languages; no duplicates, never the source.
pub fn plan_targets(
    source_language: &Language,
    configured: &[Language],
    on_disk: &[Language],
) -> Vec<Language> {
    let mut seen = HashSet::new();
    configured
        .iter()
        .chain(on_disk)
        .filter(|language| *language != source_language)
        .filter(|language| seen.insert(**language))
        .copied()
        .collect()
}

pub struct TranslationRun {
    orchestrator: Arc<TranslationOrchestrator>,
    store: Arc<dyn DocumentStore>,
    tracker: Arc<dyn ChangeTracker>,
    export: Box<dyn ExportSink>,
    options: RunOptions,
}

impl TranslationRun {
    pub fn new(
        orchestrator: Arc<TranslationOrchestrator>,
        store: Arc<dyn DocumentStore>,
        tracker: Arc<dyn ChangeTracker>,
        export: Box<dyn ExportSink>,
        options: RunOptions,
    ) -> Self {
        Self {
            orchestrator,
            store,
            tracker,
            export,
            options,
        }
    }

    /// Run to completion on the current task.
    ///
    /// `cancel` is checked before each language and before each leaf call. Languages
    /// finished before cancellation stay written and are still exported. A
    /// translation failure stops the run without exporting.
    pub async fn execute(mut self, cancel: CancellationToken) -> Result<RunReport> {
        let source = self.store.source()?;
        ensure_translatable(source.entries(), &self.store.source_label())?;

        let dirty = self.tracker.changed_names()?;
        let targets = plan_targets(
            &self.options.source_language,
            &self.options.targets,
            &self.store.existing_languages()?,
        );
        info!(
            source = %self.options.source_language,
            targets = targets.len(),
            changed = dirty.len(),
            "Starting translation run"
        );

        self.export.fill_default(source.entries());
        let translator =
            DocumentTreeTranslator::new(&self.orchestrator, self.options.source_language)
                .with_cancellation(cancel.clone());

        let mut report = RunReport::default();
        for (index, language) in targets.iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            info!(language = %language, "Translating");
            let existing = self.store.load_target(language)?;
            let outcome = translator
                .translate(
                    source.entries(),
                    existing.as_ref().map(|doc| doc.entries()),
                    language,
                    self.options.overwrite_existing,
                    &dirty,
                )
                .await?;

            let document = match outcome {
                TreeOutcome::Complete(document) => document,
                TreeOutcome::Cancelled => {
                    info!(language = %language, "Cancelled, not writing");
                    report.cancelled = true;
                    break;
                }
            };

            let (written_to, write_error) =
                match self.store.write_target(language, &source, &document.entries) {
                    Ok(path) => (path, None),
                    Err(e) => {
                        error!(language = %language, error = %e, "Failed to write translations");
                        (None, Some(e.to_string()))
                    }
                };

            self.export.write_language_column(
                index + 2,
                source.entries(),
                &document.entries,
                language,
            );

            report.languages.push(LanguageReport {
                language: *language,
                reused: document.reused,
                retranslated: document.retranslated,
                written_to,
                write_error,
            });
        }

        report.export_path = self.export.finish()?;
        info!(
            completed = report.languages.len(),
            cancelled = report.cancelled,
            "Translation run finished"
        );
        Ok(report)
    }

    /// Start the run on a background task.
    pub fn spawn(self) -> RunHandle {
        let cancel = CancellationToken::new();
        let join = tokio::spawn(self.execute(cancel.clone()));
        RunHandle { cancel, join }
    }
}

/// Handle to a run started with [`TranslationRun::spawn`].
pub struct RunHandle {
    cancel: CancellationToken,
    join: JoinHandle<Result<RunReport>>,
}

impl RunHandle {
    /// Ask the run to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the run to end: `Ok` with the report, or the error that stopped it.
    pub async fn wait(self) -> Result<RunReport> {
        self.join
            .await
            .map_err(|e| Error::Worker(e.to_string()))?
    }
}
