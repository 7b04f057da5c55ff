//! Machine translation of Android string resources
//!
//! The crate reads `res/values/<file>.xml`, translates every translatable string,
//! string array and plurals entry into each target language through a pluggable
//! [`mt::Provider`], and merges the result with translations already present in
//! `res/values-<lang>/`. Entries that are already translated and unchanged are
//! kept as they are.
//!
//! # Example
//!
//! ```ignore
//! use android_l10n::changes::GitDiffTracker;
//! use android_l10n::export::ExportTable;
//! use android_l10n::resources::ResourceDir;
//! use android_l10n::{Config, Language, RunOptions, TranslationRun};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let store = Arc::new(ResourceDir::new("app/src/main/res"));
//!     let tracker = Arc::new(GitDiffTracker::new(store.source_path()));
//!
//!     let mut options = RunOptions::new(Language::ENGLISH);
//!     options.targets = vec![Language::FRENCH, Language::JAPANESE];
//!
//!     let run = TranslationRun::new(
//!         Arc::new(config.build_orchestrator()?),
//!         store,
//!         tracker,
//!         Box::new(ExportTable::new()),
//!         options,
//!     );
//!     let report = run.spawn().wait().await?;
//!     println!("{} languages translated", report.languages.len());
//!     Ok(())
//! }
//! ```

pub mod changes;
pub mod config;
pub mod entry;
pub mod error;
pub mod export;
pub mod language;
pub mod mt;
pub mod parser;
pub mod resources;
pub mod run;
pub mod tree;

pub use config::Config;
pub use entry::{Entry, EntryKind, PluralCategory};
pub use error::{Error, Result};
pub use language::Language;
pub use parser::{ParseError, ValuesDocument};
pub use run::{LanguageReport, RunHandle, RunOptions, RunReport, TranslationRun};
pub use tree::{DirtySet, DocumentTreeTranslator, MergeDecision, MergeInputError, TreeOutcome};

#[cfg(test)]
mod integration_tests;
