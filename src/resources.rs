//! Android resource directories as document source and sink
//!
//! The source document lives in `res/values/<file>`, the translation for language
//! `L` in `res/values-<L>/<file>`.

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::language::Language;
use crate::parser::ValuesDocument;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supplies source and target documents and persists translated ones.
pub trait DocumentStore: Send + Sync {
    /// Human readable name of the source document, for messages.
    fn source_label(&self) -> String;

    fn source(&self) -> Result<ValuesDocument>;

    /// Languages that already have a target document location, in a stable order.
    fn existing_languages(&self) -> Result<Vec<Language>>;

    fn load_target(&self, language: &Language) -> Result<Option<ValuesDocument>>;

    /// Persist `entries` as the target document of `language`, each entry written as
    /// its literal text. Returns the written location, or `None` if nothing was written.
    fn write_target(
        &self,
        language: &Language,
        source: &ValuesDocument,
        entries: &[Entry],
    ) -> Result<Option<PathBuf>>;
}

#[derive(Debug, Clone)]
pub struct ResourceDir {
    root: PathBuf,
    file_name: String,
}

impl ResourceDir {
    pub const DEFAULT_FILE_NAME: &'static str = "strings.xml";

    /// `root` is the `res` directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_name: Self::DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_path(&self) -> PathBuf {
        self.root.join("values").join(&self.file_name)
    }

    pub fn target_path(&self, language: &Language) -> PathBuf {
        self.root
            .join(format!("values-{}", language.code()))
            .join(&self.file_name)
    }

    fn read(path: &Path) -> Result<ValuesDocument> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        ValuesDocument::parse(&text).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DocumentStore for ResourceDir {
    fn source_label(&self) -> String {
        self.source_path().display().to_string()
    }

    fn source(&self) -> Result<ValuesDocument> {
        Self::read(&self.source_path())
    }

    fn existing_languages(&self) -> Result<Vec<Language>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| Error::io(&self.root, e))?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&self.root, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(code) = name.strip_prefix("values-") {
                match Language::lookup(code) {
                    Some(language) => dirs.push((name.clone(), language)),
                    None => debug!(dir = %name, "Skipping non-language values directory"),
                }
            }
        }

        dirs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(dirs.into_iter().map(|(_, language)| language).collect())
    }

    fn load_target(&self, language: &Language) -> Result<Option<ValuesDocument>> {
        let path = self.target_path(language);
        if !path.is_file() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    fn write_target(
        &self,
        language: &Language,
        source: &ValuesDocument,
        entries: &[Entry],
    ) -> Result<Option<PathBuf>> {
        if !entries.iter().any(Entry::is_element) {
            debug!(language = language.code(), "Nothing to write");
            return Ok(None);
        }

        let existing = self.load_target(language)?;
        let frame = existing.as_ref().unwrap_or(source);
        let text = frame.render_entries(entries);

        let path = self.target_path(language);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        std::fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
        info!(language = language.code(), path = %path.display(), "Wrote translations");
        Ok(Some(path))
    }
}
