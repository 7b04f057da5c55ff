//! Export report of a translation run
//!
//! The report is a table: one header row naming the target languages, one row per
//! named source element, and one column per target language.

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::language::Language;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Receives the per-language results of a run and persists them at the end.
pub trait ExportSink: Send {
    /// Header row plus the first two columns (entry name, source text).
    fn fill_default(&mut self, source: &[Entry]);

    /// Fill `column` with the translations of `translated`, matched to source rows by name.
    fn write_language_column(
        &mut self,
        column: usize,
        source: &[Entry],
        translated: &[Entry],
        language: &Language,
    );

    /// Persist the table; returns where it went, if anywhere.
    fn finish(&mut self) -> Result<Option<PathBuf>>;
}

/// Spreadsheet-style report written as CSV
#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    rows: Vec<Vec<String>>,
    output_dir: Option<PathBuf>,
}

impl ExportTable {
    /// A table kept in memory only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table written to `Export-<unix millis>.csv` inside `dir` on `finish`.
    pub fn with_output_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            rows: Vec::new(),
            output_dir: Some(dir.into()),
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn set_cell(&mut self, row: usize, column: usize, value: String) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value;
    }

    /// CRLF-terminated CSV; rows keep their own length.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Export(e.into_error().into()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn source_rows(source: &[Entry]) -> impl Iterator<Item = &Entry> {
    source.iter().filter(|entry| entry.is_element())
}

impl ExportSink for ExportTable {
    fn fill_default(&mut self, source: &[Entry]) {
        self.set_cell(0, 0, "Translate Output".to_string());
        self.set_cell(0, 1, "Default".to_string());
        let rows: Vec<(String, String)> = source_rows(source)
            .map(|entry| (entry.name().unwrap_or_default().to_string(), entry.inner_text()))
            .collect();
        for (index, (name, text)) in rows.into_iter().enumerate() {
            self.set_cell(index + 1, 0, name);
            self.set_cell(index + 1, 1, text);
        }
    }

    fn write_language_column(
        &mut self,
        column: usize,
        source: &[Entry],
        translated: &[Entry],
        language: &Language,
    ) {
        self.set_cell(0, column, language.code().to_string());

        let by_name: HashMap<&str, &Entry> = translated
            .iter()
            .filter_map(|entry| entry.name().map(|name| (name, entry)))
            .collect();

        // Untranslatable rows keep their place but get no cell
        let cells: Vec<(usize, String)> = source_rows(source)
            .enumerate()
            .filter_map(|(index, entry)| {
                let translated = by_name.get(entry.name()?)?;
                Some((index + 1, translated.inner_text()))
            })
            .collect();
        for (row, text) in cells {
            self.set_cell(row, column, text);
        }
    }

    fn finish(&mut self) -> Result<Option<PathBuf>> {
        let Some(dir) = &self.output_dir else {
            return Ok(None);
        };

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let path = dir.join(format!("Export-{}.csv", millis));

        std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        std::fs::write(&path, self.to_csv()?).map_err(|e| Error::io(&path, e))?;
        info!(path = %path.display(), "Wrote export report");
        Ok(Some(path))
    }
}
