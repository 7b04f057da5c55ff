//! Sources of the dirty set
//!
//! A [`ChangeTracker`] reports which entry names changed in the source document
//! since the last committed translation. Those entries are retranslated even when
//! a target document already has them.

use crate::error::Result;
use crate::tree::DirtySet;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use tracing::{debug, warn};

pub trait ChangeTracker: Send + Sync {
    fn changed_names(&self) -> Result<DirtySet>;
}

/// A fixed set of names (command line, tests).
#[derive(Debug, Clone, Default)]
pub struct StaticChangeTracker {
    names: DirtySet,
}

impl StaticChangeTracker {
    pub fn new(names: DirtySet) -> Self {
        Self { names }
    }
}

impl ChangeTracker for StaticChangeTracker {
    fn changed_names(&self) -> Result<DirtySet> {
        Ok(self.names.clone())
    }
}

static NAME_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="(\w*)""#).expect("valid name regex"));

/// Names on added lines of a unified diff.
///
/// Only lines starting with `+` count; the `+++` file header is skipped.
pub fn parse_diff(diff: &str) -> DirtySet {
    diff.lines()
        .filter(|line| line.starts_with('+') && !line.starts_with("+++"))
        .filter_map(|line| NAME_ATTRIBUTE.captures(line))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Uncommitted changes of the source file according to `git diff -U0`.
#[derive(Debug, Clone)]
pub struct GitDiffTracker {
    file: PathBuf,
}

impl GitDiffTracker {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }
}

impl ChangeTracker for GitDiffTracker {
    /// Any git failure (no repository, git missing) yields an empty set.
    fn changed_names(&self) -> Result<DirtySet> {
        let dir = self
            .file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name = self.file.file_name().unwrap_or(self.file.as_os_str());

        let output = Command::new("git")
            .arg("diff")
            .arg("-U0")
            .arg("--")
            .arg(file_name)
            .current_dir(dir)
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let names = parse_diff(&String::from_utf8_lossy(&output.stdout));
                debug!(file = %self.file.display(), changed = names.len(), "Read git diff");
                Ok(names)
            }
            Ok(output) => {
                warn!(
                    file = %self.file.display(),
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "git diff failed, treating no entries as changed"
                );
                Ok(DirtySet::new())
            }
            Err(e) => {
                warn!(error = %e, "Could not run git, treating no entries as changed");
                Ok(DirtySet::new())
            }
        }
    }
}
