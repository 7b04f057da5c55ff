//! Crate-level error type

use crate::mt::error::{ProviderError, TranslationFailure, UnknownProviderError};
use crate::parser::ParseError;
use crate::tree::MergeInputError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error(transparent)]
    MergeInput(#[from] MergeInputError),
    #[error(transparent)]
    Translation(#[from] TranslationFailure),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    UnknownProvider(#[from] UnknownProviderError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build export report: {0}")]
    Export(#[from] csv::Error),
    /// The background worker running a translation stopped abnormally.
    #[error("translation worker failed: {0}")]
    Worker(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
