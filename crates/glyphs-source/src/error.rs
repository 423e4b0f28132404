//! Error types for reading and writing Glyphs sources.

use std::{io, path::PathBuf, result};

/// A syntax error in an ASCII property list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// Errors that can occur while loading, querying, or saving a Glyphs source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to parse '{path}': {source}")]
    Parse { path: PathBuf, source: SyntaxError },

    #[error("root of a Glyphs source must be a dictionary")]
    NotADictionary,

    #[error("missing key '{0}'")]
    MissingKey(&'static str),

    #[error("key '{key}' is not {expected}")]
    UnexpectedType { key: &'static str, expected: &'static str },
}

pub type Result<T> = result::Result<T, Error>;
