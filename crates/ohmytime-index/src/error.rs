//! Error types for index loading and search.

use std::path::PathBuf;

/// Errors returned while opening or querying a gazetteer index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Gazetteer file does not exist.
    #[error("index file not found: {0}")]
    NotFound(PathBuf),
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Two records share the same id.
    #[error("duplicate record id: {0}")]
    DuplicateId(String),
    /// Search engine failure while building or querying.
    #[error("search engine error: {0}")]
    Engine(#[from] tantivy::TantivyError),
}
