//! Error types for tree construction and mutation.

use crate::ValuePath;
use thiserror::Error;

/// Result type alias for yamlnode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or mutating a tree.
///
/// Missing keys in lookups are not errors; the `get`/`deepget` family returns
/// `None` for them.
#[derive(Debug, Error)]
pub enum Error {
    /// A node was requested over a value that is not a single-key mapping
    /// holding structured content.
    #[error("Value at {path} is not a node: found {found}")]
    InvalidNode { path: ValuePath, found: String },

    /// `set` was called on a node whose content is not a mapping.
    #[error("Node content at {path} is a {found}, not a mapping")]
    NotAMapping {
        path: ValuePath,
        found: &'static str,
    },

    /// A node refers to a location that no longer exists in the document.
    #[error("No value at {path}; the document changed after the tree was built")]
    DanglingPath { path: ValuePath },

    /// Strict deep assignment could not find the key.
    #[error("Key '{key}' not found below {path}")]
    KeyNotFound { key: String, path: ValuePath },

    /// Document nesting exceeds the configured limit.
    #[error("Tree nesting too deep (max depth: {max_depth}) at path: {path}")]
    NestingTooDeep { max_depth: usize, path: ValuePath },

    /// Path text could not be parsed.
    #[error("Invalid path '{text}': {reason}")]
    InvalidPath { text: String, reason: String },

    /// Parsing, emitting or loading the underlying document failed.
    #[error(transparent)]
    Document(#[from] yamlnode_document::Error),
}
