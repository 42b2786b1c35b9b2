//! Error types for walking and assembling trees.

use std::path::PathBuf;

use thiserror::Error;

use crate::node::{NodeId, ParentId};

/// Errors that can occur while walking a directory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Traversal failure that did not carry an I/O error.
    #[error("Traversal error at {path}: {message}")]
    Traversal { path: PathBuf, message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Tree assembly failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors reported by the indexed assembler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A node references a parent that is not the root or an earlier node.
    #[error("Node {node} references unknown parent {parent}")]
    UnknownParent { node: NodeId, parent: ParentId },

    /// The same id appears more than once.
    #[error("Duplicate node id {id}")]
    DuplicateId { id: NodeId },
}

/// A node label that is neither `treebeard_<index>` nor `#`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid node id: {value:?}")]
pub struct IdParseError {
    /// The rejected label.
    pub value: String,
}

impl IdParseError {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}
