//! Core types for treebeard.
//!
//! This crate provides the tree node and identifier types, walk
//! configuration, and the two assemblers that turn a flat, parent-tagged
//! node list into a nested tree.

mod config;
mod error;
mod node;
mod tree;

pub use config::{AssemblyMode, WalkConfig, WalkConfigBuilder};
pub use error::{IdParseError, ScanError, TreeError};
pub use node::{ID_PREFIX, Node, NodeId, ParentId, ROOT_PARENT};
pub use tree::{WalkStats, assemble};
