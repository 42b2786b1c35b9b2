//! Directory walking and tree building for treebeard.
//!
//! This crate walks a directory once, in sorted pre-order, tagging every
//! entry with a positional id and the id of its parent directory. The flat
//! result is then assembled into a nested [`Node`] tree ready to be
//! serialized for a tree-view widget.
//!
//! # Example
//!
//! ```rust,no_run
//! use treebeard_scan::build_tree;
//!
//! let root = build_tree("/path/to/dir").unwrap();
//!
//! println!("{} has {} descendants", root.name, root.size());
//! println!("{}", serde_json::to_string(&root).unwrap());
//! ```
//!
//! # Flat walks
//!
//! The walk and the assembly can be run separately:
//!
//! ```rust,no_run
//! use treebeard_scan::DirWalker;
//!
//! let walk = DirWalker::new("/path/to/dir").walk().unwrap();
//! let mut root = walk.root;
//! let complete = root.attach(walk.nodes);
//! assert!(complete);
//! ```

mod walker;

use std::path::Path;

pub use walker::{DirWalker, FlatWalk, WalkFailure, walk};

// Re-export core types for convenience
pub use treebeard_core::{
    AssemblyMode, IdParseError, Node, NodeId, ParentId, ScanError, TreeError, WalkConfig,
    WalkStats, assemble,
};

/// Walk `root` and assemble the result into a tree.
///
/// A walk error is returned unchanged and no tree is built. Nodes the
/// assembler cannot place are dropped without an error.
pub fn build_tree(root: impl AsRef<Path>) -> Result<Node, ScanError> {
    build_tree_with_config(&WalkConfig::new(root.as_ref()))
}

/// Walk and assemble using an explicit config.
///
/// With [`AssemblyMode::Indexed`] a node whose parent cannot be resolved is
/// reported as [`ScanError::Tree`] instead of being dropped.
pub fn build_tree_with_config(config: &WalkConfig) -> Result<Node, ScanError> {
    let walk = DirWalker::with_config(config.clone())
        .walk()
        .map_err(|failure| failure.error)?;

    Ok(walk.into_tree(config.assembly)?)
}
