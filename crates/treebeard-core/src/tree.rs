//! Tree assembly and walk statistics.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::node::{Node, NodeId, ParentId};

/// Summary statistics for a walk. The root itself is not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Total number of files.
    pub total_files: u64,
    /// Total number of directories.
    pub total_dirs: u64,
    /// Total number of symbolic links.
    pub total_symlinks: u64,
    /// Entries that are none of the above (sockets, devices, ...).
    pub total_other: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
}

impl WalkStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file.
    pub fn record_file(&mut self, depth: u32) {
        self.total_files += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a symlink.
    pub fn record_symlink(&mut self, depth: u32) {
        self.total_symlinks += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record any other entry type.
    pub fn record_other(&mut self, depth: u32) {
        self.total_other += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Total entries recorded.
    pub fn total_entries(&self) -> u64 {
        self.total_files + self.total_dirs + self.total_symlinks + self.total_other
    }
}

impl Node {
    /// Insert `nodes` into this tree, one at a time, in order.
    ///
    /// Each node goes under the first node (depth-first, children in order)
    /// whose id matches its parent id. A node whose parent is not in the tree
    /// at the moment it is processed is dropped and never retried.
    ///
    /// Returns `true` if every node was inserted.
    pub fn attach(&mut self, nodes: impl IntoIterator<Item = Node>) -> bool {
        let before = self.size();
        let mut offered = 0;
        for node in nodes {
            offered += 1;
            // Dropped on Err.
            let _ = self.try_insert(node);
        }
        self.size() == before + offered
    }

    /// Insert a single node under its parent, handing it back if the parent
    /// is not in this subtree.
    pub fn try_insert(&mut self, node: Node) -> Result<(), Node> {
        if node.parent_id.is(self.id) {
            self.children.push(node);
            return Ok(());
        }

        let mut node = node;
        for child in &mut self.children {
            match child.try_insert(node) {
                Ok(()) => return Ok(()),
                Err(rejected) => node = rejected,
            }
        }
        Err(node)
    }
}

/// Build a tree from a root and its flat descendants using an id index.
///
/// `nodes` must be ordered parent-before-child: every node's parent is
/// either `root` or a node earlier in the sequence. Children keep input
/// order. Unlike [`Node::attach`], a node with an unknown parent is an error.
pub fn assemble(mut root: Node, nodes: impl IntoIterator<Item = Node>) -> Result<Node, TreeError> {
    let mut known: HashSet<NodeId> = HashSet::from([root.id]);
    let mut children_by_parent: HashMap<NodeId, Vec<Node>> = HashMap::new();

    for node in nodes {
        let parent = match node.parent_id {
            ParentId::Node(id) if known.contains(&id) => id,
            parent => {
                return Err(TreeError::UnknownParent {
                    node: node.id,
                    parent,
                });
            }
        };
        if !known.insert(node.id) {
            return Err(TreeError::DuplicateId { id: node.id });
        }
        children_by_parent.entry(parent).or_default().push(node);
    }

    link_children(&mut root, &mut children_by_parent);
    Ok(root)
}

fn link_children(node: &mut Node, children_by_parent: &mut HashMap<NodeId, Vec<Node>>) {
    let mut children = children_by_parent.remove(&node.id).unwrap_or_default();
    for child in &mut children {
        link_children(child, children_by_parent);
    }
    node.children.extend(children);
}
