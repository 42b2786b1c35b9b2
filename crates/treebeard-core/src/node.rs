//! Tree node and identifier types.

use std::fmt;
use std::str::FromStr;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::error::IdParseError;

/// Prefix used when rendering node identifiers as text.
pub const ID_PREFIX: &str = "treebeard";

/// Label used for the parent of the root node.
pub const ROOT_PARENT: &str = "#";

/// Unique identifier for a node within one walk.
///
/// The wrapped value is the 0-based visitation index of the entry. It is
/// rendered as `treebeard_<index>` at the serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new NodeId from a visitation index.
    pub fn new(index: u64) -> Self {
        Self(index)
    }

    /// The visitation index this id was derived from.
    pub fn index(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}_{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(ID_PREFIX)
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|index| index.parse().ok())
            .map(Self)
            .ok_or_else(|| IdParseError::new(s))
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for NodeId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reference from a node to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ParentId {
    /// The node is the root of the walk and has no parent.
    Root,
    /// The node is a descendant of the node with this id.
    Node(NodeId),
}

impl ParentId {
    /// Check if this is the root sentinel.
    pub fn is_root(&self) -> bool {
        matches!(self, ParentId::Root)
    }

    /// Get the parent id, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            ParentId::Root => None,
            ParentId::Node(id) => Some(*id),
        }
    }

    /// Check if this refers to the given node.
    pub fn is(&self, id: NodeId) -> bool {
        *self == ParentId::Node(id)
    }
}

impl From<NodeId> for ParentId {
    fn from(id: NodeId) -> Self {
        ParentId::Node(id)
    }
}

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentId::Root => f.write_str(ROOT_PARENT),
            ParentId::Node(id) => id.fmt(f),
        }
    }
}

impl FromStr for ParentId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ROOT_PARENT {
            Ok(ParentId::Root)
        } else {
            s.parse().map(ParentId::Node)
        }
    }
}

impl From<ParentId> for String {
    fn from(id: ParentId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ParentId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single file or directory in the output tree.
///
/// The serialized field names follow the shape expected by tree-view widgets:
/// `name`, `toggled`, `active`, `path`, `isdir` and `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Synthetic identifier assigned during the walk.
    pub id: NodeId,

    /// Identifier of the containing directory's node.
    #[serde(rename = "parent")]
    pub parent_id: ParentId,

    /// File/directory name (not full path).
    pub name: CompactString,

    /// Expanded by default. Only set on the root.
    #[serde(default, skip_serializing_if = "is_false")]
    pub toggled: bool,

    /// Selection state, owned by the consumer.
    #[serde(default)]
    pub active: bool,

    /// Path segments from the walk root to this entry. Empty for the root.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<CompactString>,

    /// Whether the entry is a directory. Not recorded for the root.
    #[serde(rename = "isdir", default, skip_serializing_if = "is_false")]
    pub is_dir: bool,

    /// Child nodes, in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create the root node of a walk.
    pub fn new_root(id: NodeId, name: impl Into<CompactString>) -> Self {
        Self {
            id,
            parent_id: ParentId::Root,
            name: name.into(),
            toggled: true,
            active: false,
            path: Vec::new(),
            is_dir: false,
            children: Vec::new(),
        }
    }

    /// Create a descendant node.
    pub fn new_entry(
        id: NodeId,
        parent_id: impl Into<ParentId>,
        name: impl Into<CompactString>,
        path: Vec<CompactString>,
        is_dir: bool,
    ) -> Self {
        Self {
            id,
            parent_id: parent_id.into(),
            name: name.into(),
            toggled: false,
            active: false,
            path,
            is_dir,
            children: Vec::new(),
        }
    }

    /// Check if this node is a root (has no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_root()
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Total number of descendants, excluding this node.
    pub fn size(&self) -> usize {
        self.children.len() + self.children.iter().map(Node::size).sum::<usize>()
    }

    /// Find a node by id in this subtree (depth-first).
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}
