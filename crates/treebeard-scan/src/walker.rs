//! Ordered single-pass directory walker.

use std::path::{Component, Path, PathBuf};

use compact_str::CompactString;
use indexmap::IndexMap;
use jwalk::{Parallelism, WalkDir};
use thiserror::Error;

use treebeard_core::{
    AssemblyMode, Node, NodeId, ScanError, TreeError, WalkConfig, WalkStats, assemble,
};

/// Root node and flat descendant list produced by a successful walk.
#[derive(Debug, Clone)]
pub struct FlatWalk {
    /// The walk root. Its children are empty.
    pub root: Node,
    /// Every other entry, in visitation order.
    pub nodes: Vec<Node>,
    /// Entry counts gathered during the walk.
    pub stats: WalkStats,
}

impl FlatWalk {
    /// Number of visited entries, including the root.
    pub fn entry_count(&self) -> usize {
        self.nodes.len() + 1
    }

    /// Assemble the flat list into the root.
    ///
    /// [`AssemblyMode::Sequential`] never fails; entries it cannot place are
    /// dropped and logged. [`AssemblyMode::Indexed`] reports them instead.
    pub fn into_tree(self, mode: AssemblyMode) -> Result<Node, TreeError> {
        let FlatWalk {
            mut root, nodes, ..
        } = self;

        match mode {
            AssemblyMode::Sequential => {
                let expected = nodes.len();
                if !root.attach(nodes) {
                    tracing::warn!(
                        root = %root.name,
                        expected,
                        attached = root.size(),
                        "some entries could not be attached to the tree"
                    );
                }
                Ok(root)
            }
            AssemblyMode::Indexed => assemble(root, nodes),
        }
    }
}

/// A walk that stopped at its first traversal error.
///
/// Carries whatever was collected before the error. Callers treat the walk
/// as failed and normally discard the partial results.
#[derive(Debug, Error)]
#[error("Walk stopped after {} entries: {error}", .nodes.len())]
pub struct WalkFailure {
    /// The root, if it was visited before the error.
    pub root: Option<Node>,
    /// Entries collected before the error.
    pub nodes: Vec<Node>,
    /// The error that stopped the walk.
    #[source]
    pub error: ScanError,
}

impl WalkFailure {
    fn new(error: ScanError) -> Self {
        Self {
            root: None,
            nodes: Vec::new(),
            error,
        }
    }
}

/// Walker that assigns every entry a positional id.
///
/// Traversal contract: jwalk runs serially with sorted directory reads, so
/// the root is yielded first and entries follow in lexicographic pre-order.
/// Every directory is visited before any of its contents, which is what lets
/// each entry resolve its parent's id from the entries already seen.
///
/// Node paths are the components of the path as given, without the leading
/// `/` or drive prefix. An absolute root therefore yields `["tmp", "R", ..]`
/// rather than a list starting with an empty segment.
pub struct DirWalker {
    config: WalkConfig,
}

impl DirWalker {
    /// Create a walker with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(WalkConfig::new(root))
    }

    /// Create a walker from a config.
    pub fn with_config(config: WalkConfig) -> Self {
        Self { config }
    }

    /// Walk the root directory.
    pub fn walk(&self) -> Result<FlatWalk, WalkFailure> {
        let root_path = self.config.root.as_path();

        let metadata = std::fs::metadata(root_path)
            .map_err(|e| WalkFailure::new(ScanError::io(root_path, e)))?;
        if !metadata.is_dir() {
            return Err(WalkFailure::new(ScanError::NotADirectory {
                path: root_path.to_path_buf(),
            }));
        }

        let walker = WalkDir::new(root_path)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(self.config.follow_symlinks)
            .min_depth(0);

        // Relative path -> visitation index. First seen wins.
        let mut indices: IndexMap<PathBuf, u64> = IndexMap::new();
        let mut root: Option<Node> = None;
        let mut nodes: Vec<Node> = Vec::new();
        let mut stats = WalkStats::new();
        let mut idx: u64 = 0;

        for entry_result in walker {
            let mut entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    return Err(WalkFailure {
                        root,
                        nodes,
                        error: traversal_error(err, root_path),
                    });
                }
            };

            let path = entry.path();
            let rel = path
                .strip_prefix(root_path)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            indices.entry(rel.clone()).or_insert(idx);

            let id = NodeId::new(idx);
            if idx == 0 {
                root = Some(Node::new_root(id, root_name(root_path)));
            } else {
                let parent_rel = rel.parent().unwrap_or(Path::new(""));
                match indices.get(parent_rel) {
                    Some(&parent) => {
                        let file_type = entry.file_type();
                        let depth = u32::try_from(entry.depth()).unwrap_or(u32::MAX);
                        if file_type.is_dir() {
                            stats.record_dir(depth);
                        } else if file_type.is_file() {
                            stats.record_file(depth);
                        } else if file_type.is_symlink() {
                            stats.record_symlink(depth);
                        } else {
                            stats.record_other(depth);
                        }

                        tracing::trace!(%id, path = %path.display(), "visited entry");
                        nodes.push(Node::new_entry(
                            id,
                            NodeId::new(parent),
                            entry.file_name().to_string_lossy(),
                            path_segments(&path),
                            file_type.is_dir(),
                        ));
                    }
                    None => {
                        tracing::warn!(
                            %id,
                            path = %path.display(),
                            "parent directory not visited before entry, skipping"
                        );
                    }
                }
            }
            idx += 1;

            if let Some(err) = entry.read_children_error.take() {
                return Err(WalkFailure {
                    root,
                    nodes,
                    error: traversal_error(err, root_path),
                });
            }
        }

        let Some(root) = root else {
            return Err(WalkFailure {
                root: None,
                nodes,
                error: ScanError::Traversal {
                    path: root_path.to_path_buf(),
                    message: "root directory was not visited".to_string(),
                },
            });
        };

        tracing::debug!(
            root = %root_path.display(),
            files = stats.total_files,
            dirs = stats.total_dirs,
            symlinks = stats.total_symlinks,
            "walk complete"
        );

        Ok(FlatWalk { root, nodes, stats })
    }
}

/// Walk `root` with default settings.
pub fn walk(root: impl Into<PathBuf>) -> Result<FlatWalk, WalkFailure> {
    DirWalker::new(root).walk()
}

fn traversal_error(err: jwalk::Error, root: &Path) -> ScanError {
    let path = err.path().map(Path::to_path_buf);
    let message = err.to_string();
    scan_error(path, root, err.into_io_error(), message)
}

/// Errors without a path are reported against the walk root.
fn scan_error(
    path: Option<PathBuf>,
    root: &Path,
    source: Option<std::io::Error>,
    message: String,
) -> ScanError {
    let path = path.unwrap_or_else(|| root.to_path_buf());
    match source {
        Some(source) => ScanError::io(path, source),
        None => ScanError::Traversal { path, message },
    }
}

/// Name of the walk root: its last component, or the whole path (`/`, `.`).
fn root_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}

/// Split a path into segments. The leading `/` and drive prefix are dropped.
fn path_segments(path: &Path) -> Vec<CompactString> {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .map(|c| CompactString::new(c.as_os_str().to_string_lossy()))
        .collect()
}
