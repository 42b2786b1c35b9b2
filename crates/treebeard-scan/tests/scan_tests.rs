use std::collections::HashSet;
use std::fs;

use tempfile::TempDir;
use treebeard_scan::{
    AssemblyMode, DirWalker, Node, NodeId, ParentId, ScanError, WalkConfig, build_tree,
    build_tree_with_config, walk,
};

/// `<tmp>/R/{a.txt, b/c.txt}`
fn create_sample_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("R");

    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("b/c.txt"), "c").unwrap();

    temp
}

fn tail(node: &Node, n: usize) -> Vec<&str> {
    let start = node.path.len().saturating_sub(n);
    node.path[start..].iter().map(|s| s.as_str()).collect()
}

fn by_name<'a>(nodes: &'a [Node], name: &str) -> &'a Node {
    nodes
        .iter()
        .find(|n| n.name.as_str() == name)
        .unwrap_or_else(|| panic!("no node named {name}"))
}

#[test]
fn test_sample_walk() {
    let temp = create_sample_tree();
    let result = walk(temp.path().join("R")).unwrap();

    let root = &result.root;
    assert_eq!(root.id.to_string(), "treebeard_0");
    assert_eq!(root.parent_id.to_string(), "#");
    assert_eq!(root.name.as_str(), "R");
    assert!(root.toggled);
    assert!(root.path.is_empty());

    let a = by_name(&result.nodes, "a.txt");
    assert_eq!(a.parent_id, ParentId::Node(root.id));
    assert!(!a.is_dir);
    assert!(!a.active);
    assert_eq!(tail(a, 2), vec!["R", "a.txt"]);

    let b = by_name(&result.nodes, "b");
    assert_eq!(b.parent_id, ParentId::Node(root.id));
    assert!(b.is_dir);
    assert_eq!(tail(b, 2), vec!["R", "b"]);

    let c = by_name(&result.nodes, "c.txt");
    assert_eq!(c.parent_id, ParentId::Node(b.id));
    assert!(!c.is_dir);
    assert_eq!(tail(c, 3), vec!["R", "b", "c.txt"]);
}

#[test]
fn test_sample_build_tree() {
    let temp = create_sample_tree();
    let root = build_tree(temp.path().join("R")).unwrap();

    assert_eq!(root.child_count(), 2);
    assert_eq!(root.children[0].name.as_str(), "a.txt");
    assert_eq!(root.children[1].name.as_str(), "b");
    assert_eq!(root.children[1].child_count(), 1);
    assert_eq!(root.children[1].children[0].name.as_str(), "c.txt");
    assert_eq!(root.size(), 3);
}

#[test]
fn test_entry_count_and_unique_ids() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("x/y/z")).unwrap();
    fs::create_dir(root.join("w")).unwrap();
    fs::write(root.join("x/one"), "1").unwrap();
    fs::write(root.join("x/y/two"), "2").unwrap();
    fs::write(root.join("w/three"), "3").unwrap();
    fs::write(root.join("four"), "4").unwrap();

    // root + x, y, z, w + four files
    let result = walk(root).unwrap();
    assert_eq!(result.entry_count(), 9);
    assert_eq!(result.nodes.len(), 8);

    let ids: HashSet<NodeId> = std::iter::once(result.root.id)
        .chain(result.nodes.iter().map(|n| n.id))
        .collect();
    assert_eq!(ids.len(), 9);

    let mut tree = result.root.clone();
    assert!(tree.attach(result.nodes));
    assert_eq!(tree.size(), 8);
}

#[test]
fn test_only_directories() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("a/b/c")).unwrap();
    fs::create_dir_all(temp.path().join("d")).unwrap();

    let result = walk(temp.path()).unwrap();
    assert_eq!(result.nodes.len(), 4);
    assert!(result.nodes.iter().all(|n| n.is_dir));
    assert_eq!(result.stats.total_dirs, 4);
    assert_eq!(result.stats.total_files, 0);
}

#[test]
fn test_only_files_under_root() {
    let temp = TempDir::new().unwrap();
    for name in ["one.txt", "two.txt", "three.txt"] {
        fs::write(temp.path().join(name), name).unwrap();
    }

    let result = walk(temp.path()).unwrap();
    let root_id = result.root.id;
    assert_eq!(result.nodes.len(), 3);
    assert!(result.nodes.iter().all(|n| !n.is_dir));
    assert!(result.nodes.iter().all(|n| n.parent_id.is(root_id)));

    let names: Vec<&str> = result.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["one.txt", "three.txt", "two.txt"]);
}

#[test]
fn test_walk_is_repeatable() {
    let temp = create_sample_tree();
    let first = build_tree(temp.path().join("R")).unwrap();
    let second = build_tree(temp.path().join("R")).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_empty_directory() {
    let temp = TempDir::new().unwrap();

    let result = walk(temp.path()).unwrap();
    assert!(result.nodes.is_empty());
    assert_eq!(result.stats.total_entries(), 0);

    let root = build_tree(temp.path()).unwrap();
    assert!(root.children.is_empty());
    assert_eq!(root.size(), 0);
}

#[test]
fn test_hidden_entries_are_included() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    fs::write(temp.path().join(".git/HEAD"), "ref").unwrap();
    fs::write(temp.path().join(".env"), "KEY=1").unwrap();

    let root = build_tree(temp.path()).unwrap();
    assert_eq!(root.size(), 3);
    assert!(root.children.iter().any(|c| c.name.as_str() == ".env"));
}

#[test]
fn test_missing_root_is_error() {
    let temp = TempDir::new().unwrap();
    let err = build_tree(temp.path().join("nope")).unwrap_err();
    assert!(matches!(err, ScanError::NotFound { .. }));
}

#[test]
fn test_file_root_is_error() {
    let temp = create_sample_tree();
    let err = build_tree(temp.path().join("R/a.txt")).unwrap_err();
    assert!(matches!(err, ScanError::NotADirectory { .. }));
}

#[test]
fn test_indexed_assembly_matches_sequential() {
    let temp = create_sample_tree();
    let root_path = temp.path().join("R");

    let sequential = build_tree(&root_path).unwrap();
    let config = WalkConfig::builder()
        .root(root_path)
        .assembly(AssemblyMode::Indexed)
        .build()
        .unwrap();
    let indexed = build_tree_with_config(&config).unwrap();

    assert_eq!(sequential, indexed);
}

#[cfg(unix)]
#[test]
fn test_symlink_not_followed_by_default() {
    let temp = create_sample_tree();
    let root = temp.path().join("R");
    std::os::unix::fs::symlink(root.join("b"), root.join("link")).unwrap();

    let result = DirWalker::new(&root).walk().unwrap();
    let link = by_name(&result.nodes, "link");
    assert!(!link.is_dir);
    assert_eq!(result.stats.total_symlinks, 1);
    assert!(!result.nodes.iter().any(|n| n.parent_id.is(link.id)));
}

#[cfg(unix)]
#[test]
fn test_symlink_followed_when_configured() {
    let temp = create_sample_tree();
    let root = temp.path().join("R");
    std::os::unix::fs::symlink(root.join("b"), root.join("link")).unwrap();

    let config = WalkConfig::builder()
        .root(&root)
        .follow_symlinks(true)
        .build()
        .unwrap();
    let result = DirWalker::with_config(config).walk().unwrap();

    let link = by_name(&result.nodes, "link");
    assert!(link.is_dir);
    let inside: Vec<&Node> = result
        .nodes
        .iter()
        .filter(|n| n.parent_id.is(link.id))
        .collect();
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].name.as_str(), "c.txt");
}

#[test]
fn test_walk_failure_carries_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing");

    let failure = DirWalker::new(&missing).walk().unwrap_err();
    assert!(failure.root.is_none());
    assert!(matches!(failure.error, ScanError::NotFound { ref path } if path == &missing));
}

#[cfg(unix)]
#[test]
fn test_walk_stops_at_unreadable_directory() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let root = temp.path().join("R");
    let locked = root.join("b/locked");
    fs::create_dir_all(&locked).unwrap();
    fs::write(locked.join("x"), "x").unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("c.txt"), "c").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the directory
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let failure = walk(&root).unwrap_err();
    let tree = build_tree(&root);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(failure.error, ScanError::PermissionDenied { ref path } if path == &locked));
    assert_eq!(failure.root.as_ref().map(|r| r.name.as_str()), Some("R"));
    let names: Vec<&str> = failure.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b", "locked"]);

    let err = tree.unwrap_err();
    assert!(matches!(err, ScanError::PermissionDenied { ref path } if path == &locked));
}
