//! Integration tests for one-shot scans

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use twiggy::config::TwiggyConfig;
use twiggy::render::{document, xml, OutputFormat};
use twiggy::snapshot::SnapshotGenerator;

use crate::integration::test_utils::write_tree;

fn generator(root: &std::path::Path, config: TwiggyConfig) -> SnapshotGenerator {
    SnapshotGenerator::new(root.to_path_buf(), Arc::new(config))
}

#[test]
fn test_default_exclusions_apply() {
    let temp = TempDir::new().unwrap();
    write_tree(
        temp.path(),
        &["src/app.py", "node_modules/x.js", "__pycache__/a.pyc", "README.md"],
    );

    let snapshot = generator(temp.path(), TwiggyConfig::default()).build().unwrap();
    let paths = snapshot.scan.root.paths();
    assert!(paths.contains("src/"));
    assert!(paths.contains("src/app.py"));
    assert!(paths.contains("README.md"));
    assert!(!paths.iter().any(|p| p.starts_with("node_modules")));
    assert!(!paths.iter().any(|p| p.starts_with("__pycache__")));
    assert_eq!(snapshot.scan.stats.files, 2);
    assert_eq!(snapshot.scan.stats.directories, 1);
}

#[test]
fn test_directories_sort_before_files() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["b.txt", "A.txt", "zeta/", "alpha/inner.rs"]);

    let snapshot = generator(temp.path(), TwiggyConfig::default()).build().unwrap();
    let names: Vec<&str> = snapshot
        .scan
        .root
        .children
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["alpha", "zeta", "A.txt", "b.txt"]);
}

#[test]
fn test_document_round_trips_to_scanned_paths() {
    let temp = TempDir::new().unwrap();
    write_tree(
        temp.path(),
        &["src/lib.rs", "src/bin/main.rs", "docs/", "a & b.txt", "Cargo.toml"],
    );

    let config = TwiggyConfig {
        output_path: "structure.md".into(),
        ..Default::default()
    };
    let outcome = generator(temp.path(), config.clone()).generate().unwrap();
    let written = fs::read_to_string(&outcome.output_path).unwrap();
    let body = document::extract_body(&written).unwrap();
    let parsed = xml::parse_paths(body).unwrap();

    let rescanned = generator(temp.path(), config).build().unwrap();
    assert_eq!(parsed, rescanned.scan.root.paths());
    assert!(parsed.contains("docs/"));
    assert!(parsed.contains("a & b.txt"));
}

#[cfg(unix)]
#[test]
fn test_newline_in_file_name_round_trips() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["a\nb.txt", "ok.txt"]);

    let snapshot = generator(temp.path(), TwiggyConfig::default()).build().unwrap();
    let body = document::extract_body(&snapshot.document).unwrap();
    let parsed = xml::parse_paths(body).unwrap();
    let expected: std::collections::BTreeSet<String> =
        ["a\nb.txt".to_string(), "ok.txt".to_string()].into_iter().collect();
    assert_eq!(parsed, expected);

    let config = TwiggyConfig {
        output_format: OutputFormat::Tree,
        ..Default::default()
    };
    let tree = generator(temp.path(), config).build().unwrap();
    assert!(tree.document.contains("├── a\\nb.txt\n"));
}

#[test]
fn test_tree_format_document() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["src/main.rs", "README.md"]);
    let config = TwiggyConfig {
        output_format: OutputFormat::Tree,
        ..Default::default()
    };

    let snapshot = generator(temp.path(), config).build().unwrap();
    assert!(snapshot.document.contains("├── src/"));
    assert!(snapshot.document.contains("│   └── main.rs"));
    assert!(snapshot.document.contains("└── README.md"));
}

#[test]
fn test_max_depth_limits_scan() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["a/b/c/deep.txt", "top.txt"]);
    let config = TwiggyConfig {
        max_depth: Some(2),
        ..Default::default()
    };

    let snapshot = generator(temp.path(), config).build().unwrap();
    let paths = snapshot.scan.root.paths();
    assert!(paths.contains("a/b/"));
    assert!(!paths.contains("a/b/c/"));
}

#[test]
fn test_missing_root_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("gone");
    let err = generator(&missing, TwiggyConfig::default())
        .generate()
        .unwrap_err();
    assert!(matches!(
        err,
        twiggy::error::TwiggyError::RootUnreadable { .. }
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_noted_and_scan_continues() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["locked/secret.txt", "open/visible.txt"]);
    let locked = temp.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to observe there.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = generator(temp.path(), TwiggyConfig::default()).build();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let snapshot = result.unwrap();
    let paths = snapshot.scan.root.paths();
    assert!(paths.contains("open/visible.txt"));
    assert!(paths.contains("locked/"));
    assert!(!paths.contains("locked/secret.txt"));
    assert!(snapshot.scan.notes.iter().any(|n| n.path == "locked"));
}
