//! Integration tests for ignore rules

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use twiggy::config::TwiggyConfig;
use twiggy::ignore::{IgnoreMatcher, RuleSource};
use twiggy::snapshot::SnapshotGenerator;

use crate::integration::test_utils::write_tree;

fn scanned_paths(
    root: &std::path::Path,
    config: TwiggyConfig,
) -> std::collections::BTreeSet<String> {
    SnapshotGenerator::new(root.to_path_buf(), Arc::new(config))
        .build()
        .unwrap()
        .scan
        .root
        .paths()
}

#[test]
fn test_gitignore_sync_toggle() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["app.log", "keep.txt", "generated/out.js"]);
    fs::write(
        temp.path().join(".gitignore"),
        "# build output\n*.log\ngenerated/\n!important.log\n",
    )
    .unwrap();

    let paths = scanned_paths(temp.path(), TwiggyConfig::default());
    assert!(paths.contains("keep.txt"));
    assert!(!paths.contains("app.log"));
    assert!(!paths.contains("generated/"));

    let paths = scanned_paths(
        temp.path(),
        TwiggyConfig {
            sync_gitignore: false,
            ..Default::default()
        },
    );
    assert!(paths.contains("app.log"));
    assert!(paths.contains("generated/out.js"));
}

#[test]
fn test_user_patterns_segment_and_path() {
    let temp = TempDir::new().unwrap();
    write_tree(
        temp.path(),
        &["temp/a.txt", "src/temp/b.txt", "src/old-stuff/c.txt", "src/new/d.txt"],
    );
    let config = TwiggyConfig {
        ignore_patterns: vec!["temp".to_string(), "src/old-stuff".to_string()],
        ..Default::default()
    };

    let paths = scanned_paths(temp.path(), config);
    assert!(!paths.contains("temp/"));
    assert!(!paths.contains("src/temp/"));
    assert!(!paths.contains("src/old-stuff/"));
    assert!(paths.contains("src/new/d.txt"));
}

#[test]
fn test_directory_only_pattern_keeps_files() {
    let mut matcher = IgnoreMatcher::new();
    matcher.add_pattern("cache/", RuleSource::User);
    assert!(matcher.is_ignored_str("cache", true));
    assert!(matcher.is_ignored_str("cache/entry.bin", false));
    assert!(!matcher.is_ignored_str("cache", false));
}

#[test]
fn test_output_file_never_listed() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["docs/structure.md", "docs/guide.md"]);
    let config = TwiggyConfig {
        output_path: "docs/structure.md".into(),
        ..Default::default()
    };

    let paths = scanned_paths(temp.path(), config);
    assert!(paths.contains("docs/guide.md"));
    assert!(!paths.contains("docs/structure.md"));
}

#[test]
fn test_hidden_files_opt_in() {
    let temp = TempDir::new().unwrap();
    write_tree(
        temp.path(),
        &[".eslintrc", ".env", ".config/settings.json", "visible.txt"],
    );

    let paths = scanned_paths(temp.path(), TwiggyConfig::default());
    assert!(!paths.contains(".eslintrc"));
    assert!(paths.contains(".config/settings.json"));
    assert!(paths.contains("visible.txt"));

    let paths = scanned_paths(
        temp.path(),
        TwiggyConfig {
            include_hidden_files: true,
            ..Default::default()
        },
    );
    assert!(paths.contains(".eslintrc"));
    assert!(!paths.contains(".env"), "built-in exclusions still apply");
}
