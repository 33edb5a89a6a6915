//! Property-based tests for determinism guarantees

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use twiggy::config::TwiggyConfig;
use twiggy::ignore::IgnoreMatcher;
use twiggy::render::{self, document, xml, OutputFormat};
use twiggy::snapshot::SnapshotGenerator;
use twiggy::tree::TreeNode;

/// Relative file paths. Names mix markup metacharacters and control
/// characters; only leaves contain a `.`, so a leaf can never collide with a
/// directory of the same name.
fn file_paths() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (
            prop::collection::vec("[a-z &\\n]{1,5}", 0..3),
            "[a-zA-Z0-9 &<>\"'\\t\\r\\n-]{1,6}\\.txt",
        ),
        1..12,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(mut dirs, file)| {
                dirs.push(file);
                dirs.join("/")
            })
            .collect()
    })
}

fn insert_path(root: &mut TreeNode, path: &str) {
    let segments: Vec<&str> = path.split('/').collect();
    let mut current = root;
    for (i, segment) in segments.iter().enumerate() {
        let is_file = i + 1 == segments.len();
        let index = match current.children.iter().position(|c| c.name == *segment) {
            Some(index) => index,
            None => {
                let node = if is_file {
                    TreeNode::file(*segment)
                } else {
                    TreeNode::directory(*segment)
                };
                current.push_child(node);
                current.children.len() - 1
            }
        };
        current = &mut current.children[index];
    }
}

fn materialize(root: &Path, paths: &[String]) {
    for path in paths {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, "").unwrap();
    }
}

proptest! {
    /// Insertion order never changes the rendered output.
    #[test]
    fn test_render_independent_of_insertion_order(paths in file_paths()) {
        let mut forward = TreeNode::directory("proj");
        for path in &paths {
            insert_path(&mut forward, path);
        }
        let mut backward = TreeNode::directory("proj");
        for path in paths.iter().rev() {
            insert_path(&mut backward, path);
        }
        forward.sort_children();
        backward.sort_children();

        for format in [OutputFormat::Xml, OutputFormat::Tree] {
            prop_assert_eq!(render::render(&forward, format), render::render(&backward, format));
        }
    }

    /// Markup parses back to exactly the tree's paths.
    #[test]
    fn test_markup_round_trips(paths in file_paths()) {
        let mut root = TreeNode::directory("proj");
        for path in &paths {
            insert_path(&mut root, path);
        }
        root.sort_children();

        let parsed = xml::parse_paths(&xml::render(&root)).unwrap();
        prop_assert_eq!(parsed, root.paths());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Scanning an unchanged tree twice yields byte-identical documents whose
    /// markup lists exactly the scanned paths, including every file written.
    #[test]
    fn test_scan_is_deterministic(paths in file_paths()) {
        let temp = TempDir::new().unwrap();
        materialize(temp.path(), &paths);

        let generator = SnapshotGenerator::new(
            temp.path().to_path_buf(),
            Arc::new(TwiggyConfig {
                sync_gitignore: false,
                ..Default::default()
            }),
        );
        let matcher = IgnoreMatcher::new();
        let first = generator.build_with(&matcher).unwrap();
        let second = generator.build_with(&matcher).unwrap();
        prop_assert_eq!(&first.document, &second.document);

        let listed = first.scan.root.paths();
        let body = document::extract_body(&first.document).unwrap();
        prop_assert_eq!(&xml::parse_paths(body).unwrap(), &listed);
        let expected: BTreeSet<String> = paths.iter().cloned().collect();
        prop_assert!(expected.is_subset(&listed));
    }
}
