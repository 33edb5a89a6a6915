//! Property-based tests for ignore rules

use proptest::prelude::*;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use twiggy::config::TwiggyConfig;
use twiggy::ignore::{IgnoreMatcher, RuleSource};
use twiggy::snapshot::SnapshotGenerator;

const EXCLUDED_DIRS: &[&str] = &["node_modules", "__pycache__", "target", ".git", "dist"];

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,5}q"
}

proptest! {
    /// A default-excluded directory name hides everything below it,
    /// wherever it appears in the path.
    #[test]
    fn test_default_dir_hides_descendants(
        prefix in prop::collection::vec(segment(), 0..3),
        excluded in prop::sample::select(EXCLUDED_DIRS),
        suffix in prop::collection::vec(segment(), 0..3),
        is_dir in any::<bool>(),
    ) {
        let matcher = IgnoreMatcher::with_defaults();
        let mut segments = prefix.clone();
        segments.push(excluded.to_string());
        prop_assert!(matcher.is_ignored_str(&segments.join("/"), true));

        segments.extend(suffix);
        prop_assert!(matcher.is_ignored_str(&segments.join("/"), is_dir));

        if !prefix.is_empty() {
            prop_assert!(!matcher.is_ignored_str(&prefix.join("/"), true));
        }
    }

    /// A slash pattern only matches at the root, never deeper.
    #[test]
    fn test_path_pattern_is_anchored(
        first in segment(),
        second in segment(),
        parent in segment(),
    ) {
        prop_assume!(parent != first);
        let mut matcher = IgnoreMatcher::new();
        let pattern = format!("{}/{}", first, second);
        matcher.add_pattern(&pattern, RuleSource::User);

        prop_assert!(matcher.is_ignored_str(&pattern, true));
        let leaf = format!("{}/leaf.txt", pattern);
        let nested = format!("{}/{}", parent, pattern);
        prop_assert!(matcher.is_ignored_str(&leaf, false));
        prop_assert!(!matcher.is_ignored_str(&nested, true));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Scans never list anything under an excluded directory.
    #[test]
    fn test_scan_omits_excluded(
        kept in prop::collection::vec(segment(), 1..4),
        excluded in prop::sample::select(EXCLUDED_DIRS),
    ) {
        let temp = TempDir::new().unwrap();
        let kept_dir = temp.path().join(kept.join("/"));
        fs::create_dir_all(kept_dir.join(excluded).join("inner")).unwrap();
        fs::write(kept_dir.join("visible.txt"), "").unwrap();
        fs::write(kept_dir.join(excluded).join("inner/hidden.txt"), "").unwrap();

        let snapshot = SnapshotGenerator::new(
            temp.path().to_path_buf(),
            Arc::new(TwiggyConfig::default()),
        )
        .build()
        .unwrap();
        let paths = snapshot.scan.root.paths();

        let visible = format!("{}/visible.txt", kept.join("/"));
        prop_assert!(paths.contains(&visible));
        prop_assert!(!paths.iter().any(|p| p.contains("hidden.txt")));
        prop_assert!(!paths.iter().any(|p| p.split('/').any(|s| s == excluded)));
    }
}
