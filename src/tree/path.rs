//! Path canonicalization and normalization utilities

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a workspace root. `dunce` keeps Windows paths free of the
/// `\\?\` prefix so relative paths and display stay readable.
pub fn canonical_root(path: &Path) -> std::io::Result<PathBuf> {
    dunce::canonicalize(path)
}

/// Entry name as an NFC-normalized string (lossy for non-UTF-8 names), so the
/// same tree renders identically on every platform.
pub fn normalize_name(name: &OsStr) -> String {
    name.to_string_lossy().nfc().collect()
}

/// Normalize a `/`-separated path string without filesystem access:
/// NFC, backslashes to slashes, trailing slashes removed (except root).
pub fn normalize_path_string(path: &str) -> String {
    let mut result: String = path.nfc().map(|c| if c == '\\' { '/' } else { c }).collect();

    if result.len() > 1 {
        while result.len() > 1 && result.ends_with('/') {
            result.pop();
        }
    }

    result
}

/// Path of `path` relative to `root`, `/`-separated and NFC-normalized.
/// Returns `None` when `path` is not under `root`; the root itself is `""`.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => segments.push(normalize_name(name)),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(segments.join("/"))
}

/// Display name of a root directory: its last component, or the full path
/// for filesystem roots.
pub fn root_name(root: &Path) -> String {
    match root.file_name() {
        Some(name) => normalize_name(name),
        None => normalize_path_string(&root.to_string_lossy()),
    }
}
