//! Filesystem walker that builds the directory tree

use crate::error::TwiggyError;
use crate::ignore::IgnoreMatcher;
use crate::tree::node::{NodeKind, TreeNode};
use crate::tree::path::{normalize_name, relative_slash_path, root_name};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Filesystem walker configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false, links are leaves)
    pub follow_symlinks: bool,
    /// List files whose name starts with a dot
    pub include_hidden_files: bool,
    /// Maximum depth to traverse (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Why an entry was left out of, or truncated in, the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    PermissionDenied,
    BrokenSymlink,
    SymlinkLoop,
    Unreadable,
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoteKind::PermissionDenied => "permission denied",
            NoteKind::BrokenSymlink => "broken symlink",
            NoteKind::SymlinkLoop => "symlink loop",
            NoteKind::Unreadable => "unreadable",
        };
        f.write_str(s)
    }
}

/// A per-entry problem recovered during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanNote {
    /// Root-relative, `/`-separated path
    pub path: String,
    pub kind: NoteKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub directories: usize,
    pub files: usize,
}

/// Result of one scan
#[derive(Debug, Clone)]
pub struct Scan {
    pub root: TreeNode,
    pub notes: Vec<ScanNote>,
    pub stats: ScanStats,
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root and build the tree. Ignored directories are pruned
    /// before they are read. Per-entry failures become notes; only an
    /// unreadable root is an error.
    pub fn scan(&self, matcher: &IgnoreMatcher) -> Result<Scan, TwiggyError> {
        self.check_root()?;

        let mut stack: Vec<TreeNode> = vec![TreeNode::directory(root_name(&self.root))];
        let mut notes = Vec::new();
        let mut stats = ScanStats::default();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry, matcher));

        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    if err.depth() == 0 && err.path() == Some(self.root.as_path()) {
                        return Err(TwiggyError::RootUnreadable {
                            path: self.root.clone(),
                            message: err.to_string(),
                        });
                    }
                    if let Some(note) = self.note_for_error(&err, matcher) {
                        warn!(path = %note.path, kind = %note.kind, "{}", note.message);
                        notes.push(note);
                    }
                    continue;
                }
            };

            let depth = entry.depth();
            if depth == 0 {
                continue;
            }

            while stack.len() > depth {
                attach_top(&mut stack);
            }

            let name = normalize_name(entry.file_name());
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                // Only reached when links are not followed: the link is a leaf.
                match fs::metadata(entry.path()) {
                    Ok(target) if target.is_dir() => {
                        stats.directories += 1;
                        push_leaf(&mut stack, TreeNode::directory(name));
                    }
                    Ok(_) => {
                        stats.files += 1;
                        push_leaf(&mut stack, TreeNode::file(name));
                    }
                    Err(e) => {
                        let note = ScanNote {
                            path: self.relative(entry.path()),
                            kind: NoteKind::BrokenSymlink,
                            message: format!("Skipping broken symlink: {}", e),
                        };
                        warn!(path = %note.path, kind = %note.kind, "{}", note.message);
                        notes.push(note);
                    }
                }
            } else if file_type.is_dir() {
                stats.directories += 1;
                stack.push(TreeNode::directory(name));
            } else {
                stats.files += 1;
                push_leaf(&mut stack, TreeNode::file(name));
            }
        }

        while stack.len() > 1 {
            attach_top(&mut stack);
        }
        let mut root = stack
            .pop()
            .unwrap_or_else(|| TreeNode::directory(root_name(&self.root)));
        root.sort_children();

        debug!(
            root = %self.root.display(),
            directories = stats.directories,
            files = stats.files,
            notes = notes.len(),
            "Scan complete"
        );

        Ok(Scan { root, notes, stats })
    }

    fn check_root(&self) -> Result<(), TwiggyError> {
        let unreadable = |message: String| TwiggyError::RootUnreadable {
            path: self.root.clone(),
            message,
        };
        let metadata = fs::metadata(&self.root).map_err(|e| unreadable(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(unreadable("not a directory".to_string()));
        }
        fs::read_dir(&self.root).map_err(|e| unreadable(e.to_string()))?;
        Ok(())
    }

    fn relative(&self, path: &Path) -> String {
        relative_slash_path(&self.root, path)
            .unwrap_or_else(|| path.to_string_lossy().into_owned())
    }

    /// Entry kind as it appears in the tree. Unfollowed links take the kind
    /// of their target; broken links count as files.
    fn entry_kind(entry: &DirEntry) -> NodeKind {
        let file_type = entry.file_type();
        let is_dir = if file_type.is_symlink() {
            fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false)
        } else {
            file_type.is_dir()
        };
        if is_dir {
            NodeKind::Directory
        } else {
            NodeKind::File
        }
    }

    fn is_excluded(&self, entry: &DirEntry, matcher: &IgnoreMatcher) -> bool {
        let kind = Self::entry_kind(entry);
        if !self.config.include_hidden_files
            && kind == NodeKind::File
            && entry.file_name().to_string_lossy().starts_with('.')
        {
            return true;
        }
        match relative_slash_path(&self.root, entry.path()) {
            Some(relative) => matcher.is_ignored_str(&relative, kind.is_dir()),
            None => false,
        }
    }

    fn note_for_error(&self, err: &walkdir::Error, matcher: &IgnoreMatcher) -> Option<ScanNote> {
        let path = err.path()?;
        let relative = self.relative(path);

        let is_symlink = fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        let hidden = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(false);
        if matcher.is_ignored_str(&relative, false)
            || (hidden && !self.config.include_hidden_files && is_symlink)
        {
            return None;
        }

        let (kind, message) = if let Some(ancestor) = err.loop_ancestor() {
            (
                NoteKind::SymlinkLoop,
                format!(
                    "Skipping symlink loop back to {}",
                    self.relative(ancestor)
                ),
            )
        } else {
            match err.io_error().map(|e| e.kind()) {
                Some(ErrorKind::PermissionDenied) => (
                    NoteKind::PermissionDenied,
                    "Permission denied, listed without contents".to_string(),
                ),
                Some(ErrorKind::NotFound) if is_symlink => (
                    NoteKind::BrokenSymlink,
                    format!("Skipping broken symlink: {}", err),
                ),
                _ => (NoteKind::Unreadable, format!("Could not read entry: {}", err)),
            }
        };

        Some(ScanNote {
            path: relative,
            kind,
            message,
        })
    }
}

fn push_leaf(stack: &mut [TreeNode], node: TreeNode) {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(node);
    }
}

fn attach_top(stack: &mut Vec<TreeNode>) {
    if let Some(node) = stack.pop() {
        push_leaf(stack, node);
    }
}
