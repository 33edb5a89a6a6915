//! Filesystem notifications reduced to structural changes.

use crate::ignore::IgnoreMatcher;
use crate::tree::NodeKind;
use crate::tree::path::relative_slash_path;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use std::fs;
use std::path::{Path, PathBuf};

/// Dot-files that are real project files rather than editor scratch.
const KEPT_DOT_FILES: &[&str] = &[".gitignore", ".env", ".env.local"];

const TEMP_SUFFIXES: &[&str] = &[".tmp", ".temp", "~", ".swp", ".swo"];

/// A change that can alter the directory structure
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Created(PathBuf),
    Removed(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
    /// One side of a rename whose other side is unknown
    Moved(PathBuf),
    /// Ambiguous modification of a directory
    DirectoryChanged(PathBuf),
}

impl ChangeEvent {
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            ChangeEvent::Created(p)
            | ChangeEvent::Removed(p)
            | ChangeEvent::Moved(p)
            | ChangeEvent::DirectoryChanged(p) => vec![p.as_path()],
            ChangeEvent::Renamed { from, to } => vec![from.as_path(), to.as_path()],
        }
    }
}

/// Convert a notify event. File content and metadata changes return `None`:
/// they never change the structure.
pub fn convert_event(event: &Event) -> Option<ChangeEvent> {
    let first = event.paths.first()?.clone();
    match event.kind {
        EventKind::Create(_) => Some(ChangeEvent::Created(first)),
        EventKind::Remove(_) => Some(ChangeEvent::Removed(first)),
        EventKind::Modify(ModifyKind::Name(mode)) => match (mode, event.paths.get(1)) {
            (_, Some(to)) => Some(ChangeEvent::Renamed {
                from: first,
                to: to.clone(),
            }),
            (RenameMode::From, None) => Some(ChangeEvent::Removed(first)),
            (RenameMode::To, None) => Some(ChangeEvent::Created(first)),
            (_, None) => Some(ChangeEvent::Moved(first)),
        },
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Metadata(_)) => {
            None
        }
        EventKind::Modify(_) if first.is_dir() => Some(ChangeEvent::DirectoryChanged(first)),
        _ => None,
    }
}

/// Editor swap files, backups, and other scratch files.
pub fn is_temporary_file(name: &str) -> bool {
    TEMP_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Dot-files the scanner leaves out unless hidden files are listed.
/// Dot-directories are always scanned.
fn is_hidden_file(name: &str, kind: Option<NodeKind>) -> bool {
    name.starts_with('.') && kind == Some(NodeKind::File) && !KEPT_DOT_FILES.contains(&name)
}

/// Kind of an existing path as the scanner sees it: links take their
/// target's kind. `None` once the path is gone.
fn entry_kind(path: &Path) -> Option<NodeKind> {
    let meta = fs::symlink_metadata(path).ok()?;
    let is_dir = if meta.file_type().is_symlink() {
        fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    } else {
        meta.is_dir()
    };
    Some(if is_dir {
        NodeKind::Directory
    } else {
        NodeKind::File
    })
}

/// Decides which changes should trigger a rescan
pub struct EventFilter {
    root: PathBuf,
    output_path: PathBuf,
    matcher: IgnoreMatcher,
    include_hidden_files: bool,
}

impl EventFilter {
    pub fn new(
        root: PathBuf,
        output_path: PathBuf,
        matcher: IgnoreMatcher,
        include_hidden_files: bool,
    ) -> Self {
        Self {
            root,
            output_path,
            matcher,
            include_hidden_files,
        }
    }

    /// Replace the ignore rules, e.g. after `.gitignore` changed.
    pub fn set_matcher(&mut self, matcher: IgnoreMatcher) {
        self.matcher = matcher;
    }

    /// A rename is relevant when either side is.
    pub fn accepts(&self, event: &ChangeEvent) -> bool {
        event.paths().into_iter().any(|p| self.accepts_path(p))
    }

    fn accepts_path(&self, path: &Path) -> bool {
        if path == self.output_path {
            return false;
        }
        let relative = match relative_slash_path(&self.root, path) {
            Some(relative) if !relative.is_empty() => relative,
            _ => return false,
        };
        let name = relative.rsplit('/').next().unwrap_or(relative.as_str());
        if is_temporary_file(name) {
            return false;
        }
        // A removed entry's kind is unknown; it may have been listed.
        let kind = entry_kind(path);
        if !self.include_hidden_files && is_hidden_file(name, kind) {
            return false;
        }
        !self
            .matcher
            .is_ignored_str(&relative, kind == Some(NodeKind::Directory))
    }
}
