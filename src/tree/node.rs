//! In-memory directory tree produced by a scan.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Kind of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

impl NodeKind {
    pub fn is_dir(self) -> bool {
        matches!(self, NodeKind::Directory)
    }
}

/// A file or directory. Only directories have children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory,
            children: Vec::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Append a child. Files never get children, so pushing onto a file is a no-op.
    pub fn push_child(&mut self, child: TreeNode) {
        if self.is_dir() {
            self.children.push(child);
        }
    }

    /// Sort children recursively: directories first, then case-insensitive by
    /// name, ties broken by exact byte order.
    pub fn sort_children(&mut self) {
        self.children.sort_by(compare_entries);
        for child in &mut self.children {
            child.sort_children();
        }
    }

    /// Look up a descendant by `/`-separated relative path.
    pub fn find(&self, relative: &str) -> Option<&TreeNode> {
        let mut current = self;
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            current = current.children.iter().find(|c| c.name == segment)?;
        }
        Some(current)
    }

    /// All descendant paths relative to this node. Directories carry a
    /// trailing `/` so an empty directory is distinguishable from a file.
    pub fn paths(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for child in &self.children {
            child.collect_paths("", &mut out);
        }
        out
    }

    fn collect_paths(&self, prefix: &str, out: &mut BTreeSet<String>) {
        let path = format!("{}{}", prefix, self.name);
        if self.is_dir() {
            let dir_path = format!("{}/", path);
            for child in &self.children {
                child.collect_paths(&dir_path, out);
            }
            out.insert(dir_path);
        } else {
            out.insert(path);
        }
    }

    /// Number of directories and files below this node.
    pub fn count(&self) -> (usize, usize) {
        self.children.iter().fold((0, 0), |(dirs, files), child| {
            let (d, f) = child.count();
            if child.is_dir() {
                (dirs + d + 1, files + f)
            } else {
                (dirs + d, files + f + 1)
            }
        })
    }
}

fn compare_entries(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
