//! Renderers
//!
//! Pure functions from a [`TreeNode`] to text: structured markup (`xml`) or a
//! visual tree (`tree`). [`document`] wraps either body in the rule document
//! that is written to disk.

use crate::tree::TreeNode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod document;
pub mod tree;
pub mod xml;

/// Output format of the structure document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured markup, best for LLMs
    #[default]
    Xml,
    /// Indented visual tree, human-readable
    Tree,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Tree => "tree",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(OutputFormat::Xml),
            "tree" => Ok(OutputFormat::Tree),
            other => Err(format!(
                "Unknown output format '{}' (expected 'xml' or 'tree')",
                other
            )),
        }
    }
}

/// Render a tree in the given format. The root node is the outermost entry.
pub fn render(root: &TreeNode, format: OutputFormat) -> String {
    match format {
        OutputFormat::Xml => xml::render(root),
        OutputFormat::Tree => tree::render(root),
    }
}
