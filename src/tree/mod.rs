//! Directory Tree
//!
//! Walks a workspace root through the ignore rules and builds an ordered,
//! in-memory tree of its directories and files.

pub mod node;
pub mod path;
pub mod walker;

pub use node::{NodeKind, TreeNode};
pub use walker::{NoteKind, Scan, ScanNote, ScanStats, Walker, WalkerConfig};
