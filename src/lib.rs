//! Twiggy: Real-Time Directory Structure Snapshots
//!
//! Keeps a textual snapshot of a project's directory layout on disk so an AI
//! assistant can see the codebase structure without walking it itself. A scan
//! walks the workspace through the ignore rules, renders the resulting tree as
//! structured markup or a visual tree, and writes it atomically; the watcher
//! repeats that cycle, debounced, whenever the structure changes.

pub mod cli;
pub mod config;
pub mod error;
pub mod ignore;
pub mod init;
pub mod logging;
pub mod render;
pub mod snapshot;
pub mod status;
pub mod tree;
pub mod watch;
