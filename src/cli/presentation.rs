//! CLI presentation: text formatters per command family.

mod init;
mod snapshot;

pub use init::{format_init_preview, format_init_summary};
pub use snapshot::{format_cycle_report, format_scan_notes, format_scan_outcome};
