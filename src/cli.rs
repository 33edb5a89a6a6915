//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_cycle_report, format_init_preview, format_init_summary, format_scan_notes,
    format_scan_outcome,
};
pub use route::RunContext;
