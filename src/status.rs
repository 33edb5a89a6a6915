//! Workspace status for `twiggy status`.
//!
//! Summarizes the effective configuration, the ignore rules by source, the
//! current scan, and whether the document on disk matches a fresh render.

use crate::config::TwiggyConfig;
use crate::ignore::{IgnoreMatcher, RuleSource};
use crate::snapshot::SnapshotGenerator;
use crate::tree::{ScanNote, ScanStats};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub workspace_root: String,
    pub config_path: String,
    pub settings: StatusSettings,
    pub rules: Vec<RuleGroup>,
    pub output: OutputStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSettings {
    pub output_format: String,
    pub sync_gitignore: bool,
    pub include_hidden_files: bool,
    pub follow_symlinks: bool,
    pub max_depth: Option<usize>,
    pub debounce_ms: u64,
}

/// Ignore rules from one source. Defaults are only counted.
#[derive(Debug, Clone, Serialize)]
pub struct RuleGroup {
    pub source: RuleSource,
    pub count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputStatus {
    pub path: String,
    pub exists: bool,
    /// Whether the file matches a fresh render (None when the scan failed)
    pub up_to_date: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    #[serde(flatten)]
    pub stats: ScanStats,
    pub notes: Vec<ScanNote>,
}

/// Build the status report. Scans the workspace but writes nothing.
pub fn build_status(root: &Path, config_path: &Path, config: Arc<TwiggyConfig>) -> StatusReport {
    let generator = SnapshotGenerator::new(root.to_path_buf(), Arc::clone(&config));
    let matcher = generator.matcher();
    let output_path = generator.output_path();
    let on_disk = fs::read_to_string(&output_path).ok();

    let (scan, scan_error, up_to_date) = match generator.build_with(&matcher) {
        Ok(snapshot) => {
            let current = on_disk.as_deref() == Some(snapshot.document.as_str());
            (
                Some(ScanSummary {
                    stats: snapshot.scan.stats,
                    notes: snapshot.scan.notes,
                }),
                None,
                Some(current),
            )
        }
        Err(e) => (None, Some(e.to_string()), None),
    };

    StatusReport {
        workspace_root: root.display().to_string(),
        config_path: config_path.display().to_string(),
        settings: StatusSettings {
            output_format: config.output_format.to_string(),
            sync_gitignore: config.sync_gitignore,
            include_hidden_files: config.include_hidden_files,
            follow_symlinks: config.follow_symlinks,
            max_depth: config.max_depth,
            debounce_ms: config.watch.debounce_ms,
        },
        rules: group_rules(&matcher),
        output: OutputStatus {
            path: config.output_pattern(),
            exists: on_disk.is_some(),
            up_to_date,
        },
        scan,
        scan_error,
    }
}

fn group_rules(matcher: &IgnoreMatcher) -> Vec<RuleGroup> {
    let sources = [
        RuleSource::Default,
        RuleSource::User,
        RuleSource::Gitignore,
        RuleSource::Output,
    ];
    sources
        .iter()
        .map(|&source| {
            let patterns: Vec<String> = matcher
                .rules()
                .iter()
                .filter(|r| r.source == source)
                .map(|r| {
                    if r.dir_only {
                        format!("{}/", r.pattern)
                    } else {
                        r.pattern.clone()
                    }
                })
                .collect();
            RuleGroup {
                source,
                count: patterns.len(),
                patterns: if source == RuleSource::Default {
                    Vec::new()
                } else {
                    patterns
                },
            }
        })
        .collect()
}

pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn yes_no(value: bool) -> String {
    if value {
        format!("{}", "yes".green())
    } else {
        format!("{}", "no".yellow())
    }
}

pub fn format_status_text(report: &StatusReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Twiggy Status")));
    out.push_str(&format!("  Workspace: {}\n", report.workspace_root));
    out.push_str(&format!("  Config: {}\n\n", report.config_path));

    out.push_str(&format!("{}\n\n", format_section_heading("Settings")));
    let s = &report.settings;
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["output_format".to_string(), s.output_format.clone()]);
    table.add_row(vec!["sync_gitignore".to_string(), s.sync_gitignore.to_string()]);
    table.add_row(vec![
        "include_hidden_files".to_string(),
        s.include_hidden_files.to_string(),
    ]);
    table.add_row(vec!["follow_symlinks".to_string(), s.follow_symlinks.to_string()]);
    table.add_row(vec![
        "max_depth".to_string(),
        s.max_depth
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unlimited".to_string()),
    ]);
    table.add_row(vec!["debounce_ms".to_string(), s.debounce_ms.to_string()]);
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n\n", format_section_heading("Ignore rules")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Source", "Rules", "Patterns"]);
    for group in &report.rules {
        let patterns = if group.source == RuleSource::Default {
            "(built-in)".to_string()
        } else if group.patterns.is_empty() {
            "-".to_string()
        } else {
            group.patterns.join(", ")
        };
        table.add_row(vec![group.source.to_string(), group.count.to_string(), patterns]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n", format_section_heading("Output")));
    out.push_str(&format!("  Path: {}\n", report.output.path));
    out.push_str(&format!("  Exists: {}\n", yes_no(report.output.exists)));
    if let Some(current) = report.output.up_to_date {
        out.push_str(&format!("  Up to date: {}\n", yes_no(current)));
    }
    out.push('\n');

    out.push_str(&format!("{}\n", format_section_heading("Scan")));
    match (&report.scan, &report.scan_error) {
        (Some(scan), _) => {
            out.push_str(&format!("  Directories: {}\n", scan.stats.directories));
            out.push_str(&format!("  Files: {}\n", scan.stats.files));
            if !scan.notes.is_empty() {
                out.push_str(&format!("  Warnings ({}):\n", scan.notes.len()));
                for note in &scan.notes {
                    out.push_str(&format!(
                        "    {} {} ({})\n",
                        "!".yellow(),
                        note.path,
                        note.kind
                    ));
                }
            }
        }
        (None, Some(error)) => {
            out.push_str(&format!("  {} {}\n", "✗".red(), error));
        }
        (None, None) => {}
    }
    out
}
