//! Scan and watch presentation.

use crate::snapshot::SnapshotOutcome;
use crate::tree::ScanNote;
use crate::watch::{CycleReport, CycleTrigger};
use owo_colors::OwoColorize;

/// One warning line per skipped entry.
pub fn format_scan_notes(notes: &[ScanNote]) -> String {
    notes
        .iter()
        .map(|note| format!("  {} {}: {}", "!".yellow(), note.path, note.message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_scan_outcome(outcome: &SnapshotOutcome) -> String {
    let mut output = String::new();
    if !outcome.notes.is_empty() {
        output.push_str(&format!("Skipped {} entries:\n", outcome.notes.len()));
        output.push_str(&format_scan_notes(&outcome.notes));
        output.push_str("\n\n");
    }
    let verb = if outcome.written {
        "Wrote"
    } else {
        "Unchanged"
    };
    output.push_str(&format!(
        "{} {} ({} directories, {} files)",
        verb,
        outcome.output_path.display(),
        outcome.stats.directories,
        outcome.stats.files
    ));
    output
}

/// Single status line for a watch cycle.
pub fn format_cycle_report(report: &CycleReport) -> String {
    let trigger = |trigger: &CycleTrigger| match trigger {
        CycleTrigger::Initial => "initial scan".to_string(),
        CycleTrigger::Changes(1) => "1 change".to_string(),
        CycleTrigger::Changes(n) => format!("{} changes", n),
    };
    match report {
        CycleReport::Completed { trigger: t, outcome } => {
            let mut line = if outcome.written {
                format!(
                    "{} Updated {} ({})",
                    "✓".green(),
                    outcome.output_path.display(),
                    trigger(t)
                )
            } else {
                format!("⊘ No structural change ({})", trigger(t))
            };
            if !outcome.notes.is_empty() {
                line.push('\n');
                line.push_str(&format_scan_notes(&outcome.notes));
            }
            line
        }
        CycleReport::Failed { trigger: t, error } => {
            format!("{} Update failed ({}): {}", "✗".red(), trigger(t), error)
        }
    }
}
