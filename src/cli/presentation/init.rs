//! Init command presentation: preview and summary formatters.

use crate::ignore::GitignoreUpdate;
use crate::init::{ConfigStep, InitPreview, InitSummary};
use owo_colors::OwoColorize;

fn exists_marker(exists: bool) -> &'static str {
    if exists {
        "exists"
    } else {
        "would create"
    }
}

pub fn format_init_preview(preview: &InitPreview) -> String {
    let mut output = String::from("Initialization Preview:\n\n");

    output.push_str(&format!(
        "  Config: {} ({})\n",
        preview.config_path.display(),
        if preview.config_exists {
            "exists, would ask before overwriting"
        } else {
            "would create"
        }
    ));
    output.push_str(&format!(
        "  Output directory: {} ({})\n",
        preview.output_dir.display(),
        exists_marker(preview.output_dir_exists)
    ));
    output.push_str(&format!(
        "  .gitignore entry: {} ({})\n",
        preview.gitignore_entry,
        if preview.gitignore_has_entry {
            "present"
        } else {
            "would add"
        }
    ));
    output.push_str("\nRun 'twiggy init' to perform initialization.\n");
    output
}

pub fn format_init_summary(summary: &InitSummary) -> String {
    let mut output = String::from("Initializing Twiggy...\n\n");

    match summary.config {
        ConfigStep::Created => output.push_str(&format!(
            "  {} Created {}\n",
            "✓".green(),
            summary.config_path.display()
        )),
        ConfigStep::Overwritten => output.push_str(&format!(
            "  {} {} (overwritten)\n",
            "✓".green(),
            summary.config_path.display()
        )),
        ConfigStep::Skipped => output.push_str(&format!(
            "  ⊘ {} (already exists, kept)\n",
            summary.config_path.display()
        )),
    }

    if let Some(answers) = &summary.answers {
        output.push_str(&format!("    output_format = {}\n", answers.output_format));
        output.push_str(&format!("    sync_gitignore = {}\n", answers.sync_gitignore));
        if !answers.ignore_patterns.is_empty() {
            output.push_str(&format!(
                "    ignore_patterns = {}\n",
                answers.ignore_patterns.join(", ")
            ));
        }
    }

    if let Some(dir) = &summary.output_dir {
        output.push_str(&format!("  {} Output directory {}\n", "✓".green(), dir.display()));
    }

    match summary.gitignore {
        Some(GitignoreUpdate::Created) => {
            output.push_str(&format!("  {} Created .gitignore\n", "✓".green()))
        }
        Some(GitignoreUpdate::Appended) => {
            output.push_str(&format!("  {} Added output to .gitignore\n", "✓".green()))
        }
        Some(GitignoreUpdate::AlreadyPresent) => {
            output.push_str("  ⊘ .gitignore already lists the output (skipped)\n")
        }
        None => {}
    }

    for error in &summary.errors {
        output.push_str(&format!("  {} {}\n", "✗".red(), error));
    }

    output.push_str("\nRun 'twiggy watch' to keep the structure document up to date.");
    output
}
