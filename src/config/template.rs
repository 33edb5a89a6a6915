//! Commented `twiggy.toml` written by `twiggy init`.

use crate::config::TwiggyConfig;

/// Render a configuration as a commented TOML document. Parsing the result
/// yields the same configuration (logging settings excepted, which are left
/// at their defaults and documented as comments).
pub fn render_config(config: &TwiggyConfig) -> String {
    let patterns = toml::Value::Array(
        config
            .ignore_patterns
            .iter()
            .map(|p| toml::Value::String(p.clone()))
            .collect(),
    );
    let output_path = toml::Value::String(config.output_pattern());
    let output_format = toml::Value::String(config.output_format.as_str().to_string());

    let mut out = String::new();
    out.push_str("# Twiggy Configuration\n");
    out.push_str("#\n");
    out.push_str("# Twiggy keeps a real-time snapshot of your directory structure\n");
    out.push_str("# for AI assistants. Common build and dependency folders\n");
    out.push_str("# (node_modules, .git, target, ...) are always excluded.\n\n");

    out.push_str("# Output format: \"xml\" (structured, best for LLMs)\n");
    out.push_str("# or \"tree\" (visual, human-readable)\n");
    out.push_str(&format!("output_format = {}\n\n", output_format));

    out.push_str("# Extra folders/files to exclude, e.g. \"temp\", \"src/old-stuff\", \"*.log\"\n");
    out.push_str(&format!("ignore_patterns = {}\n\n", patterns));

    out.push_str("# Also exclude everything listed in .gitignore\n");
    out.push_str(&format!("sync_gitignore = {}\n\n", config.sync_gitignore));

    out.push_str("# Where the structure document is written (relative to this directory)\n");
    out.push_str(&format!("output_path = {}\n\n", output_path));

    out.push_str("# List dot-files such as .eslintrc\n");
    out.push_str(&format!(
        "include_hidden_files = {}\n\n",
        config.include_hidden_files
    ));

    out.push_str("# Descend into symlinked directories (loops are detected and skipped)\n");
    out.push_str(&format!("follow_symlinks = {}\n\n", config.follow_symlinks));

    out.push_str("# Limit how deep the scan descends\n");
    match config.max_depth {
        Some(depth) => out.push_str(&format!("max_depth = {}\n\n", depth)),
        None => out.push_str("# max_depth = 8\n\n"),
    }

    out.push_str("[watch]\n");
    out.push_str("# Quiet period (milliseconds) after the last change before rescanning\n");
    out.push_str(&format!("debounce_ms = {}\n\n", config.watch.debounce_ms));

    out.push_str("# [logging]\n");
    out.push_str("# level = \"warn\"      # trace, debug, info, warn, error, off\n");
    out.push_str("# format = \"text\"     # text, json\n");
    out.push_str("# output = \"stderr\"   # stdout, stderr, file\n");

    out
}
