//! CLI parse: clap types for Twiggy. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Twiggy - real-time directory structure snapshots for AI assistants
#[derive(Parser)]
#[command(name = "twiggy", version)]
#[command(about = "Keep a live snapshot of your project's directory structure for AI assistants")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides <workspace>/twiggy.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Twiggy in the workspace (twiggy.toml, output dir, .gitignore)
    Init {
        /// Use default settings without prompts
        #[arg(long)]
        defaults: bool,

        /// Only write twiggy.toml
        #[arg(long)]
        config_only: bool,

        /// Overwrite an existing twiggy.toml without asking
        #[arg(long)]
        force: bool,

        /// Show what would be initialized without changing anything
        #[arg(long)]
        list: bool,
    },
    /// Scan once and write the structure document
    Scan {
        /// Print the document instead of writing it
        #[arg(long)]
        stdout: bool,
    },
    /// Write the structure document, then keep it updated as files change
    Watch {
        /// Quiet period after the last change before rescanning (overrides config)
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// Show configuration, ignore rules, and current scan results
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
