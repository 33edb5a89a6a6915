//! Configuration System
//!
//! Workspace configuration lives in `twiggy.toml` at the workspace root and is
//! layered with built-in defaults, an optional global file, and `TWIGGY_`
//! environment overrides. A loaded [`TwiggyConfig`] is validated once and then
//! treated as immutable for the rest of the invocation.

use crate::logging::LoggingConfig;
use crate::render::OutputFormat;
use crate::tree::walker::WalkerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

mod facade;
mod merge;
mod sources;
pub mod template;

pub use facade::ConfigLoader;

/// File name of the workspace configuration.
pub const CONFIG_FILE_NAME: &str = "twiggy.toml";

/// Default location of the generated structure document, relative to the root.
pub const DEFAULT_OUTPUT_PATH: &str = ".cursor/rules/file-structure.mdc";

/// Default debounce window for the watcher.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwiggyConfig {
    /// Workspace root, relative to the directory holding the config file
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,

    /// Output format of the structure document
    #[serde(default)]
    pub output_format: OutputFormat,

    /// User ignore patterns, added on top of the built-in defaults
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Also ignore everything listed in the workspace .gitignore
    #[serde(default = "default_true")]
    pub sync_gitignore: bool,

    /// Output document path, relative to the workspace root
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// List files whose name starts with a dot
    #[serde(default)]
    pub include_hidden_files: bool,

    /// Descend into symlinked directories (cycles are detected and skipped)
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Maximum depth below the root to descend (None = unlimited)
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Watch mode settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Quiet period after the last change before rescanning
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for TwiggyConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            output_format: OutputFormat::default(),
            ignore_patterns: Vec::new(),
            sync_gitignore: default_true(),
            output_path: default_output_path(),
            include_hidden_files: false,
            follow_symlinks: false,
            max_depth: None,
            watch: WatchSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Output(String),
    Watch(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Output(msg) => write!(f, "output_path: {}", msg),
            ValidationError::Watch(msg) => write!(f, "watch: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TwiggyConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.output_path.as_os_str().is_empty() {
            errors.push(ValidationError::Output("cannot be empty".to_string()));
        } else if self.output_path.is_absolute() || self.output_path.has_root() {
            errors.push(ValidationError::Output(format!(
                "must be relative to the workspace root, got {}",
                self.output_path.display()
            )));
        } else if self
            .output_path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            errors.push(ValidationError::Output(format!(
                "must stay inside the workspace, got {}",
                self.output_path.display()
            )));
        }

        if self.watch.debounce_ms == 0 {
            errors.push(ValidationError::Watch(
                "debounce_ms must be greater than zero".to_string(),
            ));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Resolve the workspace root. `base` is the directory holding the config
    /// file (or the `--workspace` directory when no root is configured).
    pub fn resolve_root(&self, base: &Path) -> PathBuf {
        match &self.workspace_root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        }
    }

    /// Absolute path of the output document for a workspace root.
    pub fn output_file(&self, root: &Path) -> PathBuf {
        root.join(&self.output_path)
    }

    /// Output path as a root-relative, `/`-separated pattern.
    pub fn output_pattern(&self) -> String {
        self.output_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Walker settings derived from this configuration.
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            include_hidden_files: self.include_hidden_files,
            max_depth: self.max_depth,
        }
    }
}
