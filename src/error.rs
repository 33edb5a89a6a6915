//! Error types for Twiggy.

use std::path::PathBuf;
use thiserror::Error;

/// Output write errors
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace output file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level errors surfaced by library operations and the CLI
#[derive(Debug, Error)]
pub enum TwiggyError {
    #[error("No config found at {0}. Run `twiggy init` first.")]
    ConfigNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration:\n{0}")]
    InvalidConfig(String),

    #[error("Cannot scan {path}: {message}")]
    RootUnreadable { path: PathBuf, message: String },

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for TwiggyError {
    fn from(err: config::ConfigError) -> Self {
        TwiggyError::ConfigError(err.to_string())
    }
}

impl From<notify::Error> for TwiggyError {
    fn from(err: notify::Error) -> Self {
        TwiggyError::Watch(err.to_string())
    }
}

impl From<dialoguer::Error> for TwiggyError {
    fn from(err: dialoguer::Error) -> Self {
        TwiggyError::Prompt(err.to_string())
    }
}

impl TwiggyError {
    /// True for configuration failures (missing, malformed, or invalid config).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TwiggyError::ConfigNotFound(_)
                | TwiggyError::ConfigError(_)
                | TwiggyError::InvalidConfig(_)
        )
    }
}
