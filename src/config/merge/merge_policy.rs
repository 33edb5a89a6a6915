//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources replace earlier values key by key; lists are replaced, not
//! concatenated. Built-in ignore defaults are never part of the layered config,
//! so a user list cannot drop them.

use crate::config::{DEFAULT_DEBOUNCE_MS, DEFAULT_OUTPUT_PATH};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("output_format", "xml")?
        .set_default("sync_gitignore", true)?
        .set_default("output_path", DEFAULT_OUTPUT_PATH)?
        .set_default("include_hidden_files", false)?
        .set_default("follow_symlinks", false)?
        .set_default("watch.debounce_ms", DEFAULT_DEBOUNCE_MS)
}
