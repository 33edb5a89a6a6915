//! Config loading facade: the only entry point that reads configuration files.

use crate::config::merge::merge_policy;
use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::TwiggyConfig;
use crate::error::TwiggyError;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Path of the workspace config file for a workspace root.
    pub fn config_path(workspace_root: &Path) -> PathBuf {
        workspace_file::config_path(workspace_root)
    }

    /// Whether the workspace has a config file.
    pub fn exists(workspace_root: &Path) -> bool {
        Self::config_path(workspace_root).is_file()
    }

    /// Load the workspace configuration from `<workspace_root>/twiggy.toml`.
    pub fn load(workspace_root: &Path) -> Result<TwiggyConfig, TwiggyError> {
        Self::load_from_file(&Self::config_path(workspace_root))
    }

    /// Load configuration from an explicit file, layered over defaults, the
    /// global file, and environment overrides, then validate it.
    pub fn load_from_file(config_file: &Path) -> Result<TwiggyConfig, TwiggyError> {
        if !config_file.is_file() {
            return Err(TwiggyError::ConfigNotFound(config_file.to_path_buf()));
        }

        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, config_file)?;
        let builder = environment::add_to_builder(builder);

        let config: TwiggyConfig = builder.build()?.try_deserialize()?;

        config.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
            TwiggyError::InvalidConfig(msgs.join("\n"))
        })?;

        debug!(config_path = %config_file.display(), "Configuration loaded");
        Ok(config)
    }
}
