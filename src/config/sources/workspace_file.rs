//! Workspace config file source: <workspace>/twiggy.toml, or an explicit `--config` file.

use crate::config::CONFIG_FILE_NAME;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::{Path, PathBuf};

/// Path of the workspace config file.
pub fn config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(CONFIG_FILE_NAME)
}

/// Add the workspace config file to builder. The file is required: callers
/// check for existence first so a missing file surfaces as `ConfigNotFound`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    config_file: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        File::from(config_file.to_path_buf())
            .format(FileFormat::Toml)
            .required(true),
    ))
}
