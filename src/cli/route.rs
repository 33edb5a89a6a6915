//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_cycle_report, format_init_preview, format_init_summary, format_scan_outcome,
};
use crate::config::{ConfigLoader, TwiggyConfig};
use crate::error::TwiggyError;
use crate::init::{preview_init_with_config, run_init_with_config, DialoguerPrompter, InitOptions};
use crate::snapshot::SnapshotGenerator;
use crate::status::{build_status, format_status_text};
use crate::tree::path::canonical_root;
use crate::watch::{WatchConfig, WatchDaemon};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace and config paths.
/// Configuration is loaded per command since `init` runs before a config exists.
pub struct RunContext {
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
}

/// Configuration plus the workspace root it resolves to
struct LoadedWorkspace {
    root: PathBuf,
    config_path: PathBuf,
    config: Arc<TwiggyConfig>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, TwiggyError> {
        let workspace_root =
            canonical_root(&workspace_root).map_err(|e| TwiggyError::RootUnreadable {
                path: workspace_root.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            workspace_root,
            config_path,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, TwiggyError> {
        match command {
            Commands::Init {
                defaults,
                config_only,
                force,
                list,
            } => self.handle_init(*defaults, *config_only, *force, *list),
            Commands::Scan { stdout } => self.handle_scan(*stdout),
            Commands::Watch { debounce_ms } => self.handle_watch(*debounce_ms),
            Commands::Status { format } => self.handle_status(format),
        }
    }

    fn handle_init(
        &self,
        defaults: bool,
        config_only: bool,
        force: bool,
        list: bool,
    ) -> Result<String, TwiggyError> {
        let config_path = self
            .config_path
            .clone()
            .unwrap_or_else(|| ConfigLoader::config_path(&self.workspace_root));
        if list {
            return Ok(format_init_preview(&preview_init_with_config(
                &self.workspace_root,
                &config_path,
            )));
        }
        let options = InitOptions {
            defaults,
            config_only,
            force,
        };
        let summary = run_init_with_config(
            &self.workspace_root,
            &config_path,
            options,
            &mut DialoguerPrompter,
        )?;
        Ok(format_init_summary(&summary))
    }

    fn handle_scan(&self, stdout: bool) -> Result<String, TwiggyError> {
        let loaded = self.load()?;
        let generator = SnapshotGenerator::new(loaded.root, loaded.config);
        if stdout {
            let snapshot = generator.build()?;
            return Ok(snapshot.document.trim_end_matches('\n').to_string());
        }
        let outcome = generator.generate()?;
        Ok(format_scan_outcome(&outcome))
    }

    fn handle_watch(&self, debounce_ms: Option<u64>) -> Result<String, TwiggyError> {
        let mut loaded = self.load()?;
        if let Some(ms) = debounce_ms {
            if ms == 0 {
                return Err(TwiggyError::InvalidConfig(
                    "  - watch: debounce_ms must be greater than zero".to_string(),
                ));
            }
            let mut config = (*loaded.config).clone();
            config.watch.debounce_ms = ms;
            loaded.config = Arc::new(config);
        }

        let watch_config = WatchConfig::from_config(loaded.root.clone(), &loaded.config);
        let generator = SnapshotGenerator::new(loaded.root.clone(), loaded.config);
        let output_path = generator.output_path();
        let daemon = WatchDaemon::new(generator, watch_config);

        println!(
            "Watching {} (writing {}). Press Ctrl+C to stop.",
            loaded.root.display(),
            output_path.display()
        );
        daemon.start(|report| println!("{}", format_cycle_report(report)))?;
        Ok("Watch stopped.".to_string())
    }

    fn handle_status(&self, format: &str) -> Result<String, TwiggyError> {
        let loaded = self.load()?;
        let report = build_status(&loaded.root, &loaded.config_path, loaded.config);
        match format {
            "json" => Ok(serde_json::to_string_pretty(&report)?),
            "text" => Ok(format_status_text(&report)),
            other => Err(TwiggyError::InvalidConfig(format!(
                "  - unknown status format '{}' (expected text or json)",
                other
            ))),
        }
    }

    /// Load configuration and resolve the scan root. A configured
    /// `workspace_root` is relative to the directory holding the config file.
    fn load(&self) -> Result<LoadedWorkspace, TwiggyError> {
        let (config, config_path) = match &self.config_path {
            Some(path) => (ConfigLoader::load_from_file(path)?, path.clone()),
            None => (
                ConfigLoader::load(&self.workspace_root)?,
                ConfigLoader::config_path(&self.workspace_root),
            ),
        };

        let base = match &self.config_path {
            Some(path) => match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => self.workspace_root.clone(),
            },
            None => self.workspace_root.clone(),
        };
        let configured = config.resolve_root(&base);
        let root = canonical_root(&configured).map_err(|e| TwiggyError::RootUnreadable {
            path: configured.clone(),
            message: e.to_string(),
        })?;

        debug!(root = %root.display(), config = %config_path.display(), "Workspace resolved");
        info!(root = %root.display(), "Using workspace");
        Ok(LoadedWorkspace {
            root,
            config_path,
            config: Arc::new(config),
        })
    }
}
