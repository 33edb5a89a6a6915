//! Workspace initialization for `twiggy init`
//!
//! Writes a commented `twiggy.toml` (from prompts or defaults), creates the
//! output directory, and adds the output document to `.gitignore`. Prompts go
//! through the [`Prompter`] trait so the flow can be scripted in tests.

use crate::config::template::render_config;
use crate::config::{ConfigLoader, TwiggyConfig};
use crate::error::TwiggyError;
use crate::ignore::{ensure_gitignore_entry, GitignoreUpdate};
use crate::render::OutputFormat;
use crate::snapshot::write_atomic;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Flags of `twiggy init`
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Use default settings without prompting
    pub defaults: bool,
    /// Only write `twiggy.toml`; leave `.gitignore` and the output dir alone
    pub config_only: bool,
    /// Overwrite an existing `twiggy.toml` without asking
    pub force: bool,
}

/// Interactive input used by `init`
pub trait Prompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, TwiggyError>;
    /// Free text; an empty answer is allowed.
    fn input(&mut self, prompt: &str) -> Result<String, TwiggyError>;
    fn select(&mut self, prompt: &str, items: &[&str], default: usize)
        -> Result<usize, TwiggyError>;
}

/// Terminal prompts via `dialoguer`
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, TwiggyError> {
        use dialoguer::Confirm;
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn input(&mut self, prompt: &str) -> Result<String, TwiggyError> {
        use dialoguer::Input;
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }

    fn select(
        &mut self,
        prompt: &str,
        items: &[&str],
        default: usize,
    ) -> Result<usize, TwiggyError> {
        use dialoguer::Select;
        Ok(Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?)
    }
}

/// Settings collected by `init`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitAnswers {
    pub ignore_patterns: Vec<String>,
    pub sync_gitignore: bool,
    pub output_format: OutputFormat,
}

impl Default for InitAnswers {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            sync_gitignore: true,
            output_format: OutputFormat::Xml,
        }
    }
}

const FORMAT_CHOICES: &[&str] = &[
    "xml  - structured markup (better for LLMs)",
    "tree - visual tree (human-readable)",
];

impl InitAnswers {
    /// Ask for exclusions (until an empty answer), gitignore sync, and format.
    pub fn ask(prompter: &mut dyn Prompter) -> Result<Self, TwiggyError> {
        let mut ignore_patterns: Vec<String> = Vec::new();
        loop {
            let answer = prompter.input(
                "Folder/file to exclude (e.g. temp, src/old-stuff; Enter when done)",
            )?;
            let answer = answer.trim();
            if answer.is_empty() {
                break;
            }
            if !ignore_patterns.iter().any(|p| p == answer) {
                ignore_patterns.push(answer.to_string());
            }
        }

        let sync_gitignore = prompter.confirm("Also exclude everything in .gitignore?", true)?;
        let output_format = match prompter.select("Output format", FORMAT_CHOICES, 0)? {
            1 => OutputFormat::Tree,
            _ => OutputFormat::Xml,
        };

        Ok(Self {
            ignore_patterns,
            sync_gitignore,
            output_format,
        })
    }

    pub fn into_config(self) -> TwiggyConfig {
        TwiggyConfig {
            ignore_patterns: self.ignore_patterns,
            sync_gitignore: self.sync_gitignore,
            output_format: self.output_format,
            ..Default::default()
        }
    }
}

/// What happened to `twiggy.toml`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStep {
    Created,
    Overwritten,
    Skipped,
}

/// Summary of initialization operations
#[derive(Debug, Clone)]
pub struct InitSummary {
    pub config_path: PathBuf,
    pub config: ConfigStep,
    /// Settings written, when the config was (re)written
    pub answers: Option<InitAnswers>,
    pub output_dir: Option<PathBuf>,
    pub gitignore: Option<GitignoreUpdate>,
    /// Non-fatal failures (output dir, `.gitignore`)
    pub errors: Vec<String>,
}

/// Preview of what `init` would do (`--list`)
#[derive(Debug, Clone)]
pub struct InitPreview {
    pub config_path: PathBuf,
    pub config_exists: bool,
    pub output_dir: PathBuf,
    pub output_dir_exists: bool,
    pub gitignore_entry: String,
    pub gitignore_has_entry: bool,
}

/// Initialize a workspace, writing `<root>/twiggy.toml`.
pub fn run_init(
    root: &Path,
    options: InitOptions,
    prompter: &mut dyn Prompter,
) -> Result<InitSummary, TwiggyError> {
    run_init_with_config(root, &ConfigLoader::config_path(root), options, prompter)
}

/// Initialize a workspace with the configuration at an explicit path
/// (`--config`). The output directory and `.gitignore` stay under `root`.
pub fn run_init_with_config(
    root: &Path,
    config_path: &Path,
    options: InitOptions,
    prompter: &mut dyn Prompter,
) -> Result<InitSummary, TwiggyError> {
    let config_path = config_path.to_path_buf();
    let exists = config_path.is_file();

    let write = if !exists || options.force {
        true
    } else if options.defaults {
        false
    } else {
        prompter.confirm("Config already exists. Reconfigure?", false)?
    };

    let (step, answers, config) = if write {
        let answers = if options.defaults {
            InitAnswers::default()
        } else {
            InitAnswers::ask(prompter)?
        };
        let config = answers.clone().into_config();
        write_atomic(&config_path, &render_config(&config))?;
        info!(config_path = %config_path.display(), "Configuration written");
        let step = if exists {
            ConfigStep::Overwritten
        } else {
            ConfigStep::Created
        };
        (step, Some(answers), config)
    } else {
        debug!(config_path = %config_path.display(), "Keeping existing configuration");
        (
            ConfigStep::Skipped,
            None,
            ConfigLoader::load_from_file(&config_path)?,
        )
    };

    let mut summary = InitSummary {
        config_path,
        config: step,
        answers,
        output_dir: None,
        gitignore: None,
        errors: Vec::new(),
    };

    if options.config_only {
        return Ok(summary);
    }

    let output_file = config.output_file(root);
    if let Some(dir) = output_file.parent() {
        match fs::create_dir_all(dir) {
            Ok(()) => summary.output_dir = Some(dir.to_path_buf()),
            Err(e) => summary
                .errors
                .push(format!("Failed to create {}: {}", dir.display(), e)),
        }
    }

    match ensure_gitignore_entry(root, &config.output_pattern()) {
        Ok(update) => summary.gitignore = Some(update),
        Err(e) => summary
            .errors
            .push(format!("Failed to update .gitignore: {}", e)),
    }

    Ok(summary)
}

/// Report what `init` would touch without changing anything.
pub fn preview_init(root: &Path) -> InitPreview {
    preview_init_with_config(root, &ConfigLoader::config_path(root))
}

/// [`preview_init`] for a configuration at an explicit path.
pub fn preview_init_with_config(root: &Path, config_path: &Path) -> InitPreview {
    let config_path = config_path.to_path_buf();
    let config_exists = config_path.is_file();
    let config = if config_exists {
        ConfigLoader::load_from_file(&config_path).unwrap_or_default()
    } else {
        TwiggyConfig::default()
    };

    let output_file = config.output_file(root);
    let output_dir = output_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let gitignore_entry = config.output_pattern();
    let anchored = format!("/{}", gitignore_entry);
    let gitignore_has_entry = fs::read_to_string(root.join(".gitignore"))
        .map(|contents| {
            contents
                .lines()
                .map(str::trim)
                .any(|line| line == gitignore_entry || line == anchored)
        })
        .unwrap_or(false);

    InitPreview {
        config_path,
        config_exists,
        output_dir_exists: output_dir.is_dir(),
        output_dir,
        gitignore_entry,
        gitignore_has_entry,
    }
}
