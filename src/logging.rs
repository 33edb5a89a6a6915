//! Logging System
//!
//! Structured logging on top of `tracing`. Level, format, and destination come
//! from the `[logging]` table of the config, overridden by `TWIGGY_LOG*`
//! environment variables and finally by CLI flags.

use crate::error::TwiggyError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LOG_FILE_NAME: &str = "twiggy.log";

const VALID_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable to suppress all log output (set by `--quiet`)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (when output includes "file")
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Check level, format, and output values.
    pub fn validate(&self) -> Result<(), String> {
        if !VALID_LEVELS.contains(&self.level.as_str()) {
            return Err(format!(
                "invalid level '{}' (must be one of {})",
                self.level,
                VALID_LEVELS.join(", ")
            ));
        }
        if self.format != "json" && self.format != "text" {
            return Err(format!(
                "invalid format '{}' (must be 'json' or 'text')",
                self.format
            ));
        }
        parse_output_destinations(&self.output).map_err(|e| e.to_string())?;
        for (module, level) in &self.modules {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(format!("invalid level '{}' for module '{}'", level, module));
            }
        }
        Ok(())
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. CLI arguments (already folded into `config` by the binary)
/// 2. Environment variables (TWIGGY_LOG, TWIGGY_LOG_FORMAT, etc.)
/// 3. Configuration file
/// 4. Defaults
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), TwiggyError> {
    if let Some(c) = config {
        if !c.enabled {
            return Ok(());
        }
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let writer = match (output.file, output.stderr) {
        (true, true) => {
            let file = Mutex::new(open_log_file(config)?);
            BoxMakeWriter::new(TeeWriter { file })
        }
        (true, false) => BoxMakeWriter::new(Mutex::new(open_log_file(config)?)),
        (false, true) => BoxMakeWriter::new(std::io::stderr),
        (false, false) => BoxMakeWriter::new(std::io::stdout),
    };
    let ansi = use_color && !output.file;

    let base_subscriber = Registry::default().with(filter);
    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()
    };

    // A global subscriber already being set (e.g. in tests) is not an error.
    let _ = result;
    Ok(())
}

/// Writes each log record to the log file and mirrors it to stderr.
struct TeeWriter {
    file: Mutex<std::fs::File>,
}

impl<'a> fmt::MakeWriter<'a> for TeeWriter {
    type Writer = TeeGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        TeeGuard { file: &self.file }
    }
}

struct TeeGuard<'a> {
    file: &'a Mutex<std::fs::File>,
}

impl std::io::Write for TeeGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut file) = self.file.lock() {
            file.write_all(buf)?;
        }
        std::io::stderr().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Ok(mut file) = self.file.lock() {
            file.flush()?;
        }
        std::io::stderr().flush()
    }
}

fn open_log_file(config: Option<&LoggingConfig>) -> Result<std::fs::File, TwiggyError> {
    let log_file = match config.and_then(|c| c.file.clone()) {
        Some(path) => path,
        None => default_log_file_path()?,
    };

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            TwiggyError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            TwiggyError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
        })
}

/// Default log file: `<state dir>/twiggy.log`, falling back to the local data
/// dir on platforms without a state dir.
pub fn default_log_file_path() -> Result<PathBuf, TwiggyError> {
    let dirs = directories::ProjectDirs::from("", "", "twiggy").ok_or_else(|| {
        TwiggyError::ConfigError("Could not determine a home directory for logs".to_string())
    })?;
    let dir = dirs
        .state_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dirs.data_local_dir().to_path_buf());
    Ok(dir.join(LOG_FILE_NAME))
}

/// Resolve the log file path. An explicit CLI path wins, then the configured
/// path; relative paths are taken from the workspace root.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    workspace_root: Option<&Path>,
) -> Result<PathBuf, TwiggyError> {
    match cli_file.or(config_file) {
        Some(path) if path.is_absolute() => Ok(path),
        Some(path) => Ok(match workspace_root {
            Some(root) => root.join(path),
            None => path,
        }),
        None => default_log_file_path(),
    }
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, TwiggyError> {
    if let Ok(filter) = EnvFilter::try_from_env("TWIGGY_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("warn");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);

    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| {
                        TwiggyError::ConfigError(format!("Invalid log directive: {}", e))
                    })?,
            );
        }
    }

    if let Ok(modules_str) = std::env::var("TWIGGY_LOG_MODULES") {
        for module_spec in modules_str.split(',') {
            let parts: Vec<&str> = module_spec.split('=').collect();
            if parts.len() == 2 {
                let directive = format!("{}={}", parts[0].trim(), parts[1].trim());
                filter = filter.add_directive(directive.parse().map_err(|e| {
                    TwiggyError::ConfigError(format!("Invalid log directive from env: {}", e))
                })?);
            }
        }
    }

    Ok(filter)
}

/// Determine output format from config or environment
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, TwiggyError> {
    if let Ok(format) = std::env::var("TWIGGY_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(TwiggyError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format.to_string())
}

/// Output destinations
#[derive(Debug, PartialEq, Eq)]
struct OutputDestinations {
    stderr: bool,
    file: bool,
}

/// Determine output destinations from config or environment
fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestinations, TwiggyError> {
    if let Ok(output) = std::env::var("TWIGGY_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }

    let output = config.map(|c| c.output.as_str()).unwrap_or("stderr");
    parse_output_destinations(output)
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, TwiggyError> {
    match output {
        "stdout" => Ok(OutputDestinations {
            stderr: false,
            file: false,
        }),
        "stderr" => Ok(OutputDestinations {
            stderr: true,
            file: false,
        }),
        "file" => Ok(OutputDestinations {
            stderr: false,
            file: true,
        }),
        "file+stderr" => Ok(OutputDestinations {
            stderr: true,
            file: true,
        }),
        _ => Err(TwiggyError::ConfigError(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'file+stderr')",
            output
        ))),
    }
}
