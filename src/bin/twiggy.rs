//! Twiggy CLI Binary
//!
//! Command-line interface for writing and watching workspace structure snapshots.

use clap::Parser;
use std::process;
use tracing::{error, info};
use twiggy::cli::{Cli, RunContext};
use twiggy::config::ConfigLoader;
use twiggy::logging::{init_logging, resolve_log_file_path, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Twiggy CLI starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing workspace: {}", e);
            eprintln!("{}", twiggy::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", twiggy::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Logging settings for this run: `[logging]` from the config file, then
/// `--quiet`/`--verbose`, then the explicit `--log-*` flags.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(&cli.workspace),
    };
    let mut logging = loaded.map(|c| c.logging).unwrap_or_default();

    logging.enabled &= !cli.quiet;
    if cli.verbose {
        logging.level = "debug".to_string();
        // Keep file logs and mirror them to the terminal.
        if logging.output == "file" {
            logging.output = "file+stderr".to_string();
        }
    }

    let overrides = [
        (&mut logging.level, &cli.log_level),
        (&mut logging.format, &cli.log_format),
        (&mut logging.output, &cli.log_output),
    ];
    for (field, flag) in overrides {
        if let Some(value) = flag {
            field.clone_from(value);
        }
    }

    let writes_file = logging.output.split('+').any(|dest| dest == "file");
    if logging.enabled && writes_file {
        if let Ok(path) = resolve_log_file_path(
            cli.log_file.clone(),
            logging.file.take(),
            Some(cli.workspace.as_path()),
        ) {
            logging.file = Some(path);
        }
    } else if let Some(file) = &cli.log_file {
        logging.file = Some(file.clone());
    }

    logging
}
