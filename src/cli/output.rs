//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::TwiggyError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &TwiggyError) -> String {
    match e {
        TwiggyError::InvalidConfig(_) | TwiggyError::ConfigError(_) => {
            format!("{}\nFix twiggy.toml or run `twiggy init --force`.", e)
        }
        _ => e.to_string(),
    }
}
