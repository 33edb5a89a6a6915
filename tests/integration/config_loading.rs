//! Integration tests for configuration loading

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use twiggy::config::template::render_config;
use twiggy::config::{ConfigLoader, TwiggyConfig};
use twiggy::error::TwiggyError;
use twiggy::render::OutputFormat;

use crate::integration::test_utils::write_config;

#[test]
fn test_full_config_file() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        r#"
output_format = "tree"
ignore_patterns = ["temp", "src/old-stuff", "*.log"]
sync_gitignore = false
output_path = "docs/structure.md"
include_hidden_files = true
follow_symlinks = true
max_depth = 6

[watch]
debounce_ms = 400

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = ConfigLoader::load(temp.path()).unwrap();
    assert_eq!(config.output_format, OutputFormat::Tree);
    assert_eq!(config.ignore_patterns.len(), 3);
    assert!(!config.sync_gitignore);
    assert_eq!(config.output_path, PathBuf::from("docs/structure.md"));
    assert!(config.include_hidden_files);
    assert!(config.follow_symlinks);
    assert_eq!(config.max_depth, Some(6));
    assert_eq!(config.watch.debounce_ms, 400);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn test_rendered_template_loads_back() {
    let temp = TempDir::new().unwrap();
    let config = TwiggyConfig {
        output_format: OutputFormat::Tree,
        ignore_patterns: vec!["scratch \"copy\"".to_string()],
        max_depth: Some(3),
        ..Default::default()
    };
    write_config(temp.path(), &render_config(&config));

    let loaded = ConfigLoader::load(temp.path()).unwrap();
    assert_eq!(loaded.output_format, OutputFormat::Tree);
    assert_eq!(loaded.ignore_patterns, config.ignore_patterns);
    assert_eq!(loaded.max_depth, Some(3));
    assert_eq!(loaded.watch.debounce_ms, 1000);
}

#[test]
fn test_explicit_config_file_path() {
    let temp = TempDir::new().unwrap();
    let custom = temp.path().join("conf/custom.toml");
    fs::create_dir_all(custom.parent().unwrap()).unwrap();
    fs::write(&custom, "workspace_root = \"..\"\n").unwrap();

    let config = ConfigLoader::load_from_file(&custom).unwrap();
    assert_eq!(config.workspace_root, Some(PathBuf::from("..")));
    assert!(!ConfigLoader::exists(temp.path()));
}

#[test]
fn test_invalid_config_lists_every_problem() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        "output_path = \"/abs/out.md\"\n[watch]\ndebounce_ms = 0\n[logging]\nformat = \"xml\"\n",
    );

    match ConfigLoader::load(temp.path()).unwrap_err() {
        TwiggyError::InvalidConfig(message) => {
            assert!(message.contains("output_path"));
            assert!(message.contains("debounce_ms"));
            assert!(message.contains("logging"));
        }
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn test_wrong_value_type_is_config_error() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "sync_gitignore = \"sometimes\"\n");

    let err = ConfigLoader::load(temp.path()).unwrap_err();
    assert!(err.is_config_error());
}
