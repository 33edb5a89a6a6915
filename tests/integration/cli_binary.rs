//! Integration tests for the twiggy binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use crate::integration::test_utils::{write_config, write_tree};

/// Run the binary in `workspace` with an isolated config home.
fn twiggy(workspace: &Path, home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_twiggy"))
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("TWIGGY_LOG")
        .env_remove("TWIGGY_OUTPUT_FORMAT")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_init_defaults_then_scan() {
    let workspace = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_tree(workspace.path(), &["src/app.py", "node_modules/x.js"]);

    let init = twiggy(workspace.path(), home.path(), &["init", "--defaults"]);
    assert!(init.status.success(), "{}", String::from_utf8_lossy(&init.stderr));
    assert!(stdout(&init).contains("twiggy.toml"));

    let scan = twiggy(workspace.path(), home.path(), &["scan"]);
    assert!(scan.status.success(), "{}", String::from_utf8_lossy(&scan.stderr));
    assert!(stdout(&scan).contains("Wrote"));

    let doc =
        fs::read_to_string(workspace.path().join(".cursor/rules/file-structure.mdc")).unwrap();
    assert!(doc.contains("<file name=\"app.py\"/>"));
    assert!(!doc.contains("node_modules"));

    let again = twiggy(workspace.path(), home.path(), &["scan"]);
    assert!(stdout(&again).contains("Unchanged"));
}

#[test]
fn test_scan_without_config_fails() {
    let workspace = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    let output = twiggy(workspace.path(), home.path(), &["scan"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("twiggy init"));
}

#[test]
fn test_scan_stdout_prints_document() {
    let workspace = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_tree(workspace.path(), &["lib/util.rs"]);
    write_config(workspace.path(), "output_format = \"tree\"\n");

    let output = twiggy(workspace.path(), home.path(), &["scan", "--stdout"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("---\nalwaysApply: true\n---"));
    assert!(text.contains("└── util.rs"));
    assert!(!workspace.path().join(".cursor").exists());
}

#[test]
fn test_environment_overrides_config_file() {
    let workspace = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_tree(workspace.path(), &["a.txt"]);
    write_config(workspace.path(), "output_format = \"xml\"\n");

    let output = Command::new(env!("CARGO_BIN_EXE_twiggy"))
        .arg("--workspace")
        .arg(workspace.path())
        .args(["scan", "--stdout"])
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("TWIGGY_OUTPUT_FORMAT", "tree")
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("── a.txt"));
    assert!(!text.contains("<file"));
}

#[test]
fn test_global_config_applies_under_workspace_file() {
    let workspace = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_tree(workspace.path(), &["scratch/x.txt", "keep.txt"]);
    write_config(workspace.path(), "output_format = \"tree\"\n");
    let global_dir = home.path().join(".config/twiggy");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("config.toml"),
        "output_format = \"xml\"\nignore_patterns = [\"scratch\"]\n",
    )
    .unwrap();

    let output = twiggy(workspace.path(), home.path(), &["scan", "--stdout"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("── keep.txt"), "workspace file wins: {}", text);
    assert!(!text.contains("scratch"));
}

#[test]
fn test_status_json() {
    let workspace = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_tree(workspace.path(), &["src/main.rs"]);
    write_config(workspace.path(), "");

    let output = twiggy(workspace.path(), home.path(), &["status", "--format", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["scan"]["files"], 2);
    assert_eq!(value["output"]["exists"], false);
}

#[test]
fn test_init_list_is_read_only() {
    let workspace = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    let output = twiggy(workspace.path(), home.path(), &["init", "--list"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Initialization Preview"));
    assert!(!workspace.path().join("twiggy.toml").exists());
}
