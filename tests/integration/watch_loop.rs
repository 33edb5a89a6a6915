//! Integration tests for the watch daemon

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use twiggy::config::TwiggyConfig;
use twiggy::snapshot::SnapshotGenerator;
use twiggy::watch::{CycleReport, CycleTrigger, WatchConfig, WatchDaemon};

use crate::integration::test_utils::write_tree;

const WAIT: Duration = Duration::from_secs(10);

/// Start a daemon on its own thread; every cycle's trigger is forwarded.
fn spawn_daemon(
    root: &Path,
) -> (
    twiggy::watch::WatchHandle,
    mpsc::Receiver<(CycleTrigger, bool)>,
    thread::JoinHandle<()>,
    PathBuf,
) {
    let root = dunce::canonicalize(root).unwrap();
    let mut config = TwiggyConfig {
        output_path: PathBuf::from("structure.md"),
        ..Default::default()
    };
    config.watch.debounce_ms = 100;
    let config = Arc::new(config);

    let generator = SnapshotGenerator::new(root.clone(), Arc::clone(&config));
    let output = generator.output_path();
    let daemon = WatchDaemon::new(generator, WatchConfig::from_config(root, &config));
    let handle = daemon.handle();

    let (tx, rx) = mpsc::channel();
    let join = thread::spawn(move || {
        daemon
            .start(|report| {
                let entry = match report {
                    CycleReport::Completed { trigger, outcome } => (*trigger, outcome.written),
                    CycleReport::Failed { trigger, .. } => (*trigger, false),
                };
                let _ = tx.send(entry);
            })
            .unwrap();
    });
    (handle, rx, join, output)
}

#[test]
fn test_watch_writes_initial_and_updates_on_change() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["src/main.rs"]);
    let (handle, rx, join, output) = spawn_daemon(temp.path());

    let (trigger, written) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(trigger, CycleTrigger::Initial);
    assert!(written);
    assert!(fs::read_to_string(&output).unwrap().contains("main.rs"));

    // Give the watcher time to register after the initial cycle.
    thread::sleep(Duration::from_millis(500));
    fs::write(temp.path().join("added.txt"), "").unwrap();

    let deadline = Instant::now() + WAIT;
    let mut updated = false;
    while Instant::now() < deadline {
        if fs::read_to_string(&output)
            .map(|doc| doc.contains("added.txt"))
            .unwrap_or(false)
        {
            updated = true;
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }

    handle.stop();
    join.join().unwrap();
    assert!(updated, "document should list the new file");
}

#[test]
fn test_ignored_changes_do_not_trigger_cycles() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["keep.txt"]);
    let (handle, rx, join, _output) = spawn_daemon(temp.path());

    let (trigger, _) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(trigger, CycleTrigger::Initial);
    thread::sleep(Duration::from_millis(500));

    write_tree(temp.path(), &["node_modules/pkg/index.js", "notes.txt.swp"]);
    assert!(
        rx.recv_timeout(Duration::from_millis(800)).is_err(),
        "ignored paths should not start a cycle"
    );

    fs::write(temp.path().join("real.txt"), "").unwrap();
    let (trigger, written) = rx.recv_timeout(WAIT).unwrap();
    assert!(matches!(trigger, CycleTrigger::Changes(n) if n >= 1));
    assert!(written);

    handle.stop();
    join.join().unwrap();
}

#[test]
fn test_new_hidden_directory_is_picked_up() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["keep.txt"]);
    let (handle, rx, join, output) = spawn_daemon(temp.path());

    let (trigger, _) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(trigger, CycleTrigger::Initial);
    thread::sleep(Duration::from_millis(500));

    fs::create_dir(temp.path().join(".storybook")).unwrap();
    let result = rx.recv_timeout(WAIT);

    handle.stop();
    join.join().unwrap();
    let (trigger, written) = result.unwrap();
    assert!(matches!(trigger, CycleTrigger::Changes(_)));
    assert!(written);
    assert!(fs::read_to_string(&output)
        .unwrap()
        .contains("<directory name=\".storybook\"/>"));
}
