//! Watch Mode Daemon
//!
//! Writes an initial snapshot, then monitors the workspace and regenerates
//! the snapshot whenever its structure changes. Notifications arrive on a
//! channel from the notify callback thread; a single loop thread feeds them
//! through the [`debounce`] state machine and runs each cycle itself, so
//! cycles never overlap.

pub mod debounce;
pub mod events;

use crate::config::TwiggyConfig;
use crate::error::TwiggyError;
use crate::snapshot::{SnapshotGenerator, SnapshotOutcome};
use debounce::{Debouncer, WatchAction, WatchInput, WatchState};
use events::{convert_event, EventFilter};
use notify::{RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub use events::ChangeEvent;

const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Watch mode configuration
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Workspace root directory
    pub workspace_root: PathBuf,
    /// Quiet period after the last change before rescanning
    pub debounce_ms: u64,
    /// How often the loop wakes up to check for `stop()` when idle
    pub poll_interval_ms: u64,
}

impl WatchConfig {
    pub fn from_config(workspace_root: PathBuf, config: &TwiggyConfig) -> Self {
        Self {
            workspace_root,
            debounce_ms: config.watch.debounce_ms,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// What started a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleTrigger {
    Initial,
    /// Debounced batch of this many changes
    Changes(usize),
}

/// Outcome of one watch cycle, handed to the observer
#[derive(Debug)]
pub enum CycleReport {
    Completed {
        trigger: CycleTrigger,
        outcome: SnapshotOutcome,
    },
    Failed {
        trigger: CycleTrigger,
        error: TwiggyError,
    },
}

/// Cloneable handle for stopping a running daemon from another thread.
#[derive(Debug, Clone)]
pub struct WatchHandle {
    running: Arc<RwLock<bool>>,
}

impl WatchHandle {
    pub fn stop(&self) {
        *self.running.write() = false;
    }

    pub fn is_running(&self) -> bool {
        *self.running.read()
    }
}

/// Watch mode daemon
pub struct WatchDaemon {
    generator: SnapshotGenerator,
    config: WatchConfig,
    running: Arc<RwLock<bool>>,
}

impl WatchDaemon {
    pub fn new(generator: SnapshotGenerator, config: WatchConfig) -> Self {
        Self {
            generator,
            config,
            running: Arc::new(RwLock::new(true)),
        }
    }

    pub fn handle(&self) -> WatchHandle {
        WatchHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Stop the daemon; the loop exits at its next wake-up.
    pub fn stop(&self) {
        *self.running.write() = false;
    }

    /// Run until stopped or until the notification channel closes.
    ///
    /// This will:
    /// 1. Write the initial snapshot
    /// 2. Start the file watcher
    /// 3. Debounce changes and regenerate in a loop
    ///
    /// Cycle failures are reported to `observer` and do not stop the loop.
    pub fn start<F>(&self, mut observer: F) -> Result<(), TwiggyError>
    where
        F: FnMut(&CycleReport),
    {
        let root = self.config.workspace_root.clone();
        let mut filter = EventFilter::new(
            root.clone(),
            self.generator.output_path(),
            self.generator.matcher(),
            self.generator.config().include_hidden_files,
        );

        info!(workspace = %root.display(), "Writing initial snapshot");
        self.run_cycle(CycleTrigger::Initial, &mut filter, &mut observer);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;

        info!(
            workspace = %root.display(),
            debounce_ms = self.config.debounce_ms,
            "Watching workspace"
        );

        let debouncer = Debouncer::new(Duration::from_millis(self.config.debounce_ms));
        let poll = Duration::from_millis(self.config.poll_interval_ms.max(1));
        let mut state = WatchState::Idle;

        loop {
            if !*self.running.read() {
                break;
            }

            let timeout = Debouncer::next_deadline(&state)
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .map_or(poll, |remaining| remaining.min(poll));

            match rx.recv_timeout(timeout) {
                Ok(Ok(event)) => match convert_event(&event) {
                    Some(change) if filter.accepts(&change) => {
                        debug!(?change, "Structural change");
                        state = debouncer
                            .step(state, WatchInput::Change(change), Instant::now())
                            .0;
                    }
                    Some(change) => debug!(?change, "Change filtered"),
                    None => {}
                },
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }

            let (next, action) = debouncer.step(state, WatchInput::Tick, Instant::now());
            state = next;
            if let Some(WatchAction::Rescan { events }) = action {
                self.run_cycle(CycleTrigger::Changes(events.len()), &mut filter, &mut observer);
                state = debouncer
                    .step(state, WatchInput::ScanFinished, Instant::now())
                    .0;
            }
        }

        info!("Watch stopped");
        Ok(())
    }

    /// One scan/render/write cycle. The ignore rules are rebuilt first so
    /// edits to `.gitignore` take effect.
    fn run_cycle<F>(&self, trigger: CycleTrigger, filter: &mut EventFilter, observer: &mut F)
    where
        F: FnMut(&CycleReport),
    {
        let matcher = self.generator.matcher();
        let report = match self.generator.generate_with(&matcher) {
            Ok(outcome) => {
                info!(?trigger, written = outcome.written, "Snapshot cycle complete");
                CycleReport::Completed { trigger, outcome }
            }
            Err(error) => {
                warn!(?trigger, "Snapshot cycle failed: {}", error);
                CycleReport::Failed { trigger, error }
            }
        };
        filter.set_matcher(matcher);
        observer(&report);
    }
}
