//! Snapshot pipeline: ignore rules, scan, render, and atomic write.
//!
//! One [`SnapshotGenerator::generate`] call is one full cycle. Both the
//! `scan` command and every watcher cycle go through here.

use crate::config::TwiggyConfig;
use crate::error::{TwiggyError, WriteError};
use crate::ignore::IgnoreMatcher;
use crate::render::{self, document};
use crate::tree::{Scan, ScanNote, ScanStats, Walker};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::Builder;
use tracing::{debug, info};

/// A rendered scan that has not been written yet
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub scan: Scan,
    pub document: String,
}

/// Result of one generate cycle
#[derive(Debug, Clone)]
pub struct SnapshotOutcome {
    pub output_path: PathBuf,
    pub stats: ScanStats,
    pub notes: Vec<ScanNote>,
    /// False when the document on disk already matched
    pub written: bool,
}

pub struct SnapshotGenerator {
    root: PathBuf,
    config: Arc<TwiggyConfig>,
}

impl SnapshotGenerator {
    pub fn new(root: PathBuf, config: Arc<TwiggyConfig>) -> Self {
        Self { root, config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &TwiggyConfig {
        &self.config
    }

    /// Absolute path of the output document.
    pub fn output_path(&self) -> PathBuf {
        self.config.output_file(&self.root)
    }

    /// Ignore rules for this workspace. `.gitignore` is read fresh each call.
    pub fn matcher(&self) -> IgnoreMatcher {
        IgnoreMatcher::from_config(&self.config, &self.root)
    }

    /// Scan and render without writing.
    pub fn build(&self) -> Result<Snapshot, TwiggyError> {
        self.build_with(&self.matcher())
    }

    pub fn build_with(&self, matcher: &IgnoreMatcher) -> Result<Snapshot, TwiggyError> {
        let walker = Walker::with_config(self.root.clone(), self.config.walker_config());
        let scan = walker.scan(matcher)?;
        let body = render::render(&scan.root, self.config.output_format);
        let document = document::render_document(&scan.root.name, &body);
        Ok(Snapshot { scan, document })
    }

    /// Run one full cycle and write the document.
    pub fn generate(&self) -> Result<SnapshotOutcome, TwiggyError> {
        self.generate_with(&self.matcher())
    }

    pub fn generate_with(&self, matcher: &IgnoreMatcher) -> Result<SnapshotOutcome, TwiggyError> {
        let snapshot = self.build_with(matcher)?;
        let output_path = self.output_path();
        let written = write_if_changed(&output_path, &snapshot.document)?;

        info!(
            output = %output_path.display(),
            directories = snapshot.scan.stats.directories,
            files = snapshot.scan.stats.files,
            written,
            "Snapshot generated"
        );

        Ok(SnapshotOutcome {
            output_path,
            stats: snapshot.scan.stats,
            notes: snapshot.scan.notes,
            written,
        })
    }
}

/// Write `content` unless the file already holds exactly that. Returns
/// whether a write happened.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool, WriteError> {
    if let Ok(existing) = fs::read(path) {
        if existing == content.as_bytes() {
            debug!(path = %path.display(), "Output unchanged, skipping write");
            return Ok(false);
        }
    }
    write_atomic(path, content)?;
    Ok(true)
}

/// Write through a temporary file in the target directory, then rename it
/// over the target. Readers see either the old or the new document.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), WriteError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|source| WriteError::CreateDir {
        path: parent.clone(),
        source,
    })?;

    let write_err = |source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    };
    // The watcher's event filter drops `.tmp` names.
    let mut temp = Builder::new()
        .prefix(".twiggy-")
        .suffix(".tmp")
        .tempfile_in(&parent)
        .map_err(write_err)?;
    temp.write_all(content.as_bytes()).map_err(write_err)?;
    temp.flush().map_err(write_err)?;

    temp.persist(path).map_err(|e| WriteError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
