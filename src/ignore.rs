//! Ignore rules for scan and watch.
//!
//! An [`IgnoreMatcher`] is an ordered, additive list of rules tagged with the
//! source they came from: the built-in defaults, the user's `ignore_patterns`,
//! the workspace `.gitignore` (when `sync_gitignore` is on), and finally the
//! output document itself. A path is ignored when any rule matches it.
//!
//! Rules without a `/` match any single path segment (`node_modules`,
//! `*.egg-info`). Rules with a `/` match the relative path or one of its
//! ancestors (`docs/_build` also hides `docs/_build/html/index.html`). A
//! trailing `/` restricts a rule to directories.

use crate::config::TwiggyConfig;
use crate::error::TwiggyError;
use crate::tree::node::NodeKind;
use crate::tree::path::normalize_path_string;
use globset::{GlobBuilder, GlobMatcher};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Component, Path};
use tracing::debug;

/// Folders and files that are never worth listing.
pub const BUILTIN_DEFAULTS: &[&str] = &[
    // JavaScript / web
    "node_modules",
    ".next",
    ".nuxt",
    "dist",
    "build",
    ".output",
    ".vercel",
    ".netlify",
    "out",
    ".cache",
    ".parcel-cache",
    ".webpack",
    "coverage",
    ".nyc_output",
    ".jest",
    // Python
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    "venv",
    "env",
    ".venv",
    ".env",
    "site-packages",
    ".coverage",
    "htmlcov",
    "*.egg-info",
    ".eggs",
    // Rust, Go, JVM, native
    "target",
    "Cargo.lock",
    "vendor",
    ".gradle",
    ".idea",
    ".vs",
    "cmake-build-debug",
    "cmake-build-release",
    ".bundle",
    // Editors, VCS, OS
    ".vscode",
    ".vscode-test",
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    ".DS_Store",
    "Thumbs.db",
    ".Trash",
    // Logs, scratch, generated sites
    "logs",
    "log",
    "tmp",
    "temp",
    ".tmp",
    ".temp",
    "_site",
    ".docusaurus",
    "public",
    "docs/_build",
    "ios/build",
    "android/build",
    ".expo",
    // Databases, infrastructure, tooling
    "*.db",
    "*.sqlite",
    "*.sqlite3",
    ".docker",
    ".terraform",
    ".serverless",
    ".yarn",
    ".pnpm-store",
    ".rush",
    ".playwright",
    "cypress/videos",
    "cypress/screenshots",
    "test-results",
    ".sass-cache",
    ".postcssrc",
    ".eslintcache",
    ".stylelintcache",
    ".github",
    ".husky",
];

const GITIGNORE_FILE: &str = ".gitignore";
const GITIGNORE_MARKER: &str = "# Twiggy";

/// Where an ignore rule came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSource {
    Default,
    User,
    Gitignore,
    Output,
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleSource::Default => "default",
            RuleSource::User => "user",
            RuleSource::Gitignore => "gitignore",
            RuleSource::Output => "output",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
enum PatternMatcher {
    Glob(GlobMatcher),
    /// Patterns globset rejects are compared literally.
    Literal(String),
}

impl PatternMatcher {
    fn is_match(&self, candidate: &str) -> bool {
        match self {
            PatternMatcher::Glob(glob) => glob.is_match(candidate),
            PatternMatcher::Literal(literal) => literal == candidate,
        }
    }
}

/// A single normalized ignore rule
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// Normalized pattern (no leading `./` or `/`, no trailing `/`)
    pub pattern: String,
    pub source: RuleSource,
    /// Matches directories only (pattern was written with a trailing `/`)
    pub dir_only: bool,
    /// Pattern contains a `/` and is matched against whole relative paths
    pub anchored: bool,
    matcher: PatternMatcher,
}

impl IgnoreRule {
    /// Parse a raw pattern. Returns `None` for blank lines and comments.
    pub fn parse(raw: &str, source: RuleSource) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let slashed = trimmed.replace('\\', "/");
        let dir_only = slashed.ends_with('/');
        let mut pattern = slashed.as_str();
        while let Some(rest) = pattern.strip_prefix("./") {
            pattern = rest;
        }
        let pattern = normalize_path_string(pattern.trim_start_matches('/'));
        let pattern = pattern.trim_end_matches('/').to_string();
        if pattern.is_empty() {
            return None;
        }

        let matcher = match GlobBuilder::new(&pattern).literal_separator(true).build() {
            Ok(glob) => PatternMatcher::Glob(glob.compile_matcher()),
            Err(e) => {
                debug!(
                    pattern = %pattern,
                    error = %e,
                    "Pattern is not a valid glob, matching literally"
                );
                PatternMatcher::Literal(pattern.clone())
            }
        };

        Some(Self {
            anchored: pattern.contains('/'),
            pattern,
            source,
            dir_only,
            matcher,
        })
    }

    /// Match against the segments of a relative path. `is_dir` describes the
    /// last segment; every earlier segment is a directory.
    fn matches(&self, segments: &[&str], is_dir: bool) -> bool {
        let last = segments.len().saturating_sub(1);
        if self.anchored {
            let mut prefix = String::new();
            for (i, segment) in segments.iter().enumerate() {
                if i > 0 {
                    prefix.push('/');
                }
                prefix.push_str(segment);
                let segment_is_dir = i < last || is_dir;
                if self.dir_only && !segment_is_dir {
                    continue;
                }
                if self.matcher.is_match(&prefix) {
                    return true;
                }
            }
            false
        } else {
            segments.iter().enumerate().any(|(i, segment)| {
                let segment_is_dir = i < last || is_dir;
                (!self.dir_only || segment_is_dir) && self.matcher.is_match(segment)
            })
        }
    }
}

/// Ordered set of ignore rules
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// An empty matcher that ignores nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A matcher holding only the built-in defaults.
    pub fn with_defaults() -> Self {
        let mut matcher = Self::new();
        matcher.extend(BUILTIN_DEFAULTS.iter().copied(), RuleSource::Default);
        matcher
    }

    /// Build the full rule set for a workspace: defaults, user patterns,
    /// `.gitignore` (when enabled), then the output document path.
    pub fn from_config(config: &TwiggyConfig, root: &Path) -> Self {
        let mut matcher = Self::with_defaults();
        matcher.extend(config.ignore_patterns.iter(), RuleSource::User);
        if config.sync_gitignore {
            matcher.extend(read_gitignore_patterns(root).iter(), RuleSource::Gitignore);
        }
        matcher.add_pattern(&config.output_pattern(), RuleSource::Output);
        matcher
    }

    /// Add one pattern. Returns false when the pattern was blank or a comment.
    pub fn add_pattern(&mut self, pattern: &str, source: RuleSource) -> bool {
        match IgnoreRule::parse(pattern, source) {
            Some(rule) => {
                self.rules.push(rule);
                true
            }
            None => false,
        }
    }

    pub fn extend<I, S>(&mut self, patterns: I, source: RuleSource)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.add_pattern(pattern.as_ref(), source);
        }
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether a root-relative path is ignored.
    pub fn is_ignored(&self, relative: &Path, kind: NodeKind) -> bool {
        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(crate::tree::path::normalize_name(name)),
                _ => None,
            })
            .collect();
        let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
        self.matches_segments(&refs, kind.is_dir())
    }

    /// Whether a root-relative, `/`-separated path is ignored.
    pub fn is_ignored_str(&self, relative: &str, is_dir: bool) -> bool {
        let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
        self.matches_segments(&segments, is_dir)
    }

    fn matches_segments(&self, segments: &[&str], is_dir: bool) -> bool {
        if segments.is_empty() {
            return false;
        }
        self.rules.iter().any(|rule| rule.matches(segments, is_dir))
    }
}

/// Read the workspace `.gitignore` as a list of patterns. Blank lines and
/// comments are skipped; negations (`!pattern`) cannot un-ignore anything in
/// an additive rule set and are dropped.
pub fn read_gitignore_patterns(workspace_root: &Path) -> Vec<String> {
    let gitignore_path = workspace_root.join(GITIGNORE_FILE);
    if !gitignore_path.is_file() {
        return Vec::new();
    }
    let contents = match fs::read_to_string(&gitignore_path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!(path = %gitignore_path.display(), error = %e, "Could not read .gitignore");
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('!') {
            debug!(pattern = line, "Dropping .gitignore negation");
            continue;
        }
        out.push(line.to_string());
    }
    out
}

/// Result of [`ensure_gitignore_entry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitignoreUpdate {
    Created,
    Appended,
    AlreadyPresent,
}

/// Make sure `.gitignore` lists `entry`, appending it under a `# Twiggy`
/// marker. Creates `.gitignore` when missing.
pub fn ensure_gitignore_entry(
    workspace_root: &Path,
    entry: &str,
) -> Result<GitignoreUpdate, TwiggyError> {
    let gitignore_path = workspace_root.join(GITIGNORE_FILE);

    if !gitignore_path.exists() {
        fs::write(&gitignore_path, format!("{}\n{}\n", GITIGNORE_MARKER, entry))?;
        return Ok(GitignoreUpdate::Created);
    }

    let contents = fs::read_to_string(&gitignore_path)?;
    let anchored = format!("/{}", entry);
    if contents
        .lines()
        .map(str::trim)
        .any(|line| line == entry || line == anchored)
    {
        return Ok(GitignoreUpdate::AlreadyPresent);
    }

    let mut file = fs::OpenOptions::new().append(true).open(&gitignore_path)?;
    let separator = if contents.is_empty() || contents.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    write!(file, "{}\n{}\n{}\n", separator, GITIGNORE_MARKER, entry)?;
    Ok(GitignoreUpdate::Appended)
}
