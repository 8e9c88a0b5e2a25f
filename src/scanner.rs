//! Source discovery
//!
//! Expands the configured glob patterns against the source root and yields
//! the regular files that currently match. Scanning is stateless: every call
//! re-walks the filesystem, so the result always reflects what is on disk
//! right now. Candidates that disappear between directory listing and stat
//! are skipped, not errors.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ignore::overrides::{Override, OverrideBuilder};
use tracing::debug;

use crate::config::ConfigWarning;
use crate::error::{BuildError, BuildResult};

/// One source file found by a scan
///
/// Scan-local record; recomputed every pass, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path, used as the cache key
    pub path: PathBuf,
    /// Modification time at scan time
    pub modified: SystemTime,
}

/// Walks a source root according to a list of glob patterns
#[derive(Debug)]
pub struct SourceScanner {
    root: PathBuf,
    patterns: Vec<String>,
    matcher: Override,
}

impl SourceScanner {
    /// Compile `patterns` into a matcher over `root`
    ///
    /// Patterns use gitignore-style glob syntax; `**` crosses directories.
    /// An invalid pattern fails construction, not the scan.
    pub fn new(root: impl Into<PathBuf>, patterns: &[String]) -> BuildResult<Self> {
        let root = root.into();
        let matcher = compile_patterns(&root, patterns)?;
        Ok(Self {
            root,
            patterns: patterns.to_vec(),
            matcher,
        })
    }

    /// Walk the root and yield every matching regular file
    ///
    /// Lazy and restartable; overlapping patterns cannot yield a file twice
    /// because all patterns share one matcher and the tree is walked once.
    pub fn scan(&self) -> Scan<'_> {
        Scan::new(&self.root, &self.matcher)
    }

    /// Report configured patterns that match nothing
    ///
    /// Each pattern is checked on its own so a pattern shadowed by a broader
    /// one is still validated. Zero matches is a warning, never an error: the
    /// build proceeds and simply compiles nothing for that pattern.
    pub fn check_patterns(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        for pattern in &self.patterns {
            let matcher = match compile_patterns(&self.root, std::slice::from_ref(pattern)) {
                Ok(m) => m,
                Err(_) => continue,
            };
            if Scan::new(&self.root, &matcher).next().is_none() {
                warnings.push(ConfigWarning::PatternMatchesNothing {
                    pattern: pattern.clone(),
                    root: self.root.clone(),
                });
            }
        }
        warnings
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn compile_patterns(root: &Path, patterns: &[String]) -> BuildResult<Override> {
    let mut builder = OverrideBuilder::new(root);
    for pattern in patterns {
        builder
            .add(pattern)
            .map_err(|e| BuildError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
    }
    builder.build().map_err(|e| BuildError::Pattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

/// Lazy depth-first walk yielding matching regular files
///
/// Directory symlinks are not followed; a symlink that resolves to a regular
/// file counts as one. Entries whose metadata cannot be read are skipped.
pub struct Scan<'a> {
    root: &'a Path,
    matcher: &'a Override,
    stack: Vec<fs::ReadDir>,
}

impl<'a> Scan<'a> {
    fn new(root: &'a Path, matcher: &'a Override) -> Self {
        let mut stack = Vec::new();
        match fs::read_dir(root) {
            Ok(read_dir) => stack.push(read_dir),
            Err(e) => debug!(root = %root.display(), error = %e, "source root unreadable"),
        }
        Self {
            root,
            matcher,
            stack,
        }
    }
}

impl Iterator for Scan<'_> {
    type Item = SourceFile;

    fn next(&mut self) -> Option<SourceFile> {
        while let Some(read_dir) = self.stack.last_mut() {
            let entry = match read_dir.next() {
                None => {
                    self.stack.pop();
                    continue;
                }
                Some(Err(_)) => continue,
                Some(Ok(entry)) => entry,
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(_) => continue,
            };

            if file_type.is_dir() {
                if let Ok(child) = fs::read_dir(&path) {
                    self.stack.push(child);
                }
                continue;
            }

            let relative = match path.strip_prefix(self.root) {
                Ok(r) => r,
                Err(_) => continue,
            };
            if !self.matcher.matched(relative, false).is_whitelist() {
                continue;
            }

            // Re-stat through symlinks: only regular files are sources, and
            // the file may have vanished since the directory was listed.
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => match meta.modified() {
                    Ok(modified) => return Some(SourceFile { path, modified }),
                    Err(_) => continue,
                },
                Ok(_) => continue,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping unreadable candidate");
                    continue;
                }
            }
        }
        None
    }
}
