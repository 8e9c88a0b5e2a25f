//! Output path derivation
//!
//! Every output location is derived from its source path on demand; nothing
//! about the output tree is stored. The derivation is pure: the source's path
//! relative to the source root is re-rooted under the output root with the
//! extension swapped, so the output tree mirrors the source tree.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{BuildError, BuildResult};

/// Extension of generated outputs
const OUTPUT_EXT: &str = "css";

/// Extension of generated source maps
const MAP_EXT: &str = "map";

/// Derives output and map locations from source locations
#[derive(Debug, Clone)]
pub struct OutputLayout {
    source_root: PathBuf,
    output_root: PathBuf,
}

impl OutputLayout {
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
        }
    }

    /// The CSS path for `source`
    ///
    /// Fails if `source` is not lexically under the source root; the check is
    /// deliberately lexical (no canonicalization), matching how the scanner
    /// produces source paths.
    pub fn css_path(&self, source: &Path) -> BuildResult<PathBuf> {
        let relative =
            source
                .strip_prefix(&self.source_root)
                .map_err(|_| BuildError::OutsideSourceRoot {
                    path: source.to_path_buf(),
                    root: self.source_root.clone(),
                })?;
        Ok(self.output_root.join(relative).with_extension(OUTPUT_EXT))
    }

    /// The source-map path beside `css_path`
    pub fn map_path(&self, css_path: &Path) -> PathBuf {
        css_path.with_extension(MAP_EXT)
    }

    /// The posix-style path of `css_path` relative to the output root
    ///
    /// This is the name a serving layer asks for.
    pub fn served_path(&self, css_path: &Path) -> BuildResult<String> {
        let relative =
            css_path
                .strip_prefix(&self.output_root)
                .map_err(|_| BuildError::OutsideSourceRoot {
                    path: css_path.to_path_buf(),
                    root: self.output_root.clone(),
                })?;

        let segments: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();
        Ok(segments.join("/"))
    }

    /// Create the output directory for `css_path`, including parents
    ///
    /// Idempotent; an already-existing directory is not an error, even when
    /// another process created it between check and creation.
    pub fn ensure_parent_dir(&self, css_path: &Path) -> BuildResult<()> {
        if let Some(parent) = css_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }
}
