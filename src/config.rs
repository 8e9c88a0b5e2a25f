//! Build configuration
//!
//! `BuildConfig` is the complete set of inputs the engine consumes. It can be
//! built literally or deserialized from a TOML table; every field except the
//! two roots has a default. Where the configuration comes from (settings
//! files, environment, flags) is the caller's concern.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compiler::{CompileOptions, OutputStyle};
use crate::error::{BuildError, BuildResult};

/// Configuration for a [`crate::build::BuildEngine`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory scanned for source files
    pub source_root: PathBuf,

    /// Ordered glob patterns expanded against `source_root`
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Directory generated CSS is written under, mirroring `source_root`
    pub output_root: PathBuf,

    /// Output formatting style handed to the compiler
    #[serde(default)]
    pub output_style: OutputStyle,

    /// Generate a `.map` file beside each output
    #[serde(default)]
    pub source_map: bool,

    /// Extra directories the compiler searches for imports, in order
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,
}

fn default_patterns() -> Vec<String> {
    vec!["**/*.scss".to_string()]
}

impl BuildConfig {
    /// Minimal configuration: scan `source_root` for `**/*.scss`, write CSS
    /// under `output_root`
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            patterns: default_patterns(),
            output_root: output_root.into(),
            output_style: OutputStyle::Default,
            source_map: false,
            include_paths: Vec::new(),
        }
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str, origin: &Path) -> BuildResult<Self> {
        toml::from_str(text).map_err(|e| BuildError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a configuration from a TOML file
    pub fn load(path: &Path) -> BuildResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text, path)
    }

    /// Compiler options derived from this configuration
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            source_map: self.source_map,
            output_style: self.output_style,
            include_paths: self.include_paths.clone(),
        }
    }
}

/// Non-fatal configuration problem reported by [`crate::build::BuildEngine::check`]
///
/// Warnings never stop a build; a pattern that matches nothing simply
/// compiles nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A configured glob pattern matched no file under the source root
    PatternMatchesNothing { pattern: String, root: PathBuf },
    /// A configured include path does not exist or is not a directory
    MissingIncludePath { path: PathBuf },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternMatchesNothing { pattern, root } => {
                write!(f, "pattern '{}' matches no files in {}", pattern, root.display())
            }
            Self::MissingIncludePath { path } => {
                write!(f, "include path does not exist: {}", path.display())
            }
        }
    }
}
