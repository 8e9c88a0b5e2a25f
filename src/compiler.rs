//! Compiler port
//!
//! The SCSS-to-CSS compilation algorithm is an external collaborator. The
//! engine talks to it through the [`Compiler`] trait and an explicit options
//! struct; bindings to libsass, `grass`, or a test stub all plug in the same
//! way. A closure with the right signature implements the trait directly.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Output formatting style requested from the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Let the compiler pick its own default
    #[default]
    Default,
    Compact,
    Compressed,
    Expanded,
    Nested,
}

/// Options passed to the compiler for one source file
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Request a source map alongside the CSS
    pub source_map: bool,
    /// Output formatting style
    pub output_style: OutputStyle,
    /// Extra directories searched for `@import`/`@use` targets, in order
    pub include_paths: Vec<PathBuf>,
}

/// Result of compiling one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    /// Generated CSS text
    pub css: String,
    /// Source map text, present only when requested and produced
    pub map: Option<String>,
}

impl CompileOutput {
    /// CSS-only output
    pub fn css(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            map: None,
        }
    }

    /// CSS plus source map
    pub fn with_map(css: impl Into<String>, map: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            map: Some(map.into()),
        }
    }
}

/// Diagnostic from a failed compilation of one source file
///
/// Line and column are optional because not every compiler failure points at
/// a position (unreadable file, missing import target).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// Source file the compiler was invoked on
    pub file: PathBuf,
    /// 1-based line of the diagnostic, when known
    pub line: Option<u32>,
    /// 1-based column of the diagnostic, when known
    pub column: Option<u32>,
    /// Compiler's message
    pub message: String,
}

impl CompileError {
    /// Diagnostic without position information
    pub fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            column: None,
            message: message.into(),
        }
    }

    /// Diagnostic pointing at a line and column
    pub fn at(
        file: impl Into<PathBuf>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
            column: Some(column),
            message: message.into(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(
                f,
                "{}:{}:{}: {}",
                self.file.display(),
                line,
                column,
                self.message
            ),
            (Some(line), None) => {
                write!(f, "{}:{}: {}", self.file.display(), line, self.message)
            }
            _ => write!(f, "{}: {}", self.file.display(), self.message),
        }
    }
}

impl std::error::Error for CompileError {}

/// Abstract compiler interface
///
/// Implementations compile one source file to CSS text and, when requested,
/// a source map. Errors carry the compiler's own diagnostic and abort only
/// the failing source, never the whole pass.
pub trait Compiler {
    /// Compile `source` with the given options
    fn compile(&self, source: &Path, options: &CompileOptions)
        -> Result<CompileOutput, CompileError>;
}

impl<F> Compiler for F
where
    F: Fn(&Path, &CompileOptions) -> Result<CompileOutput, CompileError>,
{
    fn compile(
        &self,
        source: &Path,
        options: &CompileOptions,
    ) -> Result<CompileOutput, CompileError> {
        self(source, options)
    }
}
