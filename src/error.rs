//! Error types for sassbuild
//!
//! Library errors use `thiserror`. Per-source compile and write failures are
//! collected in [`crate::build::PassResult`] rather than aborting a pass.

use std::path::PathBuf;
use thiserror::Error;

use crate::compiler::CompileError;

/// Result type alias for sassbuild operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Main error type for sassbuild operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// Source root does not exist or is not a directory
    #[error("source root not found: {path}")]
    SourceRootNotFound { path: PathBuf },

    /// A path was asked to map but is not under the source root
    #[error("source '{path}' is outside source root '{root}'")]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },

    /// A configured glob pattern failed to compile
    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// One source failed to compile
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// An output file could not be written
    #[error("failed to write output '{path}': {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
