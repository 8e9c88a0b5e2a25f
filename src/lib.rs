//! sassbuild - incremental SCSS build engine
//!
//! sassbuild watches nothing and persists nothing: every query triggers one
//! build pass that scans the source tree by glob, recompiles only the sources
//! whose modification time no longer matches the in-memory cache (or whose
//! outputs were deleted out from under it), and garbage-collects outputs
//! whose sources have disappeared. The SCSS compiler itself is pluggable
//! through the [`Compiler`] trait.

pub mod build;
pub mod compiler;
pub mod config;
pub mod error;
pub mod fs;
pub mod paths;
pub mod scanner;

// Re-exports for convenience
pub use build::{BuildCache, BuildEngine, PassEvent, PassFailure, PassResult};
pub use compiler::{CompileError, CompileOptions, CompileOutput, Compiler, OutputStyle};
pub use config::{BuildConfig, ConfigWarning};
pub use error::{BuildError, BuildResult};
pub use paths::OutputLayout;
pub use scanner::{SourceFile, SourceScanner};
