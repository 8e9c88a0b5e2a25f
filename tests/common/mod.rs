//! Common test utilities for sassbuild integration tests.
//!
//! Provides:
//! - `TestProject`: isolated source/output tree in a tempdir
//! - `StubCompiler`: deterministic compiler recording every invocation
//! - Fixture SCSS content constants
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::TempDir;

use sassbuild::{
    BuildConfig, BuildEngine, CompileError, CompileOptions, CompileOutput, Compiler,
};

/// Site-wide stylesheet fixture
pub const SITE_SCSS: &str = r#"// site specific css
$fore-color: midnightblue;

h1, h2, h3 {
  font-weight: bold;
  color: $fore-color;
}
"#;

/// Nested admin stylesheet fixture
pub const ADMIN_SCSS: &str = r#"// admin tweaks
.field-test { line-height: 1.2em; }
"#;

/// Deeper nested stylesheet fixture
pub const EXTRA_SCSS: &str = r#"
$bg-color: rgba(0, 0, 0, 0.4);

body, html { height: 100%; }
"#;

/// Marker that makes `StubCompiler` fail with a syntax diagnostic
pub const SYNTAX_ERROR_MARKER: &str = "!!parse-error";

/// Deterministic stand-in for a real SCSS compiler.
///
/// Reads the source like a real compiler would, fails with a positioned
/// diagnostic when the content carries `SYNTAX_ERROR_MARKER`, and records
/// every invocation so tests can count recompilations.
#[derive(Clone, Default)]
pub struct StubCompiler {
    invocations: Arc<Mutex<Vec<PathBuf>>>,
}

impl StubCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths compiled so far, in order
    pub fn invocations(&self) -> Vec<PathBuf> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

impl Compiler for StubCompiler {
    fn compile(
        &self,
        source: &Path,
        options: &CompileOptions,
    ) -> Result<CompileOutput, CompileError> {
        self.invocations.lock().unwrap().push(source.to_path_buf());

        let content = fs::read_to_string(source)
            .map_err(|e| CompileError::new(source, e.to_string()))?;
        if content.contains(SYNTAX_ERROR_MARKER) {
            return Err(CompileError::at(source, 2, 5, "expected \"{\""));
        }

        let css = format!("/* compiled from {} */\n{}", source.display(), content);
        if options.source_map {
            let map = format!(r#"{{"version": 3, "sources": ["{}"]}}"#, source.display());
            Ok(CompileOutput::with_map(css, map))
        } else {
            Ok(CompileOutput::css(css))
        }
    }
}

/// Isolated project tree: `scss/` sources, `css/` outputs, one tempdir.
pub struct TestProject {
    dir: TempDir,
    pub source_root: PathBuf,
    pub output_root: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        let source_root = dir.path().join("scss");
        let output_root = dir.path().join("css");
        fs::create_dir_all(&source_root).expect("create source root");
        Self {
            dir,
            source_root,
            output_root,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a source file and back-date its mtime so outputs written later
    /// are always strictly newer, even on coarse-timestamp filesystems.
    pub fn write_source(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.source_root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).expect("create source dirs");
        fs::write(&path, content).expect("write source");
        set_mtime(&path, seconds_ago(120));
        path
    }

    /// Advance a source's mtime (newer than `write_source`, still in the
    /// past), leaving content untouched: the moral equivalent of `touch`.
    pub fn touch_source(&self, relative: &str) {
        set_mtime(&self.source_root.join(relative), seconds_ago(30));
    }

    pub fn remove_source(&self, relative: &str) {
        fs::remove_file(self.source_root.join(relative)).expect("remove source");
    }

    pub fn source_path(&self, relative: &str) -> PathBuf {
        self.source_root.join(relative)
    }

    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.output_root.join(relative)
    }

    pub fn read_output(&self, relative: &str) -> String {
        fs::read_to_string(self.output_path(relative)).expect("read output")
    }

    pub fn config(&self) -> BuildConfig {
        BuildConfig::new(&self.source_root, &self.output_root)
    }

    /// Engine over a fresh `StubCompiler`; returns the compiler handle too.
    pub fn engine(&self) -> (BuildEngine<StubCompiler>, StubCompiler) {
        self.engine_with_config(self.config())
    }

    pub fn engine_with_config(
        &self,
        config: BuildConfig,
    ) -> (BuildEngine<StubCompiler>, StubCompiler) {
        let compiler = StubCompiler::new();
        let engine = BuildEngine::new(config, compiler.clone()).expect("construct engine");
        (engine, compiler)
    }
}

/// Set a file's mtime to an absolute time
pub fn set_mtime(path: &Path, at: SystemTime) {
    filetime::set_file_mtime(path, FileTime::from_system_time(at)).expect("set mtime");
}

/// A moment `secs` seconds before now
pub fn seconds_ago(secs: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(secs)
}
