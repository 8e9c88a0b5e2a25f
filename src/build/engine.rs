//! Build engine
//!
//! One `run_pass` call is the whole lifecycle: scan the source tree, rebuild
//! the served index, recompile what is stale, then reconcile the cache
//! against the found set and delete outputs whose sources vanished. A pass
//! never fails as a whole; per-source compile and write errors are collected
//! in the returned [`PassResult`] and retried on the next pass.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;

use crate::build::cache::BuildCache;
use crate::build::staleness::needs_rebuild;
use crate::build::{PassEvent, PassFailure, PassResult};
use crate::compiler::{CompileOptions, Compiler};
use crate::config::{BuildConfig, ConfigWarning};
use crate::error::{BuildError, BuildResult};
use crate::fs;
use crate::paths::OutputLayout;
use crate::scanner::{SourceFile, SourceScanner};

/// Incremental build engine over an opaque compiler
///
/// Owns its [`BuildCache`]; independent engines never interfere, so tests
/// and multi-tenant processes can run several side by side. The cache lives
/// as long as the engine; a fresh engine converges to the correct steady
/// state within one pass by comparing output mtimes on disk.
pub struct BuildEngine<C: Compiler> {
    config: BuildConfig,
    options: CompileOptions,
    layout: OutputLayout,
    scanner: SourceScanner,
    compiler: C,
    cache: BuildCache,
}

impl<C: Compiler> std::fmt::Debug for BuildEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildEngine")
            .field("config", &self.config)
            .field("options", &self.options)
            .field("layout", &self.layout)
            .field("scanner", &self.scanner)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// One found source with its derived output locations, valid for one pass
struct PassEntry {
    source: SourceFile,
    css: PathBuf,
    served: String,
}

impl<C: Compiler> BuildEngine<C> {
    /// Create an engine for `config` driving `compiler`
    ///
    /// The source root must exist as a directory; it is not re-validated on
    /// later passes. Glob patterns are compiled here so a bad pattern fails
    /// construction instead of every scan.
    pub fn new(config: BuildConfig, compiler: C) -> BuildResult<Self> {
        if !config.source_root.is_dir() {
            return Err(BuildError::SourceRootNotFound {
                path: config.source_root.clone(),
            });
        }
        let scanner = SourceScanner::new(&config.source_root, &config.patterns)?;
        let layout = OutputLayout::new(&config.source_root, &config.output_root);
        let options = config.compile_options();
        Ok(Self {
            config,
            options,
            layout,
            scanner,
            compiler,
            cache: BuildCache::new(),
        })
    }

    /// Run one full build pass
    pub fn run_pass(&mut self) -> PassResult {
        self.run_pass_with_callback::<fn(PassEvent)>(None)
    }

    /// Run one full build pass, reporting progress through `callback`
    pub fn run_pass_with_callback<F>(&mut self, mut callback: Option<F>) -> PassResult
    where
        F: FnMut(PassEvent),
    {
        let mut result = PassResult::default();

        // Scanning: collect the found set and rebuild the served index from
        // scratch. Every found source is registered, stale or fresh: the
        // index reflects what is discoverable, not what was just compiled.
        self.cache.begin_pass();
        let mut found: HashSet<PathBuf> = HashSet::new();
        let mut entries: Vec<PassEntry> = Vec::new();
        for source in self.scanner.scan() {
            let Ok(css) = self.layout.css_path(&source.path) else {
                continue;
            };
            let Ok(served) = self.layout.served_path(&css) else {
                continue;
            };
            self.cache.register_served(served.clone(), css.clone());
            found.insert(source.path.clone());
            entries.push(PassEntry { source, css, served });
        }

        // Evaluating + Compiling
        for (index, entry) in entries.iter().enumerate() {
            let wants_map = self.options.source_map;
            let map_mtime = if wants_map {
                fs::modified(&self.layout.map_path(&entry.css))
            } else {
                None
            };
            let stale = needs_rebuild(
                entry.source.modified,
                self.cache.fresh_mtime(&entry.source.path),
                fs::modified(&entry.css),
                map_mtime,
                wants_map,
            );

            if !stale {
                self.cache
                    .record(entry.source.path.clone(), entry.source.modified);
                emit(&mut callback, PassEvent::SourceFresh {
                    index,
                    path: entry.source.path.clone(),
                });
                result.fresh.push(entry.source.path.clone());
                continue;
            }

            emit(&mut callback, PassEvent::SourceStart {
                index,
                path: entry.source.path.clone(),
            });

            match self.compile_one(entry) {
                Ok(()) => {
                    // Recorded only after the output is on disk.
                    self.cache
                        .record(entry.source.path.clone(), entry.source.modified);
                    emit(&mut callback, PassEvent::SourceCompiled {
                        index,
                        path: entry.source.path.clone(),
                    });
                    result.compiled.push(entry.source.path.clone());
                }
                Err(error) => {
                    if !entry.source.path.exists() {
                        // Vanished between scan and compile: treat as never
                        // found, so reconcile below cleans it up this pass.
                        found.remove(&entry.source.path);
                        self.cache.unregister_served(&entry.served);
                        continue;
                    }
                    emit(&mut callback, PassEvent::SourceFailed {
                        index,
                        path: entry.source.path.clone(),
                        message: error.to_string(),
                    });
                    result.failures.push(PassFailure {
                        source: entry.source.path.clone(),
                        error,
                    });
                }
            }
        }

        // Reconciling: forget sources the scan no longer found and delete
        // their outputs. Deletion is best-effort; the file may already be
        // gone and the cache has already forgotten the source.
        for source in self.cache.sources() {
            if found.contains(&source) {
                continue;
            }
            self.cache.forget(&source);
            if let Ok(css) = self.layout.css_path(&source) {
                fs::remove_file_quiet(&css);
                fs::remove_file_quiet(&self.layout.map_path(&css));
                emit(&mut callback, PassEvent::OutputRemoved { path: css });
            }
            result.removed.push(source);
        }

        debug!(
            compiled = result.compiled.len(),
            fresh = result.fresh.len(),
            removed = result.removed.len(),
            failed = result.failures.len(),
            "build pass complete"
        );
        result
    }

    /// Compile one stale source and write its outputs
    fn compile_one(&self, entry: &PassEntry) -> Result<(), BuildError> {
        self.layout.ensure_parent_dir(&entry.css)?;
        let output = self.compiler.compile(&entry.source.path, &self.options)?;
        fs::atomic_write(&entry.css, &output.css).map_err(|e| BuildError::WriteOutput {
            path: entry.css.clone(),
            source: e,
        })?;
        if let Some(map) = output.map {
            let map_path = self.layout.map_path(&entry.css);
            fs::atomic_write(&map_path, &map).map_err(|e| BuildError::WriteOutput {
                path: map_path.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Look up one output by its served-relative path, building first
    ///
    /// Runs a full pass, then consults the served index; `None` when nothing
    /// discoverable maps to `served`. A leading `/` is tolerated.
    pub fn find_output(&mut self, served: &str) -> Option<PathBuf> {
        self.run_pass();
        self.cache.served(served.trim_start_matches('/')).cloned()
    }

    /// Enumerate all outputs, building first
    ///
    /// Returns `(served path, absolute output path)` pairs ordered by served
    /// path.
    pub fn list_outputs(&mut self) -> Vec<(String, PathBuf)> {
        self.run_pass();
        self.cache
            .served_entries()
            .map(|(served, path)| (served.clone(), path.clone()))
            .collect()
    }

    /// Validate the configuration without building
    ///
    /// Off the hot path; intended for startup checks. Warnings are
    /// informational; the engine runs fine with all of them present.
    pub fn check(&self) -> Vec<ConfigWarning> {
        let mut warnings = self.scanner.check_patterns();
        for path in &self.config.include_paths {
            if !path.is_dir() {
                warnings.push(ConfigWarning::MissingIncludePath { path: path.clone() });
            }
        }
        warnings
    }

    /// The engine's configuration
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// The engine's cache (read-only)
    pub fn cache(&self) -> &BuildCache {
        &self.cache
    }

    /// The engine's path layout
    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }
}

fn emit<F: FnMut(PassEvent)>(callback: &mut Option<F>, event: PassEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
