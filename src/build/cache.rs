//! Build cache
//!
//! Owned by one engine instance, never shared or persisted. Holds two maps:
//! the fresh-time entries driving staleness decisions, and the served index
//! describing what is currently discoverable. The served index is rebuilt
//! from scratch every pass; it must never carry entries for sources the most
//! recent scan did not find.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// In-memory build state for one engine
#[derive(Debug, Default)]
pub struct BuildCache {
    /// Source path → mtime recorded at its last successful compile
    fresh: HashMap<PathBuf, SystemTime>,
    /// Served-relative path → absolute output path, for the latest pass
    served: BTreeMap<String, PathBuf>,
}

impl BuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh time recorded for `source`, if it has ever compiled cleanly
    pub fn fresh_mtime(&self, source: &Path) -> Option<SystemTime> {
        self.fresh.get(source).copied()
    }

    /// Record `source` as freshly compiled at `mtime`
    pub fn record(&mut self, source: PathBuf, mtime: SystemTime) {
        self.fresh.insert(source, mtime);
    }

    /// Drop the entry for `source`
    pub fn forget(&mut self, source: &Path) -> Option<SystemTime> {
        self.fresh.remove(source)
    }

    /// Snapshot of all cached source paths
    ///
    /// A snapshot so the reconcile step can forget entries while iterating.
    pub fn sources(&self) -> Vec<PathBuf> {
        self.fresh.keys().cloned().collect()
    }

    /// Number of cached sources
    pub fn len(&self) -> usize {
        self.fresh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fresh.is_empty()
    }

    /// Discard the served index at the start of a pass
    pub fn begin_pass(&mut self) {
        self.served.clear();
    }

    /// Register a discovered output under its served path
    pub fn register_served(&mut self, served: String, output: PathBuf) {
        self.served.insert(served, output);
    }

    /// Remove one served entry (source vanished mid-pass)
    pub fn unregister_served(&mut self, served: &str) {
        self.served.remove(served);
    }

    /// Output registered under `served`, if any
    pub fn served(&self, served: &str) -> Option<&PathBuf> {
        self.served.get(served)
    }

    /// All served entries, ordered by served path
    pub fn served_entries(&self) -> impl Iterator<Item = (&String, &PathBuf)> {
        self.served.iter()
    }

    /// Number of served entries
    pub fn served_len(&self) -> usize {
        self.served.len()
    }
}
