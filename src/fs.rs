//! Filesystem helpers
//!
//! Output writes go through a tempfile-then-rename so a crashed process never
//! leaves a half-written CSS file behind. Reconcile-time deletion is
//! best-effort: the file may already be gone, and a failure to delete must
//! not fail the pass.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

use tracing::warn;

/// Write `content` to `path` atomically, truncating any existing file
///
/// The temporary file is created in the destination directory so the final
/// rename stays on one filesystem.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Modification time of `path`, or `None` if it cannot be stat'ed
pub fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

/// Remove a file, swallowing every failure
///
/// Already-gone is the expected case during cleanup; anything else is logged
/// and ignored.
pub fn remove_file_quiet(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove stale output");
        }
    }
}
