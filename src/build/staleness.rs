//! Staleness decision
//!
//! Pure function over timestamps; the engine gathers the metadata, this
//! decides. Comparing the output's mtime against the cached fresh time (not
//! just cache presence) lets an externally deleted or clobbered output be
//! regenerated even when the source itself has not changed.

use std::time::SystemTime;

/// Decide whether a source must be recompiled
///
/// `cached` is the fresh time recorded at the last successful compile;
/// `css_mtime`/`map_mtime` are the on-disk output timestamps, `None` when
/// missing. Rules, in order:
///
/// 1. never compiled (no cache entry) → rebuild
/// 2. source mtime differs from the cached fresh time → rebuild
/// 3. CSS missing, or its mtime not strictly newer than the fresh time → rebuild
/// 4. map requested and missing or not strictly newer → rebuild
/// 5. otherwise fresh
pub fn needs_rebuild(
    source_mtime: SystemTime,
    cached: Option<SystemTime>,
    css_mtime: Option<SystemTime>,
    map_mtime: Option<SystemTime>,
    wants_map: bool,
) -> bool {
    let Some(fresh) = cached else {
        return true;
    };
    if fresh != source_mtime {
        return true;
    }
    match css_mtime {
        Some(css) if css > fresh => {}
        _ => return true,
    }
    if wants_map {
        match map_mtime {
            Some(map) if map > fresh => {}
            _ => return true,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn t(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn first_build_is_stale() {
        assert!(needs_rebuild(t(10), None, None, None, false));
        // even with an output already on disk
        assert!(needs_rebuild(t(10), None, Some(t(11)), None, false));
    }

    #[test]
    fn changed_source_is_stale() {
        assert!(needs_rebuild(t(20), Some(t(10)), Some(t(11)), None, false));
        // going backwards counts as changed too
        assert!(needs_rebuild(t(5), Some(t(10)), Some(t(11)), None, false));
    }

    #[test]
    fn missing_output_is_stale() {
        assert!(needs_rebuild(t(10), Some(t(10)), None, None, false));
    }

    #[test]
    fn output_not_strictly_newer_is_stale() {
        assert!(needs_rebuild(t(10), Some(t(10)), Some(t(10)), None, false));
        assert!(needs_rebuild(t(10), Some(t(10)), Some(t(9)), None, false));
    }

    #[test]
    fn up_to_date_output_is_fresh() {
        assert!(!needs_rebuild(t(10), Some(t(10)), Some(t(11)), None, false));
    }

    #[test]
    fn missing_map_is_stale_only_when_requested() {
        assert!(needs_rebuild(t(10), Some(t(10)), Some(t(11)), None, true));
        assert!(!needs_rebuild(t(10), Some(t(10)), Some(t(11)), None, false));
    }

    #[test]
    fn stale_map_is_stale() {
        assert!(needs_rebuild(t(10), Some(t(10)), Some(t(11)), Some(t(10)), true));
    }

    #[test]
    fn fresh_map_is_fresh() {
        assert!(!needs_rebuild(t(10), Some(t(10)), Some(t(11)), Some(t(11)), true));
    }
}
