//! Trace file-naming conventions shared by the evaluation harness.

use std::path::Path;

/// Returns `true` when `path`'s file stem ends with `suffix` (e.g. an
/// `"-authors"` marker), meaning the trace may be used for training only
/// and must not appear in a test set (§4.6).
pub fn has_marker_suffix(path: &Path, suffix: &str) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(suffix))
}
