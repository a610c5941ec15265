//! Content-addressed disk cache for fitted classifiers.
//!
//! Write-once-read-many, keyed by the sorted hash of training file paths
//! (§4.6, §5 "Shared-resource policy"): concurrent writers to the same key
//! may both succeed since they produce equivalent models, so writes go
//! through a temp file plus atomic rename rather than a lock.

use std::fs;
use std::path::{Path, PathBuf};

use steptrack_core::{ErrorInfo, SteptrackError};

/// Computes the cache file path for `cache_key` under `cache_dir`.
pub fn cache_path(cache_dir: &Path, cache_key: &str) -> PathBuf {
    cache_dir.join(format!("{cache_key}.bincode"))
}

/// Reads and deserializes a cached classifier, if present.
pub fn load(cache_dir: &Path, cache_key: &str) -> Result<Option<Vec<u8>>, SteptrackError> {
    let path = cache_path(cache_dir, cache_key);
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(&path).map_err(|err| {
        SteptrackError::Io(
            ErrorInfo::new("classifier-cache-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    Ok(Some(bytes))
}

/// Writes `bytes` to the cache atomically: the payload is written to a
/// sibling temp file and renamed into place, so a reader never observes a
/// partial write.
pub fn store(cache_dir: &Path, cache_key: &str, bytes: &[u8]) -> Result<(), SteptrackError> {
    fs::create_dir_all(cache_dir).map_err(|err| {
        SteptrackError::Io(
            ErrorInfo::new("classifier-cache-mkdir", err.to_string())
                .with_context("path", cache_dir.display().to_string()),
        )
    })?;

    let final_path = cache_path(cache_dir, cache_key);
    let mut tmp = tempfile::NamedTempFile::new_in(cache_dir).map_err(|err| {
        SteptrackError::Io(ErrorInfo::new("classifier-cache-tempfile", err.to_string()))
    })?;
    std::io::Write::write_all(&mut tmp, bytes).map_err(|err| {
        SteptrackError::Io(ErrorInfo::new("classifier-cache-write", err.to_string()))
    })?;
    tmp.persist(&final_path).map_err(|err| {
        SteptrackError::Io(
            ErrorInfo::new("classifier-cache-persist", err.to_string())
                .with_context("path", final_path.display().to_string()),
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        store(dir.path(), "abc123", b"fitted-model-bytes").unwrap();
        let loaded = load(dir.path(), "abc123").unwrap().unwrap();
        assert_eq!(loaded, b"fitted-model-bytes");
    }

    #[test]
    fn missing_key_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path(), "missing").unwrap().is_none());
    }
}
