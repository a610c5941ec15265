//! Stable cache-key hashing over a set of training file paths.

use sha2::{Digest, Sha256};

/// Computes a stable hexadecimal key over a sorted copy of `paths`, so
/// concurrent folds with identical training sets (regardless of listing
/// order) converge on the same classifier cache entry.
pub fn training_set_cache_key(paths: &[String]) -> String {
    let mut sorted: Vec<&str> = paths.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    let mut hasher = Sha256::new();
    for path in &sorted {
        hasher.update(path.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
