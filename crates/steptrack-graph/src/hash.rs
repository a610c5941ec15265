//! Stable hashing helpers used for graph provenance and classifier cache
//! keys (the latter consumed by `steptrack-classifier`).

use sha2::{Digest, Sha256};

/// Computes a stable hexadecimal hash over a sorted copy of `values`, used
/// to derive a content-addressed key from a set of file paths or step
/// names regardless of input order.
pub fn stable_hash_of_strings(values: &[String]) -> String {
    let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    let mut hasher = Sha256::new();
    for value in &sorted {
        hasher.update(value.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_order_insensitive() {
        let a = vec!["b".to_string(), "a".to_string()];
        let b = vec!["a".to_string(), "b".to_string()];
        assert_eq!(stable_hash_of_strings(&a), stable_hash_of_strings(&b));
    }
}
