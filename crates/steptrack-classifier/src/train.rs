//! Cache-aware training entry point (§4.5: "a non-null `cache_key`
//! triggers persistence ... on cache hit the cached classifier is
//! returned unchanged").

use ndarray::Array2;
use steptrack_core::{ErrorInfo, SteptrackError};

use crate::cache;
use crate::config::ClassifierConfig;
use crate::forest::ForestClassifier;
use crate::traits::StepClassifier;

/// Trains a [`ForestClassifier`], consulting and populating the on-disk
/// cache at `cache_dir` when both `cache_dir` and `cache_key` are
/// supplied.
pub fn train(
    config: ClassifierConfig,
    features: &Array2<f64>,
    labels: &[usize],
    num_classes: usize,
    cache_key: Option<&str>,
) -> Result<ForestClassifier, SteptrackError> {
    if let (Some(cache_dir), Some(key)) = (config.cache_dir.as_deref(), cache_key) {
        if let Some(bytes) = cache::load(cache_dir, key)? {
            return deserialize(&bytes);
        }
        let mut clf = ForestClassifier::new(config.clone());
        clf.fit(features, labels, num_classes)?;
        let bytes = serialize(&clf)?;
        cache::store(cache_dir, key, &bytes)?;
        return Ok(clf);
    }

    let mut clf = ForestClassifier::new(config);
    clf.fit(features, labels, num_classes)?;
    Ok(clf)
}

fn serialize(clf: &ForestClassifier) -> Result<Vec<u8>, SteptrackError> {
    bincode::serialize(clf)
        .map_err(|err| SteptrackError::Io(ErrorInfo::new("classifier-serialize", err.to_string())))
}

fn deserialize(bytes: &[u8]) -> Result<ForestClassifier, SteptrackError> {
    bincode::deserialize(bytes)
        .map_err(|err| SteptrackError::Io(ErrorInfo::new("classifier-deserialize", err.to_string())))
}
