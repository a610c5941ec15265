//! Classifier configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_n_trees() -> usize {
    100
}

/// Tunables for [`crate::forest::ForestClassifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Number of bagged decision trees.
    #[serde(default = "default_n_trees")]
    pub n_trees: usize,
    /// Maximum tree depth; `None` grows trees to purity.
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Master seed used to derive a deterministic substream per tree's
    /// bootstrap resample (`steptrack_core::derive_substream_seed`).
    #[serde(default)]
    pub seed: u64,
    /// Optional on-disk cache directory for fitted classifiers, keyed by
    /// the sorted hash of training file paths.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            n_trees: default_n_trees(),
            max_depth: None,
            seed: 0,
            cache_dir: None,
        }
    }
}
