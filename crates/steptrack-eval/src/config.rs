//! Leave-one-out harness configuration.

use serde::{Deserialize, Serialize};
use steptrack_classifier::ClassifierConfig;

fn default_num_processes() -> usize {
    1
}

fn default_authors_suffix() -> String {
    "-authors".to_string()
}

/// Tunables for [`crate::harness::run_loo`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Worker pool size for fold dispatch.
    #[serde(default = "default_num_processes")]
    pub num_processes: usize,
    /// Filename marker (matched against the file stem) excluding a trace
    /// from ever appearing in a test set.
    #[serde(default = "default_authors_suffix")]
    pub authors_suffix: String,
    /// Master seed for the deterministic per-fold train/validation split.
    #[serde(default)]
    pub seed: u64,
    /// Restricts which steps may carry initial tracker mass; `None`
    /// admits every step.
    #[serde(default)]
    pub start_step_indices: Option<Vec<usize>>,
    /// Steps for which the harness builds a run-start oracle from ground
    /// truth; `None` disables the oracle entirely.
    #[serde(default)]
    pub oracle_step_indices: Option<Vec<usize>>,
    /// Classifier configuration used to train each fold's classifier.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            num_processes: default_num_processes(),
            authors_suffix: default_authors_suffix(),
            seed: 0,
            start_step_indices: None,
            oracle_step_indices: None,
            classifier: ClassifierConfig::default(),
        }
    }
}
