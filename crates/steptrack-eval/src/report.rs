//! Per-fold and aggregate report shapes persisted by the CLI's `loo`
//! subcommand.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use steptrack_core::ErrorInfo;

/// Outbound per-frame prediction sequences for one test file (§6:
/// "Outbound (per fold, per test file)").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FramePredictions {
    /// Prefix of ground-truth step indices, per frame.
    pub y_true_prefixes: Vec<Vec<usize>>,
    /// Prefix of raw argmax predictions (no Viterbi correction), per frame.
    pub y_pred_raw_prefixes: Vec<Vec<usize>>,
    /// Prefix of Viterbi-corrected step histories, per frame.
    pub y_pred_viterbi_prefixes: Vec<Vec<usize>>,
}

/// Outcome of one leave-one-out fold. Recoverable per-fold errors (§7:
/// "data error ... is per-fold recoverable") are captured in `error`
/// rather than aborting the harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldOutcome {
    /// Index of the held-out trace within the input file list.
    pub fold_index: usize,
    /// Test file(s) evaluated by this fold, keyed by path.
    pub predictions: Vec<(PathBuf, FramePredictions)>,
    /// Set when the fold failed; `predictions` is empty in that case.
    pub error: Option<ErrorInfo>,
}

/// Aggregate report over every fold, written as `loo_report.json` by the
/// CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LooReport {
    /// Total number of input trace files.
    pub trace_count: usize,
    /// Per-fold outcomes, ordered by `fold_index`.
    pub folds: Vec<FoldOutcome>,
}
