//! Leave-one-out evaluation harness: orchestrates per-fold train/val/test
//! partitioning, classifier training, confusion-matrix estimation, and
//! the online tracker, dispatched across a `rayon` worker pool (grounded
//! on the teacher's own worker-pool dispatch: build a
//! `ThreadPoolBuilder` sized by the configured concurrency, run the fold
//! closures inside `pool.install`, and collect results back in fold
//! order).

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use steptrack_core::{derive_substream_seed, ErrorInfo, Graph, SteptrackError};
use steptrack_io::{has_marker_suffix, load_imu_and_audio};
use steptrack_tracker::ViterbiTracker;

use crate::config::HarnessConfig;
use crate::oracle::build_run_start_oracle;
use crate::report::{FoldOutcome, FramePredictions, LooReport};
use crate::split::train_val_split;

/// Runs the full leave-one-out evaluation over `files`, one fold per
/// trace, and returns an aggregate [`LooReport`]. Folds run in a
/// `rayon` thread pool sized by `config.num_processes`; a fold whose
/// data is unusable (only `-authors`-suffixed traces would be tested, or
/// loading/training fails) is recorded with its error rather than
/// aborting the others (§5, §7).
pub fn run_loo(
    graph: &Graph,
    files: &[PathBuf],
    canonical_steps: &[String],
    config: &HarnessConfig,
) -> Result<LooReport, SteptrackError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_processes.max(1))
        .build()
        .map_err(|err| SteptrackError::Usage(ErrorInfo::new("thread-pool-build", err.to_string())))?;

    let results: Vec<(usize, FoldOutcome)> = pool.install(|| {
        (0..files.len())
            .into_par_iter()
            .map(|fold_index| {
                let outcome = run_fold(graph, files, canonical_steps, config, fold_index);
                (fold_index, outcome)
            })
            .collect()
    });

    let mut folds: Vec<FoldOutcome> = results.into_iter().map(|(_, outcome)| outcome).collect();
    folds.sort_by_key(|fold| fold.fold_index);

    Ok(LooReport {
        trace_count: files.len(),
        folds,
    })
}

fn run_fold(
    graph: &Graph,
    files: &[PathBuf],
    canonical_steps: &[String],
    config: &HarnessConfig,
    fold_index: usize,
) -> FoldOutcome {
    match run_fold_inner(graph, files, canonical_steps, config, fold_index) {
        Ok(predictions) => FoldOutcome {
            fold_index,
            predictions,
            error: None,
        },
        Err(err) => FoldOutcome {
            fold_index,
            predictions: Vec::new(),
            error: Some(err.info().clone()),
        },
    }
}

fn run_fold_inner(
    graph: &Graph,
    files: &[PathBuf],
    canonical_steps: &[String],
    config: &HarnessConfig,
    fold_index: usize,
) -> Result<Vec<(PathBuf, FramePredictions)>, SteptrackError> {
    let test_files: Vec<&PathBuf> = std::iter::once(&files[fold_index])
        .filter(|path| !has_marker_suffix(path, &config.authors_suffix))
        .collect();
    if test_files.is_empty() {
        return Ok(Vec::new());
    }

    let train_val_indices: Vec<usize> = (0..files.len()).filter(|&i| i != fold_index).collect();
    let fold_seed = derive_substream_seed(config.seed, fold_index as u64);
    let (train_indices, val_indices) = train_val_split(&train_val_indices, fold_seed);
    let train_paths: Vec<&Path> = train_indices.iter().map(|&i| files[i].as_path()).collect();
    let val_paths: Vec<&Path> = val_indices.iter().map(|&i| files[i].as_path()).collect();

    let (train_features, train_labels) = load_imu_and_audio(&train_paths, canonical_steps)?;
    let cache_key = steptrack_classifier::training_set_cache_key(
        &train_paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
    );
    let clf = steptrack_classifier::train(
        config.classifier.clone(),
        &train_features,
        &train_labels,
        canonical_steps.len(),
        Some(&cache_key),
    )?;

    let (val_features, val_labels) = load_imu_and_audio(&val_paths, canonical_steps)?;
    let confusion_matrix = steptrack_classifier::confusion_probabilities(
        &clf,
        &val_features,
        &val_labels,
        canonical_steps.len(),
    )?;

    let mut outcomes = Vec::with_capacity(test_files.len());
    for test_path in test_files {
        let (test_features, y_true) = load_imu_and_audio(&[test_path.as_path()], canonical_steps)?;
        let proba = steptrack_classifier::StepClassifier::predict_proba(&clf, &test_features)?;

        let num_frames = proba.nrows();
        let num_classes = canonical_steps.len();
        let mut observations = vec![vec![0.0_f64; num_frames]; num_classes];
        let mut raw_pred = vec![0usize; num_frames];
        for t in 0..num_frames {
            let row = proba.row(t);
            let mut best = (0usize, f64::NEG_INFINITY);
            for c in 0..num_classes {
                let value = row[c];
                observations[c][t] = value;
                if value > best.1 {
                    best = (c, value);
                }
            }
            raw_pred[t] = best.0;
        }

        let oracle = config
            .oracle_step_indices
            .as_ref()
            .map(|steps| build_run_start_oracle(&y_true, steps))
            .unwrap_or_default();

        let mut tracker = ViterbiTracker::new(graph, config.start_step_indices.clone());
        let frame_results = tracker.predict(&observations, &confusion_matrix, &oracle)?;

        let mut predictions = FramePredictions::default();
        for (_, history) in &frame_results {
            let len = history.len();
            predictions.y_true_prefixes.push(y_true[..len.min(y_true.len())].to_vec());
            predictions
                .y_pred_raw_prefixes
                .push(raw_pred[..len.min(raw_pred.len())].to_vec());
            predictions.y_pred_viterbi_prefixes.push(history.clone());
        }

        outcomes.push((test_path.to_path_buf(), predictions));
    }

    Ok(outcomes)
}
