//! Per-participant trace ingestion: the serialised record produced by the
//! (out-of-scope) feature-extraction pipeline, and the `'Other'`-filtered,
//! horizontally stacked feature matrix the classifier adapter consumes.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use steptrack_core::{ErrorInfo, SteptrackError};

/// One participant's labelled trace: parallel-indexed IMU/audio feature
/// rows, per-frame labels, and millisecond timestamps relative to a clap
/// reference (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    /// IMU feature rows, shape `(F, D_imu)`.
    #[serde(rename = "IMU")]
    pub imu: Vec<Vec<f64>>,
    /// Audio feature rows, shape `(F, D_audio)`.
    pub audio: Vec<Vec<f64>>,
    /// Per-frame step-name labels, length `F`.
    pub labels: Vec<String>,
    /// Per-frame millisecond timestamps relative to the clap, length `F`.
    pub timestamp: Vec<f64>,
}

const NON_STEP_LABELS: &[&str] = &["Other", "clap", "14"];

impl TraceRecord {
    /// Loads a trace record from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SteptrackError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            SteptrackError::Data(
                ErrorInfo::new("trace-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            SteptrackError::Data(
                ErrorInfo::new("trace-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Returns `true` for the literal non-step padding labels that must be
/// trimmed from a trace before it reaches the graph builder or classifier
/// (§6: `'Other'`, `'clap'`, `'14'`).
pub fn is_non_step_label(label: &str) -> bool {
    NON_STEP_LABELS.contains(&label)
}

/// Loads and stacks a set of trace files into a single feature matrix `X`
/// (IMU columns followed by audio columns, rows horizontally concatenated
/// across files) and a parallel label-index vector `y`, filtering frames
/// whose label is `'Other'` and mapping the remaining labels to their
/// position in `canonical_steps` (mirrors
/// `load_imu_and_audio_data`).
pub fn load_imu_and_audio(
    paths: &[&Path],
    canonical_steps: &[String],
) -> Result<(Array2<f64>, Vec<usize>), SteptrackError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<usize> = Vec::new();
    let mut width = None;

    for path in paths {
        let trace = TraceRecord::load(path)?;
        for (i, label) in trace.labels.iter().enumerate() {
            if label == "Other" {
                continue;
            }
            let imu_row = trace.imu.get(i).ok_or_else(|| {
                SteptrackError::Data(ErrorInfo::new(
                    "trace-imu-row-missing",
                    format!("frame {i} has a label but no IMU row"),
                ))
            })?;
            let audio_row = trace.audio.get(i).ok_or_else(|| {
                SteptrackError::Data(ErrorInfo::new(
                    "trace-audio-row-missing",
                    format!("frame {i} has a label but no audio row"),
                ))
            })?;

            let mut row = Vec::with_capacity(imu_row.len() + audio_row.len());
            row.extend_from_slice(imu_row);
            row.extend_from_slice(audio_row);

            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => {
                    return Err(SteptrackError::Data(ErrorInfo::new(
                        "trace-feature-width-mismatch",
                        "stacked traces have inconsistent feature widths",
                    )))
                }
                _ => {}
            }

            let step_index = canonical_steps.iter().position(|s| s == label).ok_or_else(|| {
                SteptrackError::Data(ErrorInfo::new(
                    "label-not-canonical",
                    format!("label '{label}' is not in the canonical step list"),
                ))
            })?;

            rows.push(row);
            labels.push(step_index);
        }
    }

    let n_rows = rows.len();
    let n_cols = width.unwrap_or(0);
    let mut features = Array2::<f64>::zeros((n_rows, n_cols));
    for (i, row) in rows.into_iter().enumerate() {
        for (j, value) in row.into_iter().enumerate() {
            features[[i, j]] = value;
        }
    }

    Ok((features, labels))
}
