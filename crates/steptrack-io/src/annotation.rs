//! Annotation CSV ingestion: per-participant task timelines relative to a
//! clap reference, and the `'Other'`-label smoothing pass applied before a
//! trace reaches the graph builder.

use std::collections::BTreeMap;
use std::path::Path;

use steptrack_core::{ErrorInfo, SteptrackError};

/// One row of the annotation table, with the `Participant` column
/// forward-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRow {
    /// Participant identifier.
    pub participant: String,
    /// Raw timestamp, in the CSV's native units.
    pub timestamp: f64,
    /// Annotated task/step label.
    pub task: String,
}

/// Loads the annotation CSV (columns `Participant, Timestamp, Task`),
/// forward-filling blank `Participant` cells, and groups rows by
/// participant in file order.
pub fn load_annotations(path: &Path) -> Result<BTreeMap<String, Vec<AnnotationRow>>, SteptrackError> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| {
        SteptrackError::Data(
            ErrorInfo::new("annotation-open", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;

    let mut grouped: BTreeMap<String, Vec<AnnotationRow>> = BTreeMap::new();
    let mut last_participant: Option<String> = None;

    for record in reader.records() {
        let record = record.map_err(|err| {
            SteptrackError::Data(ErrorInfo::new("annotation-row", err.to_string()))
        })?;
        let participant = record
            .get(0)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .or_else(|| last_participant.clone())
            .ok_or_else(|| {
                SteptrackError::Data(ErrorInfo::new(
                    "annotation-missing-participant",
                    "first annotation row has no Participant value to forward-fill from",
                ))
            })?;
        last_participant = Some(participant.clone());

        let timestamp: f64 = record
            .get(1)
            .ok_or_else(|| SteptrackError::Data(ErrorInfo::new("annotation-missing-timestamp", "row has no Timestamp column")))?
            .parse()
            .map_err(|_| {
                SteptrackError::Data(ErrorInfo::new("annotation-bad-timestamp", "Timestamp is not numeric"))
            })?;
        let task = record
            .get(2)
            .ok_or_else(|| SteptrackError::Data(ErrorInfo::new("annotation-missing-task", "row has no Task column")))?
            .to_string();

        grouped.entry(participant.clone()).or_default().push(AnnotationRow {
            participant,
            timestamp,
            task,
        });
    }

    Ok(grouped)
}

/// Converts a participant's raw annotation rows into `(times, labels)`
/// relative to the clap reference: row `0` is the clap event itself and
/// is dropped; row `1` becomes `t=0`. When `half_speed` is set (the
/// annotator watched the recording at half speed), times are halved.
pub fn get_times_and_labels(rows: &[AnnotationRow], half_speed: bool) -> (Vec<f64>, Vec<String>) {
    if rows.len() < 2 {
        return (Vec::new(), Vec::new());
    }
    let clap_time = rows[1].timestamp;
    let mut times = Vec::with_capacity(rows.len() - 1);
    let mut labels = Vec::with_capacity(rows.len() - 1);
    for row in &rows[1..] {
        let mut t = row.timestamp - clap_time;
        if half_speed {
            t /= 2.0;
        }
        times.push(t);
        labels.push(row.task.clone());
    }
    (times, labels)
}

/// Overwrites `'Other'` labels by the preceding non-`'Other'` label. The
/// first label must not be `'Other'` (trim leading/trailing `'Other'`
/// runs before calling).
pub fn overwrite_other_labels(labels: &[String]) -> Result<Vec<String>, SteptrackError> {
    let first = labels.first().ok_or_else(|| {
        SteptrackError::Usage(ErrorInfo::new("empty-label-sequence", "labels must be non-empty"))
    })?;
    if first == "Other" {
        return Err(SteptrackError::Usage(ErrorInfo::new(
            "leading-other-label",
            "the first label must not be 'Other'; trim leading/trailing runs first",
        )));
    }

    let mut output = Vec::with_capacity(labels.len());
    let mut prev = first.clone();
    for label in labels {
        if label != "Other" {
            output.push(label.clone());
            prev = label.clone();
        } else {
            output.push(prev.clone());
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn forward_fills_participant_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotation.csv");
        fs::write(
            &path,
            "Participant,Timestamp,Task\np1,0,clap\n,100,grind\n,200,steam\n",
        )
        .unwrap();

        let grouped = load_annotations(&path).unwrap();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped["p1"].len(), 3);
        assert_eq!(grouped["p1"][2].participant, "p1");
    }

    #[test]
    fn times_are_relative_to_the_clap_row() {
        let rows = vec![
            AnnotationRow { participant: "p1".into(), timestamp: 0.0, task: "clap".into() },
            AnnotationRow { participant: "p1".into(), timestamp: 100.0, task: "grind".into() },
            AnnotationRow { participant: "p1".into(), timestamp: 300.0, task: "steam".into() },
        ];
        let (times, labels) = get_times_and_labels(&rows, false);
        assert_eq!(times, vec![0.0, 200.0]);
        assert_eq!(labels, vec!["grind".to_string(), "steam".to_string()]);
    }

    #[test]
    fn half_speed_halves_times() {
        let rows = vec![
            AnnotationRow { participant: "p1".into(), timestamp: 0.0, task: "clap".into() },
            AnnotationRow { participant: "p1".into(), timestamp: 100.0, task: "grind".into() },
        ];
        let (times, _) = get_times_and_labels(&rows, true);
        assert_eq!(times, vec![0.0]);
    }

    #[test]
    fn overwrite_other_replaces_with_previous_label() {
        let labels: Vec<String> = ["A", "Other", "Other", "B"].iter().map(|s| s.to_string()).collect();
        let fixed = overwrite_other_labels(&labels).unwrap();
        assert_eq!(fixed, vec!["A", "A", "A", "B"]);
    }

    #[test]
    fn leading_other_is_rejected() {
        let labels = vec!["Other".to_string()];
        assert!(overwrite_other_labels(&labels).is_err());
    }
}
