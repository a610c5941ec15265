//! `clap_times.csv` parsing: participant id to clap time in milliseconds.

use std::collections::BTreeMap;
use std::path::Path;

use steptrack_core::{ErrorInfo, SteptrackError};

/// Parses `clap_times.csv` (a header line followed by `pid, clap_ms`
/// rows) into a map from participant id to clap time in milliseconds.
pub fn load_clap_times(path: &Path) -> Result<BTreeMap<String, f64>, SteptrackError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| {
            SteptrackError::Data(
                ErrorInfo::new("clap-times-open", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;

    let mut clap_times = BTreeMap::new();
    for record in reader.records() {
        let record = record
            .map_err(|err| SteptrackError::Data(ErrorInfo::new("clap-times-row", err.to_string())))?;
        let pid = record
            .get(0)
            .ok_or_else(|| SteptrackError::Data(ErrorInfo::new("clap-times-missing-pid", "row has no pid column")))?
            .trim()
            .to_string();
        let clap_ms: f64 = record
            .get(1)
            .ok_or_else(|| SteptrackError::Data(ErrorInfo::new("clap-times-missing-ms", "row has no clap_ms column")))?
            .trim()
            .parse()
            .map_err(|_| SteptrackError::Data(ErrorInfo::new("clap-times-bad-ms", "clap_ms is not numeric")))?;
        clap_times.insert(pid, clap_ms);
    }
    Ok(clap_times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_pid_clap_ms_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clap_times.csv");
        fs::write(&path, "pid,clap_ms\np1,1234.5\np2,987\n").unwrap();

        let clap_times = load_clap_times(&path).unwrap();
        assert_eq!(clap_times.get("p1"), Some(&1234.5));
        assert_eq!(clap_times.get("p2"), Some(&987.0));
    }
}
