use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use steptrack_io::classes_to_canonical_steps;

/// Loads `classes.txt` and derives an ordered canonical step list:
/// `"begin"`, every distinct canonical name in sorted order, `"end"`.
pub fn load_canonical_steps(classes_path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let classes = steptrack_io::load_classes(classes_path)?;
    Ok(classes_to_canonical_steps(&classes))
}

/// Lists `.json` trace files directly under `dir`, sorted by path for
/// deterministic fold ordering.
pub fn list_trace_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Parses a comma-separated list of step indices, e.g. `"0,3,5"`.
pub fn parse_index_csv(raw: &str) -> Result<Vec<usize>, Box<dyn Error>> {
    let mut indices = BTreeSet::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        indices.insert(part.parse::<usize>()?);
    }
    Ok(indices.into_iter().collect())
}

/// Writes `value` as pretty JSON to `path`, creating parent directories.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
