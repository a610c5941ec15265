//! `classes.txt` taxonomy parsing: maps heterogeneous annotator labels to
//! canonical step names.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use steptrack_core::{ErrorInfo, SteptrackError};

/// Parses a `classes.txt` file: each line is either `label - canonical` or
/// `label,canonical`.
pub fn load_classes(path: &Path) -> Result<BTreeMap<String, String>, SteptrackError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        SteptrackError::Data(
            ErrorInfo::new("classes-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;

    let mut classes = BTreeMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.splitn(2, ',').collect();
        if parts.len() == 2 {
            classes.insert(parts[0].trim().to_string(), parts[1].trim().to_string());
        } else {
            let label = line.trim();
            let canonical = label.rsplit(" - ").next().unwrap_or(label).trim();
            classes.insert(label.to_string(), canonical.to_string());
        }
    }
    Ok(classes)
}

/// Derives an ordered canonical step list from a `classes.txt` mapping:
/// `"begin"`, every distinct canonical name in sorted order (excluding the
/// sentinels themselves, in case a table spells them out explicitly), then
/// `"end"`.
pub fn classes_to_canonical_steps(classes: &BTreeMap<String, String>) -> Vec<String> {
    let mut canonical: BTreeSet<String> = classes.values().cloned().collect();
    canonical.remove("begin");
    canonical.remove("end");

    let mut steps = Vec::with_capacity(canonical.len() + 2);
    steps.push("begin".to_string());
    steps.extend(canonical);
    steps.push("end".to_string());
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_line_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classes.txt");
        fs::write(&path, "grind beans - grind\nsteam milk,steam\n").unwrap();

        let classes = load_classes(&path).unwrap();
        assert_eq!(classes.get("grind beans"), Some(&"grind".to_string()));
        assert_eq!(classes.get("steam milk"), Some(&"steam".to_string()));
    }

    #[test]
    fn canonical_steps_are_sorted_with_sentinels() {
        let mut classes = BTreeMap::new();
        classes.insert("grind beans".to_string(), "grind".to_string());
        classes.insert("steam milk".to_string(), "steam".to_string());
        let steps = classes_to_canonical_steps(&classes);
        assert_eq!(steps, vec!["begin".to_string(), "grind".to_string(), "steam".to_string(), "end".to_string()]);
    }
}
