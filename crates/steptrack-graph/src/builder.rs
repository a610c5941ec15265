//! Estimates a [`Graph`] (transition probabilities + duration statistics)
//! from a set of labelled traces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use steptrack_core::{ErrorInfo, Graph, GraphProvenance, SteptrackError};

use crate::hash::stable_hash_of_strings;

const BEGIN_LABEL: &str = "begin";
const END_LABEL: &str = "end";

/// Structured report accompanying a built [`Graph`], mirroring the raw
/// transition counts and per-step sample sizes the original Python
/// computes internally (`transition_graph`, `time_dict`) but never
/// surfaces to the caller. Also records which steps fell back to the
/// degenerate `mean=1, std=0` duration because no trace ever visited them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphBuildReport {
    /// Number of traces consumed.
    pub trace_count: usize,
    /// Number of duration samples collected per step index.
    pub samples_per_step: Vec<usize>,
    /// Raw transition counts prior to row normalization, `[from][to]`.
    pub raw_transition_counts: Vec<Vec<u64>>,
    /// Step indices that had zero recorded duration samples and used the
    /// fallback `mean=1, std=0`.
    pub fallback_steps: Vec<usize>,
}

/// Builds a [`Graph`] from a collection of labelled traces.
///
/// `canonical_steps` names every step index in order; it must start with
/// `"begin"` and end with `"end"`. Each trace is an ordered sequence of raw
/// per-frame string labels (frames already collapsed to step granularity
/// upstream — this function does not itself aggregate frames into steps
/// beyond run-length compression of identical adjacent labels). Every label
/// encountered, including the `"begin"`/`"end"` sentinels this function
/// prepends/appends, must be present in `canonical_steps`; an unrecognised
/// label is a usage error (§7: "unknown label during graph build").
///
/// `trace_sources` identifies the input each trace came from (typically its
/// file path); it is hashed into the returned graph's
/// [`GraphProvenance::source_hash`] so a cached/serialized graph can be
/// checked against the traces that produced it. It need not align 1:1 with
/// `traces` by length — only its content is used.
pub fn build_graph(
    traces: &[Vec<String>],
    canonical_steps: &[String],
    trace_sources: &[String],
) -> Result<(Graph, GraphBuildReport), SteptrackError> {
    if canonical_steps.first().map(String::as_str) != Some(BEGIN_LABEL)
        || canonical_steps.last().map(String::as_str) != Some(END_LABEL)
    {
        return Err(SteptrackError::Usage(ErrorInfo::new(
            "canonical-steps-missing-sentinels",
            "canonical_steps must start with \"begin\" and end with \"end\"",
        )));
    }
    let n = canonical_steps.len();
    let index_of: BTreeMap<&str, usize> = canonical_steps
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    if index_of.len() != n {
        return Err(SteptrackError::Usage(ErrorInfo::new(
            "duplicate-step-index",
            "canonical_steps contains a duplicate step name",
        )));
    }

    let mut durations: Vec<Vec<f64>> = vec![Vec::new(); n];
    let mut transition_counts: Vec<Vec<u64>> = vec![vec![0; n]; n];

    for trace in traces {
        let mut labels: Vec<&str> = Vec::with_capacity(trace.len() + 2);
        labels.push(BEGIN_LABEL);
        labels.extend(trace.iter().map(String::as_str));
        labels.push(END_LABEL);

        let runs = compress_runs(&labels);
        let mut prev_index: Option<usize> = None;
        for (label, run_len) in runs {
            let idx = *index_of.get(label).ok_or_else(|| {
                SteptrackError::Usage(ErrorInfo::new(
                    "unknown-label",
                    format!("label '{label}' is not in the canonical step list"),
                ))
            })?;
            durations[idx].push(run_len as f64);
            if let Some(prev) = prev_index {
                if prev != idx {
                    transition_counts[prev][idx] += 1;
                }
            }
            prev_index = Some(idx);
        }
    }

    let mut steps = Vec::with_capacity(n);
    let mut samples_per_step = Vec::with_capacity(n);
    let mut fallback_steps = Vec::new();
    for (idx, name) in canonical_steps.iter().enumerate() {
        let _ = name;
        let samples = &durations[idx];
        samples_per_step.push(samples.len());
        let (mean, std) = if samples.is_empty() {
            fallback_steps.push(idx);
            (1.0, 0.0)
        } else {
            mean_and_population_std(samples)
        };
        steps.push(steptrack_core::Step::new(idx, mean, std));
    }

    let mut edges = vec![BTreeMap::new(); n];
    for from in 0..n {
        let total: u64 = transition_counts[from].iter().sum();
        if total == 0 {
            continue;
        }
        for to in 0..n {
            let count = transition_counts[from][to];
            if count > 0 {
                edges[from].insert(to, count as f64 / total as f64);
            }
        }
    }

    let provenance = GraphProvenance {
        trace_count: traces.len(),
        source_hash: Some(stable_hash_of_strings(trace_sources)),
        ..Default::default()
    };
    let graph = Graph::with_provenance(steps, edges, provenance)?;
    let report = GraphBuildReport {
        trace_count: traces.len(),
        samples_per_step,
        raw_transition_counts: transition_counts,
        fallback_steps,
    };
    Ok((graph, report))
}

/// Compresses consecutive identical labels into `(label, run_length)` runs.
fn compress_runs<'a>(labels: &[&'a str]) -> Vec<(&'a str, usize)> {
    let mut runs = Vec::new();
    for &label in labels {
        match runs.last_mut() {
            Some((last_label, len)) if *last_label == label => *len += 1,
            _ => runs.push((label, 1usize)),
        }
    }
    runs
}

fn mean_and_population_std(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
