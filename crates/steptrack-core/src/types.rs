use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SteptrackError};
use crate::provenance::GraphProvenance;

/// A named stage in the procedure being tracked.
///
/// `index` is dense within `[0, N)` for a graph of `N` steps; the lowest
/// index is the sentinel `begin` step and the highest is the sentinel `end`
/// step. `mean_time`/`std_time` describe the step's dwell-time distribution
/// in frames, not seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Dense index naming this step within its graph.
    pub index: usize,
    /// Mean dwell time in frames.
    pub mean_time: f64,
    /// Population standard deviation of dwell time in frames.
    pub std_time: f64,
}

impl Step {
    /// Creates a new step descriptor.
    pub fn new(index: usize, mean_time: f64, std_time: f64) -> Self {
        Self {
            index,
            mean_time,
            std_time,
        }
    }
}

/// A directed weighted graph of allowed step transitions.
///
/// Outgoing edge probabilities for any step with at least one outgoing edge
/// sum to 1. Self-loops are never stored here; step persistence is modelled
/// by dwell-time duration in [`crate::Step`] and realised downstream by the
/// tracker's trellis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    steps: Vec<Step>,
    /// `edges[from.index]` maps a destination step index to its transition
    /// probability. Empty for terminal steps.
    edges: Vec<BTreeMap<usize, f64>>,
    /// Provenance recorded when the graph was built or loaded.
    #[serde(default)]
    pub provenance: GraphProvenance,
}

impl Graph {
    /// Builds a graph from a dense steps list and an edge mapping keyed by
    /// step index, validating the invariants from the data model: dense
    /// indices, edge endpoints within range, `begin` has no incoming edges,
    /// `end` has no outgoing edges.
    pub fn new(
        steps: Vec<Step>,
        edges: Vec<BTreeMap<usize, f64>>,
    ) -> Result<Self, SteptrackError> {
        Self::with_provenance(steps, edges, GraphProvenance::default())
    }

    /// Same as [`Graph::new`] but attaches explicit provenance metadata.
    pub fn with_provenance(
        steps: Vec<Step>,
        edges: Vec<BTreeMap<usize, f64>>,
        provenance: GraphProvenance,
    ) -> Result<Self, SteptrackError> {
        if steps.is_empty() {
            return Err(SteptrackError::Graph(ErrorInfo::new(
                "empty-graph",
                "a graph requires at least one step",
            )));
        }
        for (expected, step) in steps.iter().enumerate() {
            if step.index != expected {
                return Err(SteptrackError::Graph(ErrorInfo::new(
                    "sparse-step-indices",
                    format!("expected dense step indices, found {} at position {expected}", step.index),
                )));
            }
        }
        if edges.len() != steps.len() {
            return Err(SteptrackError::Graph(ErrorInfo::new(
                "edge-table-size-mismatch",
                format!(
                    "edge table has {} rows but graph has {} steps",
                    edges.len(),
                    steps.len()
                ),
            )));
        }
        let n = steps.len();
        for (from, row) in edges.iter().enumerate() {
            for &to in row.keys() {
                if to >= n {
                    return Err(SteptrackError::Graph(ErrorInfo::new(
                        "dangling-edge",
                        format!("edge {from} -> {to} references a step outside [0, {n})"),
                    )));
                }
            }
        }
        if edges.iter().any(|row| row.contains_key(&0)) {
            return Err(SteptrackError::Graph(ErrorInfo::new(
                "begin-has-incoming-edge",
                "the begin step (index 0) may not have incoming edges",
            )));
        }
        if !edges[n - 1].is_empty() {
            return Err(SteptrackError::Graph(ErrorInfo::new(
                "end-has-outgoing-edge",
                "the end step (last index) may not have outgoing edges",
            )));
        }
        Ok(Self {
            steps,
            edges,
            provenance,
        })
    }

    /// Returns the ordered list of steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the outgoing edges of `from`, or `None` if out of range.
    pub fn edges_from(&self, from: usize) -> Option<&BTreeMap<usize, f64>> {
        self.edges.get(from)
    }

    /// Returns the full edge table, indexed by source step.
    pub fn edges(&self) -> &[BTreeMap<usize, f64>] {
        &self.edges
    }

    /// Returns the sentinel `begin` step (lowest index).
    pub fn start(&self) -> Step {
        self.steps[0]
    }

    /// Returns the sentinel `end` step (highest index).
    pub fn end(&self) -> Step {
        self.steps[self.steps.len() - 1]
    }

    /// Number of steps in the graph, including `begin` and `end`.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the graph has no steps (never constructible via
    /// [`Graph::new`], but useful for generic callers).
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(i: usize) -> Step {
        Step::new(i, 1.0, 0.0)
    }

    #[test]
    fn rejects_sparse_indices() {
        let steps = vec![Step::new(0, 1.0, 0.0), Step::new(2, 1.0, 0.0)];
        let edges = vec![BTreeMap::new(), BTreeMap::new()];
        assert!(Graph::new(steps, edges).is_err());
    }

    #[test]
    fn rejects_edge_into_begin() {
        let steps = vec![step(0), step(1)];
        let mut edges = vec![BTreeMap::new(), BTreeMap::new()];
        edges[1].insert(0, 1.0);
        assert!(Graph::new(steps, edges).is_err());
    }

    #[test]
    fn rejects_edge_out_of_end() {
        let steps = vec![step(0), step(1), step(2)];
        let mut edges = vec![BTreeMap::new(), BTreeMap::new(), BTreeMap::new()];
        edges[2].insert(1, 1.0);
        assert!(Graph::new(steps, edges).is_err());
    }

    #[test]
    fn accepts_well_formed_chain() {
        let steps = vec![step(0), step(1), step(2), step(3)];
        let mut edges = vec![BTreeMap::new(); 4];
        edges[0].insert(1, 1.0);
        edges[1].insert(2, 1.0);
        edges[2].insert(3, 1.0);
        let graph = Graph::new(steps, edges).unwrap();
        assert_eq!(graph.start().index, 0);
        assert_eq!(graph.end().index, 3);
    }

    #[test]
    fn round_trips_through_json() {
        let steps = vec![step(0), step(1)];
        let mut edges = vec![BTreeMap::new(); 2];
        edges[0].insert(1, 1.0);
        let graph = Graph::new(steps, edges).unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        let restored: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(graph, restored);
    }
}
