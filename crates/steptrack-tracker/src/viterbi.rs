//! Online, causal Viterbi tracker over `(step, dwell)` hidden states.

use std::collections::BTreeMap;

use steptrack_core::{ErrorInfo, Graph, SteptrackError};

use crate::config::TrackerConfig;
use crate::trellis::Trellis;
use crate::types::{HiddenState, ViterbiEntry};

/// Tracker lifecycle. `forward`/`predict` are only valid once the tracker
/// has left `Fresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No frame observed yet; only `initialize` is callable.
    Fresh,
    /// `initialize` has run; `forward` is now callable.
    Initialized,
    /// At least one `forward` call has run.
    Advancing,
}

/// The `(best_log_probability, best_step_history)` pair returned after
/// each frame.
pub type FrameResult = (f64, Vec<usize>);

/// Maintains, for each reachable step, the single most probable history
/// ending there (entry recombination), across a sequence of per-frame
/// observations.
pub struct ViterbiTracker<'g> {
    graph: &'g Graph,
    trellis: Trellis,
    start_step_indices: Option<Vec<usize>>,
    curr_entries: Vec<Option<ViterbiEntry>>,
    state: TrackerState,
}

impl<'g> ViterbiTracker<'g> {
    /// Builds a tracker over `graph`, using [`TrackerConfig::derive_default`]
    /// for the trellis' `max_time`.
    pub fn new(graph: &'g Graph, start_step_indices: Option<Vec<usize>>) -> Self {
        let config = TrackerConfig::derive_default(graph);
        Self::with_config(graph, start_step_indices, config)
    }

    /// Builds a tracker with an explicit [`TrackerConfig`].
    pub fn with_config(
        graph: &'g Graph,
        start_step_indices: Option<Vec<usize>>,
        config: TrackerConfig,
    ) -> Self {
        let trellis = Trellis::build(graph, config.max_time);
        Self {
            graph,
            trellis,
            start_step_indices,
            curr_entries: vec![None; graph.len()],
            state: TrackerState::Fresh,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Seeds one entry per step from the first frame's observation.
    ///
    /// For each candidate current step `c`: if `start_step_indices` is
    /// `Some` and does not contain `c`, the entry's accumulated mass stays
    /// zero (so its log-probability is `-inf`); otherwise it accumulates
    /// `sum_o CM[c][o] * observation[o]`.
    pub fn initialize(
        &mut self,
        observation: &[f64],
        confusion_matrix: &[Vec<f64>],
    ) -> Result<FrameResult, SteptrackError> {
        let mut entries = vec![None; self.graph.len()];
        for step in self.graph.steps() {
            let allowed = self
                .start_step_indices
                .as_ref()
                .map_or(true, |allowed| allowed.contains(&step.index));

            let mut acc_prob = 0.0;
            if allowed {
                let row = confusion_matrix.get(step.index).ok_or_else(|| {
                    SteptrackError::Usage(ErrorInfo::new(
                        "confusion-matrix-row-missing",
                        format!("confusion matrix has no row for step {}", step.index),
                    ))
                })?;
                for (observed_index, &prob) in row.iter().enumerate() {
                    acc_prob += prob * observation.get(observed_index).copied().unwrap_or(0.0);
                }
            }

            entries[step.index] = Some(ViterbiEntry::new(
                acc_prob.ln(),
                vec![HiddenState::new(step.index, 0)],
            ));
        }

        self.curr_entries = entries;
        self.state = TrackerState::Initialized;
        Ok(self.best_entry())
    }

    /// Advances the tracker by one frame.
    ///
    /// `oracle_next_step`, when set, restricts this frame's transitions to
    /// moves into that step and forbids self-loops out of it (entries
    /// already sitting at `oracle_next_step` are dropped entirely, since
    /// the oracle says the step is being freshly entered this frame).
    /// `oracle_prohibited_steps` forbids transitions into the named steps
    /// when no `oracle_next_step` is given.
    pub fn forward(
        &mut self,
        observation: &[f64],
        confusion_matrix: &[Vec<f64>],
        oracle_next_step: Option<usize>,
        oracle_prohibited_steps: &[usize],
    ) -> Result<FrameResult, SteptrackError> {
        if self.state == TrackerState::Fresh {
            return Err(SteptrackError::Usage(ErrorInfo::new(
                "forward-before-initialize",
                "forward() called before initialize()",
            )));
        }

        let mut observed_log_probs = vec![f64::NEG_INFINITY; self.graph.len()];
        for step in self.graph.steps() {
            let row = confusion_matrix.get(step.index).ok_or_else(|| {
                SteptrackError::Usage(ErrorInfo::new(
                    "confusion-matrix-row-missing",
                    format!("confusion matrix has no row for step {}", step.index),
                ))
            })?;
            let mut acc_prob = 0.0;
            for (observed_index, &prob) in row.iter().enumerate() {
                acc_prob += prob * observation.get(observed_index).copied().unwrap_or(0.0);
            }
            observed_log_probs[step.index] = acc_prob.ln();
        }

        let mut next_entries: Vec<Option<ViterbiEntry>> = vec![None; self.graph.len()];

        for (from_step, entry) in self.curr_entries.iter().enumerate() {
            let Some(entry) = entry else { continue };
            let Some(last) = entry.last_state() else { continue };

            for transition in self.trellis.transitions_at(from_step, last.dwell_time) {
                let to = transition.next_step_index;

                if let Some(pinned) = oracle_next_step {
                    if from_step == pinned {
                        continue;
                    }
                    if to != pinned {
                        continue;
                    }
                } else if to != from_step && oracle_prohibited_steps.contains(&to) {
                    continue;
                }

                let candidate_prob =
                    entry.log_probability + transition.log_probability + observed_log_probs[to];

                if let Some(existing) = &next_entries[to] {
                    if candidate_prob < existing.log_probability {
                        continue;
                    }
                }

                let next_dwell = if to == from_step { last.dwell_time + 1 } else { 0 };
                let mut history = entry.history.clone();
                history.push(HiddenState::new(to, next_dwell));
                next_entries[to] = Some(ViterbiEntry::new(candidate_prob, history));
            }
        }

        self.curr_entries = next_entries;
        self.state = TrackerState::Advancing;
        Ok(self.best_entry())
    }

    /// Drives `initialize` over column 0 of `observations` and `forward`
    /// over every subsequent column, returning one `FrameResult` per
    /// frame. `observations[step][frame]` and `confusion_matrix[step]`
    /// follow the layout used throughout this crate: rows indexed by
    /// actual/observed step, columns by frame.
    ///
    /// `oracle` maps a step index to the frames at which it is the
    /// designated `oracle_next_step`; when more than one key claims the
    /// same frame, the lowest step index wins (deterministic, owing to the
    /// `BTreeMap` key order).
    pub fn predict(
        &mut self,
        observations: &[Vec<f64>],
        confusion_matrix: &[Vec<f64>],
        oracle: &BTreeMap<usize, Vec<usize>>,
    ) -> Result<Vec<FrameResult>, SteptrackError> {
        let num_frames = observations.first().map_or(0, Vec::len);
        if num_frames == 0 {
            return Ok(Vec::new());
        }

        let mut results = Vec::with_capacity(num_frames);
        let first_observation: Vec<f64> = observations.iter().map(|row| row[0]).collect();
        results.push(self.initialize(&first_observation, confusion_matrix)?);

        for time in 1..num_frames {
            let oracle_next_step = oracle
                .iter()
                .find(|(_, frames)| frames.contains(&time))
                .map(|(&step, _)| step);
            let oracle_prohibited_steps: Vec<usize> = oracle
                .keys()
                .copied()
                .filter(|&step| Some(step) != oracle_next_step)
                .collect();

            let observation: Vec<f64> = observations.iter().map(|row| row[time]).collect();
            results.push(self.forward(
                &observation,
                confusion_matrix,
                oracle_next_step,
                &oracle_prohibited_steps,
            )?);
        }

        Ok(results)
    }

    fn best_entry(&self) -> FrameResult {
        self.curr_entries
            .iter()
            .flatten()
            .max_by(|a, b| a.log_probability.total_cmp(&b.log_probability))
            .map(|entry| (entry.log_probability, entry.step_history()))
            .unwrap_or((f64::NEG_INFINITY, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use steptrack_core::Step;

    fn chain_graph() -> Graph {
        let steps = vec![
            Step::new(0, 1.0, 0.0),
            Step::new(1, 3.0, 0.5),
            Step::new(2, 3.0, 0.5),
            Step::new(3, 1.0, 0.0),
        ];
        let mut edges = vec![BTreeMap::new(); 4];
        edges[0].insert(1, 1.0);
        edges[1].insert(2, 1.0);
        edges[2].insert(3, 1.0);
        Graph::new(steps, edges).unwrap()
    }

    fn identity_cm(n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect()
    }

    #[test]
    fn single_step_graph_always_predicts_that_step() {
        let steps = vec![Step::new(0, 1.0, 0.0)];
        let edges = vec![BTreeMap::new()];
        let graph = Graph::new(steps, edges).unwrap();
        let mut tracker = ViterbiTracker::new(&graph, None);

        let cm = identity_cm(1);
        let (prob, history) = tracker.initialize(&[1.0], &cm).unwrap();
        assert!(prob.is_finite());
        assert_eq!(history, vec![0]);

        let (_, history) = tracker.forward(&[1.0], &cm, None, &[]).unwrap();
        assert_eq!(history, vec![0, 0]);
    }

    #[test]
    fn forward_before_initialize_is_usage_error() {
        let graph = chain_graph();
        let mut tracker = ViterbiTracker::new(&graph, None);
        let cm = identity_cm(4);
        let err = tracker.forward(&[1.0, 0.0, 0.0, 0.0], &cm, None, &[]).unwrap_err();
        assert!(matches!(err, SteptrackError::Usage(_)));
    }

    #[test]
    fn identity_confusion_matrix_reduces_to_argmax_under_graph_constraints() {
        // scenario E1 (spec §8): begin->A->B->end, CM = I, four frames of A
        // then four frames of B.
        let graph = chain_graph();
        let cm = identity_cm(4);
        let mut tracker = ViterbiTracker::new(&graph, Some(vec![0]));

        let mut observations = vec![vec![0.0; 8]; 4];
        for t in 0..4 {
            observations[0][t] = if t == 0 { 1.0 } else { 0.0 };
            observations[1][t] = 1.0;
        }
        for t in 4..8 {
            observations[2][t] = 1.0;
        }
        // begin only occupies frame 0, handled by the graph's escape model;
        // keep step 0's column simple and let the trellis carry dwell.
        let oracle = BTreeMap::new();
        let results = tracker.predict(&observations, &cm, &oracle).unwrap();
        let (_, last_history) = results.last().unwrap();
        assert_eq!(last_history.last(), Some(&2));
    }

    #[test]
    fn oracle_pin_forces_transition_regardless_of_observation() {
        // scenario E3 (spec §8): oracle pins step B (index 2) at frame 3.
        let graph = chain_graph();
        let cm = identity_cm(4);
        let mut tracker = ViterbiTracker::new(&graph, Some(vec![0]));

        let observations = vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ];
        let mut oracle = BTreeMap::new();
        oracle.insert(2usize, vec![3usize]);

        let results = tracker.predict(&observations, &cm, &oracle).unwrap();
        let (_, history_at_3) = &results[3];
        assert_eq!(history_at_3.last(), Some(&2));
    }

    #[test]
    fn entries_after_forward_have_history_length_matching_frame_count() {
        let graph = chain_graph();
        let cm = identity_cm(4);
        let mut tracker = ViterbiTracker::new(&graph, Some(vec![0]));
        tracker.initialize(&[1.0, 0.0, 0.0, 0.0], &cm).unwrap();
        for _ in 0..3 {
            tracker
                .forward(&[0.0, 1.0, 0.0, 0.0], &cm, None, &[])
                .unwrap();
        }
        for entry in tracker.curr_entries.iter().flatten() {
            assert_eq!(entry.history.len(), 4);
        }
    }

    #[test]
    fn confusion_driven_correction_has_monotone_history_scenario_e2() {
        // scenario E2 (spec §8): CM[A][B]=0.3, CM[A][A]=0.7, with
        // observations whose argmax flips B,A,A,B,A,B,B,B. The graph only
        // admits a forward A->B edge, so the confusion-aware posterior
        // must settle into a monotone A-then-B history with no oscillation
        // back into A once it has left.
        let graph = chain_graph();
        let mut cm = identity_cm(4);
        cm[1] = vec![0.0, 0.7, 0.3, 0.0];
        let mut tracker = ViterbiTracker::new(&graph, Some(vec![1]));

        let argmax = ["B", "A", "A", "B", "A", "B", "B", "B"];
        let mut observations = vec![vec![0.0; 8]; 4];
        for (t, label) in argmax.iter().enumerate() {
            let idx = if *label == "A" { 1 } else { 2 };
            observations[idx][t] = 1.0;
        }

        let oracle = BTreeMap::new();
        let results = tracker.predict(&observations, &cm, &oracle).unwrap();
        let (_, history) = results.last().unwrap();

        assert!(
            history.windows(2).all(|w| w[0] <= w[1]),
            "history must never step backwards: {history:?}"
        );
        assert_eq!(history.first(), Some(&1));
        assert_eq!(history.last(), Some(&2));
    }

    #[test]
    fn dwell_saturates_at_max_time_without_crashing() {
        let steps = vec![Step::new(0, 2.0, 0.5), Step::new(1, 1.0, 0.0)];
        let mut edges = vec![BTreeMap::new(); 2];
        edges[0].insert(1, 1.0);
        let graph = Graph::new(steps, edges).unwrap();
        let config = TrackerConfig { max_time: 4 };
        let mut tracker = ViterbiTracker::with_config(&graph, Some(vec![0]), config);

        let cm = identity_cm(2);
        tracker.initialize(&[1.0, 0.0], &cm).unwrap();
        for _ in 0..10 {
            let (prob, _history) = tracker.forward(&[1.0, 0.0], &cm, None, &[]).unwrap();
            assert!(prob.is_finite() || prob == f64::NEG_INFINITY);
        }
    }
}
