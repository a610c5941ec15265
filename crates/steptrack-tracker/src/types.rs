//! Hidden-state value types shared by the trellis and the online tracker.

use serde::{Deserialize, Serialize};

/// A hidden state `(step_index, dwell_time)`: which step the tracker
/// believes the participant occupies, and how many consecutive frames
/// (including this one) it has spent there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenState {
    /// The step this hidden state occupies.
    pub step_index: usize,
    /// Consecutive frames already spent in `step_index`, capped below
    /// `MAX_TIME`.
    pub dwell_time: usize,
}

impl HiddenState {
    /// Creates a new hidden state.
    pub fn new(step_index: usize, dwell_time: usize) -> Self {
        Self {
            step_index,
            dwell_time,
        }
    }
}

/// A precomputed transition out of a `(from_step, from_dwell)` trellis
/// bucket: either a self-loop (`next_step_index == from_step`) or a move
/// into a graph successor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HiddenTransition {
    /// Destination step index.
    pub next_step_index: usize,
    /// Natural-log transition probability.
    pub log_probability: f64,
}

impl HiddenTransition {
    /// Creates a new transition.
    pub fn new(next_step_index: usize, log_probability: f64) -> Self {
        Self {
            next_step_index,
            log_probability,
        }
    }
}

/// A Viterbi table entry: the best log-probability history ending in a
/// particular step, as of the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViterbiEntry {
    /// Cumulative log-probability of `history`.
    pub log_probability: f64,
    /// Ordered hidden states taken so far, including the current one.
    pub history: Vec<HiddenState>,
}

impl ViterbiEntry {
    /// Creates a new entry.
    pub fn new(log_probability: f64, history: Vec<HiddenState>) -> Self {
        Self {
            log_probability,
            history,
        }
    }

    /// Returns the most recent hidden state, or `None` if `history` is
    /// empty (never true for an entry produced by the tracker).
    pub fn last_state(&self) -> Option<&HiddenState> {
        self.history.last()
    }

    /// Step indices of the history, in order.
    pub fn step_history(&self) -> Vec<usize> {
        self.history.iter().map(|state| state.step_index).collect()
    }
}
