//! Tracker configuration.

use serde::{Deserialize, Serialize};
use steptrack_core::Graph;

/// Tunable knobs for [`crate::trellis::Trellis`] construction.
///
/// `max_time` upper-bounds the plausible dwell time in frames; states
/// whose dwell reaches `max_time - 1` are absorbed (they keep receiving
/// self-transitions' neighbourhood but produce no further transitions
/// once `escape_prob` degenerates, per the survival-function construction
/// in [`crate::trellis`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Upper bound on dwell time, in frames.
    pub max_time: usize,
}

impl TrackerConfig {
    /// Derives a default `max_time` from a graph: `2 * ceil(max_i(mean_i +
    /// 3*std_i))` over all steps, so the trellis comfortably covers the
    /// longest plausible step duration with headroom.
    pub fn derive_default(graph: &Graph) -> Self {
        let bound = graph
            .steps()
            .iter()
            .map(|step| step.mean_time + 3.0 * step.std_time)
            .fold(0.0_f64, f64::max);
        let max_time = (2.0 * bound.ceil()).max(2.0) as usize;
        Self { max_time }
    }
}
