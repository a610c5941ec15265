//! Precomputed `(step, dwell) -> transitions` table.
//!
//! Converts each step's duration distribution into a dwell-indexed escape
//! probability, turning the semi-Markov procedural graph into a plain HMM
//! over `(step, dwell)` pairs (§4.3: no per-duration outer loop at query
//! time).

use statrs::distribution::{ContinuousCDF, Normal};
use steptrack_core::Graph;

use crate::types::HiddenTransition;

/// `table[step][dwell]` holds every transition reachable from that
/// `(step, dwell)` bucket: at most one self-loop plus one entry per graph
/// successor of `step`.
#[derive(Debug, Clone)]
pub struct Trellis {
    table: Vec<Vec<Vec<HiddenTransition>>>,
    max_time: usize,
}

impl Trellis {
    /// Builds the trellis for `graph`, allocating `max_time` dwell buckets
    /// per step.
    pub fn build(graph: &Graph, max_time: usize) -> Self {
        let n = graph.len();
        let mut table: Vec<Vec<Vec<HiddenTransition>>> = vec![vec![Vec::new(); max_time]; n];

        for step in graph.steps() {
            let surv = survival_fn(step.mean_time, step.std_time);
            let edges = graph.edges_from(step.index);

            let mut prev = surv(0);
            for time in 0..max_time.saturating_sub(1) {
                let curr = prev;
                let next = surv(time + 1);
                let escape_prob = 1.0 - next / curr;
                if escape_prob.is_nan() {
                    prev = next;
                    continue;
                }

                let bucket = &mut table[step.index][time];
                bucket.push(HiddenTransition::new(
                    step.index,
                    (1.0 - escape_prob).ln(),
                ));
                if let Some(edges) = edges {
                    for (&dest, &p_edge) in edges {
                        bucket.push(HiddenTransition::new(dest, (escape_prob * p_edge).ln()));
                    }
                }
                prev = next;
            }
        }

        Self { table, max_time }
    }

    /// Upper bound on dwell time this trellis was built for.
    pub fn max_time(&self) -> usize {
        self.max_time
    }

    /// Transitions reachable from `(step, dwell)`, or an empty slice if
    /// `step`/`dwell` is out of range (a dead end).
    pub fn transitions_at(&self, step: usize, dwell: usize) -> &[HiddenTransition] {
        self.table
            .get(step)
            .and_then(|rows| rows.get(dwell))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Returns the survival function `t -> P(duration > t)` for a step's
/// duration distribution. `std_time == 0` is treated as a delta function
/// at `mean_time` rather than routed through the normal CDF, whose scale
/// parameter cannot be zero.
fn survival_fn(mean_time: f64, std_time: f64) -> impl Fn(usize) -> f64 {
    if std_time > 0.0 {
        let normal = Normal::new(mean_time, std_time).expect("validated positive std_time");
        Box::new(move |t: usize| 1.0 - normal.cdf(t as f64)) as Box<dyn Fn(usize) -> f64>
    } else {
        Box::new(move |t: usize| if (t as f64) < mean_time { 1.0 } else { 0.0 })
            as Box<dyn Fn(usize) -> f64>
    }
}
