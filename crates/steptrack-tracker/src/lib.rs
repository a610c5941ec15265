#![deny(missing_docs)]
//! Online, causal Viterbi tracker over a procedural graph: the trellis
//! precomputation (`trellis`) and the per-frame tracker (`viterbi`) that
//! consumes it.

mod config;
mod trellis;
mod types;
mod viterbi;

pub use config::TrackerConfig;
pub use trellis::Trellis;
pub use types::{HiddenState, HiddenTransition, ViterbiEntry};
pub use viterbi::{FrameResult, TrackerState, ViterbiTracker};
