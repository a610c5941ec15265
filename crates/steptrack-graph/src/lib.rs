#![deny(missing_docs)]
//! Procedural graph builder for the step tracker: estimates per-step
//! duration statistics and transition probabilities from labelled traces
//! and emits a [`steptrack_core::Graph`].

mod builder;
mod hash;
mod serialization;

pub use builder::{build_graph, GraphBuildReport};
pub use hash::stable_hash_of_strings;
pub use serialization::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};
