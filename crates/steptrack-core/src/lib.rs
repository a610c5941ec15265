#![deny(missing_docs)]
//! Core value types, error model and deterministic RNG helpers shared across
//! the steptrack engine: the `Step`/`Graph` data model, the workspace-wide
//! `SteptrackError`, and seed-derivation utilities used by the classifier
//! bootstrap sampler and the evaluation harness' train/validation split.

pub mod errors;
pub mod provenance;
pub mod rng;
mod types;

pub use errors::{ErrorInfo, SteptrackError};
pub use provenance::{GraphProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
pub use types::{Graph, Step};
