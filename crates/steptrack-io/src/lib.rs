#![deny(missing_docs)]
//! Trace and taxonomy ingestion: the JSON per-participant trace record,
//! `classes.txt`/annotation-CSV/`clap_times.csv` taxonomy tables, and the
//! `'Other'`-filtering + feature-stacking glue consumed by the evaluation
//! harness.

mod annotation;
mod clap_times;
mod classes;
mod naming;
mod trace;

pub use annotation::{get_times_and_labels, load_annotations, overwrite_other_labels, AnnotationRow};
pub use clap_times::load_clap_times;
pub use classes::{classes_to_canonical_steps, load_classes};
pub use naming::has_marker_suffix;
pub use trace::{is_non_step_label, load_imu_and_audio, TraceRecord};
