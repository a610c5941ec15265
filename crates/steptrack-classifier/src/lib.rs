#![deny(missing_docs)]
//! Multiclass classifier adapter: a `StepClassifier` trait seam, a bagged
//! decision-tree default implementation, row-normalized confusion-matrix
//! estimation, and a content-addressed on-disk classifier cache.

mod cache;
mod config;
mod confusion;
mod forest;
mod hash;
mod traits;
mod train;

pub use config::ClassifierConfig;
pub use confusion::confusion_probabilities;
pub use forest::ForestClassifier;
pub use hash::training_set_cache_key;
pub use traits::{pad_missing_classes, StepClassifier};
pub use train::train;
