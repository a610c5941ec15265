use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use steptrack_graph::graph_from_json;
use steptrack_tracker::ViterbiTracker;

use super::common::write_json;

/// Drives the online tracker directly over a precomputed observation
/// matrix and confusion matrix, without training a classifier. Useful for
/// debugging a graph or reproducing a single fold's tracker output.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Path to a graph JSON file (as written by `build-graph`).
    #[arg(long)]
    pub graph: PathBuf,
    /// JSON array of per-class observation rows, shape `(num_classes, num_frames)`.
    #[arg(long)]
    pub observations: PathBuf,
    /// JSON array of confusion matrix rows, shape `(num_classes, num_classes)`.
    #[arg(long)]
    pub confusion: PathBuf,
    /// Optional JSON object mapping a step index to the frames at which it
    /// is the oracle-pinned next step.
    #[arg(long)]
    pub oracle: Option<PathBuf>,
    /// Output path for the per-frame `(log_probability, step_history)`
    /// results, written as JSON.
    #[arg(long)]
    pub out: PathBuf,
}

/// Runs `predict`.
pub fn run(args: &PredictArgs) -> Result<(), Box<dyn Error>> {
    let graph = graph_from_json(&fs::read_to_string(&args.graph)?)?;
    let observations: Vec<Vec<f64>> = serde_json::from_str(&fs::read_to_string(&args.observations)?)?;
    let confusion_matrix: Vec<Vec<f64>> = serde_json::from_str(&fs::read_to_string(&args.confusion)?)?;
    let oracle: BTreeMap<usize, Vec<usize>> = match &args.oracle {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => BTreeMap::new(),
    };

    let mut tracker = ViterbiTracker::new(&graph, None);
    let results = tracker.predict(&observations, &confusion_matrix, &oracle)?;

    write_json(&args.out, &results)?;
    println!("steptrack predict: {} frame(s), result written to {}", results.len(), args.out.display());
    Ok(())
}
