use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use steptrack_graph::{build_graph, graph_to_json};
use steptrack_io::{is_non_step_label, TraceRecord};

use super::common::{list_trace_files, load_canonical_steps};

/// Estimates a step graph (transition probabilities + duration statistics)
/// from a directory of labelled traces.
#[derive(Args, Debug)]
pub struct BuildGraphArgs {
    /// Directory of per-participant trace JSON files.
    #[arg(long)]
    pub traces: PathBuf,
    /// `classes.txt` taxonomy table, used to order the canonical step list.
    #[arg(long)]
    pub classes: PathBuf,
    /// Output path for the built graph, written as JSON.
    #[arg(long)]
    pub out: PathBuf,
}

/// Runs `build-graph`.
pub fn run(args: &BuildGraphArgs) -> Result<(), Box<dyn Error>> {
    let canonical_steps = load_canonical_steps(&args.classes)?;
    let trace_files = list_trace_files(&args.traces)?;

    let mut traces = Vec::with_capacity(trace_files.len());
    for path in &trace_files {
        let record = TraceRecord::load(path)?;
        let labels: Vec<String> = record
            .labels
            .into_iter()
            .filter(|label| !is_non_step_label(label))
            .collect();
        traces.push(labels);
    }

    let trace_sources: Vec<String> = trace_files
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    let (graph, report) = build_graph(&traces, &canonical_steps, &trace_sources)?;
    let json = graph_to_json(&graph)?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.out, json)?;

    println!(
        "steptrack build-graph: {} traces, {} steps, {} fallback step(s)",
        report.trace_count,
        canonical_steps.len(),
        report.fallback_steps.len(),
    );
    if !report.fallback_steps.is_empty() {
        println!("fallback step indices: {:?}", report.fallback_steps);
    }
    Ok(())
}
