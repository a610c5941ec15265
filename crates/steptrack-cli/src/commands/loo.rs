use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use steptrack_classifier::ClassifierConfig;
use steptrack_eval::{run_loo, HarnessConfig};
use steptrack_graph::graph_from_json;

use super::common::{list_trace_files, load_canonical_steps, parse_index_csv, write_json};

/// Runs the leave-one-out evaluation harness over a directory of labelled
/// traces and a previously built graph, writing a report to `out`.
#[derive(Args, Debug)]
pub struct LooArgs {
    /// Directory of per-participant trace JSON files.
    #[arg(long)]
    pub traces: PathBuf,
    /// `classes.txt` taxonomy table, used to order the canonical step list.
    #[arg(long)]
    pub classes: PathBuf,
    /// Path to a graph JSON file (as written by `build-graph`).
    #[arg(long)]
    pub graph: PathBuf,
    /// Comma-separated step indices for which a run-start oracle is built
    /// from ground truth.
    #[arg(long = "oracle-steps")]
    pub oracle_steps: Option<String>,
    /// Comma-separated step indices allowed to carry initial tracker mass.
    #[arg(long = "start-steps")]
    pub start_steps: Option<String>,
    /// Output directory for `loo_report.json`.
    #[arg(long)]
    pub out: PathBuf,
    /// Worker pool size for fold dispatch.
    #[arg(long = "num-processes", default_value_t = 1)]
    pub num_processes: usize,
    /// Filename marker excluding a trace from ever appearing in a test set.
    #[arg(long = "authors-suffix", default_value = "-authors")]
    pub authors_suffix: String,
    /// Master seed for per-fold train/validation splits and bootstrap resamples.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Number of bagged decision trees per fold's classifier.
    #[arg(long = "n-trees", default_value_t = 100)]
    pub n_trees: usize,
    /// Maximum tree depth; unset grows trees to purity.
    #[arg(long = "max-depth")]
    pub max_depth: Option<usize>,
    /// Optional on-disk classifier cache directory shared across folds.
    #[arg(long = "cache-dir")]
    pub cache_dir: Option<PathBuf>,
}

/// Runs `loo`.
pub fn run(args: &LooArgs) -> Result<(), Box<dyn Error>> {
    let canonical_steps = load_canonical_steps(&args.classes)?;
    let graph = graph_from_json(&fs::read_to_string(&args.graph)?)?;
    let files = list_trace_files(&args.traces)?;

    let oracle_step_indices = args.oracle_steps.as_deref().map(parse_index_csv).transpose()?;
    let start_step_indices = args.start_steps.as_deref().map(parse_index_csv).transpose()?;

    let config = HarnessConfig {
        num_processes: args.num_processes,
        authors_suffix: args.authors_suffix.clone(),
        seed: args.seed,
        start_step_indices,
        oracle_step_indices,
        classifier: ClassifierConfig {
            n_trees: args.n_trees,
            max_depth: args.max_depth,
            seed: args.seed,
            cache_dir: args.cache_dir.clone(),
        },
    };

    let report = run_loo(&graph, &files, &canonical_steps, &config)?;

    fs::create_dir_all(&args.out)?;
    write_json(&args.out.join("loo_report.json"), &report)?;

    let failed = report.folds.iter().filter(|fold| fold.error.is_some()).count();
    println!(
        "steptrack loo: {} trace(s), {} fold(s), {} failed",
        report.trace_count,
        report.folds.len(),
        failed,
    );
    for fold in report.folds.iter().filter(|fold| fold.error.is_some()) {
        if let Some(error) = &fold.error {
            eprintln!("fold {}: {}", fold.fold_index, error);
        }
    }
    Ok(())
}
