use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use steptrack_classifier::{training_set_cache_key, ClassifierConfig};
use steptrack_io::load_imu_and_audio;

use super::common::{list_trace_files, load_canonical_steps};

/// Fits a classifier over a directory of labelled traces and writes it to
/// disk.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory of per-participant trace JSON files.
    #[arg(long)]
    pub traces: PathBuf,
    /// `classes.txt` taxonomy table, used to order the canonical step list.
    #[arg(long)]
    pub classes: PathBuf,
    /// Optional on-disk cache directory, keyed by the training set's path hash.
    #[arg(long = "cache-dir")]
    pub cache_dir: Option<PathBuf>,
    /// Output path for the fitted classifier, written via `bincode`.
    #[arg(long)]
    pub out: PathBuf,
    /// Number of bagged decision trees.
    #[arg(long = "n-trees", default_value_t = 100)]
    pub n_trees: usize,
    /// Maximum tree depth; unset grows trees to purity.
    #[arg(long = "max-depth")]
    pub max_depth: Option<usize>,
    /// Master seed for the bootstrap resample substreams.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// Runs `train`.
pub fn run(args: &TrainArgs) -> Result<(), Box<dyn Error>> {
    let canonical_steps = load_canonical_steps(&args.classes)?;
    let trace_files = list_trace_files(&args.traces)?;
    let trace_paths: Vec<&std::path::Path> = trace_files.iter().map(PathBuf::as_path).collect();

    let (features, labels) = load_imu_and_audio(&trace_paths, &canonical_steps)?;

    let cache_key = args.cache_dir.as_ref().map(|_| {
        training_set_cache_key(
            &trace_paths
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>(),
        )
    });

    let config = ClassifierConfig {
        n_trees: args.n_trees,
        max_depth: args.max_depth,
        seed: args.seed,
        cache_dir: args.cache_dir.clone(),
    };
    let classifier = steptrack_classifier::train(
        config,
        &features,
        &labels,
        canonical_steps.len(),
        cache_key.as_deref(),
    )?;

    let bytes = bincode::serialize(&classifier)?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.out, bytes)?;

    println!(
        "steptrack train: {} frames across {} trace(s), {} trees, model written to {}",
        features.nrows(),
        trace_files.len(),
        args.n_trees,
        args.out.display(),
    );
    Ok(())
}
