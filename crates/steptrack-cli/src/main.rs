use std::error::Error;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::{
    build_graph::{self, BuildGraphArgs},
    loo::{self, LooArgs},
    predict::{self, PredictArgs},
    train::{self, TrainArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "steptrack", about = "Hidden-state procedural step tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate a step graph from a directory of labelled traces.
    BuildGraph(BuildGraphArgs),
    /// Fit a classifier over a directory of labelled traces.
    Train(TrainArgs),
    /// Run the leave-one-out evaluation harness.
    Loo(LooArgs),
    /// Drive the online tracker over a precomputed observation matrix.
    Predict(PredictArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::BuildGraph(args) => build_graph::run(&args),
        Command::Train(args) => train::run(&args),
        Command::Loo(args) => loo::run(&args),
        Command::Predict(args) => predict::run(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("steptrack: {}", format_error(err.as_ref()));
            ExitCode::FAILURE
        }
    }
}

fn format_error(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
