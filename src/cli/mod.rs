// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates the work to Layer 2 (application).
//
// Three commands are supported:
//   1. `summary`  - print the layer table of a built model
//   2. `init`     - build a model and save it as a checkpoint
//   3. `classify` - run a recording through a saved model
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, InitArgs, ModelArgs};

#[derive(Parser, Debug)]
#[command(
    name = "shl-architectures",
    version,
    about = "Build SHL transport-mode classifiers with Burn and run them on sensor recordings."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Summary(args)  => run_summary(args),
            Commands::Init(args)     => run_init(args),
            Commands::Classify(args) => run_classify(args),
        }
    }
}

fn run_summary(args: ModelArgs) -> Result<()> {
    use crate::application::summary_use_case::SummaryUseCase;

    let summary = SummaryUseCase::new(args.into()).execute()?;
    println!("{summary}");
    Ok(())
}

fn run_init(args: InitArgs) -> Result<()> {
    use crate::application::init_use_case::InitUseCase;

    let checkpoint_dir = args.checkpoint_dir.clone();
    InitUseCase::new(args.into()).execute()?;

    println!("Model saved to '{checkpoint_dir}'.");
    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    use crate::application::classify_use_case::ClassifyUseCase;

    tracing::info!("Classifying recording '{}'", args.recording);
    let results = ClassifyUseCase::new((&args).into()).execute()?;

    if results.is_empty() {
        println!("Recording too short for a single window.");
        return Ok(());
    }

    for window in &results {
        let top = window
            .predictions
            .iter()
            .take(args.top_k.max(1))
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ");
        println!("t={:>8.2}s  {top}", window.seconds);
    }
    Ok(())
}
