//! # aoisched
//!
//! Entry point of the scheduling agent driver. Run with `--verbose` (or set
//! `RUST_LOG`) to see every observed flow, chosen weight and table update.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use aoisched::{app, cli::Args};

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let summary = app::run(&args)?;
    tracing::info!(
        training_steps = summary.training.steps,
        training_mean_reward = summary.training.mean_reward(),
        inference_steps = summary.inference.map(|s| s.steps),
        inference_mean_reward = summary.inference.map(|s| s.mean_reward()),
        "run complete"
    );
    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
