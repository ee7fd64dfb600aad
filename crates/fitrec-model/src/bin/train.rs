//! Offline trainer.
//!
//! Generates the synthetic population, fits the goal model and writes
//! both artifacts loaded by the server at startup:
//!
//! ```bash
//! train --out artifacts/ --samples 1000 --trees 100 --max-depth 10 --seed 42
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use fitrec_model::{synthetic, train, ForestParams, ModelArtifact};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Train the fitness goal classifier", long_about = None)]
struct Args {
    /// Output directory for goal_model.json and population.json
    #[arg(long, default_value = "artifacts")]
    out: PathBuf,

    /// Number of synthetic profiles to generate
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Trees in the ensemble
    #[arg(long, default_value_t = 100)]
    trees: usize,

    #[arg(long, default_value_t = 10)]
    max_depth: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let params = ForestParams {
        n_estimators: args.trees,
        max_depth: args.max_depth,
        seed: args.seed,
        ..ForestParams::default()
    };

    let data = synthetic::generate(args.samples, args.seed);
    let outcome = train(&data, &params).context("training failed")?;
    println!("{}", outcome.report);

    let model_path = args.out.join("goal_model.json");
    let population_path = args.out.join("population.json");
    ModelArtifact::new(outcome.forest, params, Some(outcome.report))
        .save(&model_path)
        .with_context(|| format!("writing {}", model_path.display()))?;
    outcome
        .population
        .save(&population_path)
        .with_context(|| format!("writing {}", population_path.display()))?;

    println!("model      -> {}", model_path.display());
    println!("population -> {} ({} records)", population_path.display(), outcome.population.len());
    Ok(())
}
