//! Resource Contest
//!
//! Runs a batch of independent contests and prints how often each agent won.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use contest_core::config::DEFAULT_CONFIG_PATH;
use contest_core::output::{render_histogram, write_report};
use contest_core::{run_configured, CollectPolicy, ContestConfig};

/// Command line arguments for the batch runner
#[derive(Parser, Debug)]
#[command(name = "resource_contest")]
#[command(about = "Runs many resource contests in parallel and counts the winners")]
struct Args {
    /// TOML configuration file (contest.toml is used when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of trials to run
    #[arg(long, allow_negative_numbers = true)]
    trials: Option<i64>,

    /// Number of worker threads
    #[arg(long, allow_negative_numbers = true)]
    workers: Option<i64>,

    /// Master seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Safety ceiling on rounds per trial
    #[arg(long)]
    max_rounds: Option<u64>,

    /// Collect a uniformly drawn resource kind instead of always gold
    #[arg(long)]
    any_kind_collect: bool,

    /// Write the full report as JSON
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    /// Command line flags take precedence over the config file
    fn apply(&self, config: &mut ContestConfig) {
        if let Some(trials) = self.trials {
            config.batch.trial_count = trials;
        }
        if let Some(workers) = self.workers {
            config.batch.worker_count = workers;
        }
        if let Some(seed) = self.seed {
            config.batch.master_seed = Some(seed);
        }
        if let Some(max_rounds) = self.max_rounds {
            config.trial.max_rounds = max_rounds;
        }
        if self.any_kind_collect {
            config.trial.collect_policy = CollectPolicy::AnyKind;
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => ContestConfig::load(path),
        None => ContestConfig::load_or_default(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            let path = args
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            error!("Could not load {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut config);

    println!("Resource Contest");
    println!("================");
    println!("Trials: {}", config.batch.trial_count);
    println!("Workers: {}", config.batch.worker_count);
    println!(
        "Agents: {}",
        config
            .trial
            .agents
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    let started = Instant::now();
    let report = match run_configured(&config) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Total execution time: {:.2} seconds",
        started.elapsed().as_secs_f64()
    );
    println!();
    print!("{}", render_histogram(&report));

    if let Some(path) = &args.output {
        if let Err(e) = write_report(path, &report) {
            error!("Could not write report to {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        println!("Wrote {}", path.display());
    }

    ExitCode::SUCCESS
}
