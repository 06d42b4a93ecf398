//! Count command - optimize the counting environment and print the strategy.

use std::{path::PathBuf, rc::Rc};

use anyhow::Result;
use clap::Parser;

use crate::{
    action::Action,
    count::{COUNT_KEY, CountEnvironment, DONE_KEY},
    environment::Environment,
    optimizer::Optimizer,
    policy::Policy,
    state::{BasicState, State},
};

use super::{run_optimizer, write_reports};

#[derive(Parser, Debug)]
#[command(about = "Optimize the Count validation environment")]
pub struct CountArgs {
    /// Highest count an episode can stop at
    #[arg(long, default_value_t = 10)]
    pub max: i64,

    /// Initial randomization rate (0-100)
    #[arg(long, default_value_t = 40)]
    pub rate: u32,

    /// Episodes per optimizer iteration
    #[arg(long, default_value_t = 100_000)]
    pub episodes: usize,

    /// Optimizer iterations
    #[arg(long, default_value_t = 5)]
    pub iterations: u32,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional path for a JSON run summary
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional path for a CSV strategy table
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long, default_value_t = true)]
    pub progress: bool,
}

pub fn execute(args: CountArgs) -> Result<()> {
    anyhow::ensure!(args.max > 0, "--max must be positive, got {}", args.max);

    let environment: Rc<dyn Environment> = match args.seed {
        Some(seed) => Rc::new(CountEnvironment::with_seed(args.max, seed)),
        None => Rc::new(CountEnvironment::new(args.max)),
    };

    let mut optimizer = Optimizer::new(args.rate, args.episodes, args.iterations);
    if let Some(seed) = args.seed {
        optimizer = optimizer.with_seed(seed);
    }

    let (policy, iterations) = run_optimizer(&optimizer, &environment, args.progress)?;

    for count in 0..=args.max {
        let state = BasicState::new()
            .with(COUNT_KEY, count.to_string())
            .with(DONE_KEY, "false");
        match policy.preferred_action(&state) {
            Some(action) => println!("'{}' -> '{}'", state.id(), action.id()),
            None => println!("'{}' -> (never visited)", state.id()),
        }
    }

    write_reports(
        "count",
        &environment,
        &optimizer,
        &policy,
        iterations,
        args.summary.as_deref(),
        args.csv.as_deref(),
    )
}
