//! Blackjack command - optimize the reference environment and print the
//! learned strategy table.

use std::{path::PathBuf, rc::Rc};

use anyhow::Result;
use clap::Parser;

use crate::{
    action::Action,
    blackjack::BlackjackEnvironment,
    environment::Environment,
    optimizer::Optimizer,
    policy::Policy,
    state::State,
};

use super::{run_optimizer, write_reports};

#[derive(Parser, Debug)]
#[command(about = "Optimize the Blackjack reference environment")]
pub struct BlackjackArgs {
    /// Initial randomization rate (0-100)
    #[arg(long, default_value_t = 40)]
    pub rate: u32,

    /// Episodes per optimizer iteration
    #[arg(long, default_value_t = 200_000)]
    pub episodes: usize,

    /// Optimizer iterations
    #[arg(long, default_value_t = 21)]
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

    /// Print the full strategy table after optimizing
    #[arg(long, default_value_t = false)]
    pub print_strategy: bool,
}

pub fn execute(args: BlackjackArgs) -> Result<()> {
    let environment: Rc<dyn Environment> = match args.seed {
        Some(seed) => Rc::new(BlackjackEnvironment::with_seed(seed)),
        None => Rc::new(BlackjackEnvironment::new()),
    };

    let mut optimizer = Optimizer::new(args.rate, args.episodes, args.iterations);
    if let Some(seed) = args.seed {
        optimizer = optimizer.with_seed(seed);
    }

    let (policy, iterations) = run_optimizer(&optimizer, &environment, args.progress)?;

    if args.print_strategy {
        for state in environment.known_states() {
            if let Some(action) = policy.preferred_action(state.as_ref()) {
                println!("'{}' -> '{}'", state.id(), action.id());
            }
        }
    } else {
        println!(
            "Learned preferences for {} of {} known states; pass --print-strategy or --csv for the table.",
            policy.state_count(),
            environment.known_states().len()
        );
    }

    write_reports(
        "blackjack",
        &environment,
        &optimizer,
        &policy,
        iterations,
        args.summary.as_deref(),
        args.csv.as_deref(),
    )
}
