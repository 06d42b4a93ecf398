//! CLI subcommands.

pub mod blackjack;
pub mod count;

use std::{path::Path, rc::Rc};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    cli::output::{self, RunSummary},
    environment::Environment,
    optimizer::{IterationStats, Optimizer},
    policy::BasicPolicy,
};

/// Run an optimizer with an optional progress bar, collecting the
/// per-iteration statistics.
pub(crate) fn run_optimizer(
    optimizer: &Optimizer,
    environment: &Rc<dyn Environment>,
    progress: bool,
) -> Result<(BasicPolicy, Vec<IterationStats>)> {
    let bar = if progress {
        let bar = ProgressBar::new(u64::from(optimizer.iterations));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} iterations {msg}")?
                .progress_chars("=>-"),
        );
        Some(bar)
    } else {
        None
    };

    let mut stats = Vec::new();
    let policy = optimizer.run_observed(environment, |iteration| {
        if let Some(bar) = &bar {
            bar.inc(1);
            bar.set_message(format!("mean return {:.3}", iteration.mean_return));
        }
        stats.push(*iteration);
    })?;

    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    Ok((policy, stats))
}

/// Write the optional JSON summary and CSV strategy table for a finished
/// run.
pub(crate) fn write_reports(
    environment_name: &str,
    environment: &Rc<dyn Environment>,
    optimizer: &Optimizer,
    policy: &BasicPolicy,
    iterations: Vec<IterationStats>,
    summary: Option<&Path>,
    csv: Option<&Path>,
) -> Result<()> {
    if summary.is_none() && csv.is_none() {
        return Ok(());
    }

    let entries = output::strategy_entries(environment, policy);

    if let Some(path) = summary {
        let report = RunSummary {
            environment: environment_name.to_string(),
            optimizer: optimizer.clone(),
            iterations,
            strategy: entries.clone(),
        };
        output::write_summary(path, &report)?;
        println!("Wrote run summary to {}", path.display());
    }

    if let Some(path) = csv {
        output::write_strategy_csv(path, &entries)?;
        println!("Wrote strategy table to {}", path.display());
    }

    Ok(())
}
