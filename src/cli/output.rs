//! Strategy tables and run reports.

use std::{fs::File, io::BufWriter, path::Path, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{
    action::Action,
    environment::Environment,
    error::{Error, Result},
    optimizer::{IterationStats, Optimizer},
    policy::{BasicPolicy, Policy},
    state::State,
};

/// One row of a learned strategy: a state and its preferred action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyEntry {
    pub state: String,
    pub action: String,
}

/// Everything a CLI run produces, in one serializable record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Name of the optimized environment.
    pub environment: String,

    /// Optimizer configuration the run used.
    pub optimizer: Optimizer,

    /// Per-iteration statistics, in execution order.
    pub iterations: Vec<IterationStats>,

    /// Learned strategy table.
    pub strategy: Vec<StrategyEntry>,
}

/// The preferred action for every non-terminal known state the policy has
/// registered, in the environment's enumeration order.
pub fn strategy_entries(
    environment: &Rc<dyn Environment>,
    policy: &BasicPolicy,
) -> Vec<StrategyEntry> {
    let mut entries = Vec::new();
    for state in environment.known_states() {
        if state.is_terminal() {
            continue;
        }
        if let Some(action) = policy.preferred_action(state.as_ref()) {
            entries.push(StrategyEntry {
                state: state.id().into_inner(),
                action: action.id().into_inner(),
            });
        }
    }
    entries
}

/// Write a run summary as pretty-printed JSON.
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create summary file {}", path.display()),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)?;
    Ok(())
}

/// Read a previously written run summary.
pub fn read_summary(path: &Path) -> Result<RunSummary> {
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open summary file {}", path.display()),
        source,
    })?;
    let summary = serde_json::from_reader(file)?;
    Ok(summary)
}

/// Write a strategy table as CSV with `state,action` columns.
pub fn write_strategy_csv(path: &Path, entries: &[StrategyEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a strategy table back from CSV.
pub fn read_strategy_csv(path: &Path) -> Result<Vec<StrategyEntry>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut entries = Vec::new();
    for record in reader.deserialize() {
        entries.push(record?);
    }
    Ok(entries)
}
