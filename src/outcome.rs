//! Outcome records, the unit of credit assignment.

use crate::{
    action::{Action, SharedAction},
    identifiers::OutcomeId,
    state::{SharedState, State},
};

/// A recorded transition: the state an action was taken from, the action,
/// and the terminal state the episode eventually reached.
///
/// The identifier covers only the state/action pair, so outcomes from
/// different episodes that leave the same state the same way share a bucket
/// when returns are averaged. The reward is the terminal state's reward:
/// every pair visited during an episode is credited with the full episode
/// return.
pub trait Outcome {
    /// The `[<state-id> => <action-id>]` learning key.
    fn id(&self) -> OutcomeId;

    /// Reward realized at the end of the episode this outcome belongs to.
    fn reward(&self) -> i64;

    /// The state the action was taken from.
    fn initial_state(&self) -> &dyn State;

    /// The terminal state the episode reached.
    fn final_state(&self) -> &dyn State;
}

/// Generic outcome produced by experiment rollouts.
#[derive(Clone)]
pub struct BasicOutcome {
    initial: SharedState,
    action: SharedAction,
    terminal: SharedState,
}

impl BasicOutcome {
    /// Record a transition. `terminal` is the episode's final observation,
    /// shared by every outcome of the episode.
    pub fn new(initial: SharedState, action: SharedAction, terminal: SharedState) -> Self {
        Self {
            initial,
            action,
            terminal,
        }
    }

    /// The action that was taken.
    pub fn action(&self) -> &dyn Action {
        self.action.as_ref()
    }
}

impl Outcome for BasicOutcome {
    fn id(&self) -> OutcomeId {
        OutcomeId::for_pair(&self.initial.id(), &self.action.id())
    }

    fn reward(&self) -> i64 {
        self.terminal.reward()
    }

    fn initial_state(&self) -> &dyn State {
        self.initial.as_ref()
    }

    fn final_state(&self) -> &dyn State {
        self.terminal.as_ref()
    }
}
