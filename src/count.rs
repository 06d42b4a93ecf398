//! Count: a trivial validation environment.
//!
//! An episode starts at a random count below the maximum. *Increment* moves
//! the count up, busting past the maximum; *Stop* ends the episode with the
//! current count as the reward. The optimal policy increments all the way to
//! the maximum and stops there, which makes learned policies easy to audit.

use std::{any::Any, cell::RefCell, rc::Rc};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    action::{Action, SharedAction, downcast_context},
    environment::{Environment, Experiment},
    error::Result,
    identifiers::ActionId,
    state::{BasicState, SharedState, State},
};

/// Context attribute holding the current count.
pub const COUNT_KEY: &str = "count";

/// Context attribute holding the episode-finished flag.
pub const DONE_KEY: &str = "done";

/// Reward schedule: nothing until the episode ends, the reached count when
/// stopped in range, -1 when the count was pushed past the maximum.
pub fn state_reward(count: i64, done: bool, max: i64) -> i64 {
    if !done {
        0
    } else if count > max {
        -1
    } else {
        count
    }
}

/// The counting decision process.
pub struct CountEnvironment {
    max: i64,
    rng: RefCell<StdRng>,
}

impl CountEnvironment {
    /// Create an environment counting up to `max` (which must be positive).
    pub fn new(max: i64) -> Self {
        Self {
            max,
            rng: RefCell::new(StdRng::from_os_rng()),
        }
    }

    /// Create a seeded environment for reproducible episodes.
    pub fn with_seed(max: i64, seed: u64) -> Self {
        Self {
            max,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The highest count an episode can stop at.
    pub fn max(&self) -> i64 {
        self.max
    }
}

impl Environment for CountEnvironment {
    fn legal_actions(&self, _state: &dyn State) -> Vec<SharedAction> {
        vec![Rc::new(Increment), Rc::new(Stop)]
    }

    fn known_states(&self) -> Vec<SharedState> {
        let mut states = Vec::new();
        for count in 0..=self.max {
            for done in [false, true] {
                let mut state = BasicState::new()
                    .with(COUNT_KEY, count.to_string())
                    .with(DONE_KEY, done.to_string());
                state.terminal = done;
                state.reward = state_reward(count, done, self.max);
                states.push(state.into_shared());
            }
        }
        states
    }

    fn new_experiment(&self) -> Box<dyn Experiment> {
        let count = self.rng.borrow_mut().random_range(0..self.max);
        Box::new(CountExperiment {
            context: CountContext {
                count,
                done: false,
                max: self.max,
            },
        })
    }
}

/// Episode context the count actions operate on.
#[derive(Debug, Clone)]
pub struct CountContext {
    count: i64,
    done: bool,
    max: i64,
}

/// A single counting episode.
pub struct CountExperiment {
    context: CountContext,
}

impl CountExperiment {
    /// Start an episode at an explicit count, mainly for tests and
    /// counterfactual probes.
    pub fn starting_at(count: i64, max: i64) -> Self {
        Self {
            context: CountContext {
                count,
                done: false,
                max,
            },
        }
    }
}

impl Experiment for CountExperiment {
    fn observe(&self) -> SharedState {
        let mut state = BasicState::new()
            .with(COUNT_KEY, self.context.count.to_string())
            .with(DONE_KEY, self.context.done.to_string());
        state.terminal = self.context.done;
        state.reward = state_reward(self.context.count, self.context.done, self.context.max);
        state.into_shared()
    }

    fn context_mut(&mut self) -> &mut dyn Any {
        &mut self.context
    }
}

/// Raise the count by one, ending the episode when it passes the maximum.
pub struct Increment;

impl Action for Increment {
    fn id(&self) -> ActionId {
        ActionId::new("Increment")
    }

    fn apply(&self, context: &mut dyn Any) -> Result<()> {
        let context = downcast_context::<CountContext>(context, "Increment")?;
        context.count += 1;
        if context.count > context.max {
            context.done = true;
        }
        Ok(())
    }
}

/// End the episode, banking the current count.
pub struct Stop;

impl Action for Stop {
    fn id(&self) -> ActionId {
        ActionId::new("Stop")
    }

    fn apply(&self, context: &mut dyn Any) -> Result<()> {
        let context = downcast_context::<CountContext>(context, "Stop")?;
        context.done = true;
        Ok(())
    }
}
