//! Environment and experiment seams between the engine and a domain.

use std::{any::Any, rc::Rc};

use crate::{
    action::SharedAction,
    error::Result,
    evaluator::create_improved_policy,
    optimizer::{create_optimized_policy, create_random_policy},
    outcome::BasicOutcome,
    policy::{BasicPolicy, Policy},
    state::{SharedState, State},
};

/// The definition of a decision process.
///
/// An environment is the single entry point for domain behavior: which
/// actions are admissible from a state, which states policies should be
/// materialized over, and how a fresh episode is constructed. The engine
/// never looks past this interface.
pub trait Environment {
    /// Legal actions from `state`, in a stable implementation-defined order.
    ///
    /// An empty list marks the state unplayable; such states are registered
    /// in policies without a preferred action and must not be reached by
    /// rollouts.
    fn legal_actions(&self, state: &dyn State) -> Vec<SharedAction>;

    /// The enumerable universe of states policies are defined over.
    ///
    /// Used only for policy materialization, never for rollout; it may be a
    /// superset of the states an episode can reach.
    fn known_states(&self) -> Vec<SharedState>;

    /// Construct a fresh episode. Domain side effects such as dealing cards
    /// happen here.
    fn new_experiment(&self) -> Box<dyn Experiment>;
}

impl std::fmt::Debug for dyn Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("dyn Environment").finish()
    }
}

/// A single episode in progress.
///
/// Experiments are single-use: once a rollout reaches a terminal
/// observation the episode is over. The rollout loops are provided here so
/// every environment shares the same credit-assignment behavior.
pub trait Experiment {
    /// Snapshot the current observation.
    fn observe(&self) -> SharedState;

    /// The opaque episode context actions mutate.
    fn context_mut(&mut self) -> &mut dyn Any;

    /// Roll out until a terminal observation, letting `policy` choose every
    /// action.
    ///
    /// Each non-terminal step queries the policy, applies the action, and
    /// records a pending outcome; on termination every pending outcome is
    /// sealed with the single terminal observation and returned in rollout
    /// order.
    fn run(&mut self, policy: &mut dyn Policy) -> Result<Vec<BasicOutcome>> {
        let mut pending: Vec<(SharedState, SharedAction)> = Vec::new();
        let mut state = self.observe();
        while !state.is_terminal() {
            let action = policy.action(&state)?;
            action.apply(self.context_mut())?;
            pending.push((state, action));
            state = self.observe();
        }

        Ok(seal_outcomes(pending, state))
    }

    /// Roll out with the first action dictated by the caller instead of the
    /// policy. Used to measure counterfactual returns.
    fn force_run(
        &mut self,
        action: SharedAction,
        policy: &mut dyn Policy,
    ) -> Result<Vec<BasicOutcome>> {
        let mut pending: Vec<(SharedState, SharedAction)> = Vec::new();

        let state = self.observe();
        action.apply(self.context_mut())?;
        pending.push((state, action));

        let mut state = self.observe();
        while !state.is_terminal() {
            let action = policy.action(&state)?;
            action.apply(self.context_mut())?;
            pending.push((state, action));
            state = self.observe();
        }

        Ok(seal_outcomes(pending, state))
    }
}

fn seal_outcomes(
    pending: Vec<(SharedState, SharedAction)>,
    terminal: SharedState,
) -> Vec<BasicOutcome> {
    pending
        .into_iter()
        .map(|(initial, action)| BasicOutcome::new(initial, action, Rc::clone(&terminal)))
        .collect()
}

/// Policy-constructor conveniences parameterised by an environment.
pub trait EnvironmentExt {
    /// A fresh policy that picks a random preferred action for each state as
    /// it is first encountered.
    fn new_random_policy(&self) -> BasicPolicy;

    /// A policy rebuilt from a batch of observed outcomes.
    fn new_improved_policy(&self, outcomes: &[BasicOutcome]) -> BasicPolicy;

    /// A policy produced by the annealed multi-iteration optimizer.
    fn new_optimized_policy(
        &self,
        initial_rate: u32,
        episodes_per_iteration: usize,
        iterations: u32,
    ) -> Result<BasicPolicy>;
}

impl EnvironmentExt for Rc<dyn Environment> {
    fn new_random_policy(&self) -> BasicPolicy {
        create_random_policy(Rc::clone(self))
    }

    fn new_improved_policy(&self, outcomes: &[BasicOutcome]) -> BasicPolicy {
        create_improved_policy(Rc::clone(self), outcomes)
    }

    fn new_optimized_policy(
        &self,
        initial_rate: u32,
        episodes_per_iteration: usize,
        iterations: u32,
    ) -> Result<BasicPolicy> {
        create_optimized_policy(
            Rc::clone(self),
            initial_rate,
            episodes_per_iteration,
            iterations,
        )
    }
}
