//! Policy improvement from observed outcomes.

use std::{collections::HashMap, rc::Rc};

use crate::{
    action::{Action, SharedAction},
    environment::Environment,
    identifiers::OutcomeId,
    outcome::Outcome,
    policy::{BasicPolicy, Policy},
    state::State,
};

/// Visit count and accumulated reward for one state/action pair.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    visits: u64,
    reward_sum: i64,
}

impl Tally {
    fn mean_return(&self) -> f64 {
        self.reward_sum as f64 / self.visits as f64
    }
}

/// Build a fresh greedy policy from a batch of outcomes.
///
/// Outcomes are tallied per state/action pair; for each known state the
/// legal actions are scanned in the environment's stable order and the
/// observed action with the highest mean return becomes preferred. Ties keep
/// the earlier candidate; a strictly better candidate demotes the previous
/// preference into the alternates. Actions never observed are omitted
/// entirely and get rediscovered if a later rollout reaches the state.
/// States with no observed action fall back to a random registration.
pub fn create_improved_policy<O: Outcome>(
    environment: Rc<dyn Environment>,
    outcomes: &[O],
) -> BasicPolicy {
    let mut tallies: HashMap<OutcomeId, Tally> = HashMap::new();
    for outcome in outcomes {
        let tally = tallies.entry(outcome.id()).or_default();
        tally.visits += 1;
        tally.reward_sum += outcome.reward();
    }

    let mut policy = BasicPolicy::new(Rc::clone(&environment));
    for state in environment.known_states() {
        let state_id = state.id();
        let mut preferred: Option<(SharedAction, f64)> = None;
        let mut alternates: Vec<SharedAction> = Vec::new();

        for action in environment.legal_actions(state.as_ref()) {
            let key = OutcomeId::for_pair(&state_id, &action.id());
            let Some(tally) = tallies.get(&key) else {
                continue;
            };
            let mean = tally.mean_return();

            match preferred.take() {
                None => preferred = Some((action, mean)),
                Some((current, best)) if mean > best => {
                    alternates.push(current);
                    preferred = Some((action, mean));
                }
                Some(kept) => {
                    alternates.push(action);
                    preferred = Some(kept);
                }
            }
        }

        match preferred {
            Some((action, _)) => policy.add_state(state, action, alternates),
            None => policy.add_random_state(state),
        }
    }

    policy
}
