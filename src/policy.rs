//! ε-greedy policy representation.

use std::{collections::HashMap, rc::Rc};

use rand::{Rng, SeedableRng, prelude::IndexedRandom, rngs::StdRng};

use crate::{
    action::{Action, SharedAction},
    environment::Environment,
    error::{Error, Result},
    identifiers::StateId,
    state::{SharedState, State},
};

/// Historical default randomization rate for freshly constructed policies.
pub const DEFAULT_RANDOMIZATION_RATE: u32 = 40;

/// A per-state action preference with ε-style randomization.
///
/// The randomization rate is an integer in `[0, 100]`: with probability
/// `rate/100`, and only when alternates exist, the policy explores a
/// uniformly random non-preferred action instead of the preferred one.
/// Values outside the range are accepted silently; the semantics assume the
/// range.
pub trait Policy {
    /// Choose an action for `state`, registering the state with a random
    /// preference first if it has never been seen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActionsAvailable`] when the state is registered
    /// without a preferred action because the environment reported no legal
    /// actions for it.
    fn action(&mut self, state: &SharedState) -> Result<SharedAction>;

    /// The preferred action for `state`, or `None` if the state was never
    /// registered. Never mutates the policy.
    fn preferred_action(&self, state: &dyn State) -> Option<SharedAction>;

    /// Register `state` with an explicit preference. `others` must not
    /// contain the preferred action.
    fn add_state(&mut self, state: SharedState, preferred: SharedAction, others: Vec<SharedAction>);

    /// Register `state` with a uniformly random preferred action drawn from
    /// the environment's legal actions; the remainder become alternates. A
    /// state with no legal actions is registered without a preference.
    fn add_random_state(&mut self, state: SharedState);

    /// Current randomization rate.
    fn randomization_rate(&self) -> u32;

    /// Set the randomization rate.
    fn set_randomization_rate(&mut self, rate: u32);

    /// Reseed the policy's random source for deterministic replay.
    fn seed_rng(&mut self, _seed: u64) {}
}

/// Generic policy over shared state and action handles.
///
/// Holds three parallel maps keyed by state identifier (the canonical state
/// object, the preferred action, and the unordered alternates) plus a
/// back-reference to the environment used to lazily populate states first
/// reached during a rollout.
#[derive(Debug)]
pub struct BasicPolicy {
    randomization_rate: u32,
    environment: Rc<dyn Environment>,
    known_states: HashMap<StateId, SharedState>,
    preferred_actions: HashMap<StateId, SharedAction>,
    other_actions: HashMap<StateId, Vec<SharedAction>>,
    rng: StdRng,
}

impl BasicPolicy {
    /// Create an empty policy over `environment` with the historical default
    /// randomization rate.
    pub fn new(environment: Rc<dyn Environment>) -> Self {
        Self {
            randomization_rate: DEFAULT_RANDOMIZATION_RATE,
            environment,
            known_states: HashMap::new(),
            preferred_actions: HashMap::new(),
            other_actions: HashMap::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// The environment this policy is defined over.
    pub fn environment(&self) -> &Rc<dyn Environment> {
        &self.environment
    }

    /// Whether `state` has been registered.
    pub fn is_known(&self, state: &dyn State) -> bool {
        self.known_states.contains_key(&state.id())
    }

    /// Number of registered states.
    pub fn state_count(&self) -> usize {
        self.known_states.len()
    }

    /// The non-preferred alternates registered for `state`, if any.
    pub fn alternate_actions(&self, state: &dyn State) -> Option<&[SharedAction]> {
        self.other_actions.get(&state.id()).map(Vec::as_slice)
    }
}

impl Policy for BasicPolicy {
    fn action(&mut self, state: &SharedState) -> Result<SharedAction> {
        let id = state.id();
        if !self.known_states.contains_key(&id) {
            self.add_random_state(Rc::clone(state));
        }

        let draw = self.rng.random_range(0..100);
        if draw < self.randomization_rate {
            if let Some(alternates) = self.other_actions.get(&id) {
                if let Some(choice) = alternates.choose(&mut self.rng) {
                    return Ok(Rc::clone(choice));
                }
            }
        }

        self.preferred_actions
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NoActionsAvailable {
                state: id.into_inner(),
            })
    }

    fn preferred_action(&self, state: &dyn State) -> Option<SharedAction> {
        self.preferred_actions.get(&state.id()).cloned()
    }

    fn add_state(
        &mut self,
        state: SharedState,
        preferred: SharedAction,
        others: Vec<SharedAction>,
    ) {
        let id = state.id();
        debug_assert!(
            others.iter().all(|action| action.id() != preferred.id()),
            "preferred action must not appear among the alternates"
        );
        self.known_states.insert(id.clone(), state);
        self.preferred_actions.insert(id.clone(), preferred);
        self.other_actions.insert(id, others);
    }

    fn add_random_state(&mut self, state: SharedState) {
        let mut actions = self.environment.legal_actions(state.as_ref());
        let id = state.id();

        if actions.is_empty() {
            // Unplayable state: registered so lookups resolve, but with no
            // preference. Rollouts must never ask it to act.
            self.known_states.insert(id.clone(), state);
            self.other_actions.insert(id, Vec::new());
            return;
        }

        let pick = self.rng.random_range(0..actions.len());
        let preferred = actions.remove(pick);
        self.known_states.insert(id.clone(), state);
        self.preferred_actions.insert(id.clone(), preferred);
        self.other_actions.insert(id, actions);
    }

    fn randomization_rate(&self) -> u32 {
        self.randomization_rate
    }

    fn set_randomization_rate(&mut self, rate: u32) {
        self.randomization_rate = rate;
    }

    fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::{
        action::Action,
        blackjack::{BlackjackEnvironment, PAIR_KEY},
        count::CountEnvironment,
        environment::Experiment,
        identifiers::ActionId,
        state::BasicState,
    };

    struct Wait;

    impl Action for Wait {
        fn id(&self) -> ActionId {
            ActionId::new("Wait")
        }

        fn apply(&self, _context: &mut dyn Any) -> Result<()> {
            Ok(())
        }
    }

    struct WaitingRoom;

    impl Environment for WaitingRoom {
        fn legal_actions(&self, _state: &dyn State) -> Vec<SharedAction> {
            vec![Rc::new(Wait)]
        }

        fn known_states(&self) -> Vec<SharedState> {
            vec![BasicState::new().with("seat", "1").into_shared()]
        }

        fn new_experiment(&self) -> Box<dyn Experiment> {
            unreachable!("waiting room episodes are never rolled out in tests")
        }
    }

    fn count_environment() -> Rc<dyn Environment> {
        Rc::new(CountEnvironment::with_seed(10, 17))
    }

    #[test]
    fn zero_rate_policy_is_deterministic() {
        let environment = count_environment();
        let mut policy = BasicPolicy::new(Rc::clone(&environment));
        policy.set_randomization_rate(0);
        policy.seed_rng(23);

        let state = BasicState::new()
            .with("count", "4")
            .with("done", "false")
            .into_shared();

        let first = policy.action(&state).expect("state has legal actions").id();
        for _ in 0..10 {
            let next = policy.action(&state).expect("state has legal actions").id();
            assert_eq!(first, next, "zero randomization must be deterministic");
        }
    }

    #[test]
    fn first_action_becomes_the_preferred_action() {
        let environment = count_environment();
        let mut policy = BasicPolicy::new(Rc::clone(&environment));
        policy.set_randomization_rate(0);
        policy.seed_rng(41);

        let state = BasicState::new()
            .with("count", "2")
            .with("done", "false")
            .into_shared();

        let chosen = policy.action(&state).expect("state has legal actions");
        let preferred = policy
            .preferred_action(state.as_ref())
            .expect("state was just registered");
        assert_eq!(chosen.id(), preferred.id());
    }

    #[test]
    fn unknown_state_has_no_preferred_action() {
        let environment = count_environment();
        let policy = BasicPolicy::new(environment);

        let state = BasicState::new().with("count", "9").with("done", "false");
        assert!(policy.preferred_action(&state).is_none());
        assert!(!policy.is_known(&state));
    }

    #[test]
    fn random_registration_partitions_the_legal_actions() {
        let environment = count_environment();
        let mut policy = BasicPolicy::new(Rc::clone(&environment));
        policy.seed_rng(7);

        let state = BasicState::new()
            .with("count", "6")
            .with("done", "false")
            .into_shared();
        policy.add_random_state(Rc::clone(&state));

        let preferred = policy
            .preferred_action(state.as_ref())
            .expect("legal actions exist");
        let alternates = policy
            .alternate_actions(state.as_ref())
            .expect("state is registered");

        assert!(
            alternates.iter().all(|action| action.id() != preferred.id()),
            "preferred action leaked into the alternates"
        );

        let mut ids: Vec<String> = alternates
            .iter()
            .map(|action| action.id().into_inner())
            .collect();
        ids.push(preferred.id().into_inner());
        ids.sort();
        let mut legal: Vec<String> = environment
            .legal_actions(state.as_ref())
            .iter()
            .map(|action| action.id().into_inner())
            .collect();
        legal.sort();
        assert_eq!(ids, legal, "preferred + alternates must cover the legal set");
    }

    #[test]
    fn single_action_states_never_randomize() {
        let environment: Rc<dyn Environment> = Rc::new(WaitingRoom);
        let mut policy = BasicPolicy::new(environment);
        policy.set_randomization_rate(100);
        policy.seed_rng(13);

        let state = BasicState::new().with("seat", "1").into_shared();
        for _ in 0..20 {
            let action = policy.action(&state).expect("one legal action");
            assert_eq!(action.id(), "Wait");
        }
        assert!(
            policy
                .alternate_actions(state.as_ref())
                .expect("state is registered")
                .is_empty()
        );
    }

    #[test]
    fn empty_action_set_is_registered_without_a_preference() {
        let environment: Rc<dyn Environment> = Rc::new(BlackjackEnvironment::with_seed(3));
        let mut policy = BasicPolicy::new(environment);
        policy.seed_rng(19);

        // No pair attribute, so the environment reports no legal actions.
        let state = BasicState::new().with("player", "12").into_shared();
        let err = policy.action(&state).unwrap_err();
        assert!(matches!(err, Error::NoActionsAvailable { .. }));
        assert!(policy.is_known(state.as_ref()));
        assert!(policy.preferred_action(state.as_ref()).is_none());
    }

    #[test]
    fn seeded_policies_replay_identically() {
        let state = BasicState::new()
            .with("count", "3")
            .with("done", "false")
            .into_shared();

        let mut first = Vec::new();
        let mut second = Vec::new();
        for run in [&mut first, &mut second] {
            let mut policy = BasicPolicy::new(count_environment());
            policy.seed_rng(99);
            for _ in 0..25 {
                run.push(policy.action(&state).expect("legal actions exist").id());
            }
        }
        assert_eq!(first, second);
    }

    #[test]
    fn states_with_a_pair_attribute_remain_playable() {
        // The blackjack environment keys playability off the pair attribute.
        let environment: Rc<dyn Environment> = Rc::new(BlackjackEnvironment::with_seed(5));
        let mut policy = BasicPolicy::new(environment);
        policy.seed_rng(31);

        let playable = BasicState::new()
            .with("player", "12")
            .with("dealer", "9")
            .with("soft", "false")
            .with(PAIR_KEY, "false")
            .into_shared();
        assert!(policy.action(&playable).is_ok());
    }
}
