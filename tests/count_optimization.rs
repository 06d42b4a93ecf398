//! End-to-end learning on the Count validation environment.

use std::rc::Rc;

use monoikos::{
    Action, BasicState, Environment, EnvironmentExt, Outcome, Policy, SharedAction,
    count::{COUNT_KEY, CountEnvironment, CountExperiment, DONE_KEY, Increment, Stop},
    create_random_policy,
    environment::Experiment,
};

const MAX: i64 = 10;

fn count_environment(seed: u64) -> Rc<dyn Environment> {
    Rc::new(CountEnvironment::with_seed(MAX, seed))
}

fn open_state(count: i64) -> BasicState {
    BasicState::new()
        .with(COUNT_KEY, count.to_string())
        .with(DONE_KEY, "false")
}

#[test]
fn zero_rate_policy_answers_identically_across_experiments() {
    let environment = count_environment(101);
    let mut policy = environment.new_random_policy();
    policy.set_randomization_rate(0);
    policy.seed_rng(101);

    let mut chosen: Option<String> = None;
    for _ in 0..10 {
        let experiment = CountExperiment::starting_at(4, MAX);
        let state = experiment.observe();
        let action = policy.action(&state).expect("count states are playable");

        match &chosen {
            None => chosen = Some(action.id().into_inner()),
            Some(expected) => assert_eq!(
                action.id().as_str(),
                expected.as_str(),
                "zero randomization must be deterministic"
            ),
        }
    }
}

#[test]
fn first_contact_with_a_state_fixes_its_preference() {
    let environment = count_environment(59);
    let mut policy = environment.new_random_policy();
    policy.set_randomization_rate(0);
    policy.seed_rng(59);

    let experiment = environment.new_experiment();
    let state = experiment.observe();
    let action = policy.action(&state).expect("count states are playable");

    let preferred = policy
        .preferred_action(state.as_ref())
        .expect("state was registered by the lookup");
    assert_eq!(preferred.id(), action.id());
}

#[test]
fn incrementing_a_low_count_beats_stopping_on_it() {
    let environment = count_environment(7);
    let mut policy = create_random_policy(Rc::clone(&environment));
    policy.seed_rng(7);

    let mut increment_total = 0i64;
    let mut stop_total = 0i64;

    for _ in 0..20_000 {
        let increment: SharedAction = Rc::new(Increment);
        let stop: SharedAction = Rc::new(Stop);

        let mut probe = CountExperiment::starting_at(1, MAX);
        increment_total += probe
            .force_run(increment, &mut policy)
            .expect("episode completes")[0]
            .reward();

        let mut probe = CountExperiment::starting_at(1, MAX);
        stop_total += probe
            .force_run(stop, &mut policy)
            .expect("episode completes")[0]
            .reward();
    }

    assert!(
        increment_total > stop_total,
        "incrementing from 1 must outperform stopping on 1 ({increment_total} vs {stop_total})"
    );
}

#[test]
fn optimized_policy_increments_through_the_interior() {
    let environment = count_environment(42);
    let policy = environment
        .new_optimized_policy(40, 100_000, 5)
        .expect("valid optimizer parameters");

    assert_eq!(policy.randomization_rate(), 0);

    for count in 1..=(MAX - 2) {
        let state = open_state(count);
        let action = policy
            .preferred_action(&state)
            .expect("interior states are visited during optimization");
        assert_eq!(
            action.id().as_str(),
            "Increment",
            "expected to keep counting at {count}"
        );
    }
}
