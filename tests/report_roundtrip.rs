//! Run-report writing and re-reading.

use std::rc::Rc;

use monoikos::{
    Environment, Optimizer,
    cli::output::{
        read_strategy_csv, read_summary, strategy_entries, write_strategy_csv, write_summary,
        RunSummary,
    },
    count::CountEnvironment,
};

#[test]
fn summary_round_trips_through_json() {
    let environment: Rc<dyn Environment> = Rc::new(CountEnvironment::with_seed(5, 3));
    let optimizer = Optimizer::new(40, 200, 3).with_seed(3);

    let mut iterations = Vec::new();
    let policy = optimizer
        .run_observed(&environment, |stats| iterations.push(*stats))
        .expect("optimization completes");

    let strategy = strategy_entries(&environment, &policy);
    assert!(!strategy.is_empty());

    let summary = RunSummary {
        environment: "count".to_string(),
        optimizer: optimizer.clone(),
        iterations,
        strategy: strategy.clone(),
    };

    let dir = tempfile::tempdir().expect("temporary directory");
    let path = dir.path().join("summary.json");
    write_summary(&path, &summary).expect("summary written");

    let loaded = read_summary(&path).expect("summary read back");
    assert_eq!(loaded.environment, "count");
    assert_eq!(loaded.optimizer.iterations, 3);
    assert_eq!(loaded.iterations.len(), 3);
    assert_eq!(loaded.strategy, strategy);

    let last = loaded.iterations.last().expect("three iterations recorded");
    assert_eq!(last.randomization_rate, 0);
}

#[test]
fn strategy_table_round_trips_through_csv() {
    let environment: Rc<dyn Environment> = Rc::new(CountEnvironment::with_seed(5, 11));
    let policy = Optimizer::new(40, 200, 2)
        .with_seed(11)
        .run(&environment)
        .expect("optimization completes");

    let strategy = strategy_entries(&environment, &policy);
    assert!(!strategy.is_empty());

    let dir = tempfile::tempdir().expect("temporary directory");
    let path = dir.path().join("strategy.csv");
    write_strategy_csv(&path, &strategy).expect("table written");

    let loaded = read_strategy_csv(&path).expect("table read back");
    assert_eq!(loaded, strategy);
}
