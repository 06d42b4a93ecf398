//! Annealed multi-iteration policy optimization.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{
    environment::{Environment, Experiment as _},
    error::{Error, Result},
    evaluator::create_improved_policy,
    outcome::Outcome,
    policy::{BasicPolicy, Policy},
};

/// Configuration for an optimization run.
///
/// The randomization rate decays linearly from `initial_rate` to zero over
/// the iterations; each iteration collects a fresh batch of episodes and
/// rebuilds the policy from that batch alone. The final iteration therefore
/// gathers purely exploitative evidence before the last improvement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Optimizer {
    /// Randomization rate for the first iteration, in `[0, 100]`.
    pub initial_rate: u32,

    /// Episodes rolled out per iteration. Zero is legal and leaves that
    /// iteration's policy unimproved.
    pub episodes_per_iteration: usize,

    /// Number of improvement iterations; must be at least 2.
    pub iterations: u32,

    /// Optional seed for the policies' random sources.
    pub seed: Option<u64>,
}

/// Per-iteration progress reported to [`Optimizer::run_observed`] callers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IterationStats {
    /// Iteration index, counting down from `iterations - 1` to 0.
    pub iteration: u32,

    /// Randomization rate used for this iteration's rollouts.
    pub randomization_rate: u32,

    /// Episodes rolled out this iteration.
    pub episodes: usize,

    /// Outcomes accumulated this iteration.
    pub outcomes: usize,

    /// Mean terminal reward across this iteration's episodes.
    pub mean_return: f64,
}

impl Optimizer {
    /// Create a configuration with no seed.
    pub fn new(initial_rate: u32, episodes_per_iteration: usize, iterations: u32) -> Self {
        Self {
            initial_rate,
            episodes_per_iteration,
            iterations,
            seed: None,
        }
    }

    /// Attach a seed for deterministic replay.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the optimization and return the final greedy policy.
    pub fn run(&self, environment: &Rc<dyn Environment>) -> Result<BasicPolicy> {
        self.run_observed(environment, |_| {})
    }

    /// Run the optimization, reporting each completed iteration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIterations`] when `iterations < 2`; the
    /// annealing schedule divides by `iterations - 1`.
    pub fn run_observed<F>(
        &self,
        environment: &Rc<dyn Environment>,
        mut on_iteration: F,
    ) -> Result<BasicPolicy>
    where
        F: FnMut(&IterationStats),
    {
        if self.iterations < 2 {
            return Err(Error::InvalidIterations {
                iterations: self.iterations,
            });
        }

        let mut policy = create_random_policy(Rc::clone(environment));
        if let Some(seed) = self.seed {
            policy.seed_rng(seed);
        }

        for i in (0..self.iterations).rev() {
            let rate = self.initial_rate * i / (self.iterations - 1);
            policy.set_randomization_rate(rate);

            let mut outcomes = Vec::new();
            let mut total_return = 0i64;
            for _ in 0..self.episodes_per_iteration {
                let mut experiment = environment.new_experiment();
                let episode = experiment.run(&mut policy)?;
                if let Some(last) = episode.last() {
                    total_return += last.reward();
                }
                outcomes.extend(episode);
            }

            on_iteration(&IterationStats {
                iteration: i,
                randomization_rate: rate,
                episodes: self.episodes_per_iteration,
                outcomes: outcomes.len(),
                mean_return: if self.episodes_per_iteration > 0 {
                    total_return as f64 / self.episodes_per_iteration as f64
                } else {
                    0.0
                },
            });

            policy = create_improved_policy(Rc::clone(environment), &outcomes);
            if let Some(seed) = self.seed {
                policy.seed_rng(seed.wrapping_add(u64::from(i)).wrapping_add(1));
            }
        }

        policy.set_randomization_rate(0);
        Ok(policy)
    }
}

/// A fresh policy that registers states with random preferences as they are
/// first encountered.
pub fn create_random_policy(environment: Rc<dyn Environment>) -> BasicPolicy {
    BasicPolicy::new(environment)
}

/// Convenience wrapper around [`Optimizer::run`].
///
/// # Errors
///
/// Returns [`Error::InvalidIterations`] when `iterations < 2`.
pub fn create_optimized_policy(
    environment: Rc<dyn Environment>,
    initial_rate: u32,
    episodes_per_iteration: usize,
    iterations: u32,
) -> Result<BasicPolicy> {
    Optimizer::new(initial_rate, episodes_per_iteration, iterations).run(&environment)
}
