//! Monte-Carlo control engine for finite, episodic Markov decision processes
//!
//! This crate provides:
//! - Environment-agnostic state, action, and outcome abstractions
//! - An ε-greedy policy representation with lazy state registration
//! - On-policy Monte-Carlo improvement from episode returns
//! - An annealed multi-iteration optimizer
//! - A Blackjack reference environment and a Count validation environment
//!
//! Episodes credit every visited state/action pair with the full terminal
//! reward (every-visit Monte-Carlo, no discounting). The optimizer decays
//! the exploration rate linearly to zero and returns a greedy policy.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//!
//! use monoikos::{Environment, EnvironmentExt, Policy, count::CountEnvironment};
//!
//! let environment: Rc<dyn Environment> = Rc::new(CountEnvironment::with_seed(5, 7));
//! let policy = environment.new_optimized_policy(40, 200, 3)?;
//! assert_eq!(policy.randomization_rate(), 0);
//! # Ok::<(), monoikos::Error>(())
//! ```

pub mod action;
pub mod blackjack;
pub mod cli;
pub mod count;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod identifiers;
pub mod optimizer;
pub mod outcome;
pub mod policy;
pub mod state;

pub use action::{Action, SharedAction, downcast_context};
pub use environment::{Environment, EnvironmentExt, Experiment};
pub use error::{Error, Result};
pub use evaluator::create_improved_policy;
pub use identifiers::{ActionId, OutcomeId, StateId};
pub use optimizer::{IterationStats, Optimizer, create_optimized_policy, create_random_policy};
pub use outcome::{BasicOutcome, Outcome};
pub use policy::{BasicPolicy, DEFAULT_RANDOMIZATION_RATE, Policy};
pub use state::{BasicState, SharedState, State};
