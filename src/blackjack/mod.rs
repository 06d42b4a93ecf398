//! Blackjack: the reference environment.
//!
//! The simulator plays single-deck blackjack with a fixed payout schedule;
//! the environment exposes it to the engine through hand-total observations
//! and the `Hit`/`Stand`/`Double` actions.

mod environment;
mod table;

pub use environment::{
    BlackjackEnvironment, BlackjackExperiment, DEALER_KEY, Double, Hit, PAIR_KEY, PLAYER_KEY,
    SOFT_KEY, Stand,
};
pub use table::Game;
