//! Blackjack through the engine's environment interface.

use std::{any::Any, cell::RefCell, rc::Rc};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    action::{Action, SharedAction, downcast_context},
    environment::{Environment, Experiment},
    error::Result,
    identifiers::ActionId,
    state::{BasicState, SharedState, State},
};

use super::table::Game;

/// Context attribute holding the player's hand total.
pub const PLAYER_KEY: &str = "player";

/// Context attribute flagging an ace counted as 11.
pub const SOFT_KEY: &str = "soft";

/// Context attribute flagging a two-card hand (double-down is allowed).
pub const PAIR_KEY: &str = "pair";

/// Context attribute holding the dealer's hand total.
pub const DEALER_KEY: &str = "dealer";

/// The blackjack decision process.
pub struct BlackjackEnvironment {
    rng: RefCell<StdRng>,
}

impl BlackjackEnvironment {
    /// Create an environment dealing from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(StdRng::from_os_rng()),
        }
    }

    /// Create a seeded environment for reproducible deals.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for BlackjackEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for BlackjackEnvironment {
    /// `Hit` and `Stand` always; `Double` only on a two-card hand. States
    /// that do not carry a readable pair attribute are unplayable.
    fn legal_actions(&self, state: &dyn State) -> Vec<SharedAction> {
        let Some(pair) = state.context().get(PAIR_KEY) else {
            return Vec::new();
        };
        let Ok(pair) = pair.parse::<bool>() else {
            return Vec::new();
        };

        let mut actions: Vec<SharedAction> = vec![Rc::new(Hit), Rc::new(Stand)];
        if pair {
            actions.push(Rc::new(Double));
        }
        actions
    }

    /// The full observation grid: player and dealer totals 2 through 21,
    /// soft or hard, two-card or not. A superset of what play can reach.
    fn known_states(&self) -> Vec<SharedState> {
        let mut states = Vec::new();
        for player in 2..=21 {
            for dealer in 2..=21 {
                for soft in [false, true] {
                    for pair in [false, true] {
                        let state = BasicState::new()
                            .with(PLAYER_KEY, player.to_string())
                            .with(SOFT_KEY, soft.to_string())
                            .with(PAIR_KEY, pair.to_string())
                            .with(DEALER_KEY, dealer.to_string());
                        states.push(state.into_shared());
                    }
                }
            }
        }
        states
    }

    fn new_experiment(&self) -> Box<dyn Experiment> {
        let rng = StdRng::from_rng(&mut *self.rng.borrow_mut());
        Box::new(BlackjackExperiment {
            game: Game::deal(rng),
        })
    }
}

/// A single dealt hand.
pub struct BlackjackExperiment {
    game: Game,
}

impl Experiment for BlackjackExperiment {
    fn observe(&self) -> SharedState {
        let (player, soft) = self.game.player_value();
        let (dealer, _) = self.game.dealer_value();

        let mut state = BasicState::new()
            .with(PLAYER_KEY, player.to_string())
            .with(SOFT_KEY, soft.to_string())
            .with(PAIR_KEY, (self.game.player_cards() == 2).to_string())
            .with(DEALER_KEY, dealer.to_string());
        state.terminal = self.game.is_complete();
        state.reward = self.game.payout();
        state.into_shared()
    }

    fn context_mut(&mut self) -> &mut dyn Any {
        &mut self.game
    }
}

/// Draw another card.
pub struct Hit;

impl Action for Hit {
    fn id(&self) -> ActionId {
        ActionId::new("Hit")
    }

    fn apply(&self, context: &mut dyn Any) -> Result<()> {
        downcast_context::<Game>(context, "Hit")?.hit();
        Ok(())
    }
}

/// Stop drawing and let the dealer play out.
pub struct Stand;

impl Action for Stand {
    fn id(&self) -> ActionId {
        ActionId::new("Stand")
    }

    fn apply(&self, context: &mut dyn Any) -> Result<()> {
        downcast_context::<Game>(context, "Stand")?.stand();
        Ok(())
    }
}

/// Double the stake for exactly one more card.
pub struct Double;

impl Action for Double {
    fn id(&self) -> ActionId {
        ActionId::new("Double")
    }

    fn apply(&self, context: &mut dyn Any) -> Result<()> {
        downcast_context::<Game>(context, "Double")?.double_down();
        Ok(())
    }
}
