//! Single-deck blackjack hand simulator.

use rand::{Rng, rngs::StdRng};

/// A blackjack hand in progress.
///
/// Cards are ranks 1 (ace) through 13 (king); face cards count 10 and the
/// ace counts 11 while the hand total stays at or below 21. The dealer draws
/// to 18. Payouts: +15 for a two-card 21, otherwise ±10, doubled to ±20
/// after a double-down, 0 on a push.
#[derive(Debug, Clone)]
pub struct Game {
    player: Vec<u8>,
    dealer: Vec<u8>,
    deck: Vec<u8>,
    doubled: bool,
    complete: bool,
    payout: i64,
    rng: StdRng,
}

impl Game {
    /// Shuffle a fresh deck and deal two cards each, player first.
    pub fn deal(rng: StdRng) -> Self {
        let deck = (1u8..=13).flat_map(|rank| [rank; 4]).collect();
        let mut game = Game {
            player: Vec::new(),
            dealer: Vec::new(),
            deck,
            doubled: false,
            complete: false,
            payout: 0,
            rng,
        };

        let card = game.draw();
        game.player.push(card);
        let card = game.draw();
        game.dealer.push(card);
        let card = game.draw();
        game.player.push(card);
        let card = game.draw();
        game.dealer.push(card);

        game
    }

    /// Draw one card for the player, settling the hand on a bust.
    pub fn hit(&mut self) {
        if self.complete {
            return;
        }

        let card = self.draw();
        self.player.push(card);

        let (total, _) = evaluate(&self.player);
        if total > 21 {
            self.stand();
        }
    }

    /// Stop drawing: the dealer plays out to 18 or better and the hand is
    /// settled.
    pub fn stand(&mut self) {
        if self.complete {
            return;
        }

        while evaluate(&self.dealer).0 < 18 {
            let card = self.draw();
            self.dealer.push(card);
        }

        self.complete = true;
        self.payout = self.settle();
    }

    /// Double the stake, draw exactly one card, and stand.
    pub fn double_down(&mut self) {
        if self.complete {
            return;
        }

        self.doubled = true;
        self.hit();
        self.stand();
    }

    /// Player hand total and whether an ace is counting as 11.
    pub fn player_value(&self) -> (i64, bool) {
        evaluate(&self.player)
    }

    /// Dealer hand total and softness.
    pub fn dealer_value(&self) -> (i64, bool) {
        evaluate(&self.dealer)
    }

    /// Number of cards in the player's hand.
    pub fn player_cards(&self) -> usize {
        self.player.len()
    }

    /// Whether the hand has been settled.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Settled payout; 0 while the hand is live.
    pub fn payout(&self) -> i64 {
        self.payout
    }

    fn draw(&mut self) -> u8 {
        let pick = self.rng.random_range(0..self.deck.len());
        self.deck.swap_remove(pick)
    }

    fn settle(&self) -> i64 {
        let (player, _) = evaluate(&self.player);
        let (dealer, _) = evaluate(&self.dealer);

        if player == 21 && self.player.len() == 2 {
            return 15;
        }

        if player > 21 || (dealer <= 21 && dealer > player) {
            return if self.doubled { -20 } else { -10 };
        }

        if dealer > 21 || player > dealer {
            return if self.doubled { 20 } else { 10 };
        }

        0
    }
}

/// Best total for a hand, and whether an ace is being counted as 11.
fn evaluate(hand: &[u8]) -> (i64, bool) {
    let mut total = 0i64;
    let mut soft = false;

    for &card in hand {
        if (2..=10).contains(&card) {
            total += i64::from(card);
        } else if card >= 11 {
            total += 10;
        }
    }

    for &card in hand {
        if card == 1 {
            if total <= 10 {
                total += 11;
                soft = true;
            } else {
                total += 1;
            }
        }
    }

    (total, soft)
}
