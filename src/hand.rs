//! Hands and the human player's session state.

use crate::card::Card;

/// Highest total that does not bust.
pub const BLACKJACK: u8 = 21;

/// Cards held by one party, with a running total.
///
/// The total is updated one card at a time: an Ace that would push the hand
/// past 21 is counted as 1, and at most one soft Ace is downgraded per draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    total: u8,
    soft_aces: u8,
}

impl Hand {
    /// Creates a new empty hand.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cards: Vec::new(),
            total: 0,
            soft_aces: 0,
        }
    }

    /// Adds a card to the hand and updates the total.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);

        if card.is_ace() {
            self.soft_aces += 1;
        }

        let raw = self.total.saturating_add(card.value());
        if raw > BLACKJACK && self.soft_aces > 0 {
            // Count one soft Ace as 1 instead of 11.
            self.total = raw - 10;
            self.soft_aces -= 1;
        } else {
            self.total = raw;
        }
    }

    /// Clears the hand for a new round.
    pub fn reset(&mut self) {
        self.cards.clear();
        self.total = 0;
        self.soft_aces = 0;
    }

    /// Returns the cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the scored total.
    #[must_use]
    pub const fn total(&self) -> u8 {
        self.total
    }

    /// Returns how many Aces are still available to be counted as 1.
    #[must_use]
    pub const fn soft_aces(&self) -> u8 {
        self.soft_aces
    }

    /// Returns whether the hand is over 21.
    #[must_use]
    pub const fn is_bust(&self) -> bool {
        self.total > BLACKJACK
    }

    /// Returns whether the first two cards total 21.
    #[must_use]
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.total == BLACKJACK
    }

    /// Returns the number of cards in the hand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The human player: a hand plus money, the current bet, and record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    /// The player's hand.
    pub hand: Hand,
    /// Money available.
    pub money: usize,
    /// Bet for the current round.
    pub bet: usize,
    /// Rounds won.
    pub wins: u32,
    /// Rounds lost.
    pub losses: u32,
}

impl Player {
    /// Creates a player with the given money and record and an empty hand.
    #[must_use]
    pub const fn new(money: usize, wins: u32, losses: u32) -> Self {
        Self {
            hand: Hand::new(),
            money,
            bet: 0,
            wins,
            losses,
        }
    }
}
