//! The shoe cards are dealt from.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::card::{Card, DECK_SIZE, Rank, Suit};
use crate::error::EmptyShoeError;

/// An ordered collection of cards. The front of the sequence is the top.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: VecDeque<Card>,
    rng: ChaCha8Rng,
}

impl Shoe {
    /// Creates a full, shuffled shoe with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut shoe = Self {
            cards: VecDeque::with_capacity(DECK_SIZE),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        shoe.reset_and_shuffle();
        shoe
    }

    /// Creates a shoe holding exactly `cards`, top first.
    ///
    /// Later calls to [`reset_and_shuffle`](Self::reset_and_shuffle) still
    /// rebuild a full shoe.
    #[must_use]
    pub fn stacked(cards: impl IntoIterator<Item = Card>, seed: u64) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Replaces the contents with one of each card and shuffles them.
    pub fn reset_and_shuffle(&mut self) {
        self.cards.clear();
        for rank in Rank::ALL {
            for suit in Suit::ALL {
                self.cards.push_back(Card::new(rank, suit));
            }
        }
        self.cards.make_contiguous().shuffle(&mut self.rng);
        debug!(cards = self.cards.len(), "shoe reset and shuffled");
    }

    /// Removes and returns the top card.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyShoeError`] if the shoe has no cards left.
    pub fn draw_top(&mut self) -> Result<Card, EmptyShoeError> {
        self.cards.pop_front().ok_or(EmptyShoeError)
    }

    /// Returns the number of cards left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the shoe is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterates over the remaining cards, top first.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
