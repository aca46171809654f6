//! Stateless blackjack rules.
//!
//! [`Rules`] holds only the table options. Every operation takes the shoe,
//! hands and player it acts on, so a controller can own all state itself.

use tracing::debug;

use crate::card::Card;
use crate::error::EmptyShoeError;
use crate::hand::Hand;
use crate::options::TableOptions;
use crate::shoe::Shoe;

mod bet;
mod dealer;
mod outcome;

pub use bet::{BetDecision, BetRejection};
pub use dealer::DealerState;

/// The rules engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rules {
    options: TableOptions,
}

impl Rules {
    /// Creates a rules engine with the given options.
    #[must_use]
    pub const fn new(options: TableOptions) -> Self {
        Self { options }
    }

    /// Returns the options in effect.
    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Resets both hands and deals the opening cards: one to the dealer,
    /// then two to the player. The dealer's second card comes when the
    /// player stands.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyShoeError`] if the shoe runs out while dealing.
    pub fn new_round(
        &self,
        shoe: &mut Shoe,
        dealer: &mut Hand,
        player: &mut Hand,
    ) -> Result<(), EmptyShoeError> {
        dealer.reset();
        player.reset();

        dealer.add_card(shoe.draw_top()?);
        for _ in 0..2 {
            player.add_card(shoe.draw_top()?);
        }

        debug!(
            dealer = dealer.total(),
            player = player.total(),
            "opening cards dealt"
        );
        Ok(())
    }

    /// Draws one card into the player's hand and returns it.
    ///
    /// A total above 21 after the draw is a bust; ending the round is left to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyShoeError`] if the shoe is empty.
    pub fn player_hit(&self, shoe: &mut Shoe, player: &mut Hand) -> Result<Card, EmptyShoeError> {
        let card = shoe.draw_top()?;
        player.add_card(card);
        debug!(%card, total = player.total(), "player hits");
        Ok(card)
    }

    /// Plays out the dealer's hand after the player stands.
    ///
    /// Returns the cards drawn by the dealer.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyShoeError`] if the shoe runs out while the dealer must
    /// draw.
    pub fn player_stand(
        &self,
        shoe: &mut Shoe,
        dealer: &mut Hand,
    ) -> Result<Vec<Card>, EmptyShoeError> {
        self.dealer_play(shoe, dealer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    fn stacked(ranks: &[Rank]) -> Shoe {
        Shoe::stacked(ranks.iter().map(|&rank| Card::new(rank, Suit::Clubs)), 0)
    }

    #[test]
    fn opening_deal_gives_dealer_one_card() {
        let rules = Rules::default();
        let mut shoe = stacked(&[Rank::Nine, Rank::Two, Rank::Three]);
        let mut dealer = Hand::new();
        let mut player = Hand::new();
        dealer.add_card(Card::new(Rank::King, Suit::Hearts));

        rules.new_round(&mut shoe, &mut dealer, &mut player).unwrap();
        assert_eq!(dealer.len(), 1);
        assert_eq!(dealer.total(), 9);
        assert_eq!(player.total(), 5);
        assert!(shoe.is_empty());
    }

    #[test]
    fn opening_deal_fails_on_short_shoe() {
        let rules = Rules::default();
        let mut shoe = stacked(&[Rank::Nine, Rank::Two]);
        let mut dealer = Hand::new();
        let mut player = Hand::new();
        assert_eq!(
            rules.new_round(&mut shoe, &mut dealer, &mut player),
            Err(EmptyShoeError)
        );
    }

    #[test]
    fn hit_returns_drawn_card() {
        let rules = Rules::default();
        let mut shoe = stacked(&[Rank::Queen]);
        let mut player = Hand::new();
        player.add_card(Card::new(Rank::Nine, Suit::Hearts));
        player.add_card(Card::new(Rank::Five, Suit::Hearts));

        let card = rules.player_hit(&mut shoe, &mut player).unwrap();
        assert_eq!(card.rank(), Rank::Queen);
        assert!(player.is_bust());
        assert_eq!(rules.player_hit(&mut shoe, &mut player), Err(EmptyShoeError));
    }
}
