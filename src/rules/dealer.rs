use tracing::debug;

use crate::card::Card;
use crate::error::EmptyShoeError;
use crate::hand::Hand;
use crate::shoe::Shoe;

use super::Rules;

/// The dealer's position in its fixed drawing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealerState {
    /// The dealer must take another card.
    Drawing,
    /// The dealer is done.
    Standing,
}

impl DealerState {
    /// The state for a hand with `total` when the dealer stands on
    /// `stands_on`.
    #[must_use]
    pub const fn for_total(total: u8, stands_on: u8) -> Self {
        if total < stands_on {
            Self::Drawing
        } else {
            Self::Standing
        }
    }
}

impl Rules {
    /// Returns the dealer's state for the given total.
    #[must_use]
    pub const fn dealer_state(&self, total: u8) -> DealerState {
        DealerState::for_total(total, self.options.dealer_stands_on)
    }

    /// Dealer plays their hand.
    ///
    /// The dealer always takes its second card first, whatever its opening
    /// card. It then draws while the total is below
    /// [`dealer_stands_on`](crate::TableOptions::dealer_stands_on). There is
    /// no soft-17 rule and no bust avoidance.
    ///
    /// Returns the cards drawn by the dealer.
    pub(super) fn dealer_play(
        &self,
        shoe: &mut Shoe,
        dealer: &mut Hand,
    ) -> Result<Vec<Card>, EmptyShoeError> {
        let mut drawn = Vec::new();

        let card = shoe.draw_top()?;
        dealer.add_card(card);
        drawn.push(card);

        while self.dealer_state(dealer.total()) == DealerState::Drawing {
            let card = shoe.draw_top()?;
            dealer.add_card(card);
            drawn.push(card);
        }

        debug!(total = dealer.total(), drawn = drawn.len(), "dealer stands");
        Ok(drawn)
    }
}
