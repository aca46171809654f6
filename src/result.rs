//! Round result types.

use core::fmt;

use crate::error::StatsError;

/// Who took the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Both parties hold exactly 21.
    Tie,
    /// The dealer wins; the bet is lost.
    DealerWins,
    /// The player wins; the bet is paid.
    PlayerWins,
}

/// Message shown to the player when a round ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMessage {
    /// The round was tied.
    Tie,
    /// The dealer won.
    DealerWon,
    /// The player won.
    PlayerWon,
    /// The player lost and was topped back up to the starting stake.
    Replenished,
}

impl fmt::Display for RoundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tie => "It's a tie!",
            Self::DealerWon => "The dealer won!",
            Self::PlayerWon => "You won!",
            Self::Replenished => "You ran out of money, but here's some more!",
        })
    }
}

/// The money effect of a round, computed from totals alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Who won.
    pub outcome: Outcome,
    /// Message for the player.
    pub message: RoundMessage,
    /// Amount credited on a win (0 otherwise).
    pub payout: usize,
    /// Money after the round, including any top-up.
    pub money: usize,
}

/// Everything the controller needs after a round is settled.
#[derive(Debug)]
pub struct Settlement {
    /// Who won, with the money effect.
    pub resolution: Resolution,
    /// The bet that was at stake.
    pub bet: usize,
    /// Player's final total.
    pub player_total: u8,
    /// Dealer's final total.
    pub dealer_total: u8,
    /// Rounds won after this one.
    pub wins: u32,
    /// Rounds lost after this one.
    pub losses: u32,
    /// Set when the stats record could not be updated. The in-memory
    /// result stands regardless.
    pub persist_error: Option<StatsError>,
}

impl Settlement {
    /// Shorthand for `resolution.outcome`.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.resolution.outcome
    }

    /// Shorthand for `resolution.message`.
    #[must_use]
    pub const fn message(&self) -> RoundMessage {
        self.resolution.message
    }

    /// Money after the round.
    #[must_use]
    pub const fn money(&self) -> usize {
        self.resolution.money
    }

    /// Returns whether the result was written to the stats record.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        self.persist_error.is_none()
    }
}
