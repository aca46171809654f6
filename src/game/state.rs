//! Game state and event types.

use crate::card::Card;
use crate::error::StatsError;
use crate::result::Settlement;
use crate::rules::BetDecision;

/// Game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Waiting for an acceptable bet.
    Betting,
    /// A bet is placed; the round can be dealt.
    ReadyToDeal,
    /// Waiting for the player to hit or stand.
    PlayerTurn,
}

/// Which side of the table a card went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    /// The dealer.
    Dealer,
    /// The player.
    Player,
}

/// Something that changed at the table, passed to the observer registered
/// with [`Game::set_observer`](super::Game::set_observer).
#[derive(Debug)]
pub enum GameEvent<'a> {
    /// A bet was validated.
    BetDecided(BetDecision),
    /// A card was dealt.
    CardDealt {
        /// Who received the card.
        party: Party,
        /// The card.
        card: Card,
    },
    /// The stats record could not be written after a round.
    StatsNotSaved(&'a StatsError),
    /// A round finished.
    RoundSettled(&'a Settlement),
}
