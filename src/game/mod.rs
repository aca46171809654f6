//! Single-player game session.

use tracing::info;

use crate::error::GameError;
use crate::hand::{Hand, Player};
use crate::options::TableOptions;
use crate::result::Settlement;
use crate::rules::Rules;
use crate::shoe::Shoe;
use crate::stats::{StatsRecord, StatsStore};

mod actions;
pub mod state;

pub use state::{GameEvent, GameState, Party};

type Observer = Box<dyn FnMut(&GameEvent<'_>)>;

/// A blackjack session for one player against the dealer.
///
/// The game owns the shoe, both hands, the player's money and record, and the
/// stats store. It walks through [`GameState::Betting`],
/// [`GameState::ReadyToDeal`] and [`GameState::PlayerTurn`], settling and
/// persisting each round as it ends.
pub struct Game {
    rules: Rules,
    shoe: Shoe,
    /// Whether cards have been drawn since the shoe was last shuffled.
    shoe_used: bool,
    dealer: Hand,
    player: Player,
    stats: StatsStore,
    state: GameState,
    last_settlement: Option<Settlement>,
    observer: Option<Observer>,
}

impl Game {
    /// Opens a session, loading the player's money and record from `stats`.
    ///
    /// If the record does not exist yet it is created with the starting stake
    /// and no wins or losses.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed, or
    /// if a missing record cannot be created.
    pub fn open(options: TableOptions, stats: StatsStore, seed: u64) -> Result<Self, GameError> {
        let record = match stats.load() {
            Ok(record) => record,
            Err(err) if err.is_missing() => {
                let record = StatsRecord::new(options.starting_money, 0, 0);
                stats.initialize(&record)?;
                info!(path = %stats.path().display(), "created new stats record");
                record
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            rules: Rules::new(options),
            shoe: Shoe::new(seed),
            shoe_used: false,
            dealer: Hand::new(),
            player: Player::new(record.money, record.wins, record.losses),
            stats,
            state: GameState::Betting,
            last_settlement: None,
            observer: None,
        })
    }

    /// Replaces the shoe. The next deal uses it as is, without shuffling.
    ///
    /// # Errors
    ///
    /// Returns an error during the player's turn.
    pub fn set_shoe(&mut self, shoe: Shoe) -> Result<(), GameError> {
        if self.state == GameState::PlayerTurn {
            return Err(GameError::InvalidState);
        }
        self.shoe = shoe;
        self.shoe_used = false;
        Ok(())
    }

    /// Registers a callback that is told about every change at the table.
    pub fn set_observer(&mut self, observer: impl FnMut(&GameEvent<'_>) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Returns the rules in effect.
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Returns the current game state.
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Returns the player.
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Returns the dealer's hand.
    pub const fn dealer(&self) -> &Hand {
        &self.dealer
    }

    /// Returns the result of the most recent round, until the next deal.
    pub const fn last_settlement(&self) -> Option<&Settlement> {
        self.last_settlement.as_ref()
    }

    /// Returns the number of cards remaining in the shoe.
    pub fn cards_remaining(&self) -> usize {
        self.shoe.len()
    }

    /// Returns the stats store.
    pub const fn stats(&self) -> &StatsStore {
        &self.stats
    }
}

fn emit(observer: &mut Option<Observer>, event: &GameEvent<'_>) {
    if let Some(observer) = observer.as_mut() {
        observer(event);
    }
}
