//! A single-player blackjack rules engine with persisted statistics.
//!
//! The crate is split into a stateless [`Rules`] engine, which scores,
//! validates bets, plays the dealer and settles rounds over caller-owned
//! [`Shoe`] and [`Hand`] values, and a [`Game`] session that owns all of that
//! state and drives the round flow for a front end.
//!
//! Money, wins and losses are persisted between sessions by a
//! [`StatsStore`].
//!
//! # Example
//!
//! ```no_run
//! use bjsolo::{Game, StatsStore, TableOptions};
//!
//! let stats = StatsStore::new("save/save.txt");
//! let mut game = Game::open(TableOptions::default(), stats, 42)?;
//! game.place_bet("20")?;
//! game.deal()?;
//! if game.last_settlement().is_none() {
//!     let settlement = game.stand()?;
//!     println!("{}", settlement.message());
//! }
//! # Ok::<(), bjsolo::GameError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod card;
pub mod error;
pub mod game;
pub mod hand;
pub mod options;
pub mod result;
pub mod rules;
pub mod shoe;
pub mod stats;
mod sync;

// Re-export main types
pub use card::{Card, DECK_SIZE, Rank, Suit};
pub use error::{EmptyShoeError, GameError, StatsError};
pub use game::{Game, GameEvent, GameState, Party};
pub use hand::{BLACKJACK, Hand, Player};
pub use options::{RoundingMode, TableOptions};
pub use result::{Outcome, Resolution, RoundMessage, Settlement};
pub use rules::{BetDecision, BetRejection, DealerState, Rules};
pub use shoe::Shoe;
pub use stats::{RetryPolicy, StatField, StatsDocument, StatsRecord, StatsStore};
