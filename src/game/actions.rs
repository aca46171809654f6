use tracing::warn;

use crate::card::Card;
use crate::error::{EmptyShoeError, GameError};
use crate::hand::BLACKJACK;
use crate::result::Settlement;
use crate::rules::BetDecision;

use super::{Game, GameEvent, GameState, Party, emit};

impl Game {
    fn ensure_state(&self, expected: GameState) -> Result<(), GameError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(GameError::InvalidState)
        }
    }

    /// Validates and, if acceptable, places a bet typed by the player.
    ///
    /// An accepted bet moves the game to [`GameState::ReadyToDeal`]. When the
    /// player cannot cover the minimum, their money is topped up to the
    /// starting stake and the game stays in [`GameState::Betting`].
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not in betting state.
    pub fn place_bet(&mut self, raw: &str) -> Result<BetDecision, GameError> {
        self.ensure_state(GameState::Betting)?;

        let decision = self.rules.validate_bet(raw, self.player.money);
        match decision {
            BetDecision::Accepted(amount) => {
                self.player.bet = amount;
                self.state = GameState::ReadyToDeal;
            }
            BetDecision::Replenished { money } => self.player.money = money,
            BetDecision::Rejected { .. } => {}
        }

        emit(&mut self.observer, &GameEvent::BetDecided(decision));
        Ok(decision)
    }

    /// Deals a new round.
    ///
    /// The shoe is reshuffled unless it is untouched since the last shuffle
    /// or [`set_shoe`](Self::set_shoe). If the player's opening total is 21
    /// or more the round settles immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if no bet has been placed or the shoe runs out. In
    /// the latter case the round is abandoned and the bet stays placed.
    pub fn deal(&mut self) -> Result<(), GameError> {
        self.ensure_state(GameState::ReadyToDeal)?;

        if self.shoe_used {
            self.shoe.reset_and_shuffle();
        }
        self.shoe_used = true;
        self.last_settlement = None;

        let dealt = self
            .rules
            .new_round(&mut self.shoe, &mut self.dealer, &mut self.player.hand);
        self.abort_on_empty(dealt)?;
        self.state = GameState::PlayerTurn;

        for &card in self.dealer.cards() {
            emit(
                &mut self.observer,
                &GameEvent::CardDealt {
                    party: Party::Dealer,
                    card,
                },
            );
        }
        for &card in self.player.hand.cards() {
            emit(
                &mut self.observer,
                &GameEvent::CardDealt {
                    party: Party::Player,
                    card,
                },
            );
        }

        if self.player.hand.total() >= BLACKJACK {
            self.finish_round();
        }
        Ok(())
    }

    /// Player action: Hit (draw a card).
    ///
    /// Reaching 21 or busting ends the round; the result is then available
    /// from [`last_settlement`](Self::last_settlement).
    ///
    /// # Errors
    ///
    /// Returns an error if it is not the player's turn or the shoe is empty.
    pub fn hit(&mut self) -> Result<Card, GameError> {
        self.ensure_state(GameState::PlayerTurn)?;

        let drawn = self.rules.player_hit(&mut self.shoe, &mut self.player.hand);
        let card = self.abort_on_empty(drawn)?;
        emit(
            &mut self.observer,
            &GameEvent::CardDealt {
                party: Party::Player,
                card,
            },
        );

        if self.player.hand.total() >= BLACKJACK {
            self.finish_round();
        }
        Ok(card)
    }

    /// Player action: Stand. The dealer plays out its hand and the round is
    /// settled.
    ///
    /// # Errors
    ///
    /// Returns an error if it is not the player's turn or the shoe runs out
    /// while the dealer draws.
    pub fn stand(&mut self) -> Result<&Settlement, GameError> {
        self.ensure_state(GameState::PlayerTurn)?;

        let played = self.rules.player_stand(&mut self.shoe, &mut self.dealer);
        let drawn = self.abort_on_empty(played)?;
        for card in drawn {
            emit(
                &mut self.observer,
                &GameEvent::CardDealt {
                    party: Party::Dealer,
                    card,
                },
            );
        }

        Ok(self.finish_round())
    }

    fn finish_round(&mut self) -> &Settlement {
        let settlement = self
            .rules
            .settle_round(&mut self.player, &self.dealer, &self.stats);
        self.state = GameState::Betting;

        if let Some(err) = &settlement.persist_error {
            emit(&mut self.observer, &GameEvent::StatsNotSaved(err));
        }
        emit(&mut self.observer, &GameEvent::RoundSettled(&settlement));

        self.last_settlement.insert(settlement)
    }

    fn abort_on_empty<T>(&mut self, result: Result<T, EmptyShoeError>) -> Result<T, GameError> {
        result.map_err(|err| {
            warn!("shoe exhausted mid-round; round abandoned");
            self.dealer.reset();
            self.player.hand.reset();
            self.state = GameState::ReadyToDeal;
            err.into()
        })
    }
}
