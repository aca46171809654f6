use tracing::{info, warn};

use crate::hand::{BLACKJACK, Hand, Player};
use crate::result::{Outcome, Resolution, RoundMessage, Settlement};
use crate::stats::StatsStore;

use super::Rules;

impl Rules {
    /// Decides who takes the round from the two final totals.
    ///
    /// | dealer | player | outcome |
    /// |---|---|---|
    /// | 21 | 21 | tie |
    /// | 21 | any other | dealer |
    /// | any | over 21 | dealer |
    /// | equal totals | | dealer |
    /// | under 21 and above player | | dealer |
    /// | otherwise | | player |
    #[must_use]
    pub const fn decide(dealer_total: u8, player_total: u8) -> Outcome {
        match (dealer_total, player_total) {
            (BLACKJACK, BLACKJACK) => Outcome::Tie,
            (BLACKJACK, _) => Outcome::DealerWins,
            (_, p) if p > BLACKJACK => Outcome::DealerWins,
            (d, p) if d == p => Outcome::DealerWins,
            (d, p) if d < BLACKJACK && d > p => Outcome::DealerWins,
            _ => Outcome::PlayerWins,
        }
    }

    /// Amount credited to the player for a win. A winning total of exactly
    /// 21 pays [`blackjack_pays`](crate::TableOptions::blackjack_pays);
    /// anything else pays even money.
    #[must_use]
    pub fn win_payout(&self, player_total: u8, bet: usize) -> usize {
        if player_total == BLACKJACK {
            #[expect(
                clippy::cast_precision_loss,
                reason = "f64 has sufficient precision for monetary values"
            )]
            let winnings = (bet as f64) * self.options.blackjack_pays;
            self.options.rounding_blackjack.apply(winnings)
        } else {
            bet
        }
    }

    /// Computes the money effect of a round without touching any state.
    ///
    /// A loss that leaves the player below the minimum bet resets money to
    /// the starting stake.
    #[must_use]
    pub fn resolve(
        &self,
        dealer_total: u8,
        player_total: u8,
        bet: usize,
        money: usize,
    ) -> Resolution {
        match Self::decide(dealer_total, player_total) {
            Outcome::Tie => Resolution {
                outcome: Outcome::Tie,
                message: RoundMessage::Tie,
                payout: 0,
                money,
            },
            Outcome::PlayerWins => {
                let payout = self.win_payout(player_total, bet);
                Resolution {
                    outcome: Outcome::PlayerWins,
                    message: RoundMessage::PlayerWon,
                    payout,
                    money: money.saturating_add(payout),
                }
            }
            Outcome::DealerWins => {
                let remaining = money.saturating_sub(bet);
                if remaining < self.options.minimum_bet {
                    Resolution {
                        outcome: Outcome::DealerWins,
                        message: RoundMessage::Replenished,
                        payout: 0,
                        money: self.options.starting_money,
                    }
                } else {
                    Resolution {
                        outcome: Outcome::DealerWins,
                        message: RoundMessage::DealerWon,
                        payout: 0,
                        money: remaining,
                    }
                }
            }
        }
    }

    /// Settles a finished round: applies the result to `player` and records
    /// it in `stats`.
    ///
    /// Money is always written. A win or loss increments the stored counter
    /// for that side; a tie increments neither. If the record cannot be
    /// updated the in-memory result still stands and the error is returned
    /// in [`Settlement::persist_error`].
    pub fn settle_round(&self, player: &mut Player, dealer: &Hand, stats: &StatsStore) -> Settlement {
        let player_total = player.hand.total();
        let dealer_total = dealer.total();
        let resolution = self.resolve(dealer_total, player_total, player.bet, player.money);
        player.money = resolution.money;

        let persisted = stats.update(|record| {
            record.money = resolution.money;
            match resolution.outcome {
                Outcome::PlayerWins => record.wins = record.wins.saturating_add(1),
                Outcome::DealerWins => record.losses = record.losses.saturating_add(1),
                Outcome::Tie => {}
            }
        });

        let persist_error = match persisted {
            Ok(record) => {
                player.wins = record.wins;
                player.losses = record.losses;
                None
            }
            Err(err) => {
                warn!(%err, "round result not saved");
                match resolution.outcome {
                    Outcome::PlayerWins => player.wins = player.wins.saturating_add(1),
                    Outcome::DealerWins => player.losses = player.losses.saturating_add(1),
                    Outcome::Tie => {}
                }
                Some(err)
            }
        };

        info!(
            outcome = ?resolution.outcome,
            dealer_total,
            player_total,
            bet = player.bet,
            money = player.money,
            "round settled"
        );

        Settlement {
            resolution,
            bet: player.bet,
            player_total,
            dealer_total,
            wins: player.wins,
            losses: player.losses,
            persist_error,
        }
    }
}
