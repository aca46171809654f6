use core::fmt;

use tracing::debug;

use super::Rules;

/// Why a proposed bet was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetRejection {
    /// Empty or below the table minimum.
    BelowMinimum {
        /// The table minimum.
        minimum: usize,
    },
    /// Above the table maximum.
    AboveMaximum {
        /// The table maximum.
        maximum: usize,
    },
    /// Above the table maximum and above the player's money.
    AboveMaximumInsufficientFunds {
        /// The table maximum.
        maximum: usize,
    },
    /// Within limits but above the player's money.
    InsufficientFunds,
}

impl fmt::Display for BetRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimum { minimum } => write!(f, "The minimum bet is ${minimum}!"),
            Self::AboveMaximum { maximum } => write!(f, "The maximum bet is ${maximum}!"),
            Self::AboveMaximumInsufficientFunds { maximum } => write!(
                f,
                "The maximum bet is ${maximum}, and you don't have enough money!"
            ),
            Self::InsufficientFunds => f.write_str("You don't have enough money!"),
        }
    }
}

/// Result of validating a proposed bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetDecision {
    /// The bet is placed; the round can be dealt.
    Accepted(usize),
    /// The bet is refused. `suggested` is the amount to offer the player
    /// instead.
    Rejected {
        /// Why the bet was refused.
        reason: BetRejection,
        /// Replacement amount for the bet input.
        suggested: usize,
    },
    /// The player cannot cover the minimum bet and has been given the
    /// starting stake. No bet is placed.
    Replenished {
        /// The player's new money.
        money: usize,
    },
}

impl BetDecision {
    /// Returns the accepted amount, if any.
    #[must_use]
    pub const fn accepted(&self) -> Option<usize> {
        match self {
            Self::Accepted(amount) => Some(*amount),
            _ => None,
        }
    }
}

impl fmt::Display for BetDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted(amount) => write!(f, "Bet placed: ${amount}"),
            Self::Rejected { reason, .. } => fmt::Display::fmt(reason, f),
            Self::Replenished { .. } => f.write_str("You ran out of money, but here's some more!"),
        }
    }
}

/// Parsed bet input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BetInput {
    Empty,
    /// More digits than the table accepts. Holds the value if it fits.
    Oversized(Option<usize>),
    Amount(usize),
}

impl Rules {
    fn parse_bet(&self, raw: &str) -> BetInput {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return BetInput::Empty;
        }
        let amount = digits.parse().ok();
        if digits.len() > self.options.max_bet_input_len {
            return BetInput::Oversized(amount);
        }
        amount.map_or(BetInput::Oversized(None), BetInput::Amount)
    }

    /// Validates a bet typed by the player against the table limits and the
    /// player's money.
    ///
    /// Non-digit characters are ignored. Checks run in this order: minimum
    /// (with a top-up when the player cannot cover it), maximum, available
    /// money. Only a bet that passes all three is accepted.
    #[must_use]
    pub fn validate_bet(&self, raw: &str, money: usize) -> BetDecision {
        let minimum = self.options.minimum_bet;
        let maximum = self.options.maximum_bet;

        let decision = match self.parse_bet(raw) {
            BetInput::Empty => self.below_minimum(money),
            BetInput::Amount(amount) if amount < minimum => self.below_minimum(money),
            BetInput::Oversized(amount) => Self::above_maximum(amount, money, maximum),
            BetInput::Amount(amount) if amount > maximum => {
                Self::above_maximum(Some(amount), money, maximum)
            }
            BetInput::Amount(amount) if amount > money => BetDecision::Rejected {
                reason: BetRejection::InsufficientFunds,
                suggested: money,
            },
            BetInput::Amount(amount) => BetDecision::Accepted(amount),
        };

        debug!(raw, money, ?decision, "bet validated");
        decision
    }

    /// An amount too large to represent exceeds any balance.
    fn above_maximum(amount: Option<usize>, money: usize, maximum: usize) -> BetDecision {
        if amount.is_none_or(|amount| amount > money) {
            BetDecision::Rejected {
                reason: BetRejection::AboveMaximumInsufficientFunds { maximum },
                suggested: money.min(maximum),
            }
        } else {
            BetDecision::Rejected {
                reason: BetRejection::AboveMaximum { maximum },
                suggested: maximum,
            }
        }
    }

    const fn below_minimum(&self, money: usize) -> BetDecision {
        if money < self.options.minimum_bet {
            BetDecision::Replenished {
                money: self.options.starting_money,
            }
        } else {
            BetDecision::Rejected {
                reason: BetRejection::BelowMinimum {
                    minimum: self.options.minimum_bet,
                },
                suggested: self.options.minimum_bet,
            }
        }
    }
}
