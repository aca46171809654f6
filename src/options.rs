//! Table configuration options.

/// Rounding mode for payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Round up.
    Up,
    /// Round down.
    Down,
    /// Round to nearest.
    Nearest,
}

impl RoundingMode {
    pub(crate) fn apply(self, amount: f64) -> usize {
        match self {
            Self::Up => amount.ceil() as usize,
            Self::Down => amount.floor() as usize,
            Self::Nearest => amount.round() as usize,
        }
    }
}

/// Configuration options for a blackjack table.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use bjsolo::TableOptions;
///
/// let options = TableOptions::default()
///     .with_minimum_bet(5)
///     .with_maximum_bet(500)
///     .with_starting_money(1_000);
/// assert_eq!(options.maximum_bet, 500);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    /// Smallest bet accepted.
    pub minimum_bet: usize,
    /// Largest bet accepted.
    pub maximum_bet: usize,
    /// Money granted at the start and whenever the player runs dry.
    pub starting_money: usize,
    /// Bet inputs with more digits than this are treated as oversized.
    pub max_bet_input_len: usize,
    /// The dealer keeps drawing while below this total.
    pub dealer_stands_on: u8,
    /// Payout ratio for a winning 21.
    pub blackjack_pays: f64,
    /// Rounding mode for 21 payouts.
    pub rounding_blackjack: RoundingMode,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            minimum_bet: 10,
            maximum_bet: 100,
            starting_money: 200,
            max_bet_input_len: 9,
            dealer_stands_on: 17,
            blackjack_pays: 1.5,
            rounding_blackjack: RoundingMode::Down,
        }
    }
}

impl TableOptions {
    /// Sets the minimum bet.
    ///
    /// # Example
    ///
    /// ```
    /// use bjsolo::TableOptions;
    ///
    /// let options = TableOptions::default().with_minimum_bet(25);
    /// assert_eq!(options.minimum_bet, 25);
    /// ```
    #[must_use]
    pub const fn with_minimum_bet(mut self, amount: usize) -> Self {
        self.minimum_bet = amount;
        self
    }

    /// Sets the maximum bet.
    #[must_use]
    pub const fn with_maximum_bet(mut self, amount: usize) -> Self {
        self.maximum_bet = amount;
        self
    }

    /// Sets the starting stake.
    #[must_use]
    pub const fn with_starting_money(mut self, amount: usize) -> Self {
        self.starting_money = amount;
        self
    }

    /// Sets the digit count above which a bet input is oversized.
    #[must_use]
    pub const fn with_max_bet_input_len(mut self, len: usize) -> Self {
        self.max_bet_input_len = len;
        self
    }

    /// Sets the total at which the dealer stops drawing.
    ///
    /// # Example
    ///
    /// ```
    /// use bjsolo::TableOptions;
    ///
    /// let options = TableOptions::default().with_dealer_stands_on(18);
    /// assert_eq!(options.dealer_stands_on, 18);
    /// ```
    #[must_use]
    pub const fn with_dealer_stands_on(mut self, total: u8) -> Self {
        self.dealer_stands_on = total;
        self
    }

    /// Sets the payout ratio for a winning 21.
    #[must_use]
    pub const fn with_blackjack_pays(mut self, ratio: f64) -> Self {
        self.blackjack_pays = ratio;
        self
    }

    /// Sets the rounding mode for 21 payouts.
    #[must_use]
    pub const fn with_rounding_blackjack(mut self, mode: RoundingMode) -> Self {
        self.rounding_blackjack = mode;
        self
    }
}
