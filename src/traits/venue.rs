//! Injected external liquidity venue.

use core::fmt;

use crate::domain::{AccountId, Amount, Timestamp};

/// Error reported by a [`LiquidityVenue`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueError(&'static str);

impl VenueError {
    /// Creates a venue error with a static reason.
    #[must_use]
    pub const fn new(reason: &'static str) -> Self {
        Self(reason)
    }

    /// Returns the reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for VenueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "venue error: {}", self.0)
    }
}

/// A liquidity-provision request handed to the venue at migration.
///
/// Minimums are one-sided: the token minimum equals the token amount (the
/// venue must take every token or none), while the currency minimum is
/// zero. The deadline bounds how long the venue may sit on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityRequest {
    currency_amount: Amount,
    token_amount: Amount,
    min_currency: Amount,
    min_tokens: Amount,
    deadline: Timestamp,
}

impl LiquidityRequest {
    /// Builds the migration request with its one-sided minimums.
    #[must_use]
    pub const fn new(currency_amount: Amount, token_amount: Amount, deadline: Timestamp) -> Self {
        Self {
            currency_amount,
            token_amount,
            min_currency: Amount::ZERO,
            min_tokens: token_amount,
            deadline,
        }
    }

    /// Returns the currency amount offered.
    #[must_use]
    pub const fn currency_amount(&self) -> Amount {
        self.currency_amount
    }

    /// Returns the token amount offered.
    #[must_use]
    pub const fn token_amount(&self) -> Amount {
        self.token_amount
    }

    /// Returns the minimum currency the venue must accept.
    #[must_use]
    pub const fn min_currency(&self) -> Amount {
        self.min_currency
    }

    /// Returns the minimum tokens the venue must accept.
    #[must_use]
    pub const fn min_tokens(&self) -> Amount {
        self.min_tokens
    }

    /// Returns the request deadline.
    #[must_use]
    pub const fn deadline(&self) -> Timestamp {
        self.deadline
    }
}

/// What the venue reports back after providing liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueReceipt {
    pool: AccountId,
    currency_taken: Amount,
    tokens_taken: Amount,
}

impl VenueReceipt {
    /// Creates a receipt for a filled liquidity request.
    #[must_use]
    pub const fn new(pool: AccountId, currency_taken: Amount, tokens_taken: Amount) -> Self {
        Self {
            pool,
            currency_taken,
            tokens_taken,
        }
    }

    /// Returns the identifier of the pool that now holds the liquidity.
    #[must_use]
    pub const fn pool(&self) -> AccountId {
        self.pool
    }

    /// Returns the currency the venue actually took.
    #[must_use]
    pub const fn currency_taken(&self) -> Amount {
        self.currency_taken
    }

    /// Returns the tokens the venue actually took.
    #[must_use]
    pub const fn tokens_taken(&self) -> Amount {
        self.tokens_taken
    }
}

/// The external AMM the engine migrates into.
///
/// Called exactly once per engine instance, from inside the migration
/// transition. A failure here fails the entire triggering trade; the
/// engine compensates every ledger effect it made beforehand, so an
/// implementation may reject freely without corrupting engine state.
pub trait LiquidityVenue {
    /// Provides the migrated reserves as liquidity and returns the pool.
    ///
    /// # Errors
    ///
    /// Returns a [`VenueError`] if the venue cannot fill the request
    /// within its minimums and deadline.
    fn add_liquidity(&mut self, request: &LiquidityRequest) -> Result<VenueReceipt, VenueError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_minimums_are_one_sided() {
        let req = LiquidityRequest::new(
            Amount::new(9_500),
            Amount::new(1_000_000),
            Timestamp::new(1_300),
        );
        assert_eq!(req.min_tokens(), req.token_amount());
        assert_eq!(req.min_currency(), Amount::ZERO);
        assert_eq!(req.deadline(), Timestamp::new(1_300));
    }

    #[test]
    fn receipt_accessors() {
        let pool = AccountId::from_bytes([9u8; 32]);
        let r = VenueReceipt::new(pool, Amount::new(10), Amount::new(20));
        assert_eq!(r.pool(), pool);
        assert_eq!(r.currency_taken(), Amount::new(10));
        assert_eq!(r.tokens_taken(), Amount::new(20));
    }
}
