//! Virtual reserve bookkeeping.

use core::fmt;

use super::Amount;
use crate::error::{EngineError, Result};

/// The two virtual reserves the pricing curves quote against, plus the
/// collected-funds counter.
///
/// "Virtual" means these are pricing inputs, not custody records: the
/// token reserve is never held anywhere, and the currency reserve starts
/// at a configured seed value that no depositor ever paid in. The
/// on-hand currency balance is `total_collected` — net deposits in minus
/// net payouts out.
///
/// # Invariants
///
/// - `token_reserve > 0` while the instance is trading. Construction
///   rejects zero reserves and the reserve-depletion guard in every curve
///   keeps the invariant across trades.
/// - Mutation happens only through the checked `apply_*`/`debit_*` methods,
///   and only the engine can reach them; after migration the engine stops
///   calling them, freezing the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveState {
    token_reserve: Amount,
    currency_reserve: Amount,
    total_collected: Amount,
}

impl ReserveState {
    /// Creates the reserve state from the configured seed values.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if either seed reserve
    /// is zero.
    pub const fn new(token_reserve: Amount, currency_reserve: Amount) -> Result<Self> {
        if token_reserve.is_zero() {
            return Err(EngineError::InvalidConfiguration(
                "initial token reserve must be non-zero",
            ));
        }
        if currency_reserve.is_zero() {
            return Err(EngineError::InvalidConfiguration(
                "initial currency reserve must be non-zero",
            ));
        }
        Ok(Self {
            token_reserve,
            currency_reserve,
            total_collected: Amount::ZERO,
        })
    }

    /// Returns the token-side virtual reserve.
    #[must_use]
    pub const fn token_reserve(&self) -> Amount {
        self.token_reserve
    }

    /// Returns the currency-side virtual reserve.
    #[must_use]
    pub const fn currency_reserve(&self) -> Amount {
        self.currency_reserve
    }

    /// Returns the on-hand currency balance (net in minus net out).
    #[must_use]
    pub const fn total_collected(&self) -> Amount {
        self.total_collected
    }

    /// Applies an accepted buy: currency flows in, issued tokens leave the
    /// reserve.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Overflow`] / [`EngineError::Underflow`] if
    /// the update does not fit — the enclosing trade is then rejected with
    /// no partial effect.
    pub(crate) fn apply_buy(&mut self, amount_in: Amount, tokens_out: Amount) -> Result<()> {
        let new_currency = self
            .currency_reserve
            .checked_add(&amount_in)
            .ok_or(EngineError::Overflow("currency reserve update"))?;
        let new_token = self
            .token_reserve
            .checked_sub(&tokens_out)
            .ok_or(EngineError::Underflow("token reserve update"))?;
        let new_collected = self
            .total_collected
            .checked_add(&amount_in)
            .ok_or(EngineError::Overflow("collected funds update"))?;

        self.currency_reserve = new_currency;
        self.token_reserve = new_token;
        self.total_collected = new_collected;
        Ok(())
    }

    /// Applies an accepted sell: tokens return to the reserve, the quoted
    /// currency leaves it. The collected balance is untouched — payouts
    /// happen later, through the withdrawal queue.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Overflow`] / [`EngineError::Underflow`] if
    /// the update does not fit.
    pub(crate) fn apply_sell(&mut self, tokens_in: Amount, amount_out: Amount) -> Result<()> {
        let new_token = self
            .token_reserve
            .checked_add(&tokens_in)
            .ok_or(EngineError::Overflow("token reserve update"))?;
        let new_currency = self
            .currency_reserve
            .checked_sub(&amount_out)
            .ok_or(EngineError::Underflow("currency reserve update"))?;

        self.token_reserve = new_token;
        self.currency_reserve = new_currency;
        Ok(())
    }

    /// Debits the on-hand balance for a withdrawal payout, an emergency
    /// sweep, or the migration hand-over.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientFunds`] if the balance cannot
    /// cover `amount`.
    pub(crate) fn debit_collected(&mut self, amount: Amount) -> Result<()> {
        self.total_collected = self
            .total_collected
            .checked_sub(&amount)
            .ok_or(EngineError::InsufficientFunds)?;
        Ok(())
    }
}

impl fmt::Display for ReserveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ReserveState(token={}, currency={}, collected={})",
            self.token_reserve, self.currency_reserve, self.total_collected
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn seeded() -> ReserveState {
        let Ok(r) = ReserveState::new(Amount::new(15_500_000_000), Amount::new(100_000)) else {
            panic!("valid reserves");
        };
        r
    }

    #[test]
    fn zero_seed_rejected() {
        assert!(ReserveState::new(Amount::ZERO, Amount::new(1)).is_err());
        assert!(ReserveState::new(Amount::new(1), Amount::ZERO).is_err());
    }

    #[test]
    fn buy_moves_both_reserves_and_collects() {
        let mut r = seeded();
        let Ok(()) = r.apply_buy(Amount::new(100), Amount::new(15_500_000)) else {
            panic!("expected Ok");
        };
        assert_eq!(r.currency_reserve(), Amount::new(100_100));
        assert_eq!(r.token_reserve(), Amount::new(15_484_500_000));
        assert_eq!(r.total_collected(), Amount::new(100));
    }

    #[test]
    fn sell_moves_both_reserves_not_collected() {
        let mut r = seeded();
        let Ok(()) = r.apply_sell(Amount::new(1_000), Amount::new(50)) else {
            panic!("expected Ok");
        };
        assert_eq!(r.token_reserve(), Amount::new(15_500_001_000));
        assert_eq!(r.currency_reserve(), Amount::new(99_950));
        assert_eq!(r.total_collected(), Amount::ZERO);
    }

    #[test]
    fn buy_underflow_leaves_state_untouched() {
        let mut r = seeded();
        let before = r;
        assert!(r
            .apply_buy(Amount::new(1), Amount::new(u128::MAX))
            .is_err());
        assert_eq!(r, before);
    }

    #[test]
    fn debit_requires_funds() {
        let mut r = seeded();
        assert_eq!(
            r.debit_collected(Amount::new(1)),
            Err(EngineError::InsufficientFunds)
        );
        let Ok(()) = r.apply_buy(Amount::new(500), Amount::new(1)) else {
            panic!("expected Ok");
        };
        let Ok(()) = r.debit_collected(Amount::new(200)) else {
            panic!("expected Ok");
        };
        assert_eq!(r.total_collected(), Amount::new(300));
    }
}
