//! Injected fungible-ledger capability.

use core::fmt;

use crate::domain::{AccountId, Amount};

/// Error reported by a [`TokenLedger`] implementation.
///
/// Carries a static reason so the engine can surface it inside
/// [`EngineError::LedgerFailure`](crate::error::EngineError::LedgerFailure)
/// without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerError(&'static str);

impl LedgerError {
    /// Creates a ledger error with a static reason.
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

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ledger error: {}", self.0)
    }
}

/// Narrow view of the fungible-ledger primitive the engine composes with.
///
/// The engine is the only minter and burner for its token, but the ledger
/// owns the bookkeeping: balances, allowances, and the total-supply
/// invariant (total issued never exceeds the engine's configured cap —
/// the engine's capacity guard enforces this before ever calling `mint`).
///
/// All mutating methods return an explicit `Result`; the engine never
/// relies on unwinding for rollback. When a ledger call fails mid-trade,
/// the engine issues explicit compensating calls for anything it already
/// did.
pub trait TokenLedger {
    /// Mints `amount` new tokens to `to`.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the ledger rejects the mint.
    fn mint(&mut self, to: AccountId, amount: Amount) -> Result<(), LedgerError>;

    /// Burns `amount` tokens from `from`.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if `from` does not hold `amount`.
    fn burn(&mut self, from: AccountId, amount: Amount) -> Result<(), LedgerError>;

    /// Returns the token balance of `account`.
    fn balance_of(&self, account: AccountId) -> Amount;

    /// Transfers `amount` tokens between accounts.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if `from` does not hold `amount`.
    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount)
        -> Result<(), LedgerError>;

    /// Sets `spender`'s allowance over `owner`'s tokens to exactly
    /// `amount` (not additive).
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the ledger rejects the approval.
    fn approve(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_reason_round_trip() {
        let err = LedgerError::new("mint rejected");
        assert_eq!(err.reason(), "mint rejected");
        assert_eq!(format!("{err}"), "ledger error: mint rejected");
    }
}
