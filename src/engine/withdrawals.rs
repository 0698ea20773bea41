//! Pull-payment withdrawal queue.
//!
//! Sells never transfer currency synchronously; they credit the caller's
//! pending balance. `withdraw` follows checks-effects-interactions: the
//! credit is zeroed *before* the outbound treasury call, and restored if
//! the call reports failure — the zeroing and the transfer commit or fail
//! as one unit. The zero-first ordering is what blocks reentrancy through
//! the outbound transfer: a re-entered `withdraw` sees no credit.

use tracing::debug;

use crate::domain::{AccountId, Amount};
use crate::error::{EngineError, Result};
use crate::traits::Treasury;

use super::{CurveEngine, EngineEvent};

impl<L, T, V> CurveEngine<L, T, V>
where
    T: Treasury,
{
    /// Pays out the caller's full queued credit.
    ///
    /// Withdrawals stay available after migration and during emergency
    /// mode — a queued entitlement outlives the trading lifecycle.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NoPendingPayments`] if nothing is queued.
    /// - [`EngineError::InsufficientFunds`] if the engine's balance is
    ///   short of the credit.
    /// - [`EngineError::TransferFailed`] if the treasury rejects the
    ///   payment; the credit is restored in full.
    pub fn withdraw(&mut self, caller: AccountId) -> Result<Amount> {
        self.locked(|engine| engine.withdraw_locked(caller))
    }

    fn withdraw_locked(&mut self, caller: AccountId) -> Result<Amount> {
        let Some(entry) = self.accounts.get_mut(&caller) else {
            return Err(EngineError::NoPendingPayments);
        };
        let owed = entry.pending_withdrawal;
        if owed.is_zero() {
            return Err(EngineError::NoPendingPayments);
        }
        if self.reserves.total_collected() < owed {
            return Err(EngineError::InsufficientFunds);
        }

        // Effects before interaction: zero the credit, then pay.
        entry.pending_withdrawal = Amount::ZERO;

        if let Err(e) = self.treasury.pay(caller, owed) {
            if let Some(entry) = self.accounts.get_mut(&caller) {
                entry.pending_withdrawal = owed;
            }
            return Err(EngineError::TransferFailed(e.reason()));
        }

        // Balance was checked above; the debit cannot fail here.
        self.reserves.debit_collected(owed)?;

        debug!(account = %caller, amount = %owed, "withdrawal paid");
        self.events.push(EngineEvent::WithdrawalPaid {
            account: caller,
            amount: owed,
        });
        Ok(owed)
    }
}
