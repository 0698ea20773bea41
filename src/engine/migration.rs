//! One-way migration into the external liquidity venue.
//!
//! States: `TRADING` → `MIGRATING` (ephemeral, inside one buy) →
//! `MIGRATED` (terminal). The transition is evaluated at the end of every
//! accepted buy, fires when issued supply reaches the configured
//! threshold, and is **all-or-nothing across the entire triggering
//! trade**: if the venue rejects the liquidity call, every ledger effect
//! is explicitly compensated here, the flag is cleared, and the enclosing
//! buy restores its own snapshot and fails.

use tracing::info;

use crate::domain::{AccountId, Amount, Rounding, Timestamp};
use crate::error::{EngineError, Result};
use crate::math::{CheckedArithmetic, WAD};
use crate::traits::{
    LiquidityRequest, LiquidityVenue, PricingCurve, TokenLedger, Treasury,
};

use super::{CurveEngine, EngineEvent};

/// Validity granted to the venue call, in seconds past the triggering
/// trade's timestamp.
const DEADLINE_GRACE_SECS: u64 = 300;

/// The persistent migration flag and its one success artifact.
///
/// `migrated` transitions false → true exactly once; the transition body
/// briefly holds it true while the venue call is in flight and clears it
/// again on failure, so an observer only ever reads a durable `true`
/// together with a recorded venue pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MigrationState {
    migrated: bool,
    venue_pair: Option<AccountId>,
}

impl MigrationState {
    pub(crate) const fn new() -> Self {
        Self {
            migrated: false,
            venue_pair: None,
        }
    }

    /// Returns `true` once the instance has durably migrated.
    #[must_use]
    pub const fn migrated(&self) -> bool {
        self.migrated
    }

    /// Returns the venue pool recorded by a successful migration.
    #[must_use]
    pub const fn venue_pair(&self) -> Option<AccountId> {
        self.venue_pair
    }
}

impl<L, T, V> CurveEngine<L, T, V>
where
    L: TokenLedger,
    T: Treasury,
    V: LiquidityVenue,
{
    /// Runs the one-shot migration transition.
    ///
    /// Sets the `migrated` flag *first* so that nothing reached from the
    /// transition body can re-trigger it, then either records the venue
    /// pool or clears the flag and propagates the failure to the
    /// triggering buy.
    pub(crate) fn run_migration(&mut self, now: Timestamp) -> Result<()> {
        self.migration.migrated = true;

        match self.migration_body(now) {
            Ok((pool, currency_amount, token_amount)) => {
                self.migration.venue_pair = Some(pool);
                info!(
                    pool = %pool,
                    currency = %currency_amount,
                    tokens = %token_amount,
                    "migration completed"
                );
                self.events.push(EngineEvent::MigrationCompleted {
                    pool,
                    currency_amount,
                    token_amount,
                });
                Ok(())
            }
            Err(err) => {
                self.migration.migrated = false;
                Err(err)
            }
        }
    }

    /// The fixed-order transition body. Returns the venue pool plus the
    /// amounts handed over.
    fn migration_body(&mut self, now: Timestamp) -> Result<(AccountId, Amount, Amount)> {
        // Currency available for migration: on-hand balance minus the
        // fixed fee, which stays behind for the platform.
        let available = self
            .reserves
            .total_collected()
            .checked_sub(&self.config.migration_fee())
            .ok_or(EngineError::InsufficientFunds)?;
        if available.is_zero() {
            return Err(EngineError::InsufficientFunds);
        }

        // Venue tokens priced at the final reserve ratio.
        let price_wad = self.curve.spot_price_wad(&self.reserves)?;
        let venue_tokens = available
            .safe_mul(&Amount::new(WAD))?
            .safe_div(&price_wad, Rounding::Down)?;
        if venue_tokens.is_zero() {
            return Err(EngineError::InvalidAmount("venue tokens round to zero"));
        }

        // The whole unsold remainder is minted to the engine's own
        // account, then the part the venue does not need is burned back.
        let remaining = self
            .config
            .total_supply_cap()
            .checked_sub(&self.issued)
            .ok_or(EngineError::ExceedsTotalSupply)?;
        let burn_gap = remaining
            .checked_sub(&venue_tokens)
            .ok_or(EngineError::ExceedsTotalSupply)?;

        self.ledger
            .mint(self.engine_account, remaining)
            .map_err(|e| EngineError::LedgerFailure(e.reason()))?;

        if !burn_gap.is_zero() {
            if let Err(e) = self.ledger.burn(self.engine_account, burn_gap) {
                self.ledger
                    .burn(self.engine_account, remaining)
                    .map_err(|c| EngineError::LedgerFailure(c.reason()))?;
                return Err(EngineError::LedgerFailure(e.reason()));
            }
        }

        if let Err(e) = self
            .ledger
            .approve(self.engine_account, self.venue_account, venue_tokens)
        {
            self.ledger
                .burn(self.engine_account, venue_tokens)
                .map_err(|c| EngineError::LedgerFailure(c.reason()))?;
            return Err(EngineError::LedgerFailure(e.reason()));
        }

        let request = LiquidityRequest::new(
            available,
            venue_tokens,
            now.saturating_add(DEADLINE_GRACE_SECS),
        );

        match self.venue.add_liquidity(&request) {
            Ok(receipt) => {
                // Sweep the migrated currency out of the collected
                // balance; the fee remains.
                self.reserves.debit_collected(available)?;
                Ok((receipt.pool(), available, venue_tokens))
            }
            Err(e) => {
                // Explicit compensation, reverse order: revoke the
                // allowance, then burn the net-minted venue tokens.
                self.ledger
                    .approve(self.engine_account, self.venue_account, Amount::ZERO)
                    .map_err(|c| EngineError::LedgerFailure(c.reason()))?;
                self.ledger
                    .burn(self.engine_account, venue_tokens)
                    .map_err(|c| EngineError::LedgerFailure(c.reason()))?;
                Err(EngineError::VenueFailure(e.reason()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_trading() {
        let s = MigrationState::new();
        assert!(!s.migrated());
        assert_eq!(s.venue_pair(), None);
    }
}
