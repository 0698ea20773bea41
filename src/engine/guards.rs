//! The ordered guard pipeline applied before any state mutation.
//!
//! Order matters and matches the trade flow: lifecycle, bounds, capacity,
//! reserve buffer, price impact, rate limit, active-user cap. Every guard
//! here is a pure check — the engine plans the post-trade values and
//! commits them only after the last guard and the external ledger call
//! have both passed.

use crate::domain::{Amount, Rounding, Timestamp};
use crate::error::{EngineError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::PricingCurve;

use super::{Account, CurveEngine};

impl<L, T, V> CurveEngine<L, T, V> {
    /// Guard 1 — lifecycle: trading is disabled once migrated or while
    /// emergency mode is engaged.
    pub(crate) fn guard_lifecycle(&self) -> Result<()> {
        if self.migration.migrated() {
            return Err(EngineError::AlreadyMigrated);
        }
        if self.emergency {
            return Err(EngineError::EmergencyPaused);
        }
        Ok(())
    }

    /// Guard 2 — bounds: `amount_in` inside the configured trade window.
    pub(crate) fn guard_bounds(&self, amount_in: Amount) -> Result<()> {
        if amount_in.is_zero() {
            return Err(EngineError::InvalidAmount("zero deposit"));
        }
        let bounds = self.config.bounds();
        if amount_in < bounds.min() {
            return Err(EngineError::AmountTooLow);
        }
        if amount_in > bounds.max() {
            return Err(EngineError::AmountTooHigh);
        }
        Ok(())
    }

    /// Guard 3 — capacity: projected issued supply stays at or below the
    /// cap. Returns the projected supply so the commit path reuses it.
    pub(crate) fn guard_capacity(&self, tokens_out: Amount) -> Result<Amount> {
        let projected = self.issued.safe_add(&tokens_out)?;
        if projected > self.config.total_supply_cap() {
            return Err(EngineError::ExceedsTotalSupply);
        }
        Ok(projected)
    }

    /// Guard 4 — reserve buffer: the post-trade token reserve must retain
    /// the configured fraction of the pre-trade reserve, so a single
    /// trade cannot starve the ones after it.
    pub(crate) fn guard_reserve_buffer(&self, tokens_out: Amount) -> Result<()> {
        let buffer = self
            .config
            .reserve_buffer()
            .apply(self.reserves.token_reserve(), Rounding::Up)?;
        let post = self
            .reserves
            .token_reserve()
            .safe_sub(&tokens_out)
            .map_err(|_| EngineError::InsufficientReserve)?;
        if post < buffer {
            return Err(EngineError::InsufficientReserve);
        }
        Ok(())
    }

    /// Guard 5 — price impact: the estimated impact of the deposit on the
    /// currency reserve stays at or below the tunable limit.
    pub(crate) fn guard_price_impact(&self, amount_in: Amount) -> Result<()> {
        let impact = self
            .curve
            .price_impact(amount_in, self.reserves.currency_reserve())?;
        if impact > u128::from(self.params.price_impact_limit()) {
            return Err(EngineError::ExceedsPriceImpact);
        }
        Ok(())
    }

    /// Guard 6 — fixed-window rate limit. Returns the action count to
    /// stamp if the trade commits.
    ///
    /// The window is anchored at the account's last accepted trade, not
    /// smoothed: a burst straddling a window boundary is accepted by
    /// design.
    pub(crate) fn plan_rate_limit(
        &self,
        account: Option<&Account>,
        now: Timestamp,
    ) -> Result<u32> {
        let Some(account) = account else {
            return Ok(1);
        };
        let window = self.config.rate_limit().window_secs();
        if now.elapsed_since(account.last_action_time) >= window {
            return Ok(1);
        }
        if account.action_count >= self.config.rate_limit().quota() {
            return Err(EngineError::ExceededRateLimit);
        }
        Ok(account.action_count + 1)
    }

    /// Guard 7 — active-user cap. Returns `true` if the trade enrolls a
    /// new active participant.
    ///
    /// Enrollment happens at most once per account and the count never
    /// decrements; an instance without a configured cap still tracks the
    /// count for the linear family's dampening scalar.
    pub(crate) fn plan_active_user(&self, account: Option<&Account>) -> Result<bool> {
        let joins = account.map_or(true, |a| !a.is_active);
        if joins {
            if let Some(cap) = self.config.active_user_cap() {
                if self.active_users >= cap {
                    return Err(EngineError::MaxUsersReached);
                }
            }
        }
        Ok(joins)
    }
}
