//! Core pricing trait implemented by every curve family.
//!
//! [`PricingCurve`] is the seam between the engine and the conversion
//! math. It covers the three pricing questions the engine asks:
//!
//! 1. **Purchase** — [`PricingCurve::purchase_return`]: currency in,
//!    tokens out.
//! 2. **Sale** — [`PricingCurve::sale_return`]: tokens in, currency out.
//! 3. **Spot** — [`PricingCurve::spot_price_wad`]: the current reserve
//!    ratio at WAD scale.
//!
//! # Quote Contract
//!
//! All implementations **must** satisfy the shared contract:
//!
//! - `purchase_return` fails with `InvalidAmount` on a zero input or a
//!   zero token reserve, and its result is strictly positive and strictly
//!   below the pre-trade token reserve — the curve is never quotable to
//!   exhaustion.
//! - `sale_return` fails with `InvalidAmount` on a zero input, and its
//!   result never exceeds the available currency reserve.
//! - Quotes are pure: calling them never mutates anything, and the
//!   engine's mutating path uses the same function, so a quote and the
//!   trade it precedes agree bit for bit.
//!
//! # Dispatch Model
//!
//! Curves are dispatched via the [`CurveBox`](crate::curves::CurveBox)
//! enum (not `dyn` trait objects), enabling static polymorphism.

use crate::domain::{Amount, ReserveState};
use crate::error::{EngineError, Result};

/// Neutral value for the percentage scalars in [`CurveContext`].
const NEUTRAL_PERCENT: u32 = 100;

/// Trade-independent inputs a curve may fold into its quote.
///
/// The logarithmic family ignores all of it; the linear family scales its
/// base ratio by the growth multiplier derived from `engagement_score`,
/// the dampening factor derived from `active_users`, and the admin-tuned
/// `curve_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveContext {
    engagement_score: u64,
    active_users: u64,
    curve_factor: u32,
}

impl CurveContext {
    /// Creates a context from the engine's current growth state.
    #[must_use]
    pub const fn new(engagement_score: u64, active_users: u64, curve_factor: u32) -> Self {
        Self {
            engagement_score,
            active_users,
            curve_factor,
        }
    }

    /// A context with no engagement, no active users, and a neutral curve
    /// factor — what a freshly constructed engine quotes with.
    #[must_use]
    pub const fn neutral() -> Self {
        Self::new(0, 0, NEUTRAL_PERCENT)
    }

    /// Returns the accumulated engagement score.
    #[must_use]
    pub const fn engagement_score(&self) -> u64 {
        self.engagement_score
    }

    /// Returns the number of active participants.
    #[must_use]
    pub const fn active_users(&self) -> u64 {
        self.active_users
    }

    /// Returns the admin-tuned curve factor (percent, neutral = 100).
    #[must_use]
    pub const fn curve_factor(&self) -> u32 {
        self.curve_factor
    }
}

impl Default for CurveContext {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Core trait for all bonding-curve pricing families.
///
/// # Implementors
///
/// - `LogarithmicCurve` — squared log2 delta of the currency reserve.
/// - `LinearCurve` — constant reserve ratio with growth multipliers.
///
/// # Errors
///
/// Methods that can fail return [`Result<T>`]. Common variants:
///
/// - [`EngineError::InvalidAmount`] — zero input or unusable reserve.
/// - [`EngineError::InsufficientReserve`] — quote would exhaust the token
///   reserve.
/// - [`EngineError::Overflow`] — intermediate arithmetic overflow.
pub trait PricingCurve {
    /// Quotes the tokens issued for a currency deposit of `amount_in`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidAmount`] if `amount_in` is zero or the
    ///   token reserve is zero.
    /// - [`EngineError::InsufficientReserve`] if the quote rounds to zero
    ///   or reaches the token reserve.
    fn purchase_return(
        &self,
        reserves: &ReserveState,
        amount_in: Amount,
        ctx: &CurveContext,
    ) -> Result<Amount>;

    /// Quotes the currency credited for selling `token_amount` back.
    ///
    /// The result is capped at the available currency reserve — a sale can
    /// drain the currency side to zero but never promise more than it
    /// holds.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidAmount`] if `token_amount` is zero.
    fn sale_return(
        &self,
        reserves: &ReserveState,
        token_amount: Amount,
        ctx: &CurveContext,
    ) -> Result<Amount>;

    /// Returns the current price — currency per token — at WAD scale.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DivisionByZero`] if the token reserve is zero.
    fn spot_price_wad(&self, reserves: &ReserveState) -> Result<Amount>;

    /// Estimates the price impact of a trade as an integer percentage of
    /// the given reserve.
    ///
    /// Computed as `trade_size * 100 / current_reserve` — the product is
    /// formed before the division so the estimate stays meaningful for
    /// reserves above 100 units.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DivisionByZero`] if `current_reserve` is zero.
    /// - [`EngineError::Overflow`] if the scaled trade size overflows.
    fn price_impact(&self, trade_size: Amount, current_reserve: Amount) -> Result<u128> {
        if current_reserve.is_zero() {
            return Err(EngineError::DivisionByZero);
        }
        let scaled = trade_size
            .get()
            .checked_mul(100)
            .ok_or(EngineError::Overflow("price impact scaling"))?;
        Ok(scaled / current_reserve.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ImpactOnly;
    impl PricingCurve for ImpactOnly {
        fn purchase_return(
            &self,
            _reserves: &ReserveState,
            _amount_in: Amount,
            _ctx: &CurveContext,
        ) -> Result<Amount> {
            Err(EngineError::InvalidAmount("unused"))
        }
        fn sale_return(
            &self,
            _reserves: &ReserveState,
            _token_amount: Amount,
            _ctx: &CurveContext,
        ) -> Result<Amount> {
            Err(EngineError::InvalidAmount("unused"))
        }
        fn spot_price_wad(&self, _reserves: &ReserveState) -> Result<Amount> {
            Err(EngineError::DivisionByZero)
        }
    }

    #[test]
    fn impact_scales_before_dividing() {
        // 5_000 against a reserve of 100_000 is 5%, which the truncating
        // divide-first form would have reported as zero.
        assert_eq!(
            ImpactOnly.price_impact(Amount::new(5_000), Amount::new(100_000)),
            Ok(5)
        );
    }

    #[test]
    fn impact_of_full_reserve_is_hundred() {
        assert_eq!(
            ImpactOnly.price_impact(Amount::new(250), Amount::new(250)),
            Ok(100)
        );
    }

    #[test]
    fn impact_zero_reserve_rejected() {
        assert_eq!(
            ImpactOnly.price_impact(Amount::new(1), Amount::ZERO),
            Err(EngineError::DivisionByZero)
        );
    }

    #[test]
    fn neutral_context() {
        let ctx = CurveContext::neutral();
        assert_eq!(ctx.engagement_score(), 0);
        assert_eq!(ctx.active_users(), 0);
        assert_eq!(ctx.curve_factor(), 100);
        assert_eq!(CurveContext::default(), ctx);
    }
}
