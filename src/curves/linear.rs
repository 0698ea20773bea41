//! Linear (constant-ratio) curve family — the extended variant.
//!
//! Quotes the plain reserve ratio, then folds in three percentage
//! scalars from the [`CurveContext`]:
//!
//! ```text
//! base       = amount_in × token_reserve / currency_reserve
//! growth     = 100 + engagement_score / 10
//! dampening  = max(0, 100 − active_users × 2)
//! tokens_out = base × growth × dampening / 10_000 × curve_factor / 100
//! ```
//!
//! floored by the minimum-rate guarantee `amount_in × 100`. The guarantee
//! exists so that heavy dampening (50+ active users zeroes the scalar)
//! never quotes a participant nothing for something.
//!
//! Sales use the symmetric ratio `token_amount × currency_reserve /
//! token_reserve`, floored at `token_amount / 100` and capped at the
//! available currency reserve.

use crate::domain::{Amount, ReserveState, Rounding};
use crate::error::{EngineError, Result};
use crate::math::{CheckedArithmetic, WAD};
use crate::traits::{CurveContext, PricingCurve};

/// Combined denominator for the growth × dampening product.
const SCALAR_DENOMINATOR: u128 = 10_000;

/// Minimum tokens issued per unit of currency deposited.
const MIN_RATE: u128 = 100;

/// The linear pricing family.
///
/// Stateless; the growth inputs arrive through the [`CurveContext`] so a
/// quote here and the engine's mutating path read the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinearCurve;

impl LinearCurve {
    /// The growth multiplier percentage: `100 + engagement / 10`.
    fn growth_multiplier(ctx: &CurveContext) -> u128 {
        100u128 + u128::from(ctx.engagement_score()) / 10
    }

    /// The dampening percentage: `max(0, 100 − active_users × 2)`.
    fn dampening(ctx: &CurveContext) -> u128 {
        100u64
            .saturating_sub(ctx.active_users().saturating_mul(2))
            .into()
    }
}

impl PricingCurve for LinearCurve {
    fn purchase_return(
        &self,
        reserves: &ReserveState,
        amount_in: Amount,
        ctx: &CurveContext,
    ) -> Result<Amount> {
        if amount_in.is_zero() {
            return Err(EngineError::InvalidAmount("zero deposit"));
        }
        if reserves.token_reserve().is_zero() {
            return Err(EngineError::InvalidAmount("token reserve is empty"));
        }

        let base = amount_in
            .safe_mul(&reserves.token_reserve())?
            .safe_div(&reserves.currency_reserve(), Rounding::Down)?;

        let scaled = base
            .safe_mul(&Amount::new(Self::growth_multiplier(ctx)))?
            .safe_mul(&Amount::new(Self::dampening(ctx)))?
            .safe_div(&Amount::new(SCALAR_DENOMINATOR), Rounding::Down)?
            .safe_mul(&Amount::new(u128::from(ctx.curve_factor())))?
            .safe_div(&Amount::new(100), Rounding::Down)?;

        // Minimum-rate guarantee.
        let floor = amount_in.safe_mul(&Amount::new(MIN_RATE))?;
        let tokens_out = scaled.max(floor);

        if tokens_out >= reserves.token_reserve() {
            return Err(EngineError::InsufficientReserve);
        }
        Ok(tokens_out)
    }

    fn sale_return(
        &self,
        reserves: &ReserveState,
        token_amount: Amount,
        _ctx: &CurveContext,
    ) -> Result<Amount> {
        if token_amount.is_zero() {
            return Err(EngineError::InvalidAmount("zero sale"));
        }

        let base = token_amount
            .safe_mul(&reserves.currency_reserve())?
            .safe_div(&reserves.token_reserve(), Rounding::Down)?;

        let floor = token_amount.safe_div(&Amount::new(MIN_RATE), Rounding::Down)?;

        Ok(base.max(floor).min(reserves.currency_reserve()))
    }

    fn spot_price_wad(&self, reserves: &ReserveState) -> Result<Amount> {
        reserves
            .currency_reserve()
            .safe_mul(&Amount::new(WAD))?
            .safe_div(&reserves.token_reserve(), Rounding::Down)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn seeded(token: u128, currency: u128) -> ReserveState {
        let Ok(r) = ReserveState::new(Amount::new(token), Amount::new(currency)) else {
            panic!("valid reserves");
        };
        r
    }

    #[test]
    fn neutral_context_quotes_plain_ratio() {
        // 100 × 15.5e9 / 100_000 = 15_500_000, untouched by neutral
        // scalars and far above the 10_000 floor.
        let r = seeded(15_500_000_000, 100_000);
        let Ok(out) = LinearCurve.purchase_return(&r, Amount::new(100), &CurveContext::neutral())
        else {
            panic!("expected Ok");
        };
        assert_eq!(out, Amount::new(15_500_000));
        assert!(out < r.token_reserve());
    }

    #[test]
    fn engagement_raises_the_quote() {
        let r = seeded(15_500_000_000, 100_000);
        // 200 engagement → growth 120%.
        let ctx = CurveContext::new(200, 0, 100);
        let Ok(out) = LinearCurve.purchase_return(&r, Amount::new(100), &ctx) else {
            panic!("expected Ok");
        };
        assert_eq!(out, Amount::new(18_600_000));
    }

    #[test]
    fn dampening_lowers_the_quote() {
        let r = seeded(15_500_000_000, 100_000);
        // One active user → dampening 98%.
        let ctx = CurveContext::new(0, 1, 100);
        let Ok(out) = LinearCurve.purchase_return(&r, Amount::new(100), &ctx) else {
            panic!("expected Ok");
        };
        assert_eq!(out, Amount::new(15_190_000));
    }

    #[test]
    fn fifty_active_users_zero_the_scalar_floor_applies() {
        let r = seeded(15_500_000_000, 100_000);
        let ctx = CurveContext::new(0, 50, 100);
        let Ok(out) = LinearCurve.purchase_return(&r, Amount::new(100), &ctx) else {
            panic!("expected Ok");
        };
        // Dampening hits zero, leaving only the minimum-rate guarantee.
        assert_eq!(out, Amount::new(10_000));
    }

    #[test]
    fn curve_factor_scales_the_quote() {
        let r = seeded(15_500_000_000, 100_000);
        let ctx = CurveContext::new(0, 0, 50);
        let Ok(out) = LinearCurve.purchase_return(&r, Amount::new(100), &ctx) else {
            panic!("expected Ok");
        };
        assert_eq!(out, Amount::new(7_750_000));
    }

    #[test]
    fn depletion_guard_trips() {
        let r = seeded(1_000, 100_000);
        // Floor alone (100 × 100 = 10_000) exceeds the 1_000 reserve.
        assert_eq!(
            LinearCurve.purchase_return(&r, Amount::new(100), &CurveContext::neutral()),
            Err(EngineError::InsufficientReserve)
        );
    }

    #[test]
    fn sale_symmetric_ratio() {
        // Ratio 0.5 currency per token keeps the base quote above the
        // 1-per-100 floor, so the plain ratio is what pays out.
        let r = seeded(1_000_000, 500_000);
        let Ok(out) = LinearCurve.sale_return(&r, Amount::new(10_000), &CurveContext::neutral())
        else {
            panic!("expected Ok");
        };
        assert_eq!(out, Amount::new(5_000));
    }

    #[test]
    fn sale_floor_applies_when_ratio_collapses() {
        // currency tiny relative to tokens: ratio rounds to zero, the
        // 1-per-100 floor still pays.
        let r = seeded(1_000_000_000, 1_000);
        let Ok(out) = LinearCurve.sale_return(&r, Amount::new(10_000), &CurveContext::neutral())
        else {
            panic!("expected Ok");
        };
        assert_eq!(out, Amount::new(100));
    }

    #[test]
    fn sale_capped_at_currency_reserve() {
        let r = seeded(1_000, 500);
        let Ok(out) = LinearCurve.sale_return(&r, Amount::new(100_000), &CurveContext::neutral())
        else {
            panic!("expected Ok");
        };
        assert_eq!(out, r.currency_reserve());
    }

    #[test]
    fn quote_matches_repeated_call_bit_for_bit() {
        let r = seeded(15_500_000_000, 100_000);
        let ctx = CurveContext::new(37, 3, 140);
        let a = LinearCurve.purchase_return(&r, Amount::new(777), &ctx);
        let b = LinearCurve.purchase_return(&r, Amount::new(777), &ctx);
        assert_eq!(a, b);
    }
}
