//! Logarithmic curve family.
//!
//! Issues tokens against the *squared* log2 delta of the currency
//! reserve:
//!
//! ```text
//! Δ          = log2(currency_reserve + amount_in) − log2(currency_reserve)
//! tokens_out = token_reserve × Δ² / WAD²
//! ```
//!
//! and redeems against the plain log2 delta of the token reserve:
//!
//! ```text
//! Δ          = log2(token_reserve + token_amount) − log2(token_reserve)
//! amount_out = currency_reserve × Δ / WAD
//! ```
//!
//! The squaring makes early deposits cheap and late deposits steep: the
//! first doubling of the currency reserve moves the quote by a full
//! squared bit, later deposits by progressively less.

use crate::domain::{Amount, ReserveState, Rounding};
use crate::error::{EngineError, Result};
use crate::math::{log2_wad, CheckedArithmetic, WAD};
use crate::traits::{CurveContext, PricingCurve};

/// The logarithmic pricing family.
///
/// Stateless: every quote is a pure function of the reserve snapshot.
/// The [`CurveContext`] is accepted for trait uniformity and ignored —
/// growth multipliers belong to the linear family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogarithmicCurve;

impl LogarithmicCurve {
    /// log2 delta between `base + added` and `base`, at WAD scale.
    fn log_delta(base: u128, added: u128) -> Result<u128> {
        let after = base
            .checked_add(added)
            .ok_or(EngineError::Overflow("reserve grows past u128"))?;
        let hi = log2_wad(after)?;
        let lo = log2_wad(base)?;
        // log2 is monotonic, so hi >= lo always holds here.
        Ok(hi - lo)
    }
}

impl PricingCurve for LogarithmicCurve {
    fn purchase_return(
        &self,
        reserves: &ReserveState,
        amount_in: Amount,
        _ctx: &CurveContext,
    ) -> Result<Amount> {
        if amount_in.is_zero() {
            return Err(EngineError::InvalidAmount("zero deposit"));
        }
        if reserves.token_reserve().is_zero() {
            return Err(EngineError::InvalidAmount("token reserve is empty"));
        }

        let delta = Self::log_delta(reserves.currency_reserve().get(), amount_in.get())?;

        // token_reserve × Δ² / WAD², associated as ((t·Δ)/WAD·Δ)/WAD to
        // keep intermediates inside u128 for realistic reserves.
        let wad = Amount::new(WAD);
        let delta = Amount::new(delta);
        let tokens_out = reserves
            .token_reserve()
            .safe_mul(&delta)?
            .safe_div(&wad, Rounding::Down)?
            .safe_mul(&delta)?
            .safe_div(&wad, Rounding::Down)?;

        if tokens_out.is_zero() || tokens_out >= reserves.token_reserve() {
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

        let delta = Self::log_delta(reserves.token_reserve().get(), token_amount.get())?;

        let amount_out = reserves
            .currency_reserve()
            .safe_mul(&Amount::new(delta))?
            .safe_div(&Amount::new(WAD), Rounding::Down)?;

        // Never promise more currency than the reserve holds.
        Ok(amount_out.min(reserves.currency_reserve()))
    }

    fn spot_price_wad(&self, reserves: &ReserveState) -> Result<Amount> {
        reserves
            .currency_reserve()
            .safe_mul(&Amount::new(WAD))?
            .safe_div(&reserves.token_reserve(), Rounding::Down)
    }
}
