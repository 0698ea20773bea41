//! Checked arithmetic trait for domain wrapper types.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, EngineError>`](crate::error::EngineError)
//! instead of panicking on overflow, underflow, or division by zero.

use crate::domain::{Amount, Rounding};
use crate::error::{EngineError, Result};

/// Fallible arithmetic for domain wrapper types.
///
/// Every method returns [`Result<Self>`] with a specific error variant so
/// callers can distinguish overflow from underflow from division by zero.
///
/// # Contract
///
/// - **No panics** — all error conditions produce `Err`.
/// - **No saturation** — saturation hides bugs; errors propagate instead.
/// - Implementations must delegate to the inner type's checked operations.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_mul(&self, other: &Self) -> Result<Self>;

    /// Checked division with explicit [`Rounding`] direction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self> {
        self.checked_add(other)
            .ok_or(EngineError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self> {
        self.checked_sub(other)
            .ok_or(EngineError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self> {
        self.checked_mul(other)
            .ok_or(EngineError::Overflow("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self> {
        self.checked_div(other, rounding)
            .ok_or(EngineError::DivisionByZero)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn safe_add_maps_overflow() {
        assert_eq!(
            Amount::MAX.safe_add(&Amount::new(1)),
            Err(EngineError::Overflow("amount addition overflow"))
        );
        let Ok(v) = Amount::new(2).safe_add(&Amount::new(3)) else {
            panic!("expected Ok");
        };
        assert_eq!(v, Amount::new(5));
    }

    #[test]
    fn safe_sub_maps_underflow() {
        assert_eq!(
            Amount::ZERO.safe_sub(&Amount::new(1)),
            Err(EngineError::Underflow("amount subtraction underflow"))
        );
    }

    #[test]
    fn safe_mul_maps_overflow() {
        assert_eq!(
            Amount::MAX.safe_mul(&Amount::new(2)),
            Err(EngineError::Overflow("amount multiplication overflow"))
        );
    }

    #[test]
    fn safe_div_maps_zero_divisor() {
        assert_eq!(
            Amount::new(1).safe_div(&Amount::ZERO, Rounding::Down),
            Err(EngineError::DivisionByZero)
        );
        let Ok(v) = Amount::new(7).safe_div(&Amount::new(2), Rounding::Up) else {
            panic!("expected Ok");
        };
        assert_eq!(v, Amount::new(4));
    }
}
