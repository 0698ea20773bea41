//! Basis-point representation for percentages.

use core::fmt;

use super::{Amount, Rounding};
use crate::error::EngineError;

/// Maximum value that represents 100%.
const MAX_BPS: u32 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Used for the reserve-buffer fraction: the buffer a trade must leave
/// behind is `token_reserve * buffer_bps / 10_000`.
///
/// All `u32` values are technically valid, but values above 10 000 are
/// nonsensical as percentages. Use [`is_valid_percent`](Self::is_valid_percent)
/// to check.
///
/// # Examples
///
/// ```
/// use ember_curve::domain::BasisPoints;
///
/// let buffer = BasisPoints::new(1_000); // 10%
/// assert!(buffer.is_valid_percent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is in the valid percentage range (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Computes `amount * (self / 10_000)` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Overflow`] if the intermediate multiplication
    /// overflows.
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        let bps = self.0 as u128;
        let raw = amount.get();

        let product = match raw.checked_mul(bps) {
            Some(v) => v,
            None => return Err(EngineError::Overflow("basis points apply overflow")),
        };

        let divisor = MAX_BPS as u128;

        match rounding {
            Rounding::Down => Ok(Amount::new(product / divisor)),
            Rounding::Up => {
                // Ceiling: (product + divisor - 1) / divisor. The addend is
                // small, so overflow is only possible when product is within
                // 10_000 of u128::MAX.
                match product.checked_add(divisor - 1) {
                    Some(n) => Ok(Amount::new(n / divisor)),
                    None => {
                        let q = product / divisor;
                        let r = product % divisor;
                        if r != 0 {
                            Ok(Amount::new(q + 1))
                        } else {
                            Ok(Amount::new(q))
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
