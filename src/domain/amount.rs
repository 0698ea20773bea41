//! Raw asset amount with checked arithmetic.

use core::fmt;

use super::Rounding;

/// A raw quantity of either side of the curve — issued tokens or native
/// currency — in the smallest indivisible unit.
///
/// `Amount` carries no decimal interpretation; the engine's reserves,
/// quotes and ledger calls all operate on raw units. All `u128` values are
/// valid amounts.
///
/// Arithmetic methods are checked: they return `None` on overflow,
/// underflow, or division by zero instead of panicking. The engine maps
/// `None` to specific [`EngineError`](crate::error::EngineError) variants
/// through [`CheckedArithmetic`](crate::math::CheckedArithmetic).
///
/// # Examples
///
/// ```
/// use ember_curve::domain::Amount;
///
/// let deposit = Amount::new(1_000);
/// let reserve = Amount::new(15_500_000_000);
/// assert_eq!(deposit.checked_add(&reserve), Some(Amount::new(15_500_001_000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the larger of the two amounts.
    pub const fn max(self, other: Self) -> Self {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Returns the smaller of the two amounts.
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_mul(&self, other: &Self) -> Option<Self> {
        match self.0.checked_mul(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked division with explicit rounding direction.
    ///
    /// - [`Rounding::Down`]: floor division (round towards zero).
    /// - [`Rounding::Up`]: ceiling division — `(n + d - 1) / d`.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        if divisor.0 == 0 {
            return None;
        }
        match rounding {
            Rounding::Down => Some(Self(self.0 / divisor.0)),
            Rounding::Up => {
                // Ceiling division: (n + d - 1) / d.
                // divisor > 0 guarantees (divisor.0 - 1) does not underflow.
                let numerator = match self.0.checked_add(divisor.0 - 1) {
                    Some(v) => v,
                    None => {
                        // Overflow in (n + d - 1). Fall back to
                        //   ceil(n / d) = floor(n / d) + (n % d != 0)
                        let q = self.0 / divisor.0;
                        let r = self.0 % divisor.0;
                        if r != 0 {
                            return Some(Self(q + 1));
                        }
                        return Some(Self(q));
                    }
                };
                Some(Self(numerator / divisor.0))
            }
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- Construction & accessors -------------------------------------------

    #[test]
    fn new_and_get() {
        assert_eq!(Amount::new(42).get(), 42);
    }

    #[test]
    fn constants_and_default() {
        assert_eq!(Amount::ZERO.get(), 0);
        assert_eq!(Amount::MAX.get(), u128::MAX);
        assert_eq!(Amount::default(), Amount::ZERO);
    }

    #[test]
    fn is_zero() {
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::new(1).is_zero());
    }

    #[test]
    fn min_max() {
        let a = Amount::new(10);
        let b = Amount::new(20);
        assert_eq!(a.max(b), b);
        assert_eq!(a.min(b), a);
        assert_eq!(a.max(a), a);
    }

    // -- Checked arithmetic --------------------------------------------------

    #[test]
    fn add_and_overflow() {
        let a = Amount::new(100);
        assert_eq!(a.checked_add(&Amount::new(200)), Some(Amount::new(300)));
        assert_eq!(Amount::MAX.checked_add(&Amount::new(1)), None);
    }

    #[test]
    fn sub_and_underflow() {
        let a = Amount::new(300);
        assert_eq!(a.checked_sub(&Amount::new(100)), Some(Amount::new(200)));
        assert_eq!(Amount::new(1).checked_sub(&Amount::new(2)), None);
    }

    #[test]
    fn mul_and_overflow() {
        let a = Amount::new(100);
        assert_eq!(a.checked_mul(&Amount::new(200)), Some(Amount::new(20_000)));
        assert_eq!(Amount::MAX.checked_mul(&Amount::new(2)), None);
    }

    #[test]
    fn div_rounding() {
        let a = Amount::new(10);
        let d = Amount::new(3);
        assert_eq!(a.checked_div(&d, Rounding::Down), Some(Amount::new(3)));
        assert_eq!(a.checked_div(&d, Rounding::Up), Some(Amount::new(4)));
    }

    #[test]
    fn div_by_zero() {
        let a = Amount::new(100);
        assert_eq!(a.checked_div(&Amount::ZERO, Rounding::Down), None);
        assert_eq!(a.checked_div(&Amount::ZERO, Rounding::Up), None);
    }

    #[test]
    fn div_max_round_up_overflow_path() {
        // u128::MAX / 2 with remainder exercises the (n + d - 1) overflow
        // fallback in ceiling division.
        let a = Amount::MAX;
        let d = Amount::new(2);
        let floor = u128::MAX / 2;
        assert_eq!(a.checked_div(&d, Rounding::Down), Some(Amount::new(floor)));
        assert_eq!(a.checked_div(&d, Rounding::Up), Some(Amount::new(floor + 1)));
    }

    // -- Display -------------------------------------------------------------

    #[test]
    fn display_raw_units() {
        assert_eq!(format!("{}", Amount::new(15_500_000)), "15500000");
    }
}
