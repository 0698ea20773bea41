//! Immutable sale blueprint and the runtime-tunable parameter set.

use crate::domain::{Amount, BasisPoints, Timestamp};
use crate::error::{EngineError, Result};

/// Hard ceiling for the price-impact limit, in whole percent. The
/// privileged update entry point can tune the limit but never past this.
pub const HARD_IMPACT_CEILING: u8 = 20;

/// Permitted range for the linear family's curve factor (percent scalar,
/// neutral = 100).
const CURVE_FACTOR_RANGE: core::ops::RangeInclusive<u32> = 10..=1_000;

/// Which pricing family an engine instance quotes with.
///
/// The choice is fixed at construction; the two families produce
/// materially different quotes for the same reserves and are never mixed
/// at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveKind {
    /// Squared log2 delta of the currency reserve.
    #[cfg(feature = "logarithmic")]
    Logarithmic,
    /// Constant reserve ratio with growth multiplier, user dampening and
    /// the tunable curve factor.
    #[cfg(feature = "linear")]
    Linear,
}

impl CurveKind {
    /// The reserve-buffer fraction this family ships with: the
    /// logarithmic family retains a fixed 10%, the linear family a
    /// tighter 5%.
    #[must_use]
    pub const fn default_buffer(&self) -> BasisPoints {
        match self {
            #[cfg(feature = "logarithmic")]
            Self::Logarithmic => BasisPoints::new(1_000),
            #[cfg(feature = "linear")]
            Self::Linear => BasisPoints::new(500),
        }
    }
}

/// Per-trade size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeBounds {
    min: Amount,
    max: Amount,
}

impl TradeBounds {
    /// Creates trade bounds.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if `min` is zero or
    /// exceeds `max`.
    pub const fn new(min: Amount, max: Amount) -> Result<Self> {
        if min.is_zero() {
            return Err(EngineError::InvalidConfiguration(
                "minimum trade must be non-zero",
            ));
        }
        if min.get() > max.get() {
            return Err(EngineError::InvalidConfiguration(
                "minimum trade exceeds maximum trade",
            ));
        }
        Ok(Self { min, max })
    }

    /// Returns the minimum trade size.
    #[must_use]
    pub const fn min(&self) -> Amount {
        self.min
    }

    /// Returns the maximum trade size.
    #[must_use]
    pub const fn max(&self) -> Amount {
        self.max
    }
}

/// Fixed-window rate limit: at most `quota` trades per `window_secs`
/// window per account.
///
/// This is deliberately a fixed window, not a sliding one — a burst
/// straddling a window boundary can reach `2 * quota - 1` trades. That
/// boundary behavior is part of the contract and is what the tests
/// assert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateLimit {
    window_secs: u64,
    quota: u32,
}

impl RateLimit {
    /// Creates a rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if the window or the
    /// quota is zero.
    pub const fn new(window_secs: u64, quota: u32) -> Result<Self> {
        if window_secs == 0 {
            return Err(EngineError::InvalidConfiguration(
                "rate limit window must be non-zero",
            ));
        }
        if quota == 0 {
            return Err(EngineError::InvalidConfiguration(
                "rate limit quota must be non-zero",
            ));
        }
        Ok(Self { window_secs, quota })
    }

    /// Returns the window length in seconds.
    #[must_use]
    pub const fn window_secs(&self) -> u64 {
        self.window_secs
    }

    /// Returns the per-window trade quota.
    #[must_use]
    pub const fn quota(&self) -> u32 {
        self.quota
    }
}

/// Immutable blueprint for one engine instance.
///
/// Everything here is fixed at construction; the only values that can
/// move afterwards live in [`MutableParams`] and change exclusively
/// through the privileged update entry point.
///
/// # Validation
///
/// - `migration_threshold < total_supply_cap`
/// - both initial reserves non-zero
/// - price-impact limit in `1..=20`
/// - reserve buffer a valid percentage strictly below 100%
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaleConfig {
    curve: CurveKind,
    total_supply_cap: Amount,
    initial_token_reserve: Amount,
    initial_currency_reserve: Amount,
    migration_threshold: Amount,
    migration_fee: Amount,
    bounds: TradeBounds,
    price_impact_limit: u8,
    rate_limit: RateLimit,
    active_user_cap: Option<u64>,
    reserve_buffer: BasisPoints,
}

impl SaleConfig {
    /// Creates a new `SaleConfig`.
    ///
    /// # Errors
    ///
    /// Propagates any failed invariant from [`validate`](Self::validate).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        curve: CurveKind,
        total_supply_cap: Amount,
        initial_token_reserve: Amount,
        initial_currency_reserve: Amount,
        migration_threshold: Amount,
        migration_fee: Amount,
        bounds: TradeBounds,
        price_impact_limit: u8,
        rate_limit: RateLimit,
        active_user_cap: Option<u64>,
        reserve_buffer: BasisPoints,
    ) -> Result<Self> {
        let config = Self {
            curve,
            total_supply_cap,
            initial_token_reserve,
            initial_currency_reserve,
            migration_threshold,
            migration_fee,
            bounds,
            price_impact_limit,
            rate_limit,
            active_user_cap,
            reserve_buffer,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] naming the first
    /// violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.initial_token_reserve.is_zero() {
            return Err(EngineError::InvalidConfiguration(
                "initial token reserve must be non-zero",
            ));
        }
        if self.initial_currency_reserve.is_zero() {
            return Err(EngineError::InvalidConfiguration(
                "initial currency reserve must be non-zero",
            ));
        }
        if self.migration_threshold.get() >= self.total_supply_cap.get() {
            return Err(EngineError::InvalidConfiguration(
                "migration threshold must be below the supply cap",
            ));
        }
        if self.price_impact_limit == 0 || self.price_impact_limit > HARD_IMPACT_CEILING {
            return Err(EngineError::InvalidConfiguration(
                "price impact limit outside 1..=20",
            ));
        }
        if !self.reserve_buffer.is_valid_percent()
            || self.reserve_buffer >= BasisPoints::MAX_PERCENT
        {
            return Err(EngineError::InvalidConfiguration(
                "reserve buffer must be below 100%",
            ));
        }
        Ok(())
    }

    /// Returns the pricing family.
    #[must_use]
    pub const fn curve(&self) -> CurveKind {
        self.curve
    }

    /// Returns the total supply cap.
    pub const fn total_supply_cap(&self) -> Amount {
        self.total_supply_cap
    }

    /// Returns the initial token-side reserve.
    pub const fn initial_token_reserve(&self) -> Amount {
        self.initial_token_reserve
    }

    /// Returns the initial currency-side reserve.
    pub const fn initial_currency_reserve(&self) -> Amount {
        self.initial_currency_reserve
    }

    /// Returns the issued-supply threshold that triggers migration.
    pub const fn migration_threshold(&self) -> Amount {
        self.migration_threshold
    }

    /// Returns the fixed fee retained from the balance at migration.
    pub const fn migration_fee(&self) -> Amount {
        self.migration_fee
    }

    /// Returns the per-trade size bounds.
    #[must_use]
    pub const fn bounds(&self) -> TradeBounds {
        self.bounds
    }

    /// Returns the configured (initial) price-impact limit in percent.
    #[must_use]
    pub const fn price_impact_limit(&self) -> u8 {
        self.price_impact_limit
    }

    /// Returns the rate limit.
    #[must_use]
    pub const fn rate_limit(&self) -> RateLimit {
        self.rate_limit
    }

    /// Returns the active-user cap, if this instance enforces one.
    #[must_use]
    pub const fn active_user_cap(&self) -> Option<u64> {
        self.active_user_cap
    }

    /// Returns the reserve-buffer fraction each trade must leave behind.
    #[must_use]
    pub const fn reserve_buffer(&self) -> BasisPoints {
        self.reserve_buffer
    }
}

/// The runtime-tunable parameter set.
///
/// Seeded from [`SaleConfig`] at engine construction and mutated only by
/// the privileged update entry point, which records every change in the
/// engine's audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutableParams {
    price_impact_limit: u8,
    curve_factor: u32,
}

impl MutableParams {
    /// Seeds the tunable set from the immutable config, with a neutral
    /// curve factor.
    #[must_use]
    pub const fn from_config(config: &SaleConfig) -> Self {
        Self {
            price_impact_limit: config.price_impact_limit(),
            curve_factor: 100,
        }
    }

    /// Returns the current price-impact limit in percent.
    #[must_use]
    pub const fn price_impact_limit(&self) -> u8 {
        self.price_impact_limit
    }

    /// Returns the current curve factor (percent, neutral = 100).
    #[must_use]
    pub const fn curve_factor(&self) -> u32 {
        self.curve_factor
    }

    /// Applies a parameter update.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScore`] if the new impact limit is
    /// zero or above [`HARD_IMPACT_CEILING`], or the curve factor is
    /// outside `10..=1000`.
    pub fn update(&mut self, price_impact_limit: u8, curve_factor: u32) -> Result<()> {
        if price_impact_limit == 0 || price_impact_limit > HARD_IMPACT_CEILING {
            return Err(EngineError::InvalidScore);
        }
        if !CURVE_FACTOR_RANGE.contains(&curve_factor) {
            return Err(EngineError::InvalidScore);
        }
        self.price_impact_limit = price_impact_limit;
        self.curve_factor = curve_factor;
        Ok(())
    }
}

/// One entry in the parameter audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterChange {
    at: Timestamp,
    price_impact_limit: u8,
    curve_factor: u32,
}

impl ParameterChange {
    /// Records the values a privileged update set, and when.
    #[must_use]
    pub const fn new(at: Timestamp, price_impact_limit: u8, curve_factor: u32) -> Self {
        Self {
            at,
            price_impact_limit,
            curve_factor,
        }
    }

    /// Returns when the change was applied.
    #[must_use]
    pub const fn at(&self) -> Timestamp {
        self.at
    }

    /// Returns the price-impact limit that was set.
    #[must_use]
    pub const fn price_impact_limit(&self) -> u8 {
        self.price_impact_limit
    }

    /// Returns the curve factor that was set.
    #[must_use]
    pub const fn curve_factor(&self) -> u32 {
        self.curve_factor
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn bounds() -> TradeBounds {
        let Ok(b) = TradeBounds::new(Amount::new(10), Amount::new(10_000)) else {
            panic!("valid bounds");
        };
        b
    }

    fn rate() -> RateLimit {
        let Ok(r) = RateLimit::new(3_600, 5) else {
            panic!("valid rate limit");
        };
        r
    }

    #[cfg(feature = "linear")]
    fn linear_config() -> SaleConfig {
        let Ok(cfg) = SaleConfig::new(
            CurveKind::Linear,
            Amount::new(1_000_000_000),
            Amount::new(800_000_000),
            Amount::new(100_000),
            Amount::new(700_000_000),
            Amount::new(500),
            bounds(),
            10,
            rate(),
            Some(100),
            CurveKind::Linear.default_buffer(),
        ) else {
            panic!("valid config");
        };
        cfg
    }

    #[test]
    fn bounds_reject_zero_min() {
        assert!(TradeBounds::new(Amount::ZERO, Amount::new(10)).is_err());
    }

    #[test]
    fn bounds_reject_inverted() {
        assert!(TradeBounds::new(Amount::new(11), Amount::new(10)).is_err());
    }

    #[test]
    fn rate_limit_rejects_zeroes() {
        assert!(RateLimit::new(0, 5).is_err());
        assert!(RateLimit::new(60, 0).is_err());
    }

    #[cfg(feature = "linear")]
    #[test]
    fn valid_config_accepted() {
        let cfg = linear_config();
        assert_eq!(cfg.curve(), CurveKind::Linear);
        assert_eq!(cfg.reserve_buffer(), BasisPoints::new(500));
        assert_eq!(cfg.active_user_cap(), Some(100));
    }

    #[cfg(feature = "linear")]
    #[test]
    fn threshold_must_be_below_cap() {
        let result = SaleConfig::new(
            CurveKind::Linear,
            Amount::new(1_000),
            Amount::new(800),
            Amount::new(100),
            Amount::new(1_000),
            Amount::ZERO,
            bounds(),
            10,
            rate(),
            None,
            BasisPoints::new(500),
        );
        assert!(result.is_err());
    }

    #[cfg(feature = "linear")]
    #[test]
    fn impact_limit_ceiling_enforced() {
        let result = SaleConfig::new(
            CurveKind::Linear,
            Amount::new(1_000_000),
            Amount::new(800_000),
            Amount::new(100),
            Amount::new(700_000),
            Amount::ZERO,
            bounds(),
            HARD_IMPACT_CEILING + 1,
            rate(),
            None,
            BasisPoints::new(500),
        );
        assert!(result.is_err());
    }

    #[cfg(feature = "logarithmic")]
    #[test]
    fn default_buffers_differ_by_family() {
        assert_eq!(
            CurveKind::Logarithmic.default_buffer(),
            BasisPoints::new(1_000)
        );
    }

    #[cfg(feature = "linear")]
    #[test]
    fn mutable_params_update_and_bounds() {
        let cfg = linear_config();
        let mut params = MutableParams::from_config(&cfg);
        assert_eq!(params.price_impact_limit(), 10);
        assert_eq!(params.curve_factor(), 100);

        let Ok(()) = params.update(15, 250) else {
            panic!("expected Ok");
        };
        assert_eq!(params.price_impact_limit(), 15);
        assert_eq!(params.curve_factor(), 250);

        assert_eq!(params.update(21, 100), Err(EngineError::InvalidScore));
        assert_eq!(params.update(10, 5), Err(EngineError::InvalidScore));
        // Failed updates leave the params untouched.
        assert_eq!(params.price_impact_limit(), 15);
    }
}
