//! Injected wall-clock time.

use core::fmt;

/// Seconds since an arbitrary epoch.
///
/// The engine never reads a clock. Every mutating entry point takes an
/// explicit `now: Timestamp` so that liveness policies — the rate-limit
/// window, the engagement-accrual window, the migration deadline — are
/// deterministic and test-controllable. The host is responsible for
/// passing a monotonically non-decreasing value.
///
/// # Examples
///
/// ```
/// use ember_curve::domain::Timestamp;
///
/// let t0 = Timestamp::new(1_000);
/// let t1 = Timestamp::new(1_090);
/// assert_eq!(t1.elapsed_since(t0), 90);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch itself.
    pub const ZERO: Self = Self(0);

    /// Creates a `Timestamp` from raw seconds.
    #[must_use]
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the raw seconds value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since `earlier`, saturating at zero if the host
    /// handed the engine a non-monotonic clock.
    #[must_use]
    pub const fn elapsed_since(&self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Returns this timestamp advanced by `secs`, saturating at `u64::MAX`.
    #[must_use]
    pub const fn saturating_add(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
