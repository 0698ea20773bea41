//! Outcome of a trade.

use core::fmt;

use super::Amount;
use crate::error::EngineError;

/// Direction of a trade through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TradeKind {
    /// Currency in, tokens issued.
    Buy,
    /// Tokens burned, currency credit queued.
    Sell,
}

/// The outcome of an accepted buy or sell.
///
/// # Invariants
///
/// - `amount_in > 0` and `amount_out > 0` — a trade that moves nothing is
///   rejected before a receipt exists.
/// - `triggered_migration` is only ever `true` on a [`TradeKind::Buy`].
///
/// # Examples
///
/// ```
/// use ember_curve::domain::{Amount, TradeKind, TradeReceipt};
///
/// let r = TradeReceipt::new(TradeKind::Buy, Amount::new(100), Amount::new(15_190_000), false);
/// assert!(r.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradeReceipt {
    kind: TradeKind,
    amount_in: Amount,
    amount_out: Amount,
    triggered_migration: bool,
}

impl TradeReceipt {
    /// Creates a new `TradeReceipt` with validated invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAmount`] if either amount is zero, or
    /// if a sell claims to have triggered migration.
    pub const fn new(
        kind: TradeKind,
        amount_in: Amount,
        amount_out: Amount,
        triggered_migration: bool,
    ) -> crate::error::Result<Self> {
        if amount_in.is_zero() {
            return Err(EngineError::InvalidAmount("receipt amount_in is zero"));
        }
        if amount_out.is_zero() {
            return Err(EngineError::InvalidAmount("receipt amount_out is zero"));
        }
        if triggered_migration && matches!(kind, TradeKind::Sell) {
            return Err(EngineError::InvalidAmount(
                "sell cannot trigger migration",
            ));
        }
        Ok(Self {
            kind,
            amount_in,
            amount_out,
            triggered_migration,
        })
    }

    /// Returns the trade direction.
    pub const fn kind(&self) -> TradeKind {
        self.kind
    }

    /// Returns the input amount (currency for a buy, tokens for a sell).
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Returns the output amount (tokens for a buy, queued currency for a
    /// sell).
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Returns `true` if this buy pushed issued supply over the migration
    /// threshold and the instance migrated within the same call.
    #[must_use]
    pub const fn triggered_migration(&self) -> bool {
        self.triggered_migration
    }
}

impl fmt::Display for TradeReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TradeKind::Buy => "buy",
            TradeKind::Sell => "sell",
        };
        write!(
            f,
            "TradeReceipt({kind}, in={}, out={}, migrated={})",
            self.amount_in, self.amount_out, self.triggered_migration
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn valid_receipt() {
        let Ok(r) = TradeReceipt::new(TradeKind::Buy, Amount::new(100), Amount::new(99), false)
        else {
            panic!("expected Ok");
        };
        assert_eq!(r.kind(), TradeKind::Buy);
        assert_eq!(r.amount_in(), Amount::new(100));
        assert_eq!(r.amount_out(), Amount::new(99));
        assert!(!r.triggered_migration());
    }

    #[test]
    fn zero_amounts_rejected() {
        assert!(TradeReceipt::new(TradeKind::Buy, Amount::ZERO, Amount::new(1), false).is_err());
        assert!(TradeReceipt::new(TradeKind::Sell, Amount::new(1), Amount::ZERO, false).is_err());
    }

    #[test]
    fn sell_cannot_trigger_migration() {
        assert!(TradeReceipt::new(TradeKind::Sell, Amount::new(1), Amount::new(1), true).is_err());
    }

    #[test]
    fn display() {
        let Ok(r) = TradeReceipt::new(TradeKind::Sell, Amount::new(10), Amount::new(5), false)
        else {
            panic!("expected Ok");
        };
        assert_eq!(format!("{r}"), "TradeReceipt(sell, in=10, out=5, migrated=false)");
    }
}
