//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use ember_curve::prelude::*;
//! ```

pub use crate::config::{CurveKind, RateLimit, SaleConfig, TradeBounds};
pub use crate::domain::{
    AccountId, Amount, BasisPoints, ReserveState, Rounding, Timestamp, TradeKind, TradeReceipt,
};
pub use crate::engine::{AdminCap, CurveEngine, EngineEvent, GrowthMetrics, MigrationState};
pub use crate::error::{EngineError, Result};
pub use crate::traits::{LiquidityVenue, PricingCurve, TokenLedger, Treasury};
