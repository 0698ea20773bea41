//! Core abstractions: the pricing seam and the injected collaborators.
//!
//! The engine composes with its surroundings through narrow traits rather
//! than inheritance: the fungible ledger, the outbound treasury, and the
//! external liquidity venue are all injected at construction.

mod ledger;
mod pricing_curve;
mod treasury;
mod venue;

pub use ledger::{LedgerError, TokenLedger};
pub use pricing_curve::{CurveContext, PricingCurve};
pub use treasury::{TransferError, Treasury};
pub use venue::{LiquidityRequest, LiquidityVenue, VenueError, VenueReceipt};
