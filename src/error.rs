//! Unified error types for the Ember Curve engine.
//!
//! All fallible operations across the crate return [`EngineError`] as their
//! error type, ensuring a consistent error handling experience for consumers.
//!
//! The taxonomy follows four families:
//!
//! - **Validation** — zero or out-of-range amounts, malformed configuration.
//! - **State precondition** — migrated instance, rate limit, price impact,
//!   user cap, reentrancy.
//! - **Resource** — supply cap, reserve depletion, short balances, empty
//!   withdrawal queue.
//! - **External call** — failures reported by the injected ledger, treasury
//!   or liquidity venue. The engine never unwinds through these; it
//!   compensates explicitly and surfaces one of these variants.

use core::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, EngineError>;

/// Unified error enum for every fallible operation in the crate.
///
/// Arithmetic variants carry a `&'static str` describing the operation that
/// failed, so a caller can distinguish e.g. a quote overflow from a reserve
/// update overflow without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineError {
    /// Amount is zero, or the pricing input is unusable (zero reserve).
    InvalidAmount(&'static str),
    /// Trade is below the configured minimum trade size.
    AmountTooLow,
    /// Trade is above the configured maximum trade size.
    AmountTooHigh,
    /// A score or tunable parameter is outside its permitted range.
    InvalidScore,
    /// Configuration failed validation.
    InvalidConfiguration(&'static str),

    /// Trading attempted on an instance that has already migrated.
    AlreadyMigrated,
    /// A migration artifact was requested before migration happened.
    NotMigrated,
    /// Trading attempted while emergency mode is engaged.
    EmergencyPaused,
    /// Per-account fixed-window trade quota exhausted.
    ExceededRateLimit,
    /// Estimated price impact exceeds the configured ceiling.
    ExceedsPriceImpact,
    /// New participant rejected because the active-user cap is reached.
    MaxUsersReached,
    /// An entry point was re-entered while its lock was held.
    ReentrantCall,

    /// Projected supply after the trade exceeds the total supply cap.
    ExceedsTotalSupply,
    /// The trade would deplete the token reserve past its buffer.
    InsufficientReserve,
    /// Caller's ledger balance cannot cover the requested sale.
    InsufficientBalance,
    /// Engine's currency balance cannot cover the requested payout.
    InsufficientFunds,
    /// `withdraw` called with no queued credit.
    NoPendingPayments,

    /// The injected token ledger rejected a mint/burn/approve.
    LedgerFailure(&'static str),
    /// The injected treasury rejected an outbound currency transfer.
    TransferFailed(&'static str),
    /// The external liquidity venue rejected the migration call.
    VenueFailure(&'static str),

    /// Arithmetic overflow.
    Overflow(&'static str),
    /// Arithmetic underflow.
    Underflow(&'static str),
    /// Division by zero.
    DivisionByZero,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(msg) => write!(f, "invalid amount: {msg}"),
            Self::AmountTooLow => write!(f, "amount below minimum trade size"),
            Self::AmountTooHigh => write!(f, "amount exceeds maximum trade size"),
            Self::InvalidScore => write!(f, "score or parameter out of range"),
            Self::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
            Self::AlreadyMigrated => write!(f, "instance has already migrated"),
            Self::NotMigrated => write!(f, "instance has not migrated"),
            Self::EmergencyPaused => write!(f, "emergency mode is engaged"),
            Self::ExceededRateLimit => write!(f, "rate limit quota exhausted for this window"),
            Self::ExceedsPriceImpact => write!(f, "price impact exceeds the configured ceiling"),
            Self::MaxUsersReached => write!(f, "active user cap reached"),
            Self::ReentrantCall => write!(f, "reentrant call rejected"),
            Self::ExceedsTotalSupply => write!(f, "trade would exceed the total supply cap"),
            Self::InsufficientReserve => write!(f, "trade would breach the reserve buffer"),
            Self::InsufficientBalance => write!(f, "insufficient token balance"),
            Self::InsufficientFunds => write!(f, "insufficient engine currency balance"),
            Self::NoPendingPayments => write!(f, "no pending payments"),
            Self::LedgerFailure(msg) => write!(f, "ledger call failed: {msg}"),
            Self::TransferFailed(msg) => write!(f, "currency transfer failed: {msg}"),
            Self::VenueFailure(msg) => write!(f, "liquidity venue call failed: {msg}"),
            Self::Overflow(msg) => write!(f, "arithmetic overflow: {msg}"),
            Self::Underflow(msg) => write!(f, "arithmetic underflow: {msg}"),
            Self::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = EngineError::Overflow("reserve update");
        assert_eq!(format!("{err}"), "arithmetic overflow: reserve update");
    }

    #[test]
    fn variants_are_comparable() {
        assert_eq!(EngineError::AlreadyMigrated, EngineError::AlreadyMigrated);
        assert_ne!(
            EngineError::ExceededRateLimit,
            EngineError::ExceedsPriceImpact
        );
    }

    #[test]
    fn copy_semantics() {
        let a = EngineError::NoPendingPayments;
        let b = a;
        assert_eq!(a, b);
    }
}
