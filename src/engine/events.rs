//! Typed notifications emitted by committed calls.

use crate::domain::{AccountId, Amount, TradeKind};

/// A notification the engine buffers when a call commits.
///
/// The buffer is drained by the host through
/// [`CurveEngine::take_events`](crate::engine::CurveEngine::take_events).
/// The only delivery guarantee is *emitted iff the enclosing call
/// committed*: a call that fails — including a buy whose migration was
/// rolled back — leaves no trace in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineEvent {
    /// An accepted buy or sell.
    TradeExecuted {
        /// The trading account.
        account: AccountId,
        /// Trade direction.
        kind: TradeKind,
        /// Currency in (buy) or tokens in (sell).
        amount_in: Amount,
        /// Tokens out (buy) or queued currency (sell).
        amount_out: Amount,
    },
    /// Reserve state after an accepted trade.
    ReservesUpdated {
        /// Token-side virtual reserve.
        token_reserve: Amount,
        /// Currency-side virtual reserve.
        currency_reserve: Amount,
    },
    /// A sell queued a currency credit.
    WithdrawalQueued {
        /// The credited account.
        account: AccountId,
        /// The credit added by this sell.
        amount: Amount,
    },
    /// A queued credit was paid out in full.
    WithdrawalPaid {
        /// The paid account.
        account: AccountId,
        /// The full credit that was paid.
        amount: Amount,
    },
    /// The one-way migration completed.
    MigrationCompleted {
        /// The venue pool now holding the liquidity.
        pool: AccountId,
        /// Currency handed to the venue.
        currency_amount: Amount,
        /// Tokens handed to the venue.
        token_amount: Amount,
    },
    /// Emergency mode was toggled.
    EmergencyModeSet {
        /// The new mode.
        enabled: bool,
    },
    /// The collected balance was swept by the privileged path.
    EmergencyWithdrawal {
        /// Sweep recipient.
        to: AccountId,
        /// Amount swept.
        amount: Amount,
    },
    /// The tunable parameters changed.
    ParametersUpdated {
        /// New price-impact limit (percent).
        price_impact_limit: u8,
        /// New curve factor (percent).
        curve_factor: u32,
    },
    /// The admin set a new social impact score.
    SocialImpactUpdated {
        /// The new score, in `0..=100`.
        score: u64,
    },
}
