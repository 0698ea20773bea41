//! The sale engine: guarded pricing, pull payments, one-way migration.
//!
//! [`CurveEngine`] owns every piece of mutable state in the system —
//! reserves, the account table, migration state, growth metrics — and
//! reaches the outside world only through the injected
//! [`TokenLedger`], [`Treasury`] and [`LiquidityVenue`] seams. Privileged
//! entry points take the unforgeable [`AdminCap`] returned at
//! construction instead of checking caller identity.
//!
//! Every public entry point either fully commits or leaves no trace:
//! guards and arithmetic run against planned values first, external calls
//! happen next, and engine state is assigned last. The one multi-step
//! case — a buy whose migration fails at the venue — is unwound with
//! explicit compensating ledger calls and a snapshot restore.

mod account;
mod events;
mod guards;
mod metrics;
mod migration;
#[cfg(all(test, feature = "linear"))]
mod proptest_properties;
mod reentrancy;
mod withdrawals;

pub use account::Account;
pub use events::EngineEvent;
pub use metrics::GrowthMetrics;
pub use migration::MigrationState;

use std::collections::BTreeMap;

use tracing::{debug, info};

use metrics::GrowthTracker;
use reentrancy::ReentrancyLock;

use crate::config::{MutableParams, ParameterChange, SaleConfig};
use crate::curves::CurveBox;
use crate::domain::{
    AccountId, Amount, ReserveState, Timestamp, TradeKind, TradeReceipt,
};
use crate::error::{EngineError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::{
    CurveContext, LiquidityVenue, PricingCurve, TokenLedger, Treasury,
};

/// Unforgeable capability for the privileged entry points.
///
/// Exactly one is minted, by [`CurveEngine::new`]. It cannot be cloned or
/// constructed outside this crate; whoever holds it *is* the admin. The
/// engine itself never inspects caller identity.
#[derive(Debug)]
pub struct AdminCap {
    _private: (),
}

/// A bonding-curve token-sale engine instance.
///
/// Generic over its three collaborators:
///
/// - `L` — the fungible ledger ([`TokenLedger`])
/// - `T` — outbound currency custody ([`Treasury`])
/// - `V` — the external AMM migrated into ([`LiquidityVenue`])
///
/// # Lifecycle
///
/// An instance trades from construction until the buy that pushes issued
/// supply to the migration threshold; that buy migrates synchronously and
/// every later `buy`/`sell` fails with
/// [`EngineError::AlreadyMigrated`]. Withdrawals of queued credits remain
/// available throughout.
///
/// # Deposits
///
/// `buy` assumes the host delivered `amount_in` of native currency along
/// with the call; the engine accounts for it in its collected balance but
/// never pulls currency itself.
pub struct CurveEngine<L, T, V> {
    config: SaleConfig,
    params: MutableParams,
    audit: Vec<ParameterChange>,
    curve: CurveBox,
    reserves: ReserveState,
    accounts: BTreeMap<AccountId, Account>,
    migration: MigrationState,
    metrics: GrowthTracker,
    issued: Amount,
    active_users: u64,
    emergency: bool,
    lock: ReentrancyLock,
    events: Vec<EngineEvent>,
    ledger: L,
    treasury: T,
    venue: V,
    engine_account: AccountId,
    venue_account: AccountId,
}

impl<L, T, V> CurveEngine<L, T, V> {
    /// Creates an engine instance and mints its admin capability.
    ///
    /// `engine_account` is the ledger account the engine mints migration
    /// supply against; `venue_account` is the spender the venue uses to
    /// pull that supply.
    ///
    /// # Errors
    ///
    /// Propagates any violated invariant from [`SaleConfig::validate`].
    pub fn new(
        config: SaleConfig,
        ledger: L,
        treasury: T,
        venue: V,
        engine_account: AccountId,
        venue_account: AccountId,
    ) -> Result<(Self, AdminCap)> {
        config.validate()?;
        let reserves = ReserveState::new(
            config.initial_token_reserve(),
            config.initial_currency_reserve(),
        )?;
        let params = MutableParams::from_config(&config);
        let curve = CurveBox::for_kind(config.curve());

        let engine = Self {
            config,
            params,
            audit: Vec::new(),
            curve,
            reserves,
            accounts: BTreeMap::new(),
            migration: MigrationState::new(),
            metrics: GrowthTracker::new(),
            issued: Amount::ZERO,
            active_users: 0,
            emergency: false,
            lock: ReentrancyLock::new(),
            events: Vec::new(),
            ledger,
            treasury,
            venue,
            engine_account,
            venue_account,
        };
        Ok((engine, AdminCap { _private: () }))
    }

    /// Runs `f` under the reentrancy lock, releasing on every exit path.
    pub(crate) fn locked<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        self.lock.try_enter()?;
        let result = f(self);
        self.lock.exit();
        result
    }

    /// The curve context for the current growth state. Both the quote
    /// entry points and the mutating path build it the same way, which is
    /// what makes a quote and the trade behind it agree bit for bit.
    fn curve_context(&self) -> CurveContext {
        CurveContext::new(
            self.metrics.snapshot().engagement_score(),
            self.active_users,
            self.params.curve_factor(),
        )
    }

    // -- Read-only surface ---------------------------------------------------

    /// Returns the reserve state.
    #[must_use]
    pub const fn reserves(&self) -> &ReserveState {
        &self.reserves
    }

    /// Returns the migration state.
    #[must_use]
    pub const fn migration_state(&self) -> &MigrationState {
        &self.migration
    }

    /// Returns the venue pool recorded by a successful migration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotMigrated`] while the instance is still
    /// trading.
    pub fn venue_pair(&self) -> Result<AccountId> {
        self.migration.venue_pair().ok_or(EngineError::NotMigrated)
    }

    /// Returns a snapshot of the growth metrics.
    #[must_use]
    pub fn growth_metrics(&self) -> GrowthMetrics {
        self.metrics.snapshot()
    }

    /// Returns the net issued supply (minted to participants, minus
    /// burns from sells).
    pub const fn issued_supply(&self) -> Amount {
        self.issued
    }

    /// Returns the number of enrolled active participants.
    #[must_use]
    pub const fn active_users(&self) -> u64 {
        self.active_users
    }

    /// Returns the caller's queued withdrawal credit (zero for unknown
    /// accounts).
    pub fn pending_withdrawal(&self, account: AccountId) -> Amount {
        self.accounts
            .get(&account)
            .map_or(Amount::ZERO, |a| a.pending_withdrawal)
    }

    /// Returns the per-account record, if the account has ever traded.
    #[must_use]
    pub fn account(&self, account: AccountId) -> Option<&Account> {
        self.accounts.get(&account)
    }

    /// Returns the immutable configuration.
    #[must_use]
    pub const fn config(&self) -> &SaleConfig {
        &self.config
    }

    /// Returns the current tunable parameters.
    #[must_use]
    pub const fn params(&self) -> MutableParams {
        self.params
    }

    /// Returns the parameter-change audit log, oldest first.
    #[must_use]
    pub fn parameter_audit(&self) -> &[ParameterChange] {
        &self.audit
    }

    /// Returns `true` while emergency mode is engaged.
    #[must_use]
    pub const fn emergency_mode(&self) -> bool {
        self.emergency
    }

    /// Drains and returns the buffered events, oldest first.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        core::mem::take(&mut self.events)
    }

    // -- Quotes --------------------------------------------------------------

    /// Quotes the tokens a deposit of `amount_in` would issue right now.
    ///
    /// Matches the mutating path bit for bit: `buy` computes its issuance
    /// through this same curve call against the same state.
    ///
    /// # Errors
    ///
    /// - [`EngineError::AlreadyMigrated`] after migration.
    /// - Any pricing error from the configured curve.
    pub fn purchase_return(&self, amount_in: Amount) -> Result<Amount> {
        if self.migration.migrated() {
            return Err(EngineError::AlreadyMigrated);
        }
        self.curve
            .purchase_return(&self.reserves, amount_in, &self.curve_context())
    }

    /// Quotes the currency a sale of `token_amount` would credit right
    /// now.
    ///
    /// # Errors
    ///
    /// - [`EngineError::AlreadyMigrated`] after migration.
    /// - Any pricing error from the configured curve.
    pub fn sale_return(&self, token_amount: Amount) -> Result<Amount> {
        if self.migration.migrated() {
            return Err(EngineError::AlreadyMigrated);
        }
        self.curve
            .sale_return(&self.reserves, token_amount, &self.curve_context())
    }

    /// Estimates the price impact of `trade_size` against `reserve`, as
    /// an integer percentage.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DivisionByZero`] if `reserve` is zero.
    pub fn price_impact(&self, trade_size: Amount, reserve: Amount) -> Result<u128> {
        self.curve.price_impact(trade_size, reserve)
    }

    /// Returns the current spot price (currency per token) at WAD scale.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DivisionByZero`] if the token reserve is zero.
    pub fn spot_price(&self) -> Result<Amount> {
        self.curve.spot_price_wad(&self.reserves)
    }
}

impl<L, T, V> CurveEngine<L, T, V>
where
    L: TokenLedger,
    T: Treasury,
    V: LiquidityVenue,
{
    /// Buys tokens with a native-currency deposit.
    ///
    /// Runs the full guard pipeline, mints through the ledger, commits
    /// the reserve and account updates, and — when the projected supply
    /// reaches the migration threshold — migrates synchronously within
    /// the same call. The returned receipt reports whether it did.
    ///
    /// # Errors
    ///
    /// Any guard, pricing, ledger, or migration error. On error nothing
    /// is committed: a failed migration unwinds the entire trade,
    /// including the buyer's minted tokens.
    pub fn buy(
        &mut self,
        caller: AccountId,
        amount_in: Amount,
        now: Timestamp,
    ) -> Result<TradeReceipt> {
        self.locked(|engine| engine.buy_locked(caller, amount_in, now))
    }

    fn buy_locked(
        &mut self,
        caller: AccountId,
        amount_in: Amount,
        now: Timestamp,
    ) -> Result<TradeReceipt> {
        self.guard_lifecycle()?;
        self.guard_bounds(amount_in)?;

        let ctx = self.curve_context();
        let tokens_out = self
            .curve
            .purchase_return(&self.reserves, amount_in, &ctx)?;

        let new_issued = self.guard_capacity(tokens_out)?;
        self.guard_reserve_buffer(tokens_out)?;
        self.guard_price_impact(amount_in)?;

        let prev_entry = self.accounts.get(&caller).copied();
        let action_count = self.plan_rate_limit(prev_entry.as_ref(), now)?;
        let joins = self.plan_active_user(prev_entry.as_ref())?;

        let mut new_reserves = self.reserves;
        new_reserves.apply_buy(amount_in, tokens_out)?;

        // External interaction before any engine mutation: a rejected
        // mint aborts with nothing to unwind.
        self.ledger
            .mint(caller, tokens_out)
            .map_err(|e| EngineError::LedgerFailure(e.reason()))?;

        // Snapshot for the migration-failure path.
        let reserves_before = self.reserves;
        let issued_before = self.issued;
        let active_before = self.active_users;
        let events_mark = self.events.len();

        // Commit.
        self.reserves = new_reserves;
        self.issued = new_issued;
        let mut entry = prev_entry.unwrap_or_default();
        let prev_activity = prev_entry.map(|a| a.last_activity_time);
        entry.action_count = action_count;
        entry.last_action_time = now;
        if joins {
            entry.is_active = true;
            self.active_users += 1;
        }
        let metrics_rollback = self.metrics.record_trade(caller, prev_activity, now);
        entry.last_activity_time = now;
        self.accounts.insert(caller, entry);

        debug!(
            account = %caller,
            amount_in = %amount_in,
            tokens_out = %tokens_out,
            "buy executed"
        );
        self.events.push(EngineEvent::TradeExecuted {
            account: caller,
            kind: TradeKind::Buy,
            amount_in,
            amount_out: tokens_out,
        });
        self.events.push(EngineEvent::ReservesUpdated {
            token_reserve: self.reserves.token_reserve(),
            currency_reserve: self.reserves.currency_reserve(),
        });

        let mut triggered = false;
        if self.issued >= self.config.migration_threshold() {
            if let Err(err) = self.run_migration(now) {
                // All-or-nothing: unwind this trade completely.
                self.events.truncate(events_mark);
                self.metrics.revert(caller, metrics_rollback);
                match prev_entry {
                    Some(prev) => {
                        self.accounts.insert(caller, prev);
                    }
                    None => {
                        self.accounts.remove(&caller);
                    }
                }
                self.active_users = active_before;
                self.issued = issued_before;
                self.reserves = reserves_before;
                self.ledger
                    .burn(caller, tokens_out)
                    .map_err(|c| EngineError::LedgerFailure(c.reason()))?;
                return Err(err);
            }
            triggered = true;
        }

        TradeReceipt::new(TradeKind::Buy, amount_in, tokens_out, triggered)
    }

    /// Sells tokens back to the curve.
    ///
    /// Burns through the ledger and queues a currency credit; no currency
    /// moves until the caller invokes
    /// [`withdraw`](CurveEngine::withdraw).
    ///
    /// # Errors
    ///
    /// Any guard, balance, pricing, or ledger error; nothing is committed
    /// on failure.
    pub fn sell(
        &mut self,
        caller: AccountId,
        token_amount: Amount,
        now: Timestamp,
    ) -> Result<TradeReceipt> {
        self.locked(|engine| engine.sell_locked(caller, token_amount, now))
    }

    fn sell_locked(
        &mut self,
        caller: AccountId,
        token_amount: Amount,
        now: Timestamp,
    ) -> Result<TradeReceipt> {
        self.guard_lifecycle()?;
        if token_amount.is_zero() {
            return Err(EngineError::InvalidAmount("zero sale"));
        }
        if self.ledger.balance_of(caller) < token_amount {
            return Err(EngineError::InsufficientBalance);
        }

        let ctx = self.curve_context();
        let amount_out = self
            .curve
            .sale_return(&self.reserves, token_amount, &ctx)?;
        if amount_out.is_zero() {
            return Err(EngineError::InvalidAmount("sale quote rounds to zero"));
        }

        let new_issued = self.issued.safe_sub(&token_amount)?;
        let prev_entry = self.accounts.get(&caller).copied();
        let action_count = self.plan_rate_limit(prev_entry.as_ref(), now)?;
        let joins = self.plan_active_user(prev_entry.as_ref())?;

        let mut new_reserves = self.reserves;
        new_reserves.apply_sell(token_amount, amount_out)?;

        let mut entry = prev_entry.unwrap_or_default();
        let new_pending = entry.pending_withdrawal.safe_add(&amount_out)?;

        self.ledger
            .burn(caller, token_amount)
            .map_err(|e| EngineError::LedgerFailure(e.reason()))?;

        // Commit.
        self.reserves = new_reserves;
        self.issued = new_issued;
        let prev_activity = prev_entry.map(|a| a.last_activity_time);
        entry.action_count = action_count;
        entry.last_action_time = now;
        if joins {
            entry.is_active = true;
            self.active_users += 1;
        }
        self.metrics.record_trade(caller, prev_activity, now);
        entry.last_activity_time = now;
        entry.pending_withdrawal = new_pending;
        self.accounts.insert(caller, entry);

        debug!(
            account = %caller,
            tokens_in = %token_amount,
            queued = %amount_out,
            "sell executed"
        );
        self.events.push(EngineEvent::TradeExecuted {
            account: caller,
            kind: TradeKind::Sell,
            amount_in: token_amount,
            amount_out,
        });
        self.events.push(EngineEvent::ReservesUpdated {
            token_reserve: self.reserves.token_reserve(),
            currency_reserve: self.reserves.currency_reserve(),
        });
        self.events.push(EngineEvent::WithdrawalQueued {
            account: caller,
            amount: amount_out,
        });

        TradeReceipt::new(TradeKind::Sell, token_amount, amount_out, false)
    }

    // -- Privileged surface --------------------------------------------------

    /// Toggles emergency mode. While engaged, `buy` and `sell` fail with
    /// [`EngineError::EmergencyPaused`]; withdrawals keep working.
    pub fn set_emergency_mode(&mut self, _cap: &AdminCap, enabled: bool) {
        self.emergency = enabled;
        info!(enabled, "emergency mode set");
        self.events.push(EngineEvent::EmergencyModeSet { enabled });
    }

    /// Sweeps the engine's entire collected balance to `to`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InsufficientFunds`] if the balance is zero.
    /// - [`EngineError::TransferFailed`] if the treasury rejects the
    ///   sweep; the balance is untouched.
    pub fn emergency_withdraw(&mut self, _cap: &AdminCap, to: AccountId) -> Result<Amount> {
        self.locked(|engine| engine.emergency_withdraw_locked(to))
    }

    fn emergency_withdraw_locked(&mut self, to: AccountId) -> Result<Amount> {
        let balance = self.reserves.total_collected();
        if balance.is_zero() {
            return Err(EngineError::InsufficientFunds);
        }
        self.treasury
            .pay(to, balance)
            .map_err(|e| EngineError::TransferFailed(e.reason()))?;
        self.reserves.debit_collected(balance)?;

        info!(to = %to, amount = %balance, "emergency withdrawal");
        self.events.push(EngineEvent::EmergencyWithdrawal {
            to,
            amount: balance,
        });
        Ok(balance)
    }

    /// Tunes the price-impact limit and the linear curve factor, and
    /// appends the change to the audit log.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScore`] if either value is outside
    /// its permitted range; the parameters and the log are untouched.
    pub fn update_parameters(
        &mut self,
        _cap: &AdminCap,
        price_impact_limit: u8,
        curve_factor: u32,
        now: Timestamp,
    ) -> Result<()> {
        self.params.update(price_impact_limit, curve_factor)?;
        self.audit
            .push(ParameterChange::new(now, price_impact_limit, curve_factor));

        info!(price_impact_limit, curve_factor, "parameters updated");
        self.events.push(EngineEvent::ParametersUpdated {
            price_impact_limit,
            curve_factor,
        });
        Ok(())
    }

    /// Sets the social impact score.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScore`] if `score` exceeds 100.
    pub fn update_social_impact_score(
        &mut self,
        _cap: &AdminCap,
        score: u64,
        now: Timestamp,
    ) -> Result<()> {
        self.metrics.set_social_impact(score, now)?;
        self.events.push(EngineEvent::SocialImpactUpdated { score });
        Ok(())
    }
}
