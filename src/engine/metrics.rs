//! Growth metrics tracker.

use std::collections::BTreeSet;

use crate::domain::{AccountId, Timestamp};
use crate::error::{EngineError, Result};

/// Window within which a repeat trade counts as engaged activity.
const ENGAGEMENT_WINDOW_SECS: u64 = 86_400;

/// Score added for each engaged trade.
const ENGAGEMENT_INCREMENT: u64 = 10;

/// Upper bound for the admin-set social impact score.
const MAX_SOCIAL_IMPACT: u64 = 100;

/// Read-only snapshot of the growth counters.
///
/// All counters are monotonic non-decreasing except `social_impact_score`,
/// which is set directly by the privileged entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthMetrics {
    unique_holders: u64,
    total_transactions: u64,
    engagement_score: u64,
    social_impact_score: u64,
    last_update: Timestamp,
}

impl GrowthMetrics {
    /// Accounts that have ever traded. Never decremented, even for
    /// accounts that later hold zero balance.
    #[must_use]
    pub const fn unique_holders(&self) -> u64 {
        self.unique_holders
    }

    /// Accepted trades over the instance lifetime.
    #[must_use]
    pub const fn total_transactions(&self) -> u64 {
        self.total_transactions
    }

    /// Accumulated engagement score. Uncapped and never decays — repeat
    /// activity inside the window only ever adds.
    #[must_use]
    pub const fn engagement_score(&self) -> u64 {
        self.engagement_score
    }

    /// The admin-set social impact score, in `0..=100`.
    #[must_use]
    pub const fn social_impact_score(&self) -> u64 {
        self.social_impact_score
    }

    /// When any counter last moved.
    #[must_use]
    pub const fn last_update(&self) -> Timestamp {
        self.last_update
    }
}

/// Undo record for one `record_trade` call, used when the enclosing buy
/// is rolled back by a failed migration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MetricsRollback {
    newly_counted: bool,
    engagement_added: u64,
    prev_last_update: Timestamp,
}

/// The tracker behind [`GrowthMetrics`]: counters plus the counted-set
/// that makes `unique_holders` idempotent per account.
#[derive(Debug, Default)]
pub(crate) struct GrowthTracker {
    counted: BTreeSet<AccountId>,
    metrics: GrowthMetrics,
}

impl GrowthTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current counters.
    pub(crate) fn snapshot(&self) -> GrowthMetrics {
        self.metrics
    }

    /// Updates the counters for one accepted trade.
    ///
    /// `prev_activity` is the account's activity stamp before this trade
    /// (`None` on its first trade). Engagement accrues only when the gap
    /// to the previous activity is under one day.
    pub(crate) fn record_trade(
        &mut self,
        account: AccountId,
        prev_activity: Option<Timestamp>,
        now: Timestamp,
    ) -> MetricsRollback {
        let prev_last_update = self.metrics.last_update;

        let newly_counted = self.counted.insert(account);
        if newly_counted {
            self.metrics.unique_holders += 1;
        }

        self.metrics.total_transactions += 1;

        let engagement_added = match prev_activity {
            Some(prev) if now.elapsed_since(prev) < ENGAGEMENT_WINDOW_SECS => {
                self.metrics.engagement_score += ENGAGEMENT_INCREMENT;
                ENGAGEMENT_INCREMENT
            }
            _ => 0,
        };

        self.metrics.last_update = now;

        MetricsRollback {
            newly_counted,
            engagement_added,
            prev_last_update,
        }
    }

    /// Reverts one `record_trade` call.
    pub(crate) fn revert(&mut self, account: AccountId, rollback: MetricsRollback) {
        if rollback.newly_counted {
            self.counted.remove(&account);
            self.metrics.unique_holders -= 1;
        }
        self.metrics.total_transactions -= 1;
        self.metrics.engagement_score -= rollback.engagement_added;
        self.metrics.last_update = rollback.prev_last_update;
    }

    /// Sets the admin-controlled social impact score.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidScore`] if `score` exceeds 100.
    pub(crate) fn set_social_impact(&mut self, score: u64, now: Timestamp) -> Result<()> {
        if score > MAX_SOCIAL_IMPACT {
            return Err(EngineError::InvalidScore);
        }
        self.metrics.social_impact_score = score;
        self.metrics.last_update = now;
        Ok(())
    }
}
