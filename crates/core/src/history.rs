//! Defeat history: the archived outcome of finished cycles.

use burnrate_shared::types::CycleId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cycle::{Cycle, Moment};
use crate::pacing::PacingEngine;

/// Why a cycle was archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The user started a new cycle.
    ManualNewCycle,
    /// The budget reached zero.
    BudgetExhausted,
}

/// Archived record of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefeatRecord {
    /// Archived cycle.
    pub cycle_id: CycleId,
    /// Whole days between the cycle start and archival.
    pub days_survived: i64,
    /// Amount spent beyond the budget.
    pub overspent_amount: Decimal,
    /// Why the cycle ended.
    pub end_reason: EndReason,
    /// Archival timestamp.
    pub at: DateTime<Utc>,
}

impl DefeatRecord {
    /// Builds the record for archiving `cycle` at `now`.
    #[must_use]
    pub fn for_cycle(cycle: &Cycle, end_reason: EndReason, now: Moment) -> Self {
        Self {
            cycle_id: cycle.id,
            days_survived: days_survived(cycle, now.today),
            overspent_amount: overspent_amount(cycle),
            end_reason,
            at: now.at,
        }
    }
}

/// Whole days from the cycle start to `today`, never negative.
#[must_use]
pub fn days_survived(cycle: &Cycle, today: NaiveDate) -> i64 {
    (today - cycle.start_date).num_days().max(0)
}

/// Spending beyond the budget, never negative.
#[must_use]
pub fn overspent_amount(cycle: &Cycle) -> Decimal {
    PacingEngine::total_spent(cycle)
        .saturating_sub(cycle.monthly_budget)
        .max(Decimal::ZERO)
}
