//! Pacing data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cycle::Category;

/// Burn-rate state of a cycle on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingState {
    /// Spending is comfortably under the allowed daily amount.
    Normal,
    /// Today's spending has reached 80% of the allowed daily amount.
    Risk,
    /// Today's spending exceeds the allowed daily amount.
    Overspending,
    /// The budget is gone.
    Death,
}

/// Severity stage used by the richer dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingStage {
    /// On track.
    Stable,
    /// Overspending today with plenty of budget left.
    Mild,
    /// Low on budget, or overspending with little left.
    Critical,
    /// Budget exhausted or nearly so.
    Collapse,
}

/// A point on a cumulative spend curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacePoint {
    /// Day index, 0 being the cycle start.
    pub day: i64,
    /// Cumulative amount by the end of that day.
    pub amount: Decimal,
}

/// Share of total spending taken by a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    /// Category.
    pub name: Category,
    /// Total spent in the category.
    pub amount: Decimal,
    /// Percentage of total spending.
    pub percent: Decimal,
}

/// Every pacing figure for a cycle, evaluated once for a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacingSnapshot {
    /// Day the figures were computed for.
    pub today: NaiveDate,
    /// Cycle budget.
    pub monthly_budget: Decimal,
    /// Sum of all expenses.
    pub total_spent: Decimal,
    /// Budget left, never negative.
    pub remaining_budget: Decimal,
    /// Days left until the end date.
    pub remaining_days: i64,
    /// Length of the cycle in days.
    pub total_days: i64,
    /// Amount that may be spent today to stay on pace.
    pub allowed_daily: Decimal,
    /// Amount spent today.
    pub spent_today: Decimal,
    /// Signed deviation of today's spend from the allowed amount.
    pub deviation_percent: Decimal,
    /// Share of the budget already spent, capped at 100.
    pub progress_percent: Decimal,
    /// Share of the budget still available.
    pub remaining_percent: Decimal,
    /// Burn-rate state.
    pub state: PacingState,
    /// Severity stage.
    pub stage: PacingStage,
    /// Percentage of elapsed days spent within the ideal pace.
    pub discipline_index: Decimal,
    /// Predicted 1-based cycle day when money runs out.
    pub run_out_day: Option<i64>,
    /// Days the remaining budget lasts at today's rate.
    pub days_until_run_out: Option<i64>,
    /// Spending per category.
    pub categories: Vec<CategoryShare>,
}
