//! Burn-rate and pacing calculations.
//!
//! Every function is a pure read of a cycle snapshot. Functions that depend
//! on the current date take `today` explicitly. Zero denominators resolve to
//! a fixed sentinel instead of failing, and sums saturate at
//! `Decimal::MAX` instead of overflowing.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::types::{CategoryShare, PacePoint, PacingSnapshot, PacingStage, PacingState};
use crate::cycle::{Category, Cycle};

/// Spent-to-allowed ratio at which a day turns risky (0.8).
const RISK_RATIO: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Remaining percentage below which the cycle collapses.
const COLLAPSE_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Remaining percentage below which the cycle is critical.
const CRITICAL_PERCENT: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

/// Remaining percentage below which overspending is critical.
const OVERSPEND_CRITICAL_PERCENT: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// Slack on the ideal daily pace when scoring discipline (1.001).
const DISCIPLINE_TOLERANCE: Decimal = Decimal::from_parts(1001, 0, 0, false, 3);

/// Pacing engine over cycle snapshots.
pub struct PacingEngine;

impl PacingEngine {
    /// Sum of all expense amounts.
    #[must_use]
    pub fn total_spent(cycle: &Cycle) -> Decimal {
        saturating_sum(cycle.expenses.iter().map(|e| e.amount))
    }

    /// Budget left after all expenses, floored at zero.
    #[must_use]
    pub fn remaining_budget(cycle: &Cycle) -> Decimal {
        cycle
            .monthly_budget
            .saturating_sub(Self::total_spent(cycle))
            .max(Decimal::ZERO)
    }

    /// Length of the cycle in days, start and end inclusive.
    #[must_use]
    pub fn total_days(cycle: &Cycle) -> i64 {
        day_index(cycle.start_date, cycle.end_date) + 1
    }

    /// Days from `today` to the end date.
    ///
    /// Zero once the end date has passed; at least one until then.
    #[must_use]
    pub fn remaining_days(cycle: &Cycle, today: NaiveDate) -> i64 {
        if today > cycle.end_date {
            return 0;
        }
        day_index(today, cycle.end_date).max(1)
    }

    /// Amount that may be spent per remaining day to finish on budget.
    #[must_use]
    pub fn allowed_daily(cycle: &Cycle, today: NaiveDate) -> Decimal {
        let days = Self::remaining_days(cycle, today);
        if days <= 0 {
            return Decimal::ZERO;
        }
        Self::remaining_budget(cycle) / Decimal::from(days)
    }

    /// Sum of expenses booked on `today`.
    #[must_use]
    pub fn spent_today(cycle: &Cycle, today: NaiveDate) -> Decimal {
        saturating_sum(
            cycle
                .expenses
                .iter()
                .filter(|e| e.day() == Some(today))
                .map(|e| e.amount),
        )
    }

    /// Signed percentage by which today's spend exceeds the allowed amount.
    ///
    /// With nothing allowed, any spending counts as 100% over. A ratio too
    /// large to represent saturates at `Decimal::MAX`.
    #[must_use]
    pub fn deviation_percent(cycle: &Cycle, today: NaiveDate) -> Decimal {
        let allowed = Self::allowed_daily(cycle, today);
        let spent = Self::spent_today(cycle, today);
        if allowed <= Decimal::ZERO {
            return if spent > Decimal::ZERO {
                Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
        }
        spent
            .checked_sub(allowed)
            .and_then(|over| over.checked_div(allowed))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX)
    }

    /// Share of the budget spent, capped at 100.
    #[must_use]
    pub fn progress_percent(cycle: &Cycle) -> Decimal {
        if cycle.monthly_budget <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        Self::total_spent(cycle)
            .checked_div(cycle.monthly_budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ONE_HUNDRED, |pct| pct.min(Decimal::ONE_HUNDRED))
    }

    /// Share of the budget still available; 100 for a zero budget.
    #[must_use]
    pub fn remaining_percent(cycle: &Cycle) -> Decimal {
        if cycle.monthly_budget <= Decimal::ZERO {
            return Decimal::ONE_HUNDRED;
        }
        Self::remaining_budget(cycle)
            .checked_div(cycle.monthly_budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ONE_HUNDRED)
    }

    /// Classifies the cycle into a burn-rate state. First match wins.
    #[must_use]
    pub fn classify_state(cycle: &Cycle, today: NaiveDate) -> PacingState {
        if Self::remaining_budget(cycle) <= Decimal::ZERO {
            return PacingState::Death;
        }

        let allowed = Self::allowed_daily(cycle, today);
        let spent = Self::spent_today(cycle, today);

        if spent > allowed {
            PacingState::Overspending
        } else if allowed > Decimal::ZERO && spent / allowed >= RISK_RATIO {
            PacingState::Risk
        } else {
            PacingState::Normal
        }
    }

    /// Classifies the cycle into a severity stage. First match wins.
    ///
    /// Kept separate from [`Self::classify_state`]; the thresholds differ.
    #[must_use]
    pub fn classify_stage(cycle: &Cycle, today: NaiveDate) -> PacingStage {
        let remaining = Self::remaining_budget(cycle);
        let remaining_percent = Self::remaining_percent(cycle);
        let allowed = Self::allowed_daily(cycle, today);
        let is_overspending = allowed > Decimal::ZERO && Self::spent_today(cycle, today) > allowed;

        if remaining <= Decimal::ZERO || remaining_percent < COLLAPSE_PERCENT {
            PacingStage::Collapse
        } else if remaining_percent < CRITICAL_PERCENT
            || (is_overspending && remaining_percent < OVERSPEND_CRITICAL_PERCENT)
        {
            PacingStage::Critical
        } else if is_overspending {
            PacingStage::Mild
        } else {
            PacingStage::Stable
        }
    }

    /// Linear ideal spend curve from day 0 through `total_days`.
    #[must_use]
    pub fn ideal_pace_points(cycle: &Cycle) -> Vec<PacePoint> {
        let total_days = Self::total_days(cycle);
        let per_day = ideal_per_day(cycle.monthly_budget, total_days);
        (0..=total_days)
            .map(|day| PacePoint {
                day,
                amount: per_day.saturating_mul(Decimal::from(day)),
            })
            .collect()
    }

    /// Cumulative actual spend from day 0 through `total_days`.
    ///
    /// Expenses without a usable date are skipped.
    #[must_use]
    pub fn actual_pace_points(cycle: &Cycle) -> Vec<PacePoint> {
        let by_day = daily_totals(cycle);
        let mut cumulative = Decimal::ZERO;
        (0..=Self::total_days(cycle))
            .map(|day| {
                cumulative =
                    cumulative.saturating_add(by_day.get(&day).copied().unwrap_or_default());
                PacePoint {
                    day,
                    amount: cumulative,
                }
            })
            .collect()
    }

    /// Spending per category, in first-seen order.
    #[must_use]
    pub fn category_distribution(cycle: &Cycle) -> Vec<CategoryShare> {
        let mut totals: Vec<(Category, Decimal)> = Vec::new();
        for expense in &cycle.expenses {
            match totals.iter_mut().find(|(c, _)| *c == expense.category) {
                Some((_, amount)) => *amount = amount.saturating_add(expense.amount),
                None => totals.push((expense.category, expense.amount)),
            }
        }

        let total = saturating_sum(totals.iter().map(|(_, amount)| *amount));
        totals
            .into_iter()
            .map(|(name, amount)| CategoryShare {
                name,
                amount,
                percent: amount
                    .checked_div(total)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .unwrap_or(Decimal::ZERO),
            })
            .collect()
    }

    /// Percentage of elapsed days whose spend stayed within the ideal pace.
    ///
    /// Elapsed days run from the start through `min(today, end)`.
    #[must_use]
    pub fn discipline_index(cycle: &Cycle, today: NaiveDate) -> Decimal {
        let last_day = today.min(cycle.end_date);
        let elapsed = day_index(cycle.start_date, last_day) + 1;
        if elapsed <= 0 {
            return Decimal::ONE_HUNDRED;
        }

        let limit = ideal_per_day(cycle.monthly_budget, Self::total_days(cycle))
            .saturating_mul(DISCIPLINE_TOLERANCE);
        let by_day = daily_totals(cycle);
        let disciplined = (0..elapsed)
            .filter(|day| by_day.get(day).copied().unwrap_or_default() <= limit)
            .count();

        Decimal::from(disciplined) / Decimal::from(elapsed) * Decimal::ONE_HUNDRED
    }

    /// Predicted 1-based cycle day when the budget runs out at today's rate.
    ///
    /// `Some(0)` when the budget is already gone, `None` when nothing was
    /// spent today or the money lasts past the end of the cycle. A quotient
    /// too large to represent also lasts past the end.
    #[must_use]
    pub fn run_out_day(cycle: &Cycle, today: NaiveDate) -> Option<i64> {
        let remaining = Self::remaining_budget(cycle);
        if remaining <= Decimal::ZERO {
            return Some(0);
        }

        let spent = Self::spent_today(cycle, today);
        if spent <= Decimal::ZERO {
            return None;
        }

        let days_left = remaining.checked_div(spent)?.ceil().to_i64()?;
        let run_out_index = day_index(cycle.start_date, today).checked_add(days_left)?;
        (run_out_index < Self::total_days(cycle)).then_some(run_out_index + 1)
    }

    /// Whole days the remaining budget lasts at today's rate.
    ///
    /// `None` when nothing was spent today or the count does not fit an `i64`.
    #[must_use]
    pub fn days_until_run_out(cycle: &Cycle, today: NaiveDate) -> Option<i64> {
        let spent = Self::spent_today(cycle, today);
        if spent <= Decimal::ZERO {
            return None;
        }
        Self::remaining_budget(cycle)
            .checked_div(spent)?
            .floor()
            .to_i64()
    }

    /// Evaluates every figure for `today` in one pass.
    #[must_use]
    pub fn snapshot(cycle: &Cycle, today: NaiveDate) -> PacingSnapshot {
        PacingSnapshot {
            today,
            monthly_budget: cycle.monthly_budget,
            total_spent: Self::total_spent(cycle),
            remaining_budget: Self::remaining_budget(cycle),
            remaining_days: Self::remaining_days(cycle, today),
            total_days: Self::total_days(cycle),
            allowed_daily: Self::allowed_daily(cycle, today),
            spent_today: Self::spent_today(cycle, today),
            deviation_percent: Self::deviation_percent(cycle, today),
            progress_percent: Self::progress_percent(cycle),
            remaining_percent: Self::remaining_percent(cycle),
            state: Self::classify_state(cycle, today),
            stage: Self::classify_stage(cycle, today),
            discipline_index: Self::discipline_index(cycle, today),
            run_out_day: Self::run_out_day(cycle, today),
            days_until_run_out: Self::days_until_run_out(cycle, today),
            categories: Self::category_distribution(cycle),
        }
    }
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
fn day_index(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn ideal_per_day(budget: Decimal, total_days: i64) -> Decimal {
    if total_days <= 0 {
        return Decimal::ZERO;
    }
    budget / Decimal::from(total_days)
}

/// Buckets expense amounts by day index relative to the cycle start.
fn daily_totals(cycle: &Cycle) -> BTreeMap<i64, Decimal> {
    let mut by_day = BTreeMap::new();
    for expense in &cycle.expenses {
        let Some(day) = expense.day() else {
            continue;
        };
        let total = by_day
            .entry(day_index(cycle.start_date, day))
            .or_insert(Decimal::ZERO);
        *total = total.saturating_add(expense.amount);
    }
    by_day
}
