//! Property-based tests for the pacing engine.

use burnrate_shared::types::{CycleId, ExpenseId};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::PacingEngine;
use super::types::{PacingStage, PacingState};
use crate::cycle::{Category, Cycle, Expense, Moment};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn shift(date: NaiveDate, offset: i64) -> NaiveDate {
    if offset >= 0 {
        date + Days::new(offset.unsigned_abs())
    } else {
        date - Days::new(offset.unsigned_abs())
    }
}

/// Cycle of 2-90 days with up to 30 dated expenses inside it.
fn cycle_strategy() -> impl Strategy<Value = Cycle> {
    (1i64..90, 0i64..100_000_000).prop_flat_map(|(span, budget_cents)| {
        prop::collection::vec((0i64..5_000_000, 0..=span), 0..30).prop_map(move |spent| {
            let start = start();
            Cycle {
                id: CycleId::new(),
                monthly_budget: Decimal::new(budget_cents, 2),
                start_date: start,
                end_date: shift(start, span),
                expenses: spent
                    .into_iter()
                    .map(|(cents, offset)| Expense {
                        id: ExpenseId::new(),
                        amount: Decimal::new(cents, 2),
                        category: Category::Other,
                        comment: String::new(),
                        date: Some(shift(start, offset)),
                        created_at: None,
                    })
                    .collect(),
                created_at: Moment::on(start).at,
            }
        })
    })
}

/// Evaluation day from ten days before the start to well past any end.
fn today_strategy() -> impl Strategy<Value = NaiveDate> {
    (-10i64..110).prop_map(|offset| shift(start(), offset))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Remaining budget is never negative.
    #[test]
    fn prop_remaining_budget_non_negative(cycle in cycle_strategy()) {
        prop_assert!(PacingEngine::remaining_budget(&cycle) >= Decimal::ZERO);
    }

    /// Nothing is allowed once no days remain.
    #[test]
    fn prop_no_days_left_means_nothing_allowed(
        cycle in cycle_strategy(),
        today in today_strategy(),
    ) {
        if PacingEngine::remaining_days(&cycle, today) == 0 {
            prop_assert_eq!(PacingEngine::allowed_daily(&cycle, today), Decimal::ZERO);
        } else {
            prop_assert!(PacingEngine::remaining_days(&cycle, today) >= 1);
        }
    }

    /// Same cycle, same day, same answer.
    #[test]
    fn prop_snapshot_is_idempotent(
        cycle in cycle_strategy(),
        today in today_strategy(),
    ) {
        let first = PacingEngine::snapshot(&cycle, today);
        let second = PacingEngine::snapshot(&cycle, today);
        prop_assert_eq!(first, second);
        prop_assert_eq!(
            PacingEngine::actual_pace_points(&cycle),
            PacingEngine::actual_pace_points(&cycle)
        );
    }

    /// The cumulative curve ends at the total spent.
    #[test]
    fn prop_actual_pace_ends_at_total_spent(cycle in cycle_strategy()) {
        let points = PacingEngine::actual_pace_points(&cycle);
        let total_days = PacingEngine::total_days(&cycle);

        prop_assert_eq!(points.len() as i64, total_days + 1);
        prop_assert_eq!(points.last().map(|p| p.amount), Some(PacingEngine::total_spent(&cycle)));
        prop_assert!(points.windows(2).all(|w| w[0].amount <= w[1].amount));
    }

    /// Death and collapse both fire exactly when the budget is gone.
    #[test]
    fn prop_exhaustion_is_death_and_collapse(
        cycle in cycle_strategy(),
        today in today_strategy(),
    ) {
        let exhausted = PacingEngine::remaining_budget(&cycle).is_zero();
        let state = PacingEngine::classify_state(&cycle, today);
        let stage = PacingEngine::classify_stage(&cycle, today);

        prop_assert_eq!(state == PacingState::Death, exhausted);
        if exhausted {
            prop_assert_eq!(stage, PacingStage::Collapse);
            prop_assert_eq!(PacingEngine::run_out_day(&cycle, today), Some(0));
        }
    }

    /// Discipline is a percentage.
    #[test]
    fn prop_discipline_index_bounded(
        cycle in cycle_strategy(),
        today in today_strategy(),
    ) {
        let index = PacingEngine::discipline_index(&cycle, today);
        prop_assert!(index >= Decimal::ZERO);
        prop_assert!(index <= Decimal::ONE_HUNDRED);
    }

    /// A predicted run-out day always lands inside the cycle.
    #[test]
    fn prop_run_out_day_within_cycle(
        cycle in cycle_strategy(),
        today in today_strategy(),
    ) {
        if let Some(day) = PacingEngine::run_out_day(&cycle, today) {
            prop_assert!(day >= 0);
            prop_assert!(day <= PacingEngine::total_days(&cycle));
        }
    }

    /// Category shares add back up to the total spent.
    #[test]
    fn prop_category_amounts_sum_to_total(cycle in cycle_strategy()) {
        let sum: Decimal = PacingEngine::category_distribution(&cycle)
            .iter()
            .map(|share| share.amount)
            .sum();
        prop_assert_eq!(sum, PacingEngine::total_spent(&cycle));
    }
}
