//! Business rule validation for cycle setup and mutation.

use burnrate_shared::config::CycleConfig;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::error::CycleError;
use super::types::NewCycle;

/// Limits enforced when a cycle is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleRules {
    /// Smallest allowed budget.
    pub min_budget: Decimal,
    /// Longest allowed cycle in days, both ends inclusive.
    pub max_days: i64,
}

impl Default for CycleRules {
    fn default() -> Self {
        Self::from(&CycleConfig::default())
    }
}

impl From<&CycleConfig> for CycleRules {
    fn from(config: &CycleConfig) -> Self {
        Self {
            min_budget: config.min_budget,
            max_days: config.max_days,
        }
    }
}

/// Validates setup parameters for a new cycle.
///
/// # Errors
///
/// Returns the first rule the input breaks.
pub fn validate_new_cycle(input: &NewCycle, rules: &CycleRules) -> Result<(), CycleError> {
    if input.monthly_budget < rules.min_budget {
        return Err(CycleError::BudgetTooSmall {
            min: rules.min_budget,
            got: input.monthly_budget,
        });
    }

    if input.end_date <= input.start_date {
        return Err(CycleError::EndNotAfterStart {
            start: input.start_date,
            end: input.end_date,
        });
    }

    let days = (input.end_date - input.start_date).num_days() + 1;
    if days > rules.max_days {
        return Err(CycleError::TooLong {
            max: rules.max_days,
            days,
        });
    }

    Ok(())
}

/// Validates an expense amount before it is stored.
///
/// # Errors
///
/// Returns `CycleError::NegativeAmount` for amounts below zero.
pub fn validate_expense_amount(amount: Decimal) -> Result<(), CycleError> {
    if amount < Decimal::ZERO {
        return Err(CycleError::NegativeAmount);
    }
    Ok(())
}

/// Applies an emergency budget change, refusing to go below zero.
///
/// # Errors
///
/// Returns `CycleError::NegativeBudget` if the result would be negative, or
/// `CycleError::BudgetOverflow` if it cannot be represented.
pub fn adjusted_budget(current: Decimal, delta: Decimal) -> Result<Decimal, CycleError> {
    let next = current
        .checked_add(delta)
        .ok_or(CycleError::BudgetOverflow { delta })?;
    if next < Decimal::ZERO {
        return Err(CycleError::NegativeBudget { delta });
    }
    Ok(next)
}

/// Default cycle window when the user leaves dates out.
///
/// Without a start the window is the month containing `today`. With a
/// start it runs to the last day of the start's month.
#[must_use]
pub fn default_window(today: NaiveDate, start: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let start = start.unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    (start, last_day_of_month(start))
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(budget: Decimal, start: NaiveDate, end: NaiveDate) -> NewCycle {
        NewCycle {
            monthly_budget: budget,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_valid_month_cycle() {
        let result = validate_new_cycle(
            &input(dec!(3000), date(2024, 1, 1), date(2024, 1, 31)),
            &CycleRules::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_budget_below_minimum_rejected() {
        let result = validate_new_cycle(
            &input(dec!(0.5), date(2024, 1, 1), date(2024, 1, 31)),
            &CycleRules::default(),
        );
        assert_eq!(
            result,
            Err(CycleError::BudgetTooSmall {
                min: dec!(1),
                got: dec!(0.5)
            })
        );
    }

    #[rstest]
    #[case(date(2024, 1, 31), date(2024, 1, 31))]
    #[case(date(2024, 2, 1), date(2024, 1, 31))]
    fn test_end_must_follow_start(#[case] start: NaiveDate, #[case] end: NaiveDate) {
        let result = validate_new_cycle(&input(dec!(100), start, end), &CycleRules::default());
        assert!(matches!(result, Err(CycleError::EndNotAfterStart { .. })));
    }

    #[test]
    fn test_max_days_is_inclusive() {
        let rules = CycleRules::default();
        // 2023-01-01..=2023-12-31 is exactly 365 days.
        assert!(
            validate_new_cycle(&input(dec!(100), date(2023, 1, 1), date(2023, 12, 31)), &rules)
                .is_ok()
        );
        assert_eq!(
            validate_new_cycle(&input(dec!(100), date(2024, 1, 1), date(2024, 12, 31)), &rules),
            Err(CycleError::TooLong {
                max: 365,
                days: 366
            })
        );
    }

    #[test]
    fn test_budget_checked_before_dates() {
        let result = validate_new_cycle(
            &input(dec!(0), date(2024, 2, 1), date(2024, 1, 1)),
            &CycleRules::default(),
        );
        assert!(matches!(result, Err(CycleError::BudgetTooSmall { .. })));
    }

    #[test]
    fn test_expense_amount() {
        assert!(validate_expense_amount(dec!(0)).is_ok());
        assert!(validate_expense_amount(dec!(12.34)).is_ok());
        assert_eq!(
            validate_expense_amount(dec!(-0.01)),
            Err(CycleError::NegativeAmount)
        );
    }

    #[rstest]
    #[case(dec!(1000), dec!(250), Ok(dec!(1250)))]
    #[case(dec!(1000), dec!(-1000), Ok(dec!(0)))]
    #[case(dec!(1000), dec!(-1000.01), Err(CycleError::NegativeBudget { delta: dec!(-1000.01) }))]
    #[case(Decimal::MAX, dec!(1), Err(CycleError::BudgetOverflow { delta: dec!(1) }))]
    fn test_adjusted_budget(
        #[case] current: Decimal,
        #[case] delta: Decimal,
        #[case] expected: Result<Decimal, CycleError>,
    ) {
        assert_eq!(adjusted_budget(current, delta), expected);
    }

    #[rstest]
    #[case(date(2024, 2, 14), None, date(2024, 2, 1), date(2024, 2, 29))]
    #[case(date(2023, 12, 5), None, date(2023, 12, 1), date(2023, 12, 31))]
    #[case(date(2024, 2, 14), Some(date(2024, 4, 10)), date(2024, 4, 10), date(2024, 4, 30))]
    fn test_default_window(
        #[case] today: NaiveDate,
        #[case] start: Option<NaiveDate>,
        #[case] want_start: NaiveDate,
        #[case] want_end: NaiveDate,
    ) {
        assert_eq!(default_window(today, start), (want_start, want_end));
    }
}
