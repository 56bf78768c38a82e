//! Cycle error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Cycle setup and mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// Budget is below the configured minimum.
    #[error("Budget must be at least {min}, got {got}")]
    BudgetTooSmall {
        /// Configured minimum.
        min: Decimal,
        /// Requested budget.
        got: Decimal,
    },

    /// End date is not after the start date.
    #[error("End date {end} must be after start date {start}")]
    EndNotAfterStart {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Cycle spans more days than allowed.
    #[error("Cycle cannot exceed {max} days, got {days}")]
    TooLong {
        /// Configured maximum.
        max: i64,
        /// Requested length.
        days: i64,
    },

    /// Expense amount is negative.
    #[error("Expense amount cannot be negative")]
    NegativeAmount,

    /// Budget adjustment would leave a negative budget.
    #[error("Adjustment of {delta} would leave a negative budget")]
    NegativeBudget {
        /// Requested change.
        delta: Decimal,
    },

    /// Budget adjustment would exceed the largest representable amount.
    #[error("Adjustment of {delta} would overflow the budget")]
    BudgetOverflow {
        /// Requested change.
        delta: Decimal,
    },

    /// Category name is not part of the fixed set.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
