//! Cycle and expense data types.

use burnrate_shared::types::{CycleId, ExpenseId};
use chrono::{DateTime, Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::CycleError;

/// A budgeting period with a fixed total budget and date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    /// Cycle ID.
    pub id: CycleId,
    /// Total budget for the whole cycle.
    pub monthly_budget: Decimal,
    /// First day of the cycle.
    pub start_date: NaiveDate,
    /// Last day of the cycle (inclusive).
    pub end_date: NaiveDate,
    /// Expenses in the order they were logged.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An expense logged against a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Amount spent.
    pub amount: Decimal,
    /// Spending category.
    #[serde(default)]
    pub category: Category,
    /// Free-text note.
    #[serde(default)]
    pub comment: String,
    /// Calendar day the expense counts against.
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// Returns the calendar day this expense is bucketed into.
    ///
    /// Falls back to the creation day when no explicit date was stored.
    #[must_use]
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.or_else(|| self.created_at.map(|at| at.date_naive()))
    }
}

/// Accepts `YYYY-MM-DD` with an optional time suffix; anything else becomes `None`.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(|s| s.get(..10))
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

/// Fixed set of spending categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Groceries and eating out.
    Food,
    /// Fuel, fares, and rides.
    Transport,
    /// Rent and home costs.
    Housing,
    /// Power, water, phone, internet.
    Utilities,
    /// Medicine and care.
    Health,
    /// Leisure and subscriptions.
    Entertainment,
    /// Clothes and goods.
    Shopping,
    /// Anything else.
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 8] = [
        Self::Food,
        Self::Transport,
        Self::Housing,
        Self::Utilities,
        Self::Health,
        Self::Entertainment,
        Self::Shopping,
        Self::Other,
    ];

    /// Returns the persisted name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Housing => "housing",
            Self::Utilities => "utilities",
            Self::Health => "health",
            Self::Entertainment => "entertainment",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| CycleError::UnknownCategory(s.to_string()))
    }
}

/// Input for creating a new cycle.
#[derive(Debug, Clone)]
pub struct NewCycle {
    /// Total budget for the cycle.
    pub monthly_budget: Decimal,
    /// First day of the cycle.
    pub start_date: NaiveDate,
    /// Last day of the cycle.
    pub end_date: NaiveDate,
}

/// Input for logging an expense.
#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    /// Amount spent.
    pub amount: Decimal,
    /// Category; `other` when absent.
    pub category: Option<Category>,
    /// Free-text note; trimmed before storing.
    pub comment: Option<String>,
    /// Day to book the expense on; the current day when absent.
    pub date: Option<NaiveDate>,
}

/// The caller's notion of "now", passed into every storage operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    /// Local calendar day used for all day arithmetic.
    pub today: NaiveDate,
    /// Wall-clock instant used for record timestamps.
    pub at: DateTime<Utc>,
}

impl Moment {
    /// Reads the system clock.
    #[must_use]
    pub fn now() -> Self {
        let local = Local::now();
        Self {
            today: local.date_naive(),
            at: local.with_timezone(&Utc),
        }
    }

    /// Pins "today" to a given day, stamping records at its UTC midnight.
    #[must_use]
    pub fn on(today: NaiveDate) -> Self {
        Self {
            today,
            at: today.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}
