//! Spending cycles, expenses, and setup rules.

pub mod error;
pub mod types;
pub mod validation;

pub use error::CycleError;
pub use types::{Category, Cycle, Expense, Moment, NewCycle, NewExpense};
pub use validation::{CycleRules, default_window, validate_new_cycle};
