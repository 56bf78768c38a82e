//! Cycle store: cycles, expenses, and history persisted as JSON records.

use std::str::FromStr;

use burnrate_shared::types::{CycleId, ExpenseId};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::error::StoreError;
use super::kv::KeyValueStore;
use crate::cycle::validation::{adjusted_budget, validate_expense_amount};
use crate::cycle::{Cycle, CycleRules, Expense, Moment, NewCycle, NewExpense, validate_new_cycle};
use crate::history::{DefeatRecord, EndReason};
use crate::pacing::PacingEngine;

/// Storage for cycles and defeat history under a key namespace.
///
/// Records live under `{namespace}_cycles`, `{namespace}_defeats`, and the
/// active cycle pointer under `{namespace}_active`.
pub struct CycleStore<S> {
    kv: S,
    namespace: String,
    rules: CycleRules,
}

impl<S: KeyValueStore> CycleStore<S> {
    /// Wraps a key-value backend.
    pub fn new(kv: S, namespace: impl Into<String>, rules: CycleRules) -> Self {
        Self {
            kv,
            namespace: namespace.into(),
            rules,
        }
    }

    /// Releases the backend.
    pub fn into_inner(self) -> S {
        self.kv
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.namespace)
    }

    /// Unreadable payloads are logged and treated as empty.
    fn read_list<T: DeserializeOwned>(&self, suffix: &str) -> Result<Vec<T>, StoreError> {
        let key = self.key(suffix);
        let Some(raw) = self.kv.get(&key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(key = %key, error = %err, "Discarding unreadable records");
                Ok(Vec::new())
            }
        }
    }

    /// Reads a list that is about to be rewritten.
    ///
    /// An unreadable payload is copied to `{key}_unreadable` first, so the
    /// write that follows does not destroy it.
    fn read_list_for_write<T: DeserializeOwned>(
        &mut self,
        suffix: &str,
    ) -> Result<Vec<T>, StoreError> {
        let key = self.key(suffix);
        let Some(raw) = self.kv.get(&key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                let backup = format!("{key}_unreadable");
                warn!(
                    key = %key,
                    backup = %backup,
                    error = %err,
                    "Preserving unreadable records before overwrite"
                );
                self.kv.set(&backup, raw)?;
                Ok(Vec::new())
            }
        }
    }

    fn write_list<T: Serialize>(&mut self, suffix: &str, items: &[T]) -> Result<(), StoreError> {
        let key = self.key(suffix);
        let body = serde_json::to_string(items)?;
        self.kv.set(&key, body)
    }

    /// All cycles ever created, oldest first.
    pub fn cycles(&self) -> Result<Vec<Cycle>, StoreError> {
        self.read_list("cycles")
    }

    fn cycles_for_write(&mut self) -> Result<Vec<Cycle>, StoreError> {
        self.read_list_for_write("cycles")
    }

    fn save_cycles(&mut self, cycles: &[Cycle]) -> Result<(), StoreError> {
        self.write_list("cycles", cycles)
    }

    /// ID the active pointer refers to, if it is set and well formed.
    pub fn active_cycle_id(&self) -> Result<Option<CycleId>, StoreError> {
        let Some(raw) = self.kv.get(&self.key("active"))? else {
            return Ok(None);
        };
        match CycleId::from_str(&raw) {
            Ok(id) => Ok(Some(id)),
            Err(err) => {
                warn!(value = %raw, error = %err, "Ignoring malformed active cycle pointer");
                Ok(None)
            }
        }
    }

    /// The cycle the active pointer refers to.
    pub fn active_cycle(&self) -> Result<Option<Cycle>, StoreError> {
        let Some(id) = self.active_cycle_id()? else {
            return Ok(None);
        };
        Ok(self.cycles()?.into_iter().find(|c| c.id == id))
    }

    /// Points the store at a cycle, or clears the pointer.
    pub fn set_active_cycle_id(&mut self, id: Option<CycleId>) -> Result<(), StoreError> {
        let key = self.key("active");
        match id {
            Some(id) => self.kv.set(&key, id.to_string()),
            None => self.kv.remove(&key),
        }
    }

    /// Validates and stores a new cycle, making it the active one.
    pub fn create_cycle(&mut self, input: NewCycle, now: Moment) -> Result<Cycle, StoreError> {
        validate_new_cycle(&input, &self.rules)?;

        let cycle = Cycle {
            id: CycleId::new(),
            monthly_budget: input.monthly_budget,
            start_date: input.start_date,
            end_date: input.end_date,
            expenses: Vec::new(),
            created_at: now.at,
        };

        let mut cycles = self.cycles_for_write()?;
        cycles.push(cycle.clone());
        self.save_cycles(&cycles)?;
        self.set_active_cycle_id(Some(cycle.id))?;

        info!(
            cycle_id = %cycle.id,
            budget = %cycle.monthly_budget,
            start = %cycle.start_date,
            end = %cycle.end_date,
            "Cycle created"
        );
        Ok(cycle)
    }

    /// Replaces the stored copy of `cycle`.
    pub fn update_cycle(&mut self, cycle: &Cycle) -> Result<(), StoreError> {
        let mut cycles = self.cycles_for_write()?;
        let slot = cycles
            .iter_mut()
            .find(|c| c.id == cycle.id)
            .ok_or(StoreError::CycleNotFound(cycle.id))?;
        *slot = cycle.clone();
        self.save_cycles(&cycles)
    }

    /// Appends an expense to a cycle.
    ///
    /// The category defaults to `other`, the comment is trimmed, and the
    /// date defaults to `now.today`.
    pub fn add_expense(
        &mut self,
        cycle_id: CycleId,
        input: NewExpense,
        now: Moment,
    ) -> Result<Expense, StoreError> {
        validate_expense_amount(input.amount)?;

        let mut cycles = self.cycles_for_write()?;
        let cycle = cycles
            .iter_mut()
            .find(|c| c.id == cycle_id)
            .ok_or(StoreError::CycleNotFound(cycle_id))?;

        let expense = Expense {
            id: ExpenseId::new(),
            amount: input.amount,
            category: input.category.unwrap_or_default(),
            comment: input.comment.as_deref().map(str::trim).unwrap_or_default().to_string(),
            date: Some(input.date.unwrap_or(now.today)),
            created_at: Some(now.at),
        };
        cycle.expenses.push(expense.clone());
        self.save_cycles(&cycles)?;

        debug!(
            cycle_id = %cycle_id,
            expense_id = %expense.id,
            amount = %expense.amount,
            category = %expense.category,
            "Expense added"
        );
        Ok(expense)
    }

    /// Emergency budget increase (positive `delta`) or decrease (negative).
    pub fn adjust_budget(
        &mut self,
        cycle_id: CycleId,
        delta: Decimal,
    ) -> Result<Cycle, StoreError> {
        let mut cycles = self.cycles_for_write()?;
        let cycle = cycles
            .iter_mut()
            .find(|c| c.id == cycle_id)
            .ok_or(StoreError::CycleNotFound(cycle_id))?;

        let previous = cycle.monthly_budget;
        cycle.monthly_budget = adjusted_budget(previous, delta)?;
        let updated = cycle.clone();
        self.save_cycles(&cycles)?;

        info!(
            cycle_id = %cycle_id,
            from = %previous,
            to = %updated.monthly_budget,
            "Budget adjusted"
        );
        Ok(updated)
    }

    /// Archived cycle outcomes, oldest first.
    pub fn defeats_history(&self) -> Result<Vec<DefeatRecord>, StoreError> {
        self.read_list("defeats")
    }

    /// Appends a record to the defeat history.
    pub fn add_defeat(&mut self, record: DefeatRecord) -> Result<(), StoreError> {
        let mut history: Vec<DefeatRecord> = self.read_list_for_write("defeats")?;
        info!(
            cycle_id = %record.cycle_id,
            reason = ?record.end_reason,
            days_survived = record.days_survived,
            "Cycle archived"
        );
        history.push(record);
        self.write_list("defeats", &history)
    }

    /// Archives the active cycle, if any, and starts a new one.
    ///
    /// The new parameters are validated before anything is archived.
    pub fn archive_and_new_cycle(
        &mut self,
        input: NewCycle,
        now: Moment,
    ) -> Result<Cycle, StoreError> {
        validate_new_cycle(&input, &self.rules)?;

        if let Some(active) = self.active_cycle()? {
            self.add_defeat(DefeatRecord::for_cycle(
                &active,
                EndReason::ManualNewCycle,
                now,
            ))?;
        }
        self.set_active_cycle_id(None)?;
        self.create_cycle(input, now)
    }

    /// Archives the active cycle once its budget is gone.
    ///
    /// Returns the record written, or `None` if nothing was archived.
    pub fn archive_if_exhausted(
        &mut self,
        now: Moment,
    ) -> Result<Option<DefeatRecord>, StoreError> {
        let Some(active) = self.active_cycle()? else {
            return Ok(None);
        };
        if PacingEngine::remaining_budget(&active) > Decimal::ZERO {
            return Ok(None);
        }

        let record = DefeatRecord::for_cycle(&active, EndReason::BudgetExhausted, now);
        self.add_defeat(record.clone())?;
        self.set_active_cycle_id(None)?;
        Ok(Some(record))
    }

    /// Drops the active pointer; the cycle itself is kept.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.set_active_cycle_id(None)
    }
}
