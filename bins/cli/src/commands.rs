//! Subcommand handlers.

use std::io::Write;

use anyhow::Context;
use rust_decimal::Decimal;

use burnrate_core::cycle::{Cycle, Moment, NewCycle, NewExpense, default_window};
use burnrate_core::pacing::PacingEngine;
use burnrate_core::store::{CycleStore, KeyValueStore, StoreError};
use burnrate_shared::types::format_whole;
use burnrate_shared::{AppError, AppResult};

use crate::Command;
use crate::render;

/// Runs one subcommand, writing its report to `out`.
pub(crate) fn execute<S: KeyValueStore>(
    command: Command,
    store: &mut CycleStore<S>,
    now: Moment,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Start { budget, start, end } => {
            let (start, default_end) = default_window(now.today, start);
            let input = NewCycle {
                monthly_budget: budget,
                start_date: start,
                end_date: end.unwrap_or(default_end),
            };
            let cycle = store
                .archive_and_new_cycle(input, now)
                .map_err(AppError::from)?;
            writeln!(
                out,
                "Started cycle {} to {} with a budget of {}",
                cycle.start_date,
                cycle.end_date,
                format_whole(cycle.monthly_budget)
            )?;
            render::status(out, &PacingEngine::snapshot(&cycle, now.today))?;
        }
        Command::Spend {
            amount,
            category,
            comment,
            date,
        } => {
            let cycle = active(store)?;
            let expense = store
                .add_expense(
                    cycle.id,
                    NewExpense {
                        amount,
                        category,
                        comment,
                        date,
                    },
                    now,
                )
                .map_err(AppError::from)?;
            writeln!(
                out,
                "Logged {} ({})",
                format_whole(expense.amount),
                expense.category
            )?;
            archive_or_report(store, now, out)?;
        }
        Command::Adjust { delta } => {
            let cycle = active(store)?;
            let cycle = store
                .adjust_budget(cycle.id, delta)
                .map_err(AppError::from)?;
            writeln!(
                out,
                "Budget adjusted by {}, now {}",
                signed(delta),
                format_whole(cycle.monthly_budget)
            )?;
            archive_or_report(store, now, out)?;
        }
        Command::Status { json } => {
            let cycle = active(store)?;
            let snapshot = PacingEngine::snapshot(&cycle, now.today);
            if json {
                let body = serde_json::to_string_pretty(&snapshot)
                    .context("encoding snapshot as JSON")?;
                writeln!(out, "{body}")?;
            } else {
                render::status(out, &snapshot)?;
            }
        }
        Command::Details => {
            let cycle = active(store)?;
            render::details(out, &cycle, now.today)?;
        }
        Command::History => {
            let history = store.defeats_history().map_err(AppError::from)?;
            render::history(out, &history)?;
        }
        Command::Reset => {
            store.reset().map_err(AppError::from)?;
            writeln!(out, "Active cycle cleared.")?;
        }
    }
    Ok(())
}

fn active<S: KeyValueStore>(store: &CycleStore<S>) -> AppResult<Cycle> {
    store
        .active_cycle()?
        .ok_or_else(|| StoreError::NoActiveCycle.into())
}

/// Archives the active cycle once its budget is gone, otherwise prints its status.
fn archive_or_report<S: KeyValueStore>(
    store: &mut CycleStore<S>,
    now: Moment,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if let Some(record) = store.archive_if_exhausted(now).map_err(AppError::from)? {
        writeln!(
            out,
            "Budget exhausted. Cycle archived after {} days, overspent by {}.",
            record.days_survived,
            format_whole(record.overspent_amount)
        )?;
    } else {
        let cycle = active(store)?;
        render::status(out, &PacingEngine::snapshot(&cycle, now.today))?;
    }
    Ok(())
}

fn signed(delta: Decimal) -> String {
    if delta.is_sign_negative() {
        format!("-{}", format_whole(delta.abs()))
    } else {
        format!("+{}", format_whole(delta))
    }
}
