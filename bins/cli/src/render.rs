//! Text rendering of engine output.

use std::io::{self, Write};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use burnrate_core::cycle::Cycle;
use burnrate_core::history::{DefeatRecord, EndReason};
use burnrate_core::pacing::{PacingEngine, PacingSnapshot, PacingStage, PacingState};
use burnrate_shared::types::format_whole;

const GAUGE_SAFE_RATIO: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

fn percent(value: Decimal) -> String {
    format!("{}%", value.round_dp(1).normalize())
}

fn state_label(state: PacingState) -> &'static str {
    match state {
        PacingState::Normal => "normal",
        PacingState::Risk => "risk",
        PacingState::Overspending => "overspending",
        PacingState::Death => "death",
    }
}

fn stage_label(stage: PacingStage) -> &'static str {
    match stage {
        PacingStage::Stable => "stable",
        PacingStage::Mild => "mild",
        PacingStage::Critical => "critical",
        PacingStage::Collapse => "collapse",
    }
}

fn reason_label(reason: EndReason) -> &'static str {
    match reason {
        EndReason::ManualNewCycle => "new cycle",
        EndReason::BudgetExhausted => "budget exhausted",
    }
}

/// Burn gauge reading: `critical`, `overspend`, `safe`, or `stable`.
///
/// A gone budget or critical overspending reads `critical`. Overspending
/// otherwise reads `overspend`, and spending at 80% of the allowance or more
/// reads `safe`.
pub(crate) fn burn_gauge(s: &PacingSnapshot) -> &'static str {
    let allowed = s.allowed_daily;
    let safe_line = allowed.saturating_mul(GAUGE_SAFE_RATIO);
    if s.remaining_budget <= Decimal::ZERO {
        "critical"
    } else if allowed > Decimal::ZERO && s.spent_today > allowed {
        if s.stage == PacingStage::Critical {
            "critical"
        } else {
            "overspend"
        }
    } else if allowed > Decimal::ZERO && s.spent_today >= safe_line {
        "safe"
    } else {
        "stable"
    }
}

/// Damage shown on the survival bar.
pub(crate) fn survival_bar(s: &PacingSnapshot) -> &'static str {
    if s.stage == PacingStage::Collapse || s.remaining_percent < Decimal::from(5) {
        "glitch"
    } else if s.stage == PacingStage::Critical {
        "crack"
    } else if matches!(s.state, PacingState::Overspending | PacingState::Risk) {
        "melt"
    } else {
        "intact"
    }
}

/// Dashboard view of a snapshot.
pub(crate) fn status(out: &mut impl Write, s: &PacingSnapshot) -> io::Result<()> {
    writeln!(
        out,
        "Remaining      {} of {} ({})",
        format_whole(s.remaining_budget),
        format_whole(s.monthly_budget),
        percent(s.remaining_percent)
    )?;
    writeln!(out, "Days left      {} of {}", s.remaining_days, s.total_days)?;
    writeln!(out, "Allowed today  {}", format_whole(s.allowed_daily))?;
    writeln!(
        out,
        "Spent today    {} ({} vs allowed)",
        format_whole(s.spent_today),
        percent(s.deviation_percent)
    )?;
    writeln!(out, "State          {}", state_label(s.state))?;
    writeln!(out, "Stage          {}", stage_label(s.stage))?;
    writeln!(out, "Discipline     {}", percent(s.discipline_index))?;
    writeln!(
        out,
        "Pressure       {} gauge, {} bar",
        burn_gauge(s),
        survival_bar(s)
    )?;

    if !s.categories.is_empty() {
        writeln!(out, "Categories")?;
        for share in &s.categories {
            writeln!(
                out,
                "  {:<14} {:>10} {:>7}",
                share.name.as_str(),
                format_whole(share.amount),
                percent(share.percent)
            )?;
        }
    }
    Ok(())
}

/// Run-out message for the cycle as of `today`.
pub(crate) fn prediction(cycle: &Cycle, today: NaiveDate) -> String {
    let mut msg = String::from("At your current daily spend rate, ");
    if let Some(day) = PacingEngine::run_out_day(cycle, today) {
        msg.push_str(&format!("you will run out of money on day {day} of the cycle."));
    } else if let Some(days) = PacingEngine::days_until_run_out(cycle, today) {
        msg.push_str(&format!("budget lasts {days} more days."));
    } else {
        msg.push_str("you are within the daily limit.");
    }
    msg
}

/// Prediction plus the ideal and actual pace curves side by side.
pub(crate) fn details(out: &mut impl Write, cycle: &Cycle, today: NaiveDate) -> io::Result<()> {
    writeln!(out, "{}", prediction(cycle, today))?;
    writeln!(out)?;
    writeln!(out, "{:>4} {:>12} {:>12}", "Day", "Ideal", "Actual")?;

    let ideal = PacingEngine::ideal_pace_points(cycle);
    let actual = PacingEngine::actual_pace_points(cycle);
    for (i, a) in ideal.iter().zip(&actual) {
        writeln!(
            out,
            "{:>4} {:>12} {:>12}",
            i.day,
            format_whole(i.amount),
            format_whole(a.amount)
        )?;
    }
    Ok(())
}

/// Archived cycles, oldest first.
pub(crate) fn history(out: &mut impl Write, records: &[DefeatRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No archived cycles.");
    }
    for record in records {
        writeln!(
            out,
            "{}  {:<16}  survived {} days  overspent {}",
            record.at.date_naive(),
            reason_label(record.end_reason),
            record.days_survived,
            format_whole(record.overspent_amount)
        )?;
    }
    Ok(())
}
