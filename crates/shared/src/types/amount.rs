//! Display helpers for budget amounts.
//!
//! Rounding here is for display only. Stored and compared values keep
//! full `Decimal` precision.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as a whole number with `,` thousands separators.
///
/// Halves round away from zero, so `1234.5` renders as `1,235`.
#[must_use]
pub fn format_whole(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
