//! Core pacing logic for Burnrate.
//!
//! This crate contains the budgeting rules with ZERO web or database dependencies.
//! Money is `rust_decimal::Decimal` throughout and every calculation takes
//! `today` explicitly, so results depend only on their inputs.
//!
//! # Modules
//!
//! - `cycle` - Cycles, expenses, categories, and setup validation
//! - `pacing` - Burn-rate metrics, state and stage classification, forecasts
//! - `history` - Defeat records for archived cycles
//! - `store` - Key-value persistence of cycles and history

pub mod cycle;
pub mod history;
pub mod pacing;
pub mod store;
