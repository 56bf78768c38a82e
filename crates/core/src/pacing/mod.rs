//! Burn-rate and pacing calculations over a cycle snapshot.

pub mod engine;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::PacingEngine;
pub use types::{CategoryShare, PacePoint, PacingSnapshot, PacingStage, PacingState};
