//! Outcome distribution sampler.
//!
//! Tables are walked in declaration order and the first entry whose running
//! cumulative probability reaches the draw wins. Tables are never normalized:
//! a draw beyond the authored mass resolves to the last entry.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// One weighted branch of an outcome table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub probability: f64,
    /// Payout-to-stake ratio; 1.0 returns the stake, 0.0 loses it.
    pub multiplier: f64,
}

impl Outcome {
    #[must_use]
    pub const fn new(probability: f64, multiplier: f64) -> Self {
        Self {
            probability,
            multiplier,
        }
    }
}

/// Resolve a uniform draw against `table`.
///
/// # Errors
///
/// Returns [`SimError::EmptyTable`] when the table has no entries.
pub fn sample(table: &[Outcome], draw: f64) -> Result<f64, SimError> {
    let last = table.last().ok_or(SimError::EmptyTable)?;
    let mut cumulative = 0.0;
    for outcome in table {
        cumulative += outcome.probability;
        if draw <= cumulative {
            return Ok(outcome.multiplier);
        }
    }
    log::trace!("draw {draw} exceeded table mass {cumulative}; using last entry");
    Ok(last.multiplier)
}

/// Sum of the authored probabilities.
#[must_use]
pub fn total_mass(table: &[Outcome]) -> f64 {
    table.iter().map(|outcome| outcome.probability).sum()
}

/// Expected payout per unit staked (return to player) over the authored mass.
#[must_use]
pub fn expected_multiplier(table: &[Outcome]) -> f64 {
    table
        .iter()
        .map(|outcome| outcome.probability * outcome.multiplier)
        .sum()
}
