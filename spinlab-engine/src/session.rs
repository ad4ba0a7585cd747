//! Session runner: one bankroll random walk and its summary statistics.
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::games::GameModel;
use crate::numbers::{percent, usize_to_f64};
use crate::rng::{DrawSource, SeededRandom};
use crate::settings::SimSettings;

/// Read-only statistics derived from one trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub spins: u32,
    pub win_spins: u32,
    /// Includes breakeven slot spins.
    pub losing_spins: u32,
    pub final_net: f64,
    pub peak: f64,
    pub trough: f64,
    /// Population standard deviation of every trajectory point, leading 0 included.
    pub volatility: f64,
    /// Largest decline from a running peak to a later point.
    pub max_drawdown: f64,
}

impl SessionSummary {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        percent(u64::from(self.win_spins), u64::from(self.spins))
    }

    #[must_use]
    pub fn loss_rate(&self) -> f64 {
        percent(u64::from(self.losing_spins), u64::from(self.spins))
    }
}

/// Trajectory (`spins + 1` cumulative net values, starting at 0) plus summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRun {
    pub points: Vec<f64>,
    pub summary: SessionSummary,
}

/// Drive one session spin by spin.
///
/// # Errors
///
/// Returns an error if the settings carry an invalid bet size.
pub fn run_session(
    settings: &SimSettings,
    source: &mut dyn DrawSource,
) -> Result<SessionRun, SimError> {
    settings.validate()?;
    let model = GameModel::for_machine(settings.machine);
    let capacity = usize::try_from(settings.spins).unwrap_or(0).saturating_add(1);
    let mut points = Vec::with_capacity(capacity);
    points.push(0.0);

    let mut net = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut trough = 0.0_f64;
    let mut win_spins = 0_u32;
    let mut losing_spins = 0_u32;

    for _ in 0..settings.spins {
        let outcome = model.spin(settings.bet_size, source)?;
        if outcome.won {
            win_spins += 1;
        } else {
            losing_spins += 1;
        }
        net += outcome.change;
        peak = peak.max(net);
        trough = trough.min(net);
        points.push(net);
    }

    let summary = SessionSummary {
        spins: settings.spins,
        win_spins,
        losing_spins,
        final_net: net,
        peak,
        trough,
        volatility: volatility(&points),
        max_drawdown: max_drawdown(&points),
    };
    Ok(SessionRun { points, summary })
}

/// Single-session entry point for UI consumers. Without a source the run is
/// seeded from OS entropy and is not reproducible.
///
/// # Errors
///
/// Returns an error if the settings carry an invalid bet size.
pub fn run_simulation(
    settings: &SimSettings,
    source: Option<&mut dyn DrawSource>,
) -> Result<SessionRun, SimError> {
    match source {
        Some(source) => run_session(settings, source),
        None => run_session(settings, &mut SeededRandom::unseeded()),
    }
}

/// Population standard deviation.
#[must_use]
pub fn volatility(points: &[f64]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let count = usize_to_f64(points.len());
    let mean = points.iter().sum::<f64>() / count;
    let variance = points
        .iter()
        .map(|value| {
            let delta = value - mean;
            delta * delta
        })
        .sum::<f64>()
        / count;
    variance.sqrt()
}

#[must_use]
pub fn max_drawdown(points: &[f64]) -> f64 {
    let mut running_peak = 0.0_f64;
    let mut worst = 0.0_f64;
    for &value in points {
        running_peak = running_peak.max(value);
        worst = worst.max(running_peak - value);
    }
    worst
}
