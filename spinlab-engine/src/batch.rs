//! Multi-run aggregator.
//!
//! Every run `i` is seeded with `base_seed + i * SEED_STRIDE` (wrapping), so
//! any single run can be replayed from `(base_seed, i)` without the others.
//! Runs past the display cap keep only their summary, folded into a tail.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::numbers::{percent, u64_to_f64};
use crate::rng::SeededRandom;
use crate::session::{SessionRun, SessionSummary, run_session};
use crate::settings::SimSettings;

/// Number of runs whose full trajectory is kept for display.
pub const DEFAULT_DISPLAY_CAP: usize = 100;
/// Linear spacing between consecutive run seeds.
pub const SEED_STRIDE: u32 = 9973;

/// Seed for run `index` of a batch started from `base_seed`.
#[must_use]
pub const fn derive_run_seed(base_seed: u32, index: u32) -> u32 {
    base_seed.wrapping_add(index.wrapping_mul(SEED_STRIDE))
}

/// Parameters for one batch recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub settings: SimSettings,
    pub run_count: u32,
    pub base_seed: u32,
    #[serde(default = "default_display_cap")]
    pub display_cap: usize,
}

const fn default_display_cap() -> usize {
    DEFAULT_DISPLAY_CAP
}

impl BatchRequest {
    #[must_use]
    pub const fn new(settings: SimSettings, run_count: u32, base_seed: u32) -> Self {
        Self {
            settings,
            run_count,
            base_seed,
            display_cap: DEFAULT_DISPLAY_CAP,
        }
    }

    #[must_use]
    pub const fn with_display_cap(mut self, display_cap: usize) -> Self {
        self.display_cap = display_cap;
        self
    }

    /// Run count after clamping to at least one run.
    #[must_use]
    pub const fn effective_run_count(&self) -> u32 {
        if self.run_count == 0 { 1 } else { self.run_count }
    }
}

/// A displayed run with the seed that reproduces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub index: u32,
    pub seed: u32,
    pub run: SessionRun,
}

/// Summary-only rollup of runs beyond the display cap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailSummary {
    pub run_count: u32,
    pub final_net_sum: f64,
    pub win_spins: u64,
    pub losing_spins: u64,
    /// Spins-weighted percentage across every tail run.
    pub win_rate: f64,
    pub loss_rate: f64,
}

/// Everything a chart or table renderer needs for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub run_count: u32,
    pub runs: Vec<RunRecord>,
    pub mean_trajectory: Vec<f64>,
    pub tail: Option<TailSummary>,
    pub total_final_net: f64,
}

impl BatchResult {
    #[must_use]
    pub fn mean_final_net(&self) -> f64 {
        self.total_final_net / f64::from(self.run_count.max(1))
    }

    /// Displayed run with the highest final net.
    #[must_use]
    pub fn best_run(&self) -> Option<&RunRecord> {
        self.runs
            .iter()
            .max_by(|a, b| a.run.summary.final_net.total_cmp(&b.run.summary.final_net))
    }

    /// Displayed run with the lowest final net.
    #[must_use]
    pub fn worst_run(&self) -> Option<&RunRecord> {
        self.runs
            .iter()
            .min_by(|a, b| a.run.summary.final_net.total_cmp(&b.run.summary.final_net))
    }
}

#[derive(Debug)]
struct BatchAccumulator {
    spins: u32,
    display_cap: usize,
    run_count: u32,
    sums: Vec<f64>,
    runs: Vec<RunRecord>,
    total_final_net: f64,
    tail_runs: u32,
    tail_final_net: f64,
    tail_win_spins: u64,
    tail_losing_spins: u64,
}

impl BatchAccumulator {
    fn new(request: &BatchRequest) -> Self {
        let width = usize::try_from(request.settings.spins)
            .unwrap_or(0)
            .saturating_add(1);
        let run_count = request.effective_run_count();
        let kept = usize::try_from(run_count)
            .unwrap_or(usize::MAX)
            .min(request.display_cap);
        Self {
            spins: request.settings.spins,
            display_cap: request.display_cap,
            run_count,
            sums: vec![0.0; width],
            runs: Vec::with_capacity(kept),
            total_final_net: 0.0,
            tail_runs: 0,
            tail_final_net: 0.0,
            tail_win_spins: 0,
            tail_losing_spins: 0,
        }
    }

    fn ingest(&mut self, index: u32, seed: u32, run: SessionRun) {
        for (sum, point) in self.sums.iter_mut().zip(&run.points) {
            *sum += point;
        }
        self.total_final_net += run.summary.final_net;
        if self.runs.len() < self.display_cap {
            self.runs.push(RunRecord { index, seed, run });
        } else {
            self.ingest_tail(&run.summary);
        }
    }

    fn ingest_tail(&mut self, summary: &SessionSummary) {
        self.tail_runs += 1;
        self.tail_final_net += summary.final_net;
        self.tail_win_spins = self
            .tail_win_spins
            .saturating_add(u64::from(summary.win_spins));
        self.tail_losing_spins = self
            .tail_losing_spins
            .saturating_add(u64::from(summary.losing_spins));
    }

    fn finish(self) -> BatchResult {
        let denom = f64::from(self.run_count);
        let mean_trajectory = self.sums.into_iter().map(|sum| sum / denom).collect();
        let tail = (self.tail_runs > 0).then(|| {
            let tail_spins = u64::from(self.tail_runs) * u64::from(self.spins);
            TailSummary {
                run_count: self.tail_runs,
                final_net_sum: self.tail_final_net,
                win_spins: self.tail_win_spins,
                losing_spins: self.tail_losing_spins,
                win_rate: percent(self.tail_win_spins, tail_spins),
                loss_rate: percent(self.tail_losing_spins, tail_spins),
            }
        });
        log::debug!(
            "batch finished: {} runs, {} displayed, mean final net {:.4}",
            self.run_count,
            self.runs.len(),
            self.total_final_net / u64_to_f64(u64::from(self.run_count))
        );
        BatchResult {
            run_count: self.run_count,
            runs: self.runs,
            mean_trajectory,
            tail,
            total_final_net: self.total_final_net,
        }
    }
}

fn run_indexed(request: &BatchRequest, index: u32) -> Result<(u32, SessionRun), SimError> {
    let seed = derive_run_seed(request.base_seed, index);
    let run = run_session(&request.settings, &mut SeededRandom::new(seed))?;
    log::trace!(
        "run {index} seed {seed}: final net {:.4}",
        run.summary.final_net
    );
    Ok((seed, run))
}

/// Run every session of the batch sequentially and fold the results.
///
/// # Errors
///
/// Returns an error if the settings carry an invalid bet size.
pub fn run_batch(request: &BatchRequest) -> Result<BatchResult, SimError> {
    request.settings.validate()?;
    let mut accumulator = BatchAccumulator::new(request);
    log::debug!(
        "batch start: {} runs of {} from base seed {}",
        accumulator.run_count,
        request.settings.machine.key(),
        request.base_seed
    );
    for index in 0..accumulator.run_count {
        let (seed, run) = run_indexed(request, index)?;
        accumulator.ingest(index, seed, run);
    }
    Ok(accumulator.finish())
}

/// Run sessions on the rayon pool, then fold them in run-index order.
///
/// # Errors
///
/// Returns an error if the settings carry an invalid bet size.
#[cfg(feature = "parallel")]
pub fn run_batch_parallel(request: &BatchRequest) -> Result<BatchResult, SimError> {
    use rayon::prelude::*;

    request.settings.validate()?;
    let mut accumulator = BatchAccumulator::new(request);
    let runs = (0..accumulator.run_count)
        .into_par_iter()
        .map(|index| run_indexed(request, index))
        .collect::<Result<Vec<_>, SimError>>()?;
    for (index, (seed, run)) in (0..accumulator.run_count).zip(runs) {
        accumulator.ingest(index, seed, run);
    }
    Ok(accumulator.finish())
}
