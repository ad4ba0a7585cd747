use anyhow::{Context, Result};
use serde::Serialize;
use spinlab_engine::numbers::{percent, usize_to_f64};
use spinlab_engine::{BatchRequest, BatchResult, DEFAULT_DISPLAY_CAP, SimSettings, run_batch};
use std::time::Instant;

use super::acceptance::check_batch;
use super::scenarios::Scenario;
use super::seeds::SeedInfo;
use crate::util::trajectory_digest;

/// Batch shape shared by every scenario in one tester invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationPlan {
    pub runs: u32,
    pub spins: Option<u32>,
    pub bet_size: Option<f64>,
    pub display_cap: usize,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            runs: 100,
            spins: None,
            bet_size: None,
            display_cap: DEFAULT_DISPLAY_CAP,
        }
    }
}

impl SimulationPlan {
    /// Scenario settings with the plan's overrides applied.
    #[must_use]
    pub fn settings_for(&self, base: SimSettings) -> SimSettings {
        let with_spins = self.spins.map_or(base, |spins| base.with_spins(spins));
        self.bet_size
            .map_or(with_spins, |bet| with_spins.with_bet_size(bet))
    }

    #[must_use]
    pub fn request_for(&self, scenario: &Scenario, seed: u32) -> BatchRequest {
        BatchRequest::new(self.settings_for(scenario.settings), self.runs, seed)
            .with_display_cap(self.display_cap)
    }
}

/// One scenario x seed batch, flattened for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRecord {
    pub scenario: String,
    pub label: String,
    pub seed: u32,
    pub runs: u32,
    pub spins: u32,
    pub bet_size: f64,
    pub total_final_net: f64,
    pub mean_final_net: f64,
    pub best_final_net: Option<f64>,
    pub worst_final_net: Option<f64>,
    pub win_rate: f64,
    pub mean_volatility: f64,
    pub max_drawdown: f64,
    pub tail_runs: u32,
    pub trajectory_digest: String,
    pub duration_ms: u64,
    pub passed: bool,
    pub failures: Vec<String>,
}

impl BatchRecord {
    fn from_result(
        scenario: &Scenario,
        request: &BatchRequest,
        result: &BatchResult,
        duration_ms: u64,
        failures: Vec<String>,
    ) -> Self {
        let displayed_wins: u64 = result
            .runs
            .iter()
            .map(|r| u64::from(r.run.summary.win_spins))
            .sum();
        let wins = displayed_wins + result.tail.map_or(0, |t| t.win_spins);
        let total_spins = u64::from(result.run_count) * u64::from(request.settings.spins);
        let mean_volatility = if result.runs.is_empty() {
            0.0
        } else {
            result
                .runs
                .iter()
                .map(|r| r.run.summary.volatility)
                .sum::<f64>()
                / usize_to_f64(result.runs.len())
        };
        let max_drawdown = result
            .runs
            .iter()
            .map(|r| r.run.summary.max_drawdown)
            .fold(0.0_f64, f64::max);

        Self {
            scenario: scenario.key.clone(),
            label: request.settings.machine.label(),
            seed: request.base_seed,
            runs: result.run_count,
            spins: request.settings.spins,
            bet_size: request.settings.bet_size,
            total_final_net: result.total_final_net,
            mean_final_net: result.mean_final_net(),
            best_final_net: result.best_run().map(|r| r.run.summary.final_net),
            worst_final_net: result.worst_run().map(|r| r.run.summary.final_net),
            win_rate: percent(wins, total_spins),
            mean_volatility,
            max_drawdown,
            tail_runs: result.tail.map_or(0, |t| t.run_count),
            trajectory_digest: trajectory_digest(&result.mean_trajectory),
            duration_ms,
            passed: failures.is_empty(),
            failures,
        }
    }
}

/// Run one batch and check it.
pub fn run_scenario_batch(
    plan: &SimulationPlan,
    scenario: &Scenario,
    seed: &SeedInfo,
) -> Result<BatchRecord> {
    let request = plan.request_for(scenario, seed.seed);
    let started = Instant::now();
    let result = run_batch(&request)
        .with_context(|| format!("batch {} seed {} failed", scenario.key, seed.token))?;
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let failures = check_batch(&request, &result);
    if !failures.is_empty() {
        log::warn!(
            "{} seed {}: {} acceptance failures",
            scenario.key,
            seed.seed,
            failures.len()
        );
    }
    Ok(BatchRecord::from_result(
        scenario,
        &request,
        &result,
        duration_ms,
        failures,
    ))
}

/// Every scenario against every seed, in scenario-major order.
pub fn run_plan(
    plan: &SimulationPlan,
    scenarios: &[Scenario],
    seeds: &[SeedInfo],
) -> Result<Vec<BatchRecord>> {
    let mut records = Vec::with_capacity(scenarios.len() * seeds.len());
    for scenario in scenarios {
        for seed in seeds {
            records.push(run_scenario_batch(plan, scenario, seed)?);
        }
    }
    Ok(records)
}
