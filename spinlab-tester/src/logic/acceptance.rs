use anyhow::{Result, ensure};
use serde::Serialize;
use spinlab_engine::{
    BatchRequest, BatchResult, RouletteBet, SeededRandom, SessionRun, SimSettings,
    derive_run_seed, run_session,
};

/// Spins used by the even-money fairness check.
pub const FAIRNESS_SPINS: u32 = 10_000;
/// Allowed distance between the observed and theoretical win fraction.
pub const FAIRNESS_TOLERANCE: f64 = 0.025;

const NET_EPSILON: f64 = 1e-9;

/// Outcome of the even-money fairness check for one seed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairnessRecord {
    pub seed: u32,
    pub spins: u32,
    pub expected_rate: f64,
    pub observed_rate: f64,
    pub tolerance: f64,
    pub passed: bool,
}

/// Run every batch-level check, collecting failures instead of stopping at the first.
#[must_use]
pub fn check_batch(request: &BatchRequest, result: &BatchResult) -> Vec<String> {
    let checks: [(&str, Result<()>); 4] = [
        ("trajectory", check_trajectories(request, result)),
        ("summary", check_summaries(result)),
        ("fold", check_fold(result)),
        ("replay", check_replay(request, result)),
    ];
    checks
        .into_iter()
        .filter_map(|(name, outcome)| outcome.err().map(|e| format!("{name}: {e:#}")))
        .collect()
}

fn check_trajectories(request: &BatchRequest, result: &BatchResult) -> Result<()> {
    let width = usize::try_from(request.settings.spins)?.saturating_add(1);
    ensure!(
        result.mean_trajectory.len() == width,
        "mean trajectory has {} points, expected {width}",
        result.mean_trajectory.len()
    );
    for record in &result.runs {
        ensure!(
            record.run.points.len() == width,
            "run {} has {} points, expected {width}",
            record.index,
            record.run.points.len()
        );
        ensure!(
            record.run.points.first() == Some(&0.0),
            "run {} does not start at 0",
            record.index
        );
    }
    Ok(())
}

fn check_run_summary(index: u32, run: &SessionRun) -> Result<()> {
    let summary = &run.summary;
    ensure!(
        summary.win_spins + summary.losing_spins == summary.spins,
        "run {index}: {} wins + {} losses != {} spins",
        summary.win_spins,
        summary.losing_spins,
        summary.spins
    );
    let last = run.points.last().copied().unwrap_or(0.0);
    ensure!(
        (summary.final_net - last).abs() < NET_EPSILON,
        "run {index}: final net {} differs from last point {last}",
        summary.final_net
    );
    let peak = run.points.iter().copied().fold(0.0_f64, f64::max);
    let trough = run.points.iter().copied().fold(0.0_f64, f64::min);
    ensure!(
        (summary.peak - peak).abs() < NET_EPSILON && (summary.trough - trough).abs() < NET_EPSILON,
        "run {index}: peak/trough {}/{} do not match trajectory {peak}/{trough}",
        summary.peak,
        summary.trough
    );
    ensure!(
        summary.volatility >= 0.0 && summary.volatility.is_finite(),
        "run {index}: volatility {} is not a finite non-negative value",
        summary.volatility
    );
    ensure!(
        summary.max_drawdown >= 0.0 && summary.max_drawdown <= peak - trough + NET_EPSILON,
        "run {index}: drawdown {} outside [0, {}]",
        summary.max_drawdown,
        peak - trough
    );
    Ok(())
}

fn check_summaries(result: &BatchResult) -> Result<()> {
    for record in &result.runs {
        check_run_summary(record.index, &record.run)?;
    }
    if let Some(tail) = &result.tail {
        ensure!(
            (0.0..=100.0).contains(&tail.win_rate) && (0.0..=100.0).contains(&tail.loss_rate),
            "tail rates {}/{} outside 0..=100",
            tail.win_rate,
            tail.loss_rate
        );
    }
    Ok(())
}

fn check_fold(result: &BatchResult) -> Result<()> {
    let displayed: f64 = result.runs.iter().map(|r| r.run.summary.final_net).sum();
    let tail = result.tail.map_or(0.0, |t| t.final_net_sum);
    let folded = displayed + tail;
    let scale = result.total_final_net.abs().max(1.0);
    ensure!(
        (folded - result.total_final_net).abs() <= NET_EPSILON * scale,
        "total final net {} differs from summed runs {folded}",
        result.total_final_net
    );
    let counted = u32::try_from(result.runs.len())? + result.tail.map_or(0, |t| t.run_count);
    ensure!(
        counted == result.run_count,
        "{counted} runs accounted for, batch reports {}",
        result.run_count
    );
    Ok(())
}

fn check_replay(request: &BatchRequest, result: &BatchResult) -> Result<()> {
    let Some(first) = result.runs.first() else {
        return Ok(());
    };
    let seed = derive_run_seed(request.base_seed, first.index);
    ensure!(first.seed == seed, "run 0 seed {} != derived {seed}", first.seed);
    let replay = run_session(&request.settings, &mut SeededRandom::new(seed))?;
    ensure!(
        replay == first.run,
        "replaying run {} from seed {seed} diverged",
        first.index
    );
    Ok(())
}

/// Even-money bet over [`FAIRNESS_SPINS`] spins must win close to 18/37 of the time.
pub fn even_money_fairness(seed: u32) -> Result<FairnessRecord> {
    let settings = SimSettings::roulette(RouletteBet::EvenMoney).with_spins(FAIRNESS_SPINS);
    let run = run_session(&settings, &mut SeededRandom::new(seed))?;
    let expected_rate = RouletteBet::EvenMoney.definition().probability;
    let observed_rate = f64::from(run.summary.win_spins) / f64::from(FAIRNESS_SPINS);
    Ok(FairnessRecord {
        seed,
        spins: FAIRNESS_SPINS,
        expected_rate,
        observed_rate,
        tolerance: FAIRNESS_TOLERANCE,
        passed: (observed_rate - expected_rate).abs() <= FAIRNESS_TOLERANCE,
    })
}

/// Fail when any fairness record is out of bounds.
pub fn validate_fairness(records: &[FairnessRecord]) -> Result<()> {
    for record in records {
        ensure!(
            record.passed,
            "even-money win rate {:.4} for seed {} is more than {} from {:.4}",
            record.observed_rate,
            record.seed,
            record.tolerance,
            record.expected_rate
        );
    }
    Ok(())
}
