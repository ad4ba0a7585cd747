//! SpinLab Simulation Engine
//!
//! Platform-agnostic Monte Carlo core for the SpinLab slot and roulette
//! simulator. Given settings and a seed it produces cumulative bankroll
//! trajectories, per-session summaries and batch aggregates, with no rendering,
//! I/O or platform-specific dependencies.

pub mod batch;
pub mod catalog;
pub mod distribution;
pub mod error;
pub mod games;
pub mod numbers;
pub mod rng;
pub mod session;
pub mod settings;

// Re-export commonly used types
pub use batch::{
    BatchRequest, BatchResult, DEFAULT_DISPLAY_CAP, RunRecord, SEED_STRIDE, TailSummary,
    derive_run_seed, run_batch,
};
#[cfg(feature = "parallel")]
pub use batch::run_batch_parallel;
pub use catalog::{
    BetDefinition, CatalogEntry, RouletteBet, SlotProfile, roulette_bets, slot_profiles,
};
pub use distribution::{Outcome, expected_multiplier, sample, total_mass};
pub use error::SimError;
pub use games::{GameModel, RouletteWheel, SlotMachine, SpinOutcome};
pub use rng::{DrawSource, SeededRandom};
pub use session::{SessionRun, SessionSummary, run_session, run_simulation};
pub use settings::{Machine, SimSettings};

/// Random source factory: a reproducible draw function for `seed`.
#[must_use]
pub fn create_seeded_random(seed: u32) -> impl FnMut() -> f64 {
    let mut rng = SeededRandom::new(seed);
    move || rng.draw()
}

/// Starting configuration before any user interaction.
#[must_use]
pub fn default_settings() -> SimSettings {
    SimSettings::default()
}
