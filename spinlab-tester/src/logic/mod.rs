pub mod acceptance;
pub mod reports;
pub mod scenarios;
pub mod seeds;
pub mod simulation;

pub use acceptance::{FairnessRecord, even_money_fairness, validate_fairness};
pub use scenarios::{Scenario, expand_scenarios, get_scenario, list_scenarios};
pub use seeds::resolve_seed_inputs;
pub use simulation::{BatchRecord, SimulationPlan, run_plan};
