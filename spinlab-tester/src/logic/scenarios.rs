use spinlab_engine::{Machine, RouletteBet, SimSettings, SlotProfile};

use crate::util::split_csv;

/// One machine configuration exercised by the tester.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub key: String,
    pub description: String,
    pub settings: SimSettings,
}

impl Scenario {
    #[must_use]
    pub fn from_settings(settings: SimSettings) -> Self {
        Self {
            key: settings.machine.key(),
            description: describe(settings.machine),
            settings,
        }
    }

    /// Scenario built from a user-supplied settings document.
    #[must_use]
    pub fn custom(settings: SimSettings) -> Self {
        Self {
            key: format!("custom-{}", settings.machine.key()),
            description: format!("{} (custom settings)", settings.machine.label()),
            settings,
        }
    }
}

fn describe(machine: Machine) -> String {
    match machine {
        Machine::Slot { profile } => format!(
            "{} slot, expected return {:.3}",
            profile.label(),
            spinlab_engine::expected_multiplier(profile.table())
        ),
        Machine::Roulette { bet } => {
            let def = bet.definition();
            format!(
                "{} bet, p={:.4} pays {}x",
                def.label, def.probability, def.multiplier
            )
        }
    }
}

#[must_use]
pub fn all_scenarios() -> Vec<Scenario> {
    SlotProfile::ALL
        .into_iter()
        .map(SimSettings::slot)
        .chain(RouletteBet::ALL.into_iter().map(SimSettings::roulette))
        .map(Scenario::from_settings)
        .collect()
}

#[must_use]
pub fn list_scenarios() -> Vec<(String, String)> {
    all_scenarios()
        .into_iter()
        .map(|s| (s.key, s.description))
        .collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<Scenario> {
    all_scenarios().into_iter().find(|s| s.key == key)
}

/// Split the `--scenarios` argument; `all` expands to every catalog key.
#[must_use]
pub fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        scenarios.retain(|s| !s.eq_ignore_ascii_case("all"));
        for (key, _) in list_scenarios() {
            if !scenarios.contains(&key) {
                scenarios.push(key);
            }
        }
    }
    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_one_scenario_per_machine() {
        let keys: Vec<String> = list_scenarios().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), 8);
        assert_eq!(keys.first().map(String::as_str), Some("slot-steady"));
        assert_eq!(keys.last().map(String::as_str), Some("roulette-even-money"));
    }

    #[test]
    fn lookup_by_key() {
        let scenario = get_scenario("roulette-dozen").unwrap();
        assert_eq!(
            scenario.settings.machine,
            Machine::Roulette {
                bet: RouletteBet::Dozen
            }
        );
        assert!(get_scenario("roulette-corner").is_none());
    }

    #[test]
    fn all_expands_without_duplicates() {
        let scenarios = expand_scenarios("slot-volatile, all");
        assert_eq!(scenarios.len(), 8);
        assert_eq!(scenarios[0], "slot-volatile");
        let single = expand_scenarios("slot-steady");
        assert_eq!(single, vec!["slot-steady"]);
    }

    #[test]
    fn custom_scenarios_are_tagged() {
        let scenario = Scenario::custom(SimSettings::default().with_spins(10));
        assert_eq!(scenario.key, "custom-slot-balanced");
        assert_eq!(scenario.settings.spins, 10);
    }
}
