//! Slot and roulette per-spin payout rules.
use crate::catalog::{BetDefinition, RouletteBet, SlotProfile};
use crate::distribution::{Outcome, sample};
use crate::error::SimError;
use crate::rng::DrawSource;
use crate::settings::Machine;

/// Result of a single spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinOutcome {
    /// Net bankroll change (payout minus stake).
    pub change: f64,
    pub won: bool,
}

/// Slot machine driven by one profile table.
#[derive(Debug, Clone, Copy)]
pub struct SlotMachine {
    table: &'static [Outcome],
}

impl SlotMachine {
    #[must_use]
    pub const fn new(profile: SlotProfile) -> Self {
        Self {
            table: profile.table(),
        }
    }

    /// Spin once. A breakeven multiplier of 1.0 is not a win spin.
    ///
    /// # Errors
    ///
    /// Returns an error if the outcome table is empty.
    pub fn spin(&self, bet_size: f64, source: &mut dyn DrawSource) -> Result<SpinOutcome, SimError> {
        let multiplier = sample(self.table, source.draw())?;
        let change = bet_size * multiplier - bet_size;
        Ok(SpinOutcome {
            change,
            won: change > 0.0,
        })
    }
}

/// Roulette wheel resolving one bet with a single win threshold.
#[derive(Debug, Clone, Copy)]
pub struct RouletteWheel {
    bet: BetDefinition,
}

impl RouletteWheel {
    #[must_use]
    pub fn new(bet: RouletteBet) -> Self {
        Self {
            bet: bet.definition(),
        }
    }

    pub fn spin(&self, bet_size: f64, source: &mut dyn DrawSource) -> SpinOutcome {
        let won = source.draw() <= self.bet.probability;
        let change = if won {
            bet_size * (self.bet.multiplier - 1.0)
        } else {
            -bet_size
        };
        SpinOutcome { change, won }
    }
}

/// Game model selected by the settings' machine variant.
#[derive(Debug, Clone, Copy)]
pub enum GameModel {
    Slot(SlotMachine),
    Roulette(RouletteWheel),
}

impl GameModel {
    #[must_use]
    pub fn for_machine(machine: Machine) -> Self {
        match machine {
            Machine::Slot { profile } => Self::Slot(SlotMachine::new(profile)),
            Machine::Roulette { bet } => Self::Roulette(RouletteWheel::new(bet)),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the slot outcome table is empty.
    pub fn spin(&self, bet_size: f64, source: &mut dyn DrawSource) -> Result<SpinOutcome, SimError> {
        match self {
            Self::Slot(machine) => machine.spin(bet_size, source),
            Self::Roulette(wheel) => Ok(wheel.spin(bet_size, source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(value: f64) -> impl FnMut() -> f64 {
        move || value
    }

    #[test]
    fn slot_total_loss_costs_the_stake() {
        let machine = SlotMachine::new(SlotProfile::Balanced);
        let outcome = machine.spin(10.0, &mut fixed(0.1)).unwrap();
        assert!((outcome.change + 10.0).abs() < f64::EPSILON);
        assert!(!outcome.won);
    }

    #[test]
    fn slot_breakeven_counts_as_losing_spin() {
        let machine = SlotMachine::new(SlotProfile::Balanced);
        // 0.70 lands in the (0.16, x1) band.
        let outcome = machine.spin(10.0, &mut fixed(0.70)).unwrap();
        assert!(outcome.change.abs() < f64::EPSILON);
        assert!(!outcome.won);
    }

    #[test]
    fn slot_jackpot_pays_net_of_stake() {
        let machine = SlotMachine::new(SlotProfile::Volatile);
        let outcome = machine.spin(2.0, &mut fixed(0.9995)).unwrap();
        assert!((outcome.change - 498.0).abs() < 1e-9);
        assert!(outcome.won);
    }

    #[test]
    fn roulette_uses_probability_as_inclusive_threshold() {
        let wheel = RouletteWheel::new(RouletteBet::EvenMoney);
        let threshold = 18.0 / 37.0;
        let win = wheel.spin(5.0, &mut fixed(threshold));
        assert!(win.won);
        assert!((win.change - 5.0).abs() < f64::EPSILON);
        let loss = wheel.spin(5.0, &mut fixed(threshold + 1e-9));
        assert!(!loss.won);
        assert!((loss.change + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_number_win_pays_thirty_five_to_one() {
        let wheel = RouletteWheel::new(RouletteBet::SingleNumber);
        let outcome = wheel.spin(1.0, &mut fixed(0.0));
        assert!((outcome.change - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn model_dispatches_on_machine() {
        let model = GameModel::for_machine(Machine::Roulette {
            bet: RouletteBet::Dozen,
        });
        assert!(matches!(model, GameModel::Roulette(_)));
        let outcome = model.spin(1.0, &mut fixed(0.5)).unwrap();
        assert!(!outcome.won);
    }
}
