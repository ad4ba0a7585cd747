//! Simulation configuration handed to the engine by value.
use serde::{Deserialize, Serialize};

use crate::catalog::{RouletteBet, SlotProfile};
use crate::error::SimError;

pub const DEFAULT_SPINS: u32 = 200;
pub const DEFAULT_BET_SIZE: f64 = 1.0;

/// Machine variant plus the one field that differs between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "machine", rename_all = "kebab-case")]
pub enum Machine {
    Slot { profile: SlotProfile },
    Roulette { bet: RouletteBet },
}

impl Machine {
    /// Short scenario-style key, e.g. `slot-balanced` or `roulette-dozen`.
    #[must_use]
    pub fn key(self) -> String {
        match self {
            Self::Slot { profile } => format!("slot-{}", profile.id()),
            Self::Roulette { bet } => format!("roulette-{}", bet.id()),
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Slot { profile } => format!("Slot - {}", profile.label()),
            Self::Roulette { bet } => format!("Roulette - {}", bet.definition().label),
        }
    }
}

/// Immutable settings for one batch of sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimSettings {
    #[serde(flatten)]
    pub machine: Machine,
    pub spins: u32,
    pub bet_size: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            machine: Machine::Slot {
                profile: SlotProfile::Balanced,
            },
            spins: DEFAULT_SPINS,
            bet_size: DEFAULT_BET_SIZE,
        }
    }
}

impl SimSettings {
    #[must_use]
    pub const fn slot(profile: SlotProfile) -> Self {
        Self {
            machine: Machine::Slot { profile },
            spins: DEFAULT_SPINS,
            bet_size: DEFAULT_BET_SIZE,
        }
    }

    #[must_use]
    pub const fn roulette(bet: RouletteBet) -> Self {
        Self {
            machine: Machine::Roulette { bet },
            spins: DEFAULT_SPINS,
            bet_size: DEFAULT_BET_SIZE,
        }
    }

    #[must_use]
    pub const fn with_spins(mut self, spins: u32) -> Self {
        self.spins = spins;
        self
    }

    #[must_use]
    pub const fn with_bet_size(mut self, bet_size: f64) -> Self {
        self.bet_size = bet_size;
        self
    }

    /// Parse a settings document such as
    /// `{"machine":"slot","profile":"balanced","spins":200,"betSize":1}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, names an unknown profile or
    /// bet, or carries an invalid bet size.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns [`SimError::InvalidBetSize`] unless the bet size is positive and finite.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.bet_size.is_finite() && self.bet_size > 0.0 {
            Ok(())
        } else {
            Err(SimError::InvalidBetSize(self.bet_size))
        }
    }
}
