//! Static reference data: slot payout tables and roulette bet definitions.
//!
//! These catalogs are engine-internal constants. The UI reads them to render
//! choices; the engine never builds or mutates them per call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::distribution::Outcome;
use crate::error::SimError;

/// Pockets on a single-zero wheel.
pub const WHEEL_POCKETS: f64 = 37.0;

const STEADY_TABLE: [Outcome; 6] = [
    Outcome::new(0.38, 0.0),
    Outcome::new(0.25, 1.0),
    Outcome::new(0.26, 1.5),
    Outcome::new(0.09, 2.0),
    Outcome::new(0.018, 5.0),
    Outcome::new(0.002, 20.0),
];

const BALANCED_TABLE: [Outcome; 7] = [
    Outcome::new(0.62, 0.0),
    Outcome::new(0.16, 1.0),
    Outcome::new(0.13, 2.0),
    Outcome::new(0.06, 3.0),
    Outcome::new(0.025, 8.0),
    Outcome::new(0.004, 25.0),
    Outcome::new(0.001, 60.0),
];

const VOLATILE_TABLE: [Outcome; 7] = [
    Outcome::new(0.80, 0.0),
    Outcome::new(0.10, 1.0),
    Outcome::new(0.06, 2.0),
    Outcome::new(0.025, 6.0),
    Outcome::new(0.01, 15.0),
    Outcome::new(0.004, 45.0),
    Outcome::new(0.001, 250.0),
];

/// Slot volatility profile, each selecting a fixed outcome table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotProfile {
    /// Frequent small returns
    Steady,
    /// Mid-variance mix of small and large wins
    Balanced,
    /// Rare, large jackpots
    Volatile,
}

impl SlotProfile {
    pub const ALL: [Self; 3] = [Self::Steady, Self::Balanced, Self::Volatile];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Steady => "steady",
            Self::Balanced => "balanced",
            Self::Volatile => "volatile",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Steady => "Steady (low volatility)",
            Self::Balanced => "Balanced (medium volatility)",
            Self::Volatile => "Volatile (high volatility)",
        }
    }

    #[must_use]
    pub const fn table(self) -> &'static [Outcome] {
        match self {
            Self::Steady => &STEADY_TABLE,
            Self::Balanced => &BALANCED_TABLE,
            Self::Volatile => &VOLATILE_TABLE,
        }
    }
}

impl fmt::Display for SlotProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SlotProfile {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimError::UnknownProfile(s.to_string()))
    }
}

/// Roulette bet family. Each resolves to a single win probability and payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouletteBet {
    SingleNumber,
    Split,
    Street,
    Dozen,
    EvenMoney,
}

/// Probability, payout multiplier (stake included) and display label of a bet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BetDefinition {
    pub probability: f64,
    pub multiplier: f64,
    pub label: &'static str,
}

impl RouletteBet {
    pub const ALL: [Self; 5] = [
        Self::SingleNumber,
        Self::Split,
        Self::Street,
        Self::Dozen,
        Self::EvenMoney,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::SingleNumber => "single-number",
            Self::Split => "split",
            Self::Street => "street",
            Self::Dozen => "dozen",
            Self::EvenMoney => "even-money",
        }
    }

    #[must_use]
    pub fn definition(self) -> BetDefinition {
        let (pockets, multiplier, label) = match self {
            Self::SingleNumber => (1.0, 36.0, "Single number (35:1)"),
            Self::Split => (2.0, 18.0, "Split (17:1)"),
            Self::Street => (3.0, 12.0, "Street (11:1)"),
            Self::Dozen => (12.0, 3.0, "Dozen (2:1)"),
            Self::EvenMoney => (18.0, 2.0, "Even money (1:1)"),
        };
        BetDefinition {
            probability: pockets / WHEEL_POCKETS,
            multiplier,
            label,
        }
    }
}

impl fmt::Display for RouletteBet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RouletteBet {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bet| bet.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimError::UnknownBet(s.to_string()))
    }
}

/// Catalog row handed to UI consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub probability: Option<f64>,
    pub multiplier: Option<f64>,
    /// Expected payout per unit staked.
    pub expected_return: f64,
}

/// Slot profile labels keyed by profile id, in display order.
#[must_use]
pub fn slot_profiles() -> Vec<CatalogEntry> {
    SlotProfile::ALL
        .into_iter()
        .map(|profile| CatalogEntry {
            id: profile.id(),
            label: profile.label(),
            probability: None,
            multiplier: None,
            expected_return: crate::distribution::expected_multiplier(profile.table()),
        })
        .collect()
}

/// Roulette bet definitions keyed by bet id, in display order.
#[must_use]
pub fn roulette_bets() -> Vec<CatalogEntry> {
    RouletteBet::ALL
        .into_iter()
        .map(|bet| {
            let def = bet.definition();
            CatalogEntry {
                id: bet.id(),
                label: def.label,
                probability: Some(def.probability),
                multiplier: Some(def.multiplier),
                expected_return: def.probability * def.multiplier,
            }
        })
        .collect()
}
