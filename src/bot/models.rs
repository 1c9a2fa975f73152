//! Bot personalities and their playing parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playing style presets.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    TightPassive,
    #[default]
    TightAggressive,
    LoosePassive,
    LooseAggressive,
}

impl Personality {
    pub const ALL: [Self; 4] = [
        Self::TightPassive,
        Self::TightAggressive,
        Self::LoosePassive,
        Self::LooseAggressive,
    ];

    #[must_use]
    pub fn params(self) -> PersonalityParams {
        match self {
            Self::TightPassive => PersonalityParams::tight_passive(),
            Self::TightAggressive => PersonalityParams::tight_aggressive(),
            Self::LoosePassive => PersonalityParams::loose_passive(),
            Self::LooseAggressive => PersonalityParams::loose_aggressive(),
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::TightPassive => "tight-passive",
            Self::TightAggressive => "tight-aggressive",
            Self::LoosePassive => "loose-passive",
            Self::LooseAggressive => "loose-aggressive",
        };
        write!(f, "{repr}")
    }
}

/// Personality parameters
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PersonalityParams {
    /// Hand strength below this = fold when facing a bet
    pub fold_threshold: f32,

    /// Hand strength above this = consider raising
    pub raise_threshold: f32,

    /// Aggression factor (ratio of bets/raises to calls)
    pub aggression_factor: f32,

    /// Whether the bot bluffs
    pub bluffs: bool,

    /// Bluff frequency (0.0 to 1.0)
    pub bluff_frequency: f32,
}

impl PersonalityParams {
    /// Folds a lot, rarely raises
    #[must_use]
    pub fn tight_passive() -> Self {
        Self {
            fold_threshold: 0.30,
            raise_threshold: 0.70,
            aggression_factor: 0.5,
            bluffs: false,
            bluff_frequency: 0.0,
        }
    }

    /// Plays few hands, bets them hard
    #[must_use]
    pub fn tight_aggressive() -> Self {
        Self {
            fold_threshold: 0.30,
            raise_threshold: 0.45,
            aggression_factor: 2.5,
            bluffs: true,
            bluff_frequency: 0.10,
        }
    }

    /// Calls with almost anything
    #[must_use]
    pub fn loose_passive() -> Self {
        Self {
            fold_threshold: 0.12,
            raise_threshold: 0.75,
            aggression_factor: 0.5,
            bluffs: false,
            bluff_frequency: 0.0,
        }
    }

    /// Plays many hands and raises often
    #[must_use]
    pub fn loose_aggressive() -> Self {
        Self {
            fold_threshold: 0.12,
            raise_threshold: 0.35,
            aggression_factor: 3.0,
            bluffs: true,
            bluff_frequency: 0.25,
        }
    }
}
