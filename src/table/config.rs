//! Table configuration models.

use serde::{Deserialize, Serialize};

use super::TableError;
use crate::game::{
    constants::{DEFAULT_ILLEGAL_ACTION_ATTEMPTS, DEFAULT_STARTING_STACK, MAX_PLAYERS},
    entities::Chips,
    variant::VariantDescriptor,
};

/// Table configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TableSettings {
    /// Table name
    pub name: String,

    /// Game played at the table
    pub variant: VariantDescriptor,

    /// Maximum number of players (default: 10)
    pub max_players: usize,

    /// Stack given to players seated without one
    pub starting_stack: Chips,

    /// Burn a card before each board deal
    pub burn_cards: bool,

    /// Refused actions a seat may request per decision before the table
    /// checks or folds for it
    pub max_illegal_attempts: u8,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            name: "Default Table".to_string(),
            variant: VariantDescriptor::default(),
            max_players: MAX_PLAYERS,
            starting_stack: DEFAULT_STARTING_STACK,
            burn_cards: false,
            max_illegal_attempts: DEFAULT_ILLEGAL_ACTION_ATTEMPTS,
        }
    }
}

impl TableSettings {
    #[must_use]
    pub fn with_variant(variant: VariantDescriptor) -> Self {
        Self {
            name: variant.name.clone(),
            variant,
            ..Self::default()
        }
    }

    /// Parses and validates settings from JSON. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|err| TableError::InvalidSettings(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), TableError> {
        self.variant.validate()?;

        let max = MAX_PLAYERS.min(self.variant.max_players(self.burn_cards));
        if self.max_players < 2 || self.max_players > max {
            return Err(TableError::InvalidSettings(format!(
                "Max players must be between 2 and {max}"
            )));
        }

        if self.starting_stack == 0 {
            return Err(TableError::InvalidSettings(
                "Starting stack must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
