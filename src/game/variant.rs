//! Variant descriptors.
//!
//! A descriptor is read-only data that tells the hand engine which game it
//! is running: board or stud dealing, hole cards, forced bets, limit or
//! no-limit betting, and how hands and pots are resolved. The engine
//! branches on these fields and never mutates them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    constants::{DECK_SIZE, LIMIT_RAISE_CAP},
    entities::{Chips, Street},
    errors::VariantError,
};

/// How cards reach the players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStructure {
    /// Hole cards plus a shared board; blinds open the action.
    Board,
    /// Each player's own mix of down and up cards; antes and a bring-in.
    Stud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BettingStructure {
    Limit,
    NoLimit,
}

impl fmt::Display for BettingStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BettingStructure::Limit => write!(f, "limit"),
            BettingStructure::NoLimit => write!(f, "no-limit"),
        }
    }
}

/// Which cards may form a player's five-card hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandResolution {
    /// Best five of every card the player can use.
    AnyFive,
    /// Exactly two hole cards and three board cards.
    TwoPlusThree,
}

/// How each pot is divided at showdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotResolution {
    HighOnly,
    /// Half to the best ace-to-five low, with no qualifier.
    HiLoAceToFive,
    /// Half to the best eight-or-better low when one exists.
    HiLoMustQualify,
}

impl PotResolution {
    #[must_use]
    pub fn is_hi_lo(self) -> bool {
        !matches!(self, Self::HighOnly)
    }
}

/// Forced bet and bet sizes. Fields a variant doesn't use stay zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedBets {
    #[serde(default)]
    pub small_blind: Chips,
    #[serde(default)]
    pub big_blind: Chips,
    #[serde(default)]
    pub ante: Chips,
    #[serde(default)]
    pub bring_in: Chips,
    /// Fixed bet on early limit streets; minimum opening bet in stud.
    #[serde(default)]
    pub small_bet: Chips,
    /// Fixed bet on late limit streets.
    #[serde(default)]
    pub big_bet: Chips,
}

/// Cards dealt as a street opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreetDeal {
    pub board: u8,
    pub down: u8,
    pub up: u8,
}

/// Game variant descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDescriptor {
    /// Display name
    pub name: String,

    pub structure: GameStructure,

    /// Down cards dealt before the first betting round
    pub hole_cards: u8,

    pub forced_bets: ForcedBets,

    pub betting: BettingStructure,

    pub hand_resolution: HandResolution,

    pub pot_resolution: PotResolution,

    /// Voluntary bets/raises allowed per street. Limit games default to 4
    /// when unset; no-limit games are uncapped when unset.
    #[serde(default)]
    pub raise_cap: Option<u8>,
}

impl Default for VariantDescriptor {
    fn default() -> Self {
        Self::texas_holdem()
    }
}

impl VariantDescriptor {
    /// No-limit Texas Hold'em, blinds 10/20.
    #[must_use]
    pub fn texas_holdem() -> Self {
        Self {
            name: "Texas Hold'em".to_string(),
            structure: GameStructure::Board,
            hole_cards: 2,
            forced_bets: ForcedBets {
                small_blind: 10,
                big_blind: 20,
                ..ForcedBets::default()
            },
            betting: BettingStructure::NoLimit,
            hand_resolution: HandResolution::AnyFive,
            pot_resolution: PotResolution::HighOnly,
            raise_cap: None,
        }
    }

    /// Limit Omaha eight-or-better, blinds 10/20, bets 20/40.
    #[must_use]
    pub fn omaha_hi_lo() -> Self {
        Self {
            name: "Omaha Hi-Lo".to_string(),
            structure: GameStructure::Board,
            hole_cards: 4,
            forced_bets: ForcedBets {
                small_blind: 10,
                big_blind: 20,
                small_bet: 20,
                big_bet: 40,
                ..ForcedBets::default()
            },
            betting: BettingStructure::Limit,
            hand_resolution: HandResolution::TwoPlusThree,
            pot_resolution: PotResolution::HiLoMustQualify,
            raise_cap: Some(LIMIT_RAISE_CAP),
        }
    }

    /// Limit seven card stud, ante 5, bring-in 10, bets 20/40.
    #[must_use]
    pub fn seven_card_stud() -> Self {
        Self {
            name: "Seven Card Stud".to_string(),
            structure: GameStructure::Stud,
            hole_cards: 2,
            forced_bets: ForcedBets {
                ante: 5,
                bring_in: 10,
                small_bet: 20,
                big_bet: 40,
                ..ForcedBets::default()
            },
            betting: BettingStructure::Limit,
            hand_resolution: HandResolution::AnyFive,
            pot_resolution: PotResolution::HighOnly,
            raise_cap: Some(LIMIT_RAISE_CAP),
        }
    }

    /// Seven card stud eight-or-better.
    #[must_use]
    pub fn seven_card_stud_hi_lo() -> Self {
        Self {
            name: "Seven Card Stud Hi-Lo".to_string(),
            pot_resolution: PotResolution::HiLoMustQualify,
            ..Self::seven_card_stud()
        }
    }

    /// Parses and validates a descriptor from JSON.
    pub fn from_json(json: &str) -> Result<Self, VariantError> {
        let variant: Self = serde_json::from_str(json)?;
        variant.validate()?;
        Ok(variant)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), VariantError> {
        let bets = &self.forced_bets;
        if self.hand_resolution == HandResolution::TwoPlusThree
            && self.structure != GameStructure::Board
        {
            return Err(VariantError::TwoPlusThreeNeedsBoard);
        }

        match self.structure {
            GameStructure::Board => {
                if !(2..=7).contains(&self.hole_cards) {
                    return Err(VariantError::InvalidHoleCards {
                        hole_cards: self.hole_cards,
                    });
                }
                if bets.big_blind == 0 || bets.big_blind < bets.small_blind {
                    return Err(VariantError::InvalidBlinds);
                }
            }
            GameStructure::Stud => {
                if !(1..=3).contains(&self.hole_cards) {
                    return Err(VariantError::InvalidHoleCards {
                        hole_cards: self.hole_cards,
                    });
                }
                if bets.small_bet == 0 {
                    return Err(VariantError::InvalidLimitBets);
                }
                if bets.bring_in > bets.small_bet {
                    return Err(VariantError::BringInTooLarge {
                        bring_in: bets.bring_in,
                        small_bet: bets.small_bet,
                    });
                }
            }
        }

        if self.betting == BettingStructure::Limit
            && (bets.small_bet == 0 || bets.big_bet < bets.small_bet)
        {
            return Err(VariantError::InvalidLimitBets);
        }

        if self.raise_cap == Some(0) {
            return Err(VariantError::InvalidRaiseCap);
        }

        Ok(())
    }

    /// Cards dealt at the start of each betting street, first street first.
    #[must_use]
    pub fn deal_plan(&self) -> Vec<StreetDeal> {
        match self.structure {
            GameStructure::Board => vec![
                StreetDeal {
                    down: self.hole_cards,
                    ..StreetDeal::default()
                },
                StreetDeal {
                    board: 3,
                    ..StreetDeal::default()
                },
                StreetDeal {
                    board: 1,
                    ..StreetDeal::default()
                },
                StreetDeal {
                    board: 1,
                    ..StreetDeal::default()
                },
            ],
            GameStructure::Stud => vec![
                StreetDeal {
                    down: self.hole_cards,
                    up: 1,
                    ..StreetDeal::default()
                },
                StreetDeal {
                    up: 1,
                    ..StreetDeal::default()
                },
                StreetDeal {
                    up: 1,
                    ..StreetDeal::default()
                },
                StreetDeal {
                    up: 1,
                    ..StreetDeal::default()
                },
                StreetDeal {
                    down: 1,
                    ..StreetDeal::default()
                },
            ],
        }
    }

    /// Number of betting streets.
    #[must_use]
    pub fn num_streets(&self) -> usize {
        match self.structure {
            GameStructure::Board => 4,
            GameStructure::Stud => 5,
        }
    }

    /// The fixed bet/raise increment in limit games, or the minimum opening
    /// bet in no-limit games. Limit games switch to the big bet from the
    /// third street on.
    #[must_use]
    pub fn bet_size(&self, street: Street) -> Chips {
        let bets = &self.forced_bets;
        match (self.betting, self.structure) {
            (BettingStructure::NoLimit, GameStructure::Board) => bets.big_blind,
            (BettingStructure::NoLimit, GameStructure::Stud) => bets.small_bet,
            (BettingStructure::Limit, _) => match street.betting_index() {
                Some(0 | 1) => bets.small_bet,
                _ => bets.big_bet,
            },
        }
    }

    /// Effective cap on voluntary bets/raises per street.
    #[must_use]
    pub fn effective_raise_cap(&self) -> Option<u8> {
        match self.betting {
            BettingStructure::Limit => Some(self.raise_cap.unwrap_or(LIMIT_RAISE_CAP)),
            BettingStructure::NoLimit => self.raise_cap,
        }
    }

    #[must_use]
    pub fn cards_per_player(&self) -> usize {
        self.deal_plan()
            .iter()
            .map(|deal| usize::from(deal.down + deal.up))
            .sum()
    }

    #[must_use]
    pub fn board_cards(&self) -> usize {
        self.deal_plan()
            .iter()
            .map(|deal| usize::from(deal.board))
            .sum()
    }

    /// Cards burned per hand when burning is on: one before each board deal.
    #[must_use]
    pub fn burn_cards(&self) -> usize {
        self.deal_plan().iter().filter(|deal| deal.board > 0).count()
    }

    /// Most players a single deck can deal a full hand to.
    #[must_use]
    pub fn max_players(&self, burn: bool) -> usize {
        let burns = if burn { self.burn_cards() } else { 0 };
        let shared = self.board_cards() + burns;
        DECK_SIZE.saturating_sub(shared) / self.cards_per_player().max(1)
    }

    /// Street name the way players of this variant call it.
    #[must_use]
    pub fn street_name(&self, street: Street) -> String {
        match (self.structure, street) {
            (GameStructure::Stud, Street::PreFlop) => "third street".to_string(),
            (GameStructure::Stud, Street::Flop) => "fourth street".to_string(),
            (GameStructure::Stud, Street::Turn) => "fifth street".to_string(),
            (GameStructure::Stud, Street::River) => "sixth street".to_string(),
            (GameStructure::Stud, Street::Final) => "seventh street".to_string(),
            _ => street.to_string(),
        }
    }
}

impl fmt::Display for VariantDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.betting)
    }
}
