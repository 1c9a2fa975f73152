//! Bot decision-making logic with personality-based behavior.

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    models::{Personality, PersonalityParams},
    policy::{DecisionPolicy, legalize},
};
use crate::game::{
    entities::{Action, ActionChoices, Card, Chips},
    functional::{
        Category, eval_high, eval_low, eval_omaha_high, eval_omaha_low, rank_exposed,
    },
    state_machine::VisibleState,
    variant::{BettingStructure, HandResolution},
};

// === Hand Strength Base Values ===

/// Hand strength for high card (weakest hand: 10%)
const STRENGTH_HIGH_CARD: f32 = 0.1;

/// Hand strength for one pair (25% = beats high card)
const STRENGTH_ONE_PAIR: f32 = 0.25;

const STRENGTH_TWO_PAIR: f32 = 0.40;

const STRENGTH_THREE_OF_A_KIND: f32 = 0.55;

const STRENGTH_STRAIGHT: f32 = 0.70;

const STRENGTH_FLUSH: f32 = 0.75;

const STRENGTH_FULL_HOUSE: f32 = 0.85;

const STRENGTH_FOUR_OF_A_KIND: f32 = 0.95;

/// Hand strength for straight flush (99% = nearly unbeatable)
const STRENGTH_STRAIGHT_FLUSH: f32 = 0.99;

/// Configuration for bot decision-making probabilities and sizing.
///
/// Fold and raise thresholds live on [`PersonalityParams`]; this holds the
/// knobs every personality shares.
///
/// # Examples
///
/// ```
/// use poker_settle::bot::decision::BotDecisionConfig;
///
/// let config = BotDecisionConfig::default();
/// assert_eq!(config.bluff_size_multiplier, 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct BotDecisionConfig {
    /// Bluff size as a multiplier of the current pot.
    ///
    /// **Range**: 0.5-2.0 (typical: 1.0)
    pub bluff_size_multiplier: f32,

    /// A call costing less than this share of the final pot earns the
    /// pot odds bonus.
    ///
    /// **Range**: 0.15-0.35 (typical: 0.25)
    pub pot_odds_bonus_threshold: f32,

    /// Bonus added to the call probability when the price is right.
    pub pot_odds_bonus_value: f32,

    /// Base probability of calling with medium-strength hands.
    ///
    /// **Range**: 0.2-0.5 (typical: 0.3)
    /// **Higher** = more calling stations (passive play)
    pub base_call_probability: f32,

    /// call_prob = base + (aggression / divisor)
    pub call_aggression_divisor: f32,

    /// Base probability of raising with strong hands.
    ///
    /// **Range**: 0.3-0.6 (typical: 0.4)
    pub base_raise_probability: f32,

    /// raise_prob = base + (aggression / divisor)
    pub raise_aggression_divisor: f32,

    /// Raise size as a multiple of the pot for passive bots (aggression < 1.0).
    pub passive_raise_multiplier: f32,

    /// Raise size multiple for moderate bots (aggression 1.0-2.0).
    pub moderate_raise_multiplier: f32,

    /// Raise size multiple for aggressive bots (aggression > 2.0).
    pub aggressive_raise_multiplier: f32,

    /// Variance range for raise sizing (±percentage).
    ///
    /// **Range**: 0.1-0.3 (typical: 0.2)
    pub raise_variance: f32,

    /// Strength added for a qualifying low in hi-lo games.
    pub low_bonus: f32,
}

impl Default for BotDecisionConfig {
    fn default() -> Self {
        Self {
            bluff_size_multiplier: 1.0,
            pot_odds_bonus_threshold: 0.25,
            pot_odds_bonus_value: 0.2,
            base_call_probability: 0.3,
            call_aggression_divisor: 5.0,
            base_raise_probability: 0.4,
            raise_aggression_divisor: 4.0,
            passive_raise_multiplier: 0.5,
            moderate_raise_multiplier: 0.75,
            aggressive_raise_multiplier: 1.0,
            raise_variance: 0.2,
            low_bonus: 0.2,
        }
    }
}

/// Bot decision maker
#[derive(Debug)]
pub struct BotDecisionMaker {
    rng: StdRng,
    personality: Personality,
    params: PersonalityParams,
    config: BotDecisionConfig,
}

impl BotDecisionMaker {
    /// Create a decision maker seeded from the OS
    #[must_use]
    pub fn new(personality: Personality) -> Self {
        Self::with_rng(personality, StdRng::from_os_rng())
    }

    /// Create a reproducible decision maker
    #[must_use]
    pub fn seeded(personality: Personality, seed: u64) -> Self {
        Self::with_rng(personality, StdRng::seed_from_u64(seed))
    }

    fn with_rng(personality: Personality, rng: StdRng) -> Self {
        Self {
            rng,
            personality,
            params: personality.params(),
            config: BotDecisionConfig::default(),
        }
    }

    /// Create a decision maker with custom config
    #[must_use]
    pub fn with_config(mut self, config: BotDecisionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn personality(&self) -> Personality {
        self.personality
    }

    /// Decide an action from the seat's view of the hand.
    ///
    /// The result is always one of `legal`.
    pub fn decide_action(&mut self, state: &VisibleState, legal: &ActionChoices) -> Action {
        let strength = self.estimate_hand_strength(state);
        let action = self.choose(state, legal, strength);
        debug!(
            "{} bot on seat {} holds strength {strength:.2}, picks {action}",
            self.personality, state.seat
        );
        legalize(action, legal)
    }

    fn choose(&mut self, state: &VisibleState, legal: &ActionChoices, strength: f32) -> Action {
        let params = self.params.clone();
        let can_check = legal.contains(&Action::Check);
        let to_call = state.to_call();

        // Calling puts us all-in anyway.
        if to_call > 0 && state.stack <= to_call {
            return if strength >= params.fold_threshold {
                Action::Call
            } else {
                Action::Fold
            };
        }

        // Weak hands
        if strength < params.fold_threshold {
            if params.bluffs && self.rng.random_bool(f64::from(params.bluff_frequency)) {
                let size = (state.pot as f32 * self.config.bluff_size_multiplier) as Chips;
                return self.raise_to(state, legal, size);
            }
            return if can_check { Action::Check } else { Action::Fold };
        }

        // Medium strength hands: play based on aggression and pot odds
        if strength < params.raise_threshold {
            if can_check {
                return Action::Check;
            }
            let pot_odds_bonus = if state.pot_odds() < self.config.pot_odds_bonus_threshold {
                self.config.pot_odds_bonus_value
            } else {
                0.0
            };
            let call_probability = self.config.base_call_probability
                + params.aggression_factor / self.config.call_aggression_divisor
                + pot_odds_bonus;
            return if self.rng.random_bool(f64::from(call_probability.min(1.0))) {
                Action::Call
            } else {
                Action::Fold
            };
        }

        // Strong hands
        let raise_probability = self.config.base_raise_probability
            + params.aggression_factor / self.config.raise_aggression_divisor;
        if self.rng.random_bool(f64::from(raise_probability.min(1.0))) {
            let size = self.raise_size(state);
            self.raise_to(state, legal, size)
        } else if can_check {
            // Slow-play
            Action::Check
        } else {
            Action::Call
        }
    }

    /// Chips to add on top of the bet to match, scaled to the pot.
    fn raise_size(&mut self, state: &VisibleState) -> Chips {
        let multiplier = match self.params.aggression_factor {
            x if x < 1.0 => self.config.passive_raise_multiplier,
            x if x < 2.0 => self.config.moderate_raise_multiplier,
            _ => self.config.aggressive_raise_multiplier,
        };
        let variance = self
            .rng
            .random_range(-self.config.raise_variance..=self.config.raise_variance);
        ((state.pot + state.to_call()) as f32 * multiplier * (1.0 + variance)) as Chips
    }

    fn raise_to(&self, state: &VisibleState, legal: &ActionChoices, size: Chips) -> Action {
        let Some(min_to) = legal.min_raise_to() else {
            // No room for a full raise; a short stack can still shove.
            return if legal.contains(&Action::AllIn) {
                Action::AllIn
            } else {
                Action::Call
            };
        };
        if state.betting == BettingStructure::Limit {
            return Action::Raise(None);
        }
        let target = (state.bet_to_match + size).max(min_to);
        match legal.all_in_to() {
            Some(all_in_to) if target >= all_in_to => Action::AllIn,
            _ => Action::Raise(Some(target)),
        }
    }

    /// Estimate hand strength in `[0, 1]` from the seat's own cards and
    /// the board.
    #[must_use]
    pub fn estimate_hand_strength(&self, state: &VisibleState) -> f32 {
        let mut all_cards = state.cards.clone();
        all_cards.extend_from_slice(&state.board);
        if all_cards.len() < 5 {
            return partial_strength(&all_cards);
        }

        let omaha =
            state.hand_resolution == HandResolution::TwoPlusThree && state.board.len() >= 3;
        let high = if omaha {
            eval_omaha_high(&state.cards, &state.board)
        } else {
            eval_high(&all_cards)
        };
        let base_strength = match high.category {
            Category::Incomplete => 0.0,
            Category::HighCard => STRENGTH_HIGH_CARD,
            Category::OnePair => STRENGTH_ONE_PAIR,
            Category::TwoPair => STRENGTH_TWO_PAIR,
            Category::ThreeOfAKind => STRENGTH_THREE_OF_A_KIND,
            Category::Straight => STRENGTH_STRAIGHT,
            Category::Flush => STRENGTH_FLUSH,
            Category::FullHouse => STRENGTH_FULL_HOUSE,
            Category::FourOfAKind => STRENGTH_FOUR_OF_A_KIND,
            Category::StraightFlush => STRENGTH_STRAIGHT_FLUSH,
            Category::RoyalFlush => 1.0,
        };
        // Normalize top value (2-14) to a 0.0-0.1 kicker bonus
        let kicker_bonus = high
            .values
            .first()
            .map_or(0.0, |value| f32::from(*value) / 14.0 * 0.1);

        let low_bonus = if state.pot_resolution.is_hi_lo() {
            let low = if omaha {
                eval_omaha_low(&state.cards, &state.board)
            } else {
                eval_low(&all_cards)
            };
            if low.qualified { self.config.low_bonus } else { 0.0 }
        } else {
            0.0
        };

        (base_strength + kicker_bonus + low_bonus).min(1.0)
    }
}

/// Strength of fewer than five known cards: pairs and better by their
/// rank, otherwise the top two cards with a nudge for suited or
/// connected holdings.
fn partial_strength(cards: &[Card]) -> f32 {
    let rank = rank_exposed(cards);
    let top = rank.values.first().map_or(0.0, |v| f32::from(*v) / 14.0);
    match rank.category {
        Category::Incomplete => 0.0,
        Category::HighCard => {
            let second = rank.values.get(1).map_or(0.0, |v| f32::from(*v) / 14.0);
            let suited = cards.len() >= 2 && cards.iter().all(|card| card.1 == cards[0].1);
            let connected = rank
                .values
                .windows(2)
                .any(|pair| pair[0].abs_diff(pair[1]) == 1);
            top * 0.35
                + second * 0.15
                + if suited { 0.05 } else { 0.0 }
                + if connected { 0.05 } else { 0.0 }
        }
        Category::OnePair | Category::TwoPair => 0.5 + top * 0.4,
        _ => 0.95,
    }
}

impl DecisionPolicy for BotDecisionMaker {
    fn decide(&mut self, state: &VisibleState, legal: &ActionChoices) -> Action {
        self.decide_action(state, legal)
    }
}
