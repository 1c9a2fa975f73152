//! Decision policies that pick actions for seated players.
//!
//! This module implements:
//! - `DecisionPolicy`: the seam the table calls when a seat is to act
//! - `ScriptedPolicy` and `CallingStation` for deterministic play
//! - `BotDecisionMaker`: randomized play driven by a `Personality`
//!
//! ## Personalities
//!
//! ### Tight-Passive
//! - Folds anything below 30% strength
//! - Raises only above 70%
//! - Never bluffs
//!
//! ### Tight-Aggressive
//! - Folds below 30%, raises above 45%
//! - Aggression 2.5, bluffs 10% of the time
//!
//! ### Loose-Passive
//! - Folds only below 12%, rarely raises
//! - Never bluffs
//!
//! ### Loose-Aggressive
//! - Folds below 12%, raises above 35%
//! - Aggression 3.0, bluffs 25% of the time
//!
//! ## Example
//!
//! ```
//! use poker_settle::bot::{BotDecisionMaker, DecisionPolicy, Personality, Policy};
//! use poker_settle::game::{entities::Deck, variant::VariantDescriptor, Hand, HandOptions};
//!
//! let mut hand = Hand::start(
//!     &VariantDescriptor::texas_holdem(),
//!     &[1000, 1000],
//!     0,
//!     Deck::default(),
//!     HandOptions::default(),
//! )
//! .unwrap();
//! let mut policy = Policy::from(BotDecisionMaker::seeded(Personality::TightAggressive, 7));
//! let seat = hand.current_actor().unwrap();
//! let action = policy.decide(&hand.visible_state(seat), &hand.legal_actions(seat));
//! assert!(hand.act(seat, &action).is_ok());
//! ```

pub mod decision;
pub mod models;
pub mod policy;

pub use decision::{BotDecisionConfig, BotDecisionMaker};
pub use models::{Personality, PersonalityParams};
pub use policy::{CallingStation, DecisionPolicy, Policy, ScriptedPolicy};
