//! # Poker Settle
//!
//! A poker betting and settlement engine for board and stud games.
//!
//! The engine tracks every chip a player puts in, builds main and side
//! pots when players go all-in for different amounts, runs limit and
//! no-limit betting rounds and splits pots at showdown, including
//! eight-or-better hi-lo splits. Variants are data: a
//! [`VariantDescriptor`](game::variant::VariantDescriptor) says how many
//! cards to deal, which forced bets to post and how to resolve pots.
//!
//! ## Architecture
//!
//! A hand moves through the same pieces whatever the variant:
//!
//! - **ContributionLedger**: stacks, street commitments, folds and all-ins
//! - **BettingRound**: whose turn it is and which actions are legal
//! - **PotLedger**: sweeps each closed street into capped side pots
//! - **Showdown**: evaluates hands per pot and splits the chips
//! - **Hand**: deals the streets and drives the above, emitting events
//!
//! ## Core Modules
//!
//! - [`game`]: Entities, hand evaluation, ledgers, betting and the hand engine
//! - [`bot`]: Decision policies that pick actions for seats
//! - [`table`]: Seats, button movement and multi-hand sessions
//!
//! ## Example
//!
//! ```
//! use poker_settle::{Action, Deck, Hand, HandOptions, VariantDescriptor};
//!
//! let mut hand = Hand::start(
//!     &VariantDescriptor::texas_holdem(),
//!     &[1000, 1000],
//!     0,
//!     Deck::default(),
//!     HandOptions::default(),
//! )
//! .unwrap();
//!
//! // Heads-up the button posts the small blind and acts first.
//! hand.act(0, &Action::Fold).unwrap();
//! assert!(hand.is_over());
//! assert_eq!(hand.stacks(), vec![990, 1010]);
//! ```

/// Decision policies for seated players.
pub mod bot;

/// Core game logic, entities, ledgers and the hand engine.
pub mod game;
pub use game::{
    ActionError, GameEvent, Hand, HandError, HandOptions, HandSummary, VisibleState,
    constants::{self, MAX_PLAYERS},
    entities::{self, Action, Card, Chips, Deck, SeatIndex, Street},
    functional,
    variant::VariantDescriptor,
};

/// Table driver and sessions.
pub mod table;
