//! Poker betting and settlement engine.
//!
//! This module provides the engine every variant shares:
//! - Hand evaluation, high and eight-or-better low
//! - Per-player contribution ledger and multi-level side pots
//! - Betting rounds for limit and no-limit structures
//! - Showdown resolution, hand engine and event stream

pub mod betting;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod functional;
pub mod history;
pub mod ledger;
pub mod pot;
pub mod showdown;
pub mod state_machine;
pub mod variant;

pub use errors::{ActionError, CardParseError, DeckError, HandError, HandResult, VariantError};
pub use state_machine::{GameEvent, Hand, HandOptions, HandSummary, VisibleState};
