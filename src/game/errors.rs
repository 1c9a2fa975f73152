//! Game error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{Chips, SeatIndex};

/// Reasons an action is refused. A refused action leaves the hand
/// untouched, so the player may simply be asked again.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ActionError {
    #[error("all-in for ${to} would exceed the fixed raise to ${limit}")]
    AllInExceedsLimit { to: Chips, limit: Chips },
    #[error("can't check while facing ${to_call}")]
    CannotCheck { to_call: Chips },
    #[error("hand is over")]
    HandOver,
    #[error("raise must be exactly to ${expected} in a limit game")]
    InvalidLimitRaise { to: Chips, expected: Chips },
    #[error("seat {seat} has no chips behind")]
    NoChips { seat: SeatIndex },
    #[error("nothing to call")]
    NothingToCall,
    #[error("can't fold when not facing a bet")]
    NothingToFold,
    #[error("not seat {seat}'s turn")]
    OutOfTurn { seat: SeatIndex },
    #[error("raise cap of {cap} reached this street")]
    RaiseCapReached { cap: u8 },
    #[error("action wasn't reopened by a full raise")]
    RaiseNotReopened,
    #[error("raise to ${to} is below the minimum of ${min}")]
    RaiseTooSmall { to: Chips, min: Chips },
}

/// Dealing errors. Running out of cards means the table was configured with
/// more seats or streets than a deck supports.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DeckError {
    #[error("deck exhausted after dealing {dealt} cards")]
    Exhausted { dealt: usize },
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CardParseError {
    #[error("can't parse card from {0:?}")]
    InvalidLength(String),
    #[error("invalid card suit {0:?}")]
    InvalidSuit(char),
    #[error("invalid card value {0:?}")]
    InvalidValue(String),
}

/// Variant descriptor validation errors.
#[derive(Debug, Error)]
pub enum VariantError {
    #[error("board games need a positive big blind no smaller than the small blind")]
    InvalidBlinds,
    #[error("bring-in ${bring_in} can't exceed the small bet ${small_bet}")]
    BringInTooLarge { bring_in: Chips, small_bet: Chips },
    #[error("{hole_cards} hole cards is not playable")]
    InvalidHoleCards { hole_cards: u8 },
    #[error("limit games need a positive small bet no larger than the big bet")]
    InvalidLimitBets,
    #[error("two-plus-three hand resolution needs a board game")]
    TwoPlusThreeNeedsBoard,
    #[error("raise cap must be at least 1")]
    InvalidRaiseCap,
    #[error("can't read variant descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a hand could not be started or dealt.
#[derive(Debug, Error)]
pub enum HandError {
    #[error("need 2+ players with chips, have {funded}")]
    NotEnoughPlayers { funded: usize },
    #[error("{players} players is more than the {max} a hand can seat")]
    TooManyPlayers { players: usize, max: usize },
    #[error("button seat {0} doesn't exist")]
    InvalidButton(SeatIndex),
    #[error("hand needs {needed} cards but the deck has {remaining}")]
    NotEnoughCards { needed: usize, remaining: usize },
    #[error(transparent)]
    Variant(#[from] VariantError),
}

pub type HandResult<T> = Result<T, HandError>;
