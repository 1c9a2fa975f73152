use super::entities::{Chips, Value};

pub const DECK_SIZE: usize = 52;

/// Seats a table will accept regardless of variant. Variants may support
/// fewer because of the cards each player needs.
pub const MAX_PLAYERS: usize = 10;

/// Voluntary bets and raises allowed per street in limit games.
pub const LIMIT_RAISE_CAP: u8 = 4;

/// Highest rank a qualifying low may contain (eight-or-better).
pub const LOW_QUALIFIER: Value = 8;

/// Rank used to fill the sequence of a hand with no qualifying low.
pub const UNQUALIFIED_LOW_VALUE: Value = 15;

pub const DEFAULT_STARTING_STACK: Chips = 1000;

/// Times a policy may be re-prompted after a refused action before the
/// table checks or folds on its behalf.
pub const DEFAULT_ILLEGAL_ACTION_ATTEMPTS: u8 = 3;
