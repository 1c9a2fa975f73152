//! Table driver and session runner.
//!
//! This module implements:
//! - Table: seats players, moves the button, plays hands with per-seat
//!   decision policies
//! - Session: runs many hands and keeps statistics
//! - TableSettings: table configuration and validation

pub mod config;
pub mod manager;
pub mod session;

pub use config::TableSettings;
pub use manager::{HandOutcome, Seat, Table};
pub use session::{NotableHand, Session, SessionStats};

use thiserror::Error;

use crate::game::{
    entities::SeatIndex,
    errors::{ActionError, HandError, VariantError},
};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("table is full ({max} seats)")]
    TableFull { max: usize },
    #[error("{0} is already seated")]
    DuplicateName(String),
    #[error("{seats} seats but {policies} policies")]
    PolicyCountMismatch { seats: usize, policies: usize },
    #[error("invalid table settings: {0}")]
    InvalidSettings(String),
    #[error("seat {seat} can't act: {source}")]
    Refused {
        seat: SeatIndex,
        source: ActionError,
    },
    #[error("hand #{0} stopped with nobody to act")]
    HandStalled(u64),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Variant(#[from] VariantError),
}
