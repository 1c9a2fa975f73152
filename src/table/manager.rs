//! The table: seats, button and the loop that asks policies for actions.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{TableError, config::TableSettings};
use crate::{
    bot::policy::{DecisionPolicy, forced_action},
    game::{
        entities::{Chips, Deck, SeatIndex},
        history::HandHistory,
        state_machine::{GameEvent, Hand, HandOptions, HandSummary},
    },
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Seat {
    pub name: String,
    pub stack: Chips,
}

/// What a played hand left behind.
#[derive(Clone, Debug)]
pub struct HandOutcome {
    pub summary: HandSummary,
    pub history: HandHistory,
    pub events: Vec<GameEvent>,
    /// Actions the engine refused during the hand.
    pub refused: usize,
}

#[derive(Debug)]
pub struct Table {
    settings: TableSettings,
    seats: Vec<Seat>,
    button: Option<SeatIndex>,
    hands_played: u64,
}

impl Table {
    pub fn new(settings: TableSettings) -> Result<Self, TableError> {
        settings.validate()?;
        Ok(Self {
            settings,
            seats: Vec::new(),
            button: None,
            hands_played: 0,
        })
    }

    /// Seats a player in the next free seat. A `None` stack uses the
    /// table's starting stack.
    pub fn seat_player(&mut self, name: &str, stack: Option<Chips>) -> Result<SeatIndex, TableError> {
        if self.seats.len() >= self.settings.max_players {
            return Err(TableError::TableFull {
                max: self.settings.max_players,
            });
        }
        if self.seats.iter().any(|seat| seat.name == name) {
            return Err(TableError::DuplicateName(name.to_string()));
        }
        self.seats.push(Seat {
            name: name.to_string(),
            stack: stack.unwrap_or(self.settings.starting_stack),
        });
        let seat = self.seats.len() - 1;
        debug!("{name} takes seat {seat} at {}", self.settings.name);
        Ok(seat)
    }

    #[must_use]
    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    #[must_use]
    pub fn stacks(&self) -> Vec<Chips> {
        self.seats.iter().map(|seat| seat.stack).collect()
    }

    #[must_use]
    pub fn total_chips(&self) -> Chips {
        self.seats.iter().map(|seat| seat.stack).sum()
    }

    #[must_use]
    pub fn funded_seats(&self) -> usize {
        self.seats.iter().filter(|seat| seat.stack > 0).count()
    }

    #[must_use]
    pub fn button(&self) -> Option<SeatIndex> {
        self.button
    }

    #[must_use]
    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    /// Next funded seat after the current button, or the first funded
    /// seat before the first hand.
    fn next_button(&self) -> SeatIndex {
        let n = self.seats.len();
        let start = self.button.map_or(0, |button| button + 1);
        (0..n)
            .map(|offset| (start + offset) % n)
            .find(|&seat| self.seats[seat].stack > 0)
            .unwrap_or(0)
    }

    /// Plays one hand to completion, asking `policies[seat]` for every
    /// decision, and applies the result to the seats.
    ///
    /// A refused action is logged and the seat is asked again; after
    /// `max_illegal_attempts` refusals the table checks or folds for it.
    pub fn play_hand<P: DecisionPolicy>(
        &mut self,
        deck: Deck,
        policies: &mut [P],
    ) -> Result<HandOutcome, TableError> {
        if policies.len() != self.seats.len() {
            return Err(TableError::PolicyCountMismatch {
                seats: self.seats.len(),
                policies: policies.len(),
            });
        }

        let button = self.next_button();
        let number = self.hands_played + 1;
        let stacks = self.stacks();
        let players: Vec<(&str, Chips)> = self
            .seats
            .iter()
            .map(|seat| (seat.name.as_str(), seat.stack))
            .collect();
        let mut history = HandHistory::new(&players);
        let mut hand = Hand::start(
            &self.settings.variant,
            &stacks,
            button,
            deck,
            HandOptions {
                number,
                burn_cards: self.settings.burn_cards,
            },
        )?;
        self.button = Some(button);

        let mut events: Vec<GameEvent> = Vec::new();
        let mut refused = 0;
        loop {
            for event in hand.drain_events() {
                history.record(&event);
                events.push(event);
            }
            let Some(seat) = hand.current_actor() else {
                break;
            };
            let legal = hand.legal_actions(seat);
            let state = hand.visible_state(seat);
            let max_attempts = usize::from(self.settings.max_illegal_attempts);
            let mut attempts = 0;
            loop {
                let action = if attempts < max_attempts {
                    policies[seat].decide(&state, &legal)
                } else {
                    forced_action(&legal)
                };
                match hand.act(seat, &action) {
                    Ok(_) => break,
                    Err(err) if attempts < max_attempts => {
                        attempts += 1;
                        refused += 1;
                        warn!(
                            "{} can't {action} (options: {legal}): {err}",
                            self.seats[seat].name
                        );
                    }
                    Err(err) => return Err(TableError::Refused { seat, source: err }),
                }
            }
        }

        let summary = hand.summary().ok_or(TableError::HandStalled(number))?;
        for (seat, stack) in self.seats.iter_mut().zip(&summary.final_stacks) {
            seat.stack = *stack;
        }
        self.hands_played = number;

        for (seat, amount) in summary.settlement.payouts() {
            info!("{} wins ${amount}", self.seats[seat].name);
        }
        Ok(HandOutcome {
            summary,
            history,
            events,
            refused,
        })
    }
}
