//! Hand history built from the engine's event stream.
//!
//! Settlement never depends on this; a history is an observer that can be
//! queried after the fact and exported as JSON.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

use super::{
    entities::{Bet, BetAction, Card, Chips, SeatIndex, Street},
    showdown::Share,
    state_machine::GameEvent,
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SeatRecord {
    pub seat: SeatIndex,
    pub name: String,
    pub starting_stack: Chips,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionRecord {
    pub street: Street,
    pub seat: SeatIndex,
    pub bet: Bet,
    /// Chips wagered in the hand once this action settled.
    pub pot_after: Chips,
}

impl ActionRecord {
    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.bet.action == BetAction::Post
    }
}

/// Cards dealt to one seat, or to the board when `seat` is `None`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DealRecord {
    pub street: Street,
    pub seat: Option<SeatIndex>,
    pub cards: Vec<Card>,
    pub face_up: bool,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RevealRecord {
    pub seat: SeatIndex,
    pub high: String,
    pub low: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AwardRecord {
    pub pot_index: usize,
    pub seat: SeatIndex,
    pub amount: Chips,
    pub share: Share,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandHistory {
    pub number: u64,
    pub button: SeatIndex,
    pub seats: Vec<SeatRecord>,
    pub actions: Vec<ActionRecord>,
    pub deals: Vec<DealRecord>,
    pub board: Vec<Card>,
    pub reveals: Vec<RevealRecord>,
    pub awards: Vec<AwardRecord>,
    pub ran_out: bool,
    pub chopped: bool,
    pub finished: bool,
    #[serde(skip)]
    street: Street,
    #[serde(skip)]
    wagered: Chips,
}

impl HandHistory {
    /// A history for players seated in order, with their stacks at the
    /// start of the hand.
    #[must_use]
    pub fn new<S: AsRef<str>>(players: &[(S, Chips)]) -> Self {
        let seats = players
            .iter()
            .enumerate()
            .map(|(seat, (name, stack))| SeatRecord {
                seat,
                name: name.as_ref().to_string(),
                starting_stack: *stack,
            })
            .collect();
        Self {
            seats,
            ..Self::default()
        }
    }

    pub fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::HandStarted { number, button, .. } => {
                self.number = *number;
                self.button = *button;
                self.street = Street::PreFlop;
            }
            GameEvent::ForcedBetPosted { seat, bet, .. } => self.push_action(*seat, *bet),
            GameEvent::Acted { seat, street, bet } => {
                self.street = *street;
                self.push_action(*seat, *bet);
            }
            GameEvent::CardsDealt {
                seat,
                cards,
                face_up,
            } => self.deals.push(DealRecord {
                street: self.street,
                seat: Some(*seat),
                cards: cards.clone(),
                face_up: *face_up,
            }),
            GameEvent::BoardDealt { street, cards } => {
                self.street = *street;
                self.board.extend_from_slice(cards);
                self.deals.push(DealRecord {
                    street: *street,
                    seat: None,
                    cards: cards.clone(),
                    face_up: true,
                });
            }
            GameEvent::StreetClosed { street, .. } => {
                self.street = street
                    .betting_index()
                    .and_then(|idx| Street::from_betting_index(idx + 1))
                    .unwrap_or(Street::Showdown);
            }
            GameEvent::RunOut { .. } => self.ran_out = true,
            GameEvent::Revealed { seat, high, low } => self.reveals.push(RevealRecord {
                seat: *seat,
                high: high.clone(),
                low: low.clone(),
            }),
            GameEvent::PotAwarded {
                pot_index,
                seat,
                amount,
                share,
            } => self.awards.push(AwardRecord {
                pot_index: *pot_index,
                seat: *seat,
                amount: *amount,
                share: *share,
            }),
            GameEvent::HandFinished { chopped, .. } => {
                self.chopped = *chopped;
                self.finished = true;
            }
        }
    }

    pub fn record_all<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a GameEvent>,
    {
        for event in events {
            self.record(event);
        }
    }

    fn push_action(&mut self, seat: SeatIndex, bet: Bet) {
        self.wagered += bet.amount;
        self.actions.push(ActionRecord {
            street: self.street,
            seat,
            bet,
            pot_after: self.wagered,
        });
    }

    #[must_use]
    pub fn actions_on(&self, street: Street) -> Vec<&ActionRecord> {
        self.actions
            .iter()
            .filter(|action| action.street == street)
            .collect()
    }

    #[must_use]
    pub fn actions_by(&self, seat: SeatIndex) -> Vec<&ActionRecord> {
        self.actions
            .iter()
            .filter(|action| action.seat == seat)
            .collect()
    }

    /// Cards dealt to `seat`, in deal order.
    #[must_use]
    pub fn cards_of(&self, seat: SeatIndex) -> Vec<Card> {
        self.deals
            .iter()
            .filter(|deal| deal.seat == Some(seat))
            .flat_map(|deal| deal.cards.iter().copied())
            .collect()
    }

    #[must_use]
    pub fn won_by(&self, seat: SeatIndex) -> Chips {
        self.awards
            .iter()
            .filter(|award| award.seat == seat)
            .map(|award| award.amount)
            .sum()
    }

    #[must_use]
    pub fn winners(&self) -> BTreeSet<SeatIndex> {
        self.awards.iter().map(|award| award.seat).collect()
    }

    #[must_use]
    pub fn wagered(&self) -> Chips {
        self.wagered
    }

    fn name(&self, seat: SeatIndex) -> String {
        self.seats
            .get(seat)
            .map_or_else(|| format!("seat {seat}"), |record| record.name.clone())
    }

    /// # Errors
    ///
    /// Fails only if serialization itself fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// # Errors
    ///
    /// Fails on malformed JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl fmt::Display for HandHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hand #{}", self.number)?;
        for record in &self.seats {
            let button = if record.seat == self.button {
                " (button)"
            } else {
                ""
            };
            writeln!(
                f,
                "  seat {}: {} ${}{button}",
                record.seat, record.name, record.starting_stack
            )?;
        }

        let mut street = None;
        for action in &self.actions {
            if street != Some(action.street) {
                street = Some(action.street);
                writeln!(f, "*** {} ***", action.street)?;
            }
            writeln!(f, "  {} {}", self.name(action.seat), action.bet)?;
        }
        if !self.board.is_empty() {
            let board: Vec<String> = self.board.iter().map(ToString::to_string).collect();
            writeln!(f, "board: {}", board.join(" "))?;
        }
        for reveal in &self.reveals {
            match &reveal.low {
                Some(low) => writeln!(f, "  {} shows {} / {low}", self.name(reveal.seat), reveal.high)?,
                None => writeln!(f, "  {} shows {}", self.name(reveal.seat), reveal.high)?,
            }
        }
        for award in &self.awards {
            writeln!(f, "  {} wins ${}", self.name(award.seat), award.amount)?;
        }
        Ok(())
    }
}
