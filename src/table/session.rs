//! Multi-hand sessions and their statistics.

use log::info;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    TableError,
    manager::{HandOutcome, Table},
};
use crate::{
    bot::policy::DecisionPolicy,
    game::entities::{Chips, Deck},
};

/// A hand worth pointing out after the session.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NotableHand {
    pub number: u64,
    pub pot: Chips,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SessionStats {
    pub hands_played: u64,
    pub side_pot_hands: u64,
    pub chopped_hands: u64,
    pub showdowns: u64,
    pub refused_actions: usize,
    pub biggest_pot: Chips,
    /// Chips won or lost per seat since the session started.
    pub net: Vec<i64>,
    pub notable: Vec<NotableHand>,
}

impl SessionStats {
    fn new(seats: usize) -> Self {
        Self {
            net: vec![0; seats],
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &HandOutcome) {
        let summary = &outcome.summary;
        let pot = summary.pot_total();
        self.hands_played += 1;
        self.refused_actions += outcome.refused;
        if summary.went_to_showdown() {
            self.showdowns += 1;
        }
        for (seat, net) in self.net.iter_mut().enumerate() {
            *net += summary.net(seat);
        }

        let mut reasons = Vec::new();
        if summary.had_side_pots() {
            self.side_pot_hands += 1;
            reasons.push(format!("{} side pot(s)", summary.pots.len() - 1));
        }
        if summary.settlement.chopped {
            self.chopped_hands += 1;
            reasons.push("chopped pot".to_string());
        }
        if pot > self.biggest_pot {
            self.biggest_pot = pot;
            if self.hands_played > 1 {
                reasons.push("biggest pot so far".to_string());
            }
        }
        if !reasons.is_empty() {
            self.notable.push(NotableHand {
                number: summary.number,
                pot,
                reason: reasons.join(", "),
            });
        }
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "hands played:    {}", self.hands_played)?;
        writeln!(f, "showdowns:       {}", self.showdowns)?;
        writeln!(f, "side pot hands:  {}", self.side_pot_hands)?;
        writeln!(f, "chopped hands:   {}", self.chopped_hands)?;
        writeln!(f, "biggest pot:     ${}", self.biggest_pot)?;
        writeln!(f, "refused actions: {}", self.refused_actions)?;
        for (seat, net) in self.net.iter().enumerate() {
            writeln!(f, "seat {seat} net:      {net:+}")?;
        }
        Ok(())
    }
}

/// Plays hands at one table with a fixed set of policies and a seeded
/// shuffle.
#[derive(Debug)]
pub struct Session<P> {
    table: Table,
    policies: Vec<P>,
    rng: StdRng,
    total_chips: Chips,
    stats: SessionStats,
}

impl<P: DecisionPolicy> Session<P> {
    pub fn new(table: Table, policies: Vec<P>, seed: u64) -> Result<Self, TableError> {
        if policies.len() != table.seats().len() {
            return Err(TableError::PolicyCountMismatch {
                seats: table.seats().len(),
                policies: policies.len(),
            });
        }
        let total_chips = table.total_chips();
        let stats = SessionStats::new(table.seats().len());
        Ok(Self {
            table,
            policies,
            rng: StdRng::seed_from_u64(seed),
            total_chips,
            stats,
        })
    }

    /// Plays one hand with a freshly shuffled deck.
    ///
    /// # Panics
    ///
    /// Panics if the table gained or lost chips.
    pub fn play_one(&mut self) -> Result<HandOutcome, TableError> {
        let deck = Deck::shuffled(&mut self.rng);
        let outcome = self.table.play_hand(deck, &mut self.policies)?;
        assert_eq!(
            self.table.total_chips(),
            self.total_chips,
            "hand #{} changed the chips at the table",
            outcome.summary.number
        );
        self.stats.record(&outcome);
        Ok(outcome)
    }

    /// Plays up to `hands` hands, stopping early once fewer than two
    /// players have chips.
    pub fn run(&mut self, hands: usize) -> Result<&SessionStats, TableError> {
        for _ in 0..hands {
            if self.table.funded_seats() < 2 {
                info!(
                    "{} stops after {} hands: one player has every chip",
                    self.table.settings().name,
                    self.stats.hands_played
                );
                break;
            }
            self.play_one()?;
        }
        Ok(&self.stats)
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}
