//! Pot ledger.
//!
//! Pots are built from street commitments when a betting street closes.
//! Folded chips go straight into the main pot. For the live players every
//! distinct all-in amount marks a level; the chips between two levels form
//! a band that belongs to one pot, and only the players who reached the
//! top of the band may win it. The lowest band joins the open pot, higher
//! bands start side pots, and chips above the highest all-in open the pot
//! for the next street.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{
    entities::{Chips, SeatIndex},
    ledger::Contribution,
};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pot {
    pub amount: Chips,
    /// Hand contribution at which this pot starts; zero for the main pot.
    pub bet_level: Chips,
    pub eligible: BTreeSet<SeatIndex>,
    /// An all-in player is eligible, so the pot can't take more chips.
    pub capped: bool,
}

impl Pot {
    fn new(bet_level: Chips) -> Self {
        Self {
            bet_level,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PotLedger {
    pots: Vec<Pot>,
    /// Hand contribution of a player who has matched every street so far.
    matched_level: Chips,
    /// Chips swept in so far.
    wagered: Chips,
    folded: BTreeSet<SeatIndex>,
}

impl PotLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Main pot first, side pots in creation order.
    #[must_use]
    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    #[must_use]
    pub fn total(&self) -> Chips {
        self.pots.iter().map(|pot| pot.amount).sum()
    }

    /// Chips swept into pots so far.
    #[must_use]
    pub fn wagered(&self) -> Chips {
        self.wagered
    }

    #[must_use]
    pub fn has_side_pots(&self) -> bool {
        self.pots.len() > 1
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drops a folded player from every pot, now and in future sweeps.
    pub fn remove_folded(&mut self, seat: SeatIndex) {
        self.folded.insert(seat);
        for pot in &mut self.pots {
            pot.eligible.remove(&seat);
        }
    }

    /// The last pot if it can still take chips, otherwise a new one.
    fn open_pot(&mut self, bet_level: Chips) -> &mut Pot {
        let needs_new = self.pots.last().is_none_or(|pot| pot.capped);
        if needs_new {
            self.pots.push(Pot::new(bet_level));
        }
        let idx = self.pots.len() - 1;
        &mut self.pots[idx]
    }

    fn main_pot(&mut self) -> &mut Pot {
        if self.pots.is_empty() {
            self.pots.push(Pot::new(0));
        }
        &mut self.pots[0]
    }

    /// Moves a closed street's commitments into the pots.
    ///
    /// # Panics
    ///
    /// Panics on inconsistent input (a seat listed twice, or a folded
    /// all-in) and when the pots no longer reconcile afterwards.
    pub fn sweep_round(&mut self, contributions: &[Contribution]) {
        let mut seen = BTreeSet::new();
        for c in contributions {
            assert!(seen.insert(c.seat), "seat {} swept twice", c.seat);
            assert!(
                !(c.folded && c.all_in),
                "seat {} is both folded and all-in",
                c.seat
            );
            if c.folded {
                self.remove_folded(c.seat);
            }
        }

        let round_total: Chips = contributions.iter().map(|c| c.committed).sum();
        if round_total == 0 {
            self.check_invariants();
            return;
        }

        let folded_total: Chips = contributions
            .iter()
            .filter(|c| c.folded)
            .map(|c| c.committed)
            .sum();
        if folded_total > 0 {
            self.main_pot().amount += folded_total;
        }

        let live: Vec<&Contribution> = contributions.iter().filter(|c| !c.folded).collect();
        let mut levels: Vec<Chips> = live
            .iter()
            .filter(|c| c.all_in && c.committed > 0)
            .map(|c| c.committed)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let base = self.matched_level;
        let mut prev = 0;
        for level in levels {
            let band: Chips = live
                .iter()
                .map(|c| c.committed.min(level) - c.committed.min(prev))
                .sum();
            let eligible = live
                .iter()
                .filter(|c| c.committed >= level)
                .map(|c| c.seat);
            let pot = self.open_pot(base + prev);
            pot.amount += band;
            pot.eligible.extend(eligible);
            pot.capped = true;
            prev = level;
        }

        let excess: Chips = live
            .iter()
            .map(|c| c.committed.saturating_sub(prev))
            .sum();
        if excess > 0 {
            let eligible = live
                .iter()
                .filter(|c| c.committed > prev)
                .map(|c| c.seat);
            let pot = self.open_pot(base + prev);
            pot.amount += excess;
            pot.eligible.extend(eligible);
        }

        let top = live.iter().map(|c| c.committed).max().unwrap_or(0);
        self.matched_level = base + top;
        self.wagered += round_total;
        self.check_invariants();
    }

    fn check_invariants(&self) {
        assert_eq!(
            self.total(),
            self.wagered,
            "pots hold ${} but ${} was wagered",
            self.total(),
            self.wagered
        );
        for (idx, pot) in self.pots.iter().enumerate() {
            assert!(
                pot.eligible.is_disjoint(&self.folded),
                "pot {idx} lists a folded player as eligible"
            );
            assert!(
                pot.amount == 0 || !pot.eligible.is_empty(),
                "pot {idx} holds ${} with nobody eligible",
                pot.amount
            );
        }
        for (idx, pair) in self.pots.windows(2).enumerate() {
            assert!(
                pair[0].bet_level <= pair[1].bet_level,
                "pot {} starts below pot {idx}",
                idx + 1
            );
            assert!(
                pair[1].eligible.is_subset(&pair[0].eligible),
                "pot {} has players missing from pot {idx}",
                idx + 1
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contrib(seat: SeatIndex, committed: Chips) -> Contribution {
        Contribution {
            seat,
            committed,
            folded: false,
            all_in: false,
        }
    }

    fn all_in(seat: SeatIndex, committed: Chips) -> Contribution {
        Contribution {
            all_in: true,
            ..contrib(seat, committed)
        }
    }

    fn folded(seat: SeatIndex, committed: Chips) -> Contribution {
        Contribution {
            folded: true,
            ..contrib(seat, committed)
        }
    }

    fn seats(list: &[SeatIndex]) -> BTreeSet<SeatIndex> {
        list.iter().copied().collect()
    }

    // === Single Street Tests ===

    #[test]
    fn test_no_all_in_single_main_pot() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[contrib(0, 20), contrib(1, 20), folded(2, 10)]);
        assert_eq!(pots.pots().len(), 1);
        assert_eq!(pots.pots()[0].amount, 50);
        assert_eq!(pots.pots()[0].bet_level, 0);
        assert_eq!(pots.pots()[0].eligible, seats(&[0, 1]));
    }

    #[test]
    fn test_short_all_in_creates_side_pot() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[
            contrib(0, 300),
            contrib(1, 300),
            all_in(2, 150),
            contrib(3, 300),
        ]);
        let [main, side] = pots.pots() else {
            panic!("expected two pots");
        };
        assert_eq!(main.amount, 600);
        assert_eq!(main.eligible, seats(&[0, 1, 2, 3]));
        assert_eq!(side.amount, 450);
        assert_eq!(side.bet_level, 150);
        assert_eq!(side.eligible, seats(&[0, 1, 3]));
    }

    #[test]
    fn test_multiple_all_in_levels() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[
            all_in(0, 50),
            all_in(1, 120),
            contrib(2, 300),
            contrib(3, 300),
        ]);
        let amounts: Vec<Chips> = pots.pots().iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![200, 210, 360]);
        assert_eq!(pots.pots()[0].eligible, seats(&[0, 1, 2, 3]));
        assert_eq!(pots.pots()[1].eligible, seats(&[1, 2, 3]));
        assert_eq!(pots.pots()[2].eligible, seats(&[2, 3]));
        assert_eq!(pots.total(), 770);
    }

    #[test]
    fn test_equal_all_ins_share_a_level() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[all_in(0, 100), all_in(1, 100), contrib(2, 250)]);
        assert_eq!(pots.pots().len(), 2);
        assert_eq!(pots.pots()[0].amount, 300);
        assert_eq!(pots.pots()[1].amount, 150);
        assert_eq!(pots.pots()[1].eligible, seats(&[2]));
    }

    #[test]
    fn test_folded_chips_go_to_main_pot() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[all_in(0, 50), contrib(1, 200), folded(2, 100)]);
        let [main, side] = pots.pots() else {
            panic!("expected two pots");
        };
        assert_eq!(main.amount, 200);
        assert_eq!(main.eligible, seats(&[0, 1]));
        assert_eq!(side.amount, 150);
        assert_eq!(side.bet_level, 50);
        assert_eq!(side.eligible, seats(&[1]));

        let mut pots = PotLedger::new();
        pots.sweep_round(&[folded(0, 100), contrib(1, 300), all_in(2, 50)]);
        let amounts: Vec<Chips> = pots.pots().iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![200, 250]);
        assert_eq!(pots.pots()[0].eligible, seats(&[1, 2]));
    }

    #[test]
    fn test_folded_chips_join_capped_main_pot() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[all_in(0, 20), contrib(1, 20), contrib(2, 20)]);
        pots.sweep_round(&[contrib(0, 0), contrib(1, 100), folded(2, 40)]);
        let amounts: Vec<Chips> = pots.pots().iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![100, 100]);
        assert_eq!(pots.pots()[0].eligible, seats(&[0, 1]));
        assert_eq!(pots.pots()[1].eligible, seats(&[1]));
    }

    #[test]
    fn test_fold_above_short_all_in_leaves_no_orphan_pot() {
        // A short big blind all-in while the small blind folds more.
        let mut pots = PotLedger::new();
        pots.sweep_round(&[folded(0, 10), all_in(1, 5)]);
        let [main] = pots.pots() else {
            panic!("expected one pot");
        };
        assert_eq!(main.amount, 15);
        assert_eq!(main.eligible, seats(&[1]));
    }

    #[test]
    fn test_empty_street_changes_nothing() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[contrib(0, 0), contrib(1, 0)]);
        assert!(pots.pots().is_empty());
        assert_eq!(pots.wagered(), 0);
    }

    // === Multi Street Tests ===

    #[test]
    fn test_open_pot_carries_across_streets() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[contrib(0, 100), contrib(1, 100), contrib(2, 100)]);
        pots.sweep_round(&[all_in(0, 40), contrib(1, 80), contrib(2, 80)]);
        pots.sweep_round(&[contrib(0, 0), contrib(1, 50), contrib(2, 50)]);

        let [main, side] = pots.pots() else {
            panic!("expected two pots");
        };
        assert_eq!(main.amount, 420);
        assert!(main.capped);
        assert_eq!(main.eligible, seats(&[0, 1, 2]));
        assert_eq!(side.amount, 180);
        assert_eq!(side.bet_level, 140);
        assert_eq!(side.eligible, seats(&[1, 2]));
        assert_eq!(pots.wagered(), 600);
    }

    #[test]
    fn test_capped_pot_forces_new_pot_next_street() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[all_in(0, 100), contrib(1, 100), contrib(2, 100)]);
        assert_eq!(pots.pots().len(), 1);
        pots.sweep_round(&[contrib(0, 0), contrib(1, 50), contrib(2, 50)]);
        assert_eq!(pots.pots().len(), 2);
        assert_eq!(pots.pots()[1].amount, 100);
        assert_eq!(pots.pots()[1].bet_level, 100);
        assert_eq!(pots.pots()[1].eligible, seats(&[1, 2]));
    }

    #[test]
    fn test_fold_removes_eligibility_everywhere() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[contrib(0, 20), contrib(1, 20), contrib(2, 20)]);
        pots.remove_folded(2);
        assert_eq!(pots.pots()[0].eligible, seats(&[0, 1]));
        pots.sweep_round(&[contrib(0, 40), contrib(1, 40), folded(2, 0)]);
        assert_eq!(pots.pots()[0].eligible, seats(&[0, 1]));
        assert_eq!(pots.total(), 140);
    }

    #[test]
    fn test_clear() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[contrib(0, 20), contrib(1, 20)]);
        pots.clear();
        assert_eq!(pots, PotLedger::default());
    }

    // === Invariant Tests ===

    #[test]
    #[should_panic(expected = "both folded and all-in")]
    fn test_folded_all_in_is_rejected() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[Contribution {
            seat: 0,
            committed: 10,
            folded: true,
            all_in: true,
        }]);
    }

    #[test]
    #[should_panic(expected = "swept twice")]
    fn test_duplicate_seat_is_rejected() {
        let mut pots = PotLedger::new();
        pots.sweep_round(&[contrib(0, 10), contrib(0, 10)]);
    }
}
