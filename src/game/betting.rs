//! Betting round state machine.
//!
//! One `BettingRound` runs one street. It decides whose turn it is, which
//! actions are legal, applies an action to the contribution ledger, and
//! reports when the street is closed. It never touches the pots.

use serde::{Deserialize, Serialize};

use super::{
    entities::{Action, ActionChoice, ActionChoices, Bet, BetAction, Chips, SeatIndex, Street},
    errors::ActionError,
    ledger::ContributionLedger,
    variant::BettingStructure,
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BettingRound {
    street: Street,
    structure: BettingStructure,
    /// Limit increment, or minimum opening bet in no-limit.
    bet_size: Chips,
    raise_cap: Option<u8>,
    bet_to_match: Chips,
    /// Size of the last full raise; the next raise must be at least this.
    min_raise: Chips,
    raises: u8,
    acted: Vec<bool>,
    /// Cleared for players who already acted when a short all-in raised
    /// the bet; they may call or fold but not raise again.
    may_raise: Vec<bool>,
    actor: Option<SeatIndex>,
}

impl BettingRound {
    #[must_use]
    pub fn new(
        street: Street,
        num_seats: usize,
        structure: BettingStructure,
        bet_size: Chips,
        raise_cap: Option<u8>,
    ) -> Self {
        Self {
            street,
            structure,
            bet_size,
            raise_cap,
            bet_to_match: 0,
            min_raise: bet_size,
            raises: 0,
            acted: vec![false; num_seats],
            may_raise: vec![true; num_seats],
            actor: None,
        }
    }

    /// Picks up forced bets already in the ledger and hands the turn to
    /// the first seat at or after `first` that needs to act.
    pub fn open(&mut self, ledger: &ContributionLedger, first: SeatIndex) {
        self.open_facing(ledger, first, 0);
    }

    /// Like `open`, but the street faces at least `forced` even when a
    /// short stack posted less.
    pub fn open_facing(&mut self, ledger: &ContributionLedger, first: SeatIndex, forced: Chips) {
        self.bet_to_match = ledger.max_committed().max(forced);
        self.actor = self.find_actor(ledger, first, true);
    }

    /// Records a seat as having acted without an action, e.g. a bring-in.
    pub fn mark_acted(&mut self, seat: SeatIndex) {
        self.acted[seat] = true;
    }

    #[must_use]
    pub fn street(&self) -> Street {
        self.street
    }

    #[must_use]
    pub fn bet_to_match(&self) -> Chips {
        self.bet_to_match
    }

    #[must_use]
    pub fn actor(&self) -> Option<SeatIndex> {
        self.actor
    }

    /// Voluntary bets and raises made this street.
    #[must_use]
    pub fn raises(&self) -> u8 {
        self.raises
    }

    #[must_use]
    pub fn has_acted(&self, seat: SeatIndex) -> bool {
        self.acted[seat]
    }

    /// Smallest street total that counts as a full bet or raise.
    #[must_use]
    pub fn min_raise_to(&self) -> Chips {
        match self.structure {
            BettingStructure::Limit if self.bet_to_match < self.bet_size => self.bet_size,
            BettingStructure::Limit => self.bet_to_match + self.bet_size,
            BettingStructure::NoLimit if self.bet_to_match == 0 => self.bet_size,
            BettingStructure::NoLimit => self.bet_to_match + self.min_raise,
        }
    }

    fn cap_reached(&self) -> bool {
        self.raise_cap.is_some_and(|cap| self.raises >= cap)
    }

    fn raise_allowed(
        &self,
        ledger: &ContributionLedger,
        seat: SeatIndex,
    ) -> Result<(), ActionError> {
        if let Some(cap) = self.raise_cap.filter(|_| self.cap_reached()) {
            return Err(ActionError::RaiseCapReached { cap });
        }
        if !self.may_raise[seat] {
            return Err(ActionError::RaiseNotReopened);
        }
        let player = ledger.player(seat);
        if player.committed + player.stack <= self.bet_to_match {
            return Err(ActionError::NoChips { seat });
        }
        Ok(())
    }

    /// A street is closed once nobody is left who owes an action.
    #[must_use]
    pub fn is_closed(&self, ledger: &ContributionLedger) -> bool {
        if ledger.num_in_hand() < 2 {
            return true;
        }
        let live: Vec<SeatIndex> = (0..ledger.len())
            .filter(|&seat| ledger.player(seat).can_act())
            .collect();
        match live.as_slice() {
            [] => true,
            // Nobody left to bet against once the last live player is matched.
            [seat] if ledger.player(*seat).committed >= self.bet_to_match => true,
            _ => live.iter().all(|&seat| {
                self.acted[seat] && ledger.player(seat).committed == self.bet_to_match
            }),
        }
    }

    fn needs_action(&self, ledger: &ContributionLedger, seat: SeatIndex) -> bool {
        let player = ledger.player(seat);
        player.can_act() && (!self.acted[seat] || player.committed < self.bet_to_match)
    }

    fn find_actor(
        &self,
        ledger: &ContributionLedger,
        start: SeatIndex,
        inclusive: bool,
    ) -> Option<SeatIndex> {
        if self.is_closed(ledger) {
            return None;
        }
        let n = ledger.len();
        let offset = usize::from(!inclusive);
        (0..n)
            .map(|i| (start + offset + i) % n)
            .find(|&seat| self.needs_action(ledger, seat))
    }

    /// Legal options for `seat`; empty unless it's their turn.
    #[must_use]
    pub fn legal_actions(&self, ledger: &ContributionLedger, seat: SeatIndex) -> ActionChoices {
        let mut choices = ActionChoices::default();
        if self.actor != Some(seat) {
            return choices;
        }
        let player = ledger.player(seat);
        let to_call = self.bet_to_match.saturating_sub(player.committed);
        let all_in_to = player.committed + player.stack;

        if to_call == 0 {
            choices.0.insert(ActionChoice::Check);
        } else {
            choices.0.insert(ActionChoice::Fold);
            choices.0.insert(ActionChoice::Call(to_call.min(player.stack)));
        }

        let can_raise = self.raise_allowed(ledger, seat).is_ok();
        let min_to = self.min_raise_to();
        if can_raise && all_in_to > min_to {
            choices.0.insert(ActionChoice::Raise(min_to));
        }
        if self.all_in_allowed(all_in_to, can_raise).is_ok() {
            choices.0.insert(ActionChoice::AllIn(all_in_to));
        }
        choices
    }

    fn all_in_allowed(&self, all_in_to: Chips, can_raise: bool) -> Result<(), ActionError> {
        if all_in_to <= self.bet_to_match {
            // Calling for less never changes the bet.
            return Ok(());
        }
        if !can_raise {
            return Err(self
                .raise_cap
                .filter(|_| self.cap_reached())
                .map_or(ActionError::RaiseNotReopened, |cap| {
                    ActionError::RaiseCapReached { cap }
                }));
        }
        let limit = self.min_raise_to();
        if self.structure == BettingStructure::Limit && all_in_to > limit {
            return Err(ActionError::AllInExceedsLimit {
                to: all_in_to,
                limit,
            });
        }
        Ok(())
    }

    /// Validates and applies `action` for `seat`. A refused action leaves
    /// both the round and the ledger untouched.
    pub fn apply(
        &mut self,
        ledger: &mut ContributionLedger,
        seat: SeatIndex,
        action: &Action,
    ) -> Result<Bet, ActionError> {
        if self.actor != Some(seat) {
            return Err(ActionError::OutOfTurn { seat });
        }
        let player = ledger.player(seat);
        let to_call = self.bet_to_match.saturating_sub(player.committed);
        let all_in_to = player.committed + player.stack;

        let bet = match action {
            Action::Fold => {
                if to_call == 0 {
                    return Err(ActionError::NothingToFold);
                }
                ledger.fold(seat)
            }
            Action::Check => ledger.check(seat, self.bet_to_match)?,
            Action::Call => {
                if to_call == 0 {
                    return Err(ActionError::NothingToCall);
                }
                ledger.call(seat, self.bet_to_match)
            }
            Action::Raise(to) => {
                self.raise_allowed(ledger, seat)?;
                let min_to = self.min_raise_to();
                let target = match (self.structure, *to) {
                    (BettingStructure::Limit, Some(to)) if to != min_to => {
                        return Err(ActionError::InvalidLimitRaise {
                            to,
                            expected: min_to,
                        });
                    }
                    (_, Some(to)) => to,
                    (_, None) => min_to,
                };
                // Short of a full raise is only possible by going all-in.
                if target < min_to && target < all_in_to {
                    return Err(ActionError::RaiseTooSmall {
                        to: target,
                        min: min_to,
                    });
                }
                ledger.raise(seat, target)
            }
            Action::AllIn => {
                if player.stack == 0 {
                    return Err(ActionError::NoChips { seat });
                }
                let can_raise = self.raise_allowed(ledger, seat).is_ok();
                self.all_in_allowed(all_in_to, can_raise)?;
                ledger.go_all_in(seat)
            }
        };

        self.record(ledger, seat, &bet);
        Ok(bet)
    }

    fn record(&mut self, ledger: &ContributionLedger, seat: SeatIndex, bet: &Bet) {
        let new_total = ledger.player(seat).committed;
        let raised = matches!(bet.action, BetAction::Raise | BetAction::AllIn);
        if raised && new_total > self.bet_to_match {
            let increase = new_total - self.bet_to_match;
            let full = new_total >= self.min_raise_to();
            for other in (0..ledger.len()).filter(|&other| other != seat) {
                let player = ledger.player(other);
                if !player.can_act() || player.committed >= new_total {
                    continue;
                }
                if full {
                    self.may_raise[other] = true;
                } else if self.acted[other] {
                    self.may_raise[other] = false;
                }
                self.acted[other] = false;
            }
            if full {
                self.raises += 1;
                if self.structure == BettingStructure::NoLimit {
                    self.min_raise = self.min_raise.max(increase);
                }
            }
            self.bet_to_match = new_total;
        }
        self.acted[seat] = true;
        self.actor = self.find_actor(ledger, seat, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_round(stacks: &[Chips]) -> (BettingRound, ContributionLedger) {
        let ledger = ContributionLedger::new(stacks);
        let mut round = BettingRound::new(
            Street::Flop,
            stacks.len(),
            BettingStructure::Limit,
            20,
            Some(4),
        );
        round.open(&ledger, 0);
        (round, ledger)
    }

    fn no_limit_preflop(stacks: &[Chips]) -> (BettingRound, ContributionLedger) {
        let mut ledger = ContributionLedger::new(stacks);
        ledger.post(0, 10);
        ledger.post(1, 20);
        let mut round = BettingRound::new(
            Street::PreFlop,
            stacks.len(),
            BettingStructure::NoLimit,
            20,
            None,
        );
        round.open(&ledger, 2 % stacks.len());
        (round, ledger)
    }

    // === Turn Order Tests ===

    #[test]
    fn test_open_starts_at_first_seat_needing_action() {
        let (round, _) = no_limit_preflop(&[1000, 1000, 1000]);
        assert_eq!(round.actor(), Some(2));
        assert_eq!(round.bet_to_match(), 20);
    }

    #[test]
    fn test_out_of_turn_is_refused() {
        let (mut round, mut ledger) = no_limit_preflop(&[1000, 1000, 1000]);
        assert_eq!(
            round.apply(&mut ledger, 0, &Action::Call),
            Err(ActionError::OutOfTurn { seat: 0 })
        );
        assert!(round.legal_actions(&ledger, 0).is_empty());
    }

    #[test]
    fn test_street_closes_when_all_matched() {
        let (mut round, mut ledger) = no_limit_preflop(&[1000, 1000, 1000]);
        round.apply(&mut ledger, 2, &Action::Call).unwrap();
        round.apply(&mut ledger, 0, &Action::Call).unwrap();
        assert_eq!(round.actor(), Some(1));
        assert!(!round.is_closed(&ledger));
        round.apply(&mut ledger, 1, &Action::Check).unwrap();
        assert!(round.is_closed(&ledger));
        assert_eq!(round.actor(), None);
    }

    #[test]
    fn test_raise_reopens_action() {
        let (mut round, mut ledger) = no_limit_preflop(&[1000, 1000, 1000]);
        round.apply(&mut ledger, 2, &Action::Call).unwrap();
        round.apply(&mut ledger, 0, &Action::Call).unwrap();
        round.apply(&mut ledger, 1, &Action::Raise(Some(80))).unwrap();
        assert!(!round.has_acted(2));
        assert!(!round.has_acted(0));
        assert_eq!(round.actor(), Some(2));
        assert_eq!(round.bet_to_match(), 80);
    }

    // === Legality Tests ===

    #[test]
    fn test_check_and_fold_legality() {
        let (mut round, mut ledger) = limit_round(&[1000, 1000]);
        assert_eq!(
            round.apply(&mut ledger, 0, &Action::Fold),
            Err(ActionError::NothingToFold)
        );
        assert_eq!(
            round.apply(&mut ledger, 0, &Action::Call),
            Err(ActionError::NothingToCall)
        );
        round.apply(&mut ledger, 0, &Action::Raise(None)).unwrap();
        assert_eq!(
            round.apply(&mut ledger, 1, &Action::Check),
            Err(ActionError::CannotCheck { to_call: 20 })
        );
        let legal = round.legal_actions(&ledger, 1);
        assert!(legal.contains(&Action::Fold));
        assert!(legal.contains(&Action::Call));
        assert!(!legal.contains(&Action::Check));
    }

    #[test]
    fn test_no_limit_min_raise() {
        let (mut round, mut ledger) = no_limit_preflop(&[1000, 1000, 1000]);
        assert_eq!(round.min_raise_to(), 40);
        assert_eq!(
            round.apply(&mut ledger, 2, &Action::Raise(Some(30))),
            Err(ActionError::RaiseTooSmall { to: 30, min: 40 })
        );
        round.apply(&mut ledger, 2, &Action::Raise(Some(100))).unwrap();
        assert_eq!(round.min_raise_to(), 180);
        assert_eq!(round.legal_actions(&ledger, 0).min_raise_to(), Some(180));
    }

    #[test]
    fn test_limit_raise_is_fixed() {
        let (mut round, mut ledger) = limit_round(&[1000, 1000]);
        assert_eq!(
            round.apply(&mut ledger, 0, &Action::Raise(Some(50))),
            Err(ActionError::InvalidLimitRaise {
                to: 50,
                expected: 20
            })
        );
        let bet = round.apply(&mut ledger, 0, &Action::Raise(Some(20))).unwrap();
        assert_eq!(bet.to, 20);
        let bet = round.apply(&mut ledger, 1, &Action::Raise(None)).unwrap();
        assert_eq!(bet.to, 40);
    }

    #[test]
    fn test_limit_cap_refuses_fifth_raise() {
        let (mut round, mut ledger) = limit_round(&[1000, 1000, 1000]);
        round.apply(&mut ledger, 0, &Action::Raise(None)).unwrap();
        round.apply(&mut ledger, 1, &Action::Raise(None)).unwrap();
        round.apply(&mut ledger, 2, &Action::Raise(None)).unwrap();
        round.apply(&mut ledger, 0, &Action::Raise(None)).unwrap();
        assert_eq!(round.raises(), 4);
        assert_eq!(round.bet_to_match(), 80);

        assert_eq!(
            round.apply(&mut ledger, 1, &Action::Raise(None)),
            Err(ActionError::RaiseCapReached { cap: 4 })
        );
        let legal = round.legal_actions(&ledger, 1);
        assert!(!legal.contains(&Action::Raise(None)));
        assert!(!legal.contains(&Action::AllIn));
        assert!(legal.contains(&Action::Call));
        assert!(legal.contains(&Action::Fold));

        round.apply(&mut ledger, 1, &Action::Call).unwrap();
        round.apply(&mut ledger, 2, &Action::Call).unwrap();
        assert!(round.is_closed(&ledger));
    }

    #[test]
    fn test_limit_all_in_cannot_exceed_raise() {
        let (mut round, mut ledger) = limit_round(&[1000, 1000]);
        assert!(!round.legal_actions(&ledger, 0).contains(&Action::AllIn));
        assert_eq!(
            round.apply(&mut ledger, 0, &Action::AllIn),
            Err(ActionError::AllInExceedsLimit {
                to: 1000,
                limit: 20
            })
        );
    }

    // === All-In Tests ===

    #[test]
    fn test_all_in_for_less_does_not_reopen() {
        let (mut round, mut ledger) = no_limit_preflop(&[1000, 1000, 15]);
        // Seat 2 can only call short.
        round.apply(&mut ledger, 2, &Action::AllIn).unwrap();
        assert_eq!(round.bet_to_match(), 20);
        round.apply(&mut ledger, 0, &Action::Call).unwrap();
        round.apply(&mut ledger, 1, &Action::Check).unwrap();
        assert!(round.is_closed(&ledger));
    }

    #[test]
    fn test_short_all_in_raise_does_not_let_actors_reraise() {
        // Seat 1 bets 100, seat 2 shoves 150 which is short of a full raise.
        let mut ledger = ContributionLedger::new(&[1000, 1000, 150]);
        let mut round =
            BettingRound::new(Street::Flop, 3, BettingStructure::NoLimit, 20, None);
        round.open(&ledger, 1);
        round.apply(&mut ledger, 1, &Action::Raise(Some(100))).unwrap();
        round.apply(&mut ledger, 2, &Action::AllIn).unwrap();
        assert_eq!(round.bet_to_match(), 150);

        // Seat 0 hadn't acted yet and may still raise.
        let legal = round.legal_actions(&ledger, 0);
        assert!(legal.contains(&Action::Raise(None)));
        round.apply(&mut ledger, 0, &Action::Call).unwrap();

        // Seat 1 already acted; it must respond but can't re-raise.
        let legal = round.legal_actions(&ledger, 1);
        assert!(legal.contains(&Action::Call));
        assert!(!legal.contains(&Action::Raise(None)));
        assert_eq!(
            round.apply(&mut ledger, 1, &Action::Raise(Some(400))),
            Err(ActionError::RaiseNotReopened)
        );
        round.apply(&mut ledger, 1, &Action::Call).unwrap();
        assert!(round.is_closed(&ledger));
    }

    #[test]
    fn test_short_raise_converts_to_all_in() {
        let (mut round, mut ledger) = no_limit_preflop(&[1000, 1000, 30]);
        let bet = round.apply(&mut ledger, 2, &Action::Raise(None)).unwrap();
        assert_eq!(bet.action, BetAction::AllIn);
        assert_eq!(bet.to, 30);
        // 30 is short of a full raise to 40, the bet moves but no raise counts.
        assert_eq!(round.raises(), 0);
        assert_eq!(round.bet_to_match(), 30);
    }

    #[test]
    fn test_closes_early_with_one_live_player() {
        let mut ledger = ContributionLedger::new(&[1000, 100]);
        let mut round =
            BettingRound::new(Street::Turn, 2, BettingStructure::NoLimit, 20, None);
        round.open(&ledger, 0);
        round.apply(&mut ledger, 0, &Action::Raise(Some(50))).unwrap();
        round.apply(&mut ledger, 1, &Action::AllIn).unwrap();
        assert_eq!(round.actor(), Some(0));
        round.apply(&mut ledger, 0, &Action::Call).unwrap();
        assert!(round.is_closed(&ledger));
    }

    #[test]
    fn test_no_actor_when_everyone_all_in() {
        let mut ledger = ContributionLedger::new(&[100, 100]);
        ledger.go_all_in(0);
        ledger.go_all_in(1);
        let mut round =
            BettingRound::new(Street::River, 2, BettingStructure::NoLimit, 20, None);
        round.open(&ledger, 0);
        assert_eq!(round.actor(), None);
        assert!(round.is_closed(&ledger));
    }
}
