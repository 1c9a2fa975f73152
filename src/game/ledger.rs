//! Contribution ledger.
//!
//! One row per seat holding the chips behind, the chips committed on the
//! current street, and the folded/all-in flags. Actions move chips from the
//! stack to the street commitment; a sweep hands the street's commitments
//! to the pot ledger and zeroes them.

use serde::{Deserialize, Serialize};

use super::{
    entities::{Bet, BetAction, Chips, SeatIndex},
    errors::ActionError,
};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerLedger {
    /// Chips not yet wagered.
    pub stack: Chips,
    /// Chips in for the current street.
    pub committed: Chips,
    /// Chips in for the whole hand, swept or not.
    pub total_committed: Chips,
    pub folded: bool,
    pub all_in: bool,
}

impl PlayerLedger {
    #[must_use]
    pub fn new(stack: Chips) -> Self {
        Self {
            stack,
            ..Self::default()
        }
    }

    /// Still contesting the pot.
    #[must_use]
    pub fn in_hand(&self) -> bool {
        !self.folded
    }

    /// Still able to act.
    #[must_use]
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }
}

/// A seat's street commitment as handed to the pot ledger.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Contribution {
    pub seat: SeatIndex,
    pub committed: Chips,
    pub folded: bool,
    pub all_in: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContributionLedger {
    players: Vec<PlayerLedger>,
}

impl ContributionLedger {
    /// A fresh ledger for a hand. Seats with an empty stack sit the hand
    /// out and are recorded as folded.
    #[must_use]
    pub fn new(stacks: &[Chips]) -> Self {
        let players = stacks
            .iter()
            .map(|&stack| PlayerLedger {
                folded: stack == 0,
                ..PlayerLedger::new(stack)
            })
            .collect();
        Self { players }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[must_use]
    pub fn player(&self, seat: SeatIndex) -> &PlayerLedger {
        &self.players[seat]
    }

    #[must_use]
    pub fn players(&self) -> &[PlayerLedger] {
        &self.players
    }

    /// Players who haven't folded.
    #[must_use]
    pub fn num_in_hand(&self) -> usize {
        self.players.iter().filter(|p| p.in_hand()).count()
    }

    /// Players who can still act.
    #[must_use]
    pub fn num_can_act(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    /// The largest street commitment.
    #[must_use]
    pub fn max_committed(&self) -> Chips {
        self.players.iter().map(|p| p.committed).max().unwrap_or(0)
    }

    /// Every chip moved off a stack this hand.
    #[must_use]
    pub fn total_committed(&self) -> Chips {
        self.players.iter().map(|p| p.total_committed).sum()
    }

    /// Moves up to `amount` from the stack into the street commitment and
    /// reports how much moved.
    fn commit(&mut self, seat: SeatIndex, amount: Chips) -> Chips {
        let player = &mut self.players[seat];
        let moved = amount.min(player.stack);
        player.stack -= moved;
        player.committed += moved;
        player.total_committed += moved;
        if player.stack == 0 && moved > 0 {
            player.all_in = true;
        }
        moved
    }

    fn bet(&self, seat: SeatIndex, action: BetAction, amount: Chips) -> Bet {
        let player = &self.players[seat];
        let action = if player.all_in && action != BetAction::Fold {
            BetAction::AllIn
        } else {
            action
        };
        Bet {
            action,
            amount,
            to: player.committed,
        }
    }

    /// Brings the street commitment up to `target`. A call the stack can't
    /// cover becomes an all-in.
    pub fn call(&mut self, seat: SeatIndex, target: Chips) -> Bet {
        let owed = target.saturating_sub(self.players[seat].committed);
        let moved = self.commit(seat, owed);
        self.bet(seat, BetAction::Call, moved)
    }

    /// Raises the street commitment to `target`. A raise the stack can't
    /// cover becomes an all-in.
    pub fn raise(&mut self, seat: SeatIndex, target: Chips) -> Bet {
        let owed = target.saturating_sub(self.players[seat].committed);
        let moved = self.commit(seat, owed);
        self.bet(seat, BetAction::Raise, moved)
    }

    pub fn go_all_in(&mut self, seat: SeatIndex) -> Bet {
        let stack = self.players[seat].stack;
        let moved = self.commit(seat, stack);
        self.bet(seat, BetAction::AllIn, moved)
    }

    pub fn fold(&mut self, seat: SeatIndex) -> Bet {
        self.players[seat].folded = true;
        self.bet(seat, BetAction::Fold, 0)
    }

    /// Legal only when the player already matches `bet_to_match`.
    pub fn check(&mut self, seat: SeatIndex, bet_to_match: Chips) -> Result<Bet, ActionError> {
        let committed = self.players[seat].committed;
        if committed != bet_to_match {
            return Err(ActionError::CannotCheck {
                to_call: bet_to_match.saturating_sub(committed),
            });
        }
        Ok(self.bet(seat, BetAction::Check, 0))
    }

    /// Posts a forced bet. A short stack posts what it has and is all-in.
    pub fn post(&mut self, seat: SeatIndex, amount: Chips) -> Bet {
        let moved = self.commit(seat, amount);
        self.bet(seat, BetAction::Post, moved)
    }

    /// Hands every seat's street commitment to the caller and zeroes it.
    pub fn sweep(&mut self) -> Vec<Contribution> {
        self.players
            .iter_mut()
            .enumerate()
            .map(|(seat, player)| {
                let committed = std::mem::take(&mut player.committed);
                Contribution {
                    seat,
                    committed,
                    folded: player.folded,
                    all_in: player.all_in,
                }
            })
            .collect()
    }

    /// Pays chips back onto a stack.
    pub fn award(&mut self, seat: SeatIndex, amount: Chips) {
        self.players[seat].stack += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> ContributionLedger {
        ContributionLedger::new(&[1000, 1000, 150, 0])
    }

    #[test]
    fn test_empty_stacks_sit_out() {
        let ledger = ledger();
        assert!(ledger.player(3).folded);
        assert_eq!(ledger.num_in_hand(), 3);
        assert_eq!(ledger.num_can_act(), 3);
    }

    #[test]
    fn test_call_moves_difference() {
        let mut ledger = ledger();
        ledger.post(0, 20);
        let bet = ledger.call(0, 50);
        assert_eq!(bet.action, BetAction::Call);
        assert_eq!(bet.amount, 30);
        assert_eq!(bet.to, 50);
        assert_eq!(ledger.player(0).stack, 950);
    }

    #[test]
    fn test_short_call_becomes_all_in() {
        let mut ledger = ledger();
        let bet = ledger.call(2, 400);
        assert_eq!(bet.action, BetAction::AllIn);
        assert_eq!(bet.amount, 150);
        assert_eq!(bet.to, 150);
        let player = ledger.player(2);
        assert!(player.all_in);
        assert_eq!(player.stack, 0);
    }

    #[test]
    fn test_exact_raise_of_stack_is_all_in() {
        let mut ledger = ledger();
        let bet = ledger.raise(2, 150);
        assert_eq!(bet.action, BetAction::AllIn);
        assert!(ledger.player(2).all_in);
    }

    #[test]
    fn test_raise() {
        let mut ledger = ledger();
        let bet = ledger.raise(1, 100);
        assert_eq!(bet.action, BetAction::Raise);
        assert_eq!(bet.amount, 100);
        assert_eq!(ledger.max_committed(), 100);
    }

    #[test]
    fn test_check_requires_match() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.check(0, 20),
            Err(ActionError::CannotCheck { to_call: 20 })
        );
        ledger.call(0, 20);
        assert_eq!(ledger.check(0, 20).unwrap().action, BetAction::Check);
    }

    #[test]
    fn test_short_post_is_all_in() {
        let mut ledger = ContributionLedger::new(&[5, 100]);
        let bet = ledger.post(0, 20);
        assert_eq!(bet.action, BetAction::AllIn);
        assert_eq!(bet.amount, 5);
    }

    #[test]
    fn test_fold() {
        let mut ledger = ledger();
        ledger.post(1, 20);
        let bet = ledger.fold(1);
        assert_eq!(bet.action, BetAction::Fold);
        assert!(ledger.player(1).folded);
        assert_eq!(ledger.player(1).committed, 20);
    }

    #[test]
    fn test_sweep_zeroes_commitments() {
        let mut ledger = ledger();
        ledger.post(0, 10);
        ledger.post(1, 20);
        ledger.go_all_in(2);
        let contributions = ledger.sweep();
        assert_eq!(contributions.len(), 4);
        assert_eq!(contributions[2].committed, 150);
        assert!(contributions[2].all_in);
        assert!(contributions[3].folded);
        assert!(ledger.players().iter().all(|p| p.committed == 0));
        assert_eq!(ledger.total_committed(), 180);
    }

    #[test]
    fn test_award() {
        let mut ledger = ledger();
        ledger.go_all_in(2);
        ledger.award(2, 450);
        assert_eq!(ledger.player(2).stack, 450);
    }
}
