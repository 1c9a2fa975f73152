//! The decision seam between the engine and whoever picks actions.

use enum_dispatch::enum_dispatch;
use std::collections::VecDeque;

use super::decision::BotDecisionMaker;
use crate::game::{
    entities::{Action, ActionChoices},
    state_machine::VisibleState,
};

/// Picks an action for the seat to act. The engine validates whatever
/// comes back, so a policy may probe.
#[enum_dispatch]
pub trait DecisionPolicy {
    fn decide(&mut self, state: &VisibleState, legal: &ActionChoices) -> Action;
}

/// Built-in policies, dispatched without boxing.
#[enum_dispatch(DecisionPolicy)]
#[derive(Debug)]
pub enum Policy {
    ScriptedPolicy,
    CallingStation,
    BotDecisionMaker,
}

/// Check when free, otherwise call, otherwise fold.
#[must_use]
pub fn passive_action(legal: &ActionChoices) -> Action {
    [Action::Check, Action::Call, Action::Fold, Action::AllIn]
        .into_iter()
        .find(|action| legal.contains(action))
        .unwrap_or(Action::Fold)
}

/// Check when free, otherwise fold. Used when a seat keeps asking for
/// actions the engine refuses.
#[must_use]
pub fn forced_action(legal: &ActionChoices) -> Action {
    if legal.contains(&Action::Check) {
        Action::Check
    } else {
        Action::Fold
    }
}

/// `action` if it's among the legal options, else the passive fallback.
#[must_use]
pub fn legalize(action: Action, legal: &ActionChoices) -> Action {
    if legal.contains(&action) {
        action
    } else {
        passive_action(legal)
    }
}

/// Plays a queue of actions in order, then checks or calls.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPolicy {
    actions: VecDeque<Action>,
}

impl ScriptedPolicy {
    pub fn new<I: IntoIterator<Item = Action>>(actions: I) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn decide(&mut self, _state: &VisibleState, legal: &ActionChoices) -> Action {
        self.actions
            .pop_front()
            .unwrap_or_else(|| passive_action(legal))
    }
}

/// Never folds, never raises.
#[derive(Clone, Copy, Debug, Default)]
pub struct CallingStation;

impl DecisionPolicy for CallingStation {
    fn decide(&mut self, _state: &VisibleState, legal: &ActionChoices) -> Action {
        passive_action(legal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        entities::{ActionChoice, Deck},
        state_machine::{Hand, HandOptions},
        variant::VariantDescriptor,
    };

    fn view() -> VisibleState {
        let hand = Hand::start(
            &VariantDescriptor::texas_holdem(),
            &[1000, 1000],
            0,
            Deck::default(),
            HandOptions::default(),
        )
        .unwrap();
        hand.visible_state(0)
    }

    fn facing_bet() -> ActionChoices {
        ActionChoices::from([
            ActionChoice::Fold,
            ActionChoice::Call(10),
            ActionChoice::Raise(40),
            ActionChoice::AllIn(1000),
        ])
    }

    #[test]
    fn test_scripted_plays_queue_then_calls() {
        let mut policy = Policy::from(ScriptedPolicy::new([Action::Raise(Some(60))]));
        let state = view();
        assert_eq!(policy.decide(&state, &facing_bet()), Action::Raise(Some(60)));
        assert_eq!(policy.decide(&state, &facing_bet()), Action::Call);
        let free = ActionChoices::from([ActionChoice::Check, ActionChoice::Raise(20)]);
        assert_eq!(policy.decide(&state, &free), Action::Check);
    }

    #[test]
    fn test_calling_station() {
        let mut policy = Policy::from(CallingStation);
        for _ in 0..3 {
            assert_eq!(policy.decide(&view(), &facing_bet()), Action::Call);
        }
    }

    #[test]
    fn test_legalize_and_forced() {
        assert_eq!(legalize(Action::Check, &facing_bet()), Action::Call);
        assert_eq!(legalize(Action::Raise(None), &facing_bet()), Action::Raise(None));
        assert_eq!(forced_action(&facing_bet()), Action::Fold);
        let free = ActionChoices::from([ActionChoice::Check]);
        assert_eq!(forced_action(&free), Action::Check);
    }
}
