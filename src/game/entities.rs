use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fmt::{self},
    hash::{Hash, Hasher},
    mem::discriminant,
    str::FromStr,
};

use super::{
    constants::DECK_SIZE,
    errors::{CardParseError, DeckError},
};

/// Suits in stud tie-break order: clubs are the lowest, spades the highest.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Diamond, Self::Heart, Self::Spade];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Diamond => "♦",
            Self::Heart => "♥",
            Self::Spade => "♠",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

pub const ACE: Value = 14;

/// A card is a tuple of a value (two=2u8 ... ace=14u8) and a suit.
/// Aces are stored high; the low evaluator maps them to 1 itself.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    /// Value with the ace counted as one, for ace-to-five lows.
    #[must_use]
    pub const fn low_value(&self) -> Value {
        if self.0 == ACE { 1 } else { self.0 }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            1 | 14 => "A",
            10 => "T",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        write!(f, "{value}{}", self.1)
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parses short notation such as `As`, `Td`, `10h` or `7c`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let suit_char = chars
            .next_back()
            .ok_or_else(|| CardParseError::InvalidLength(s.to_string()))?;
        let value_str = chars.as_str();
        let value = match value_str.to_ascii_uppercase().as_str() {
            "A" => ACE,
            "K" => 13,
            "Q" => 12,
            "J" => 11,
            "T" | "10" => 10,
            v if v.len() == 1 => match v.parse::<Value>() {
                Ok(n) if (2..=9).contains(&n) => n,
                _ => return Err(CardParseError::InvalidValue(value_str.to_string())),
            },
            _ => return Err(CardParseError::InvalidValue(value_str.to_string())),
        };
        let suit = match suit_char.to_ascii_lowercase() {
            'c' | '♣' => Suit::Club,
            'd' | '♦' => Suit::Diamond,
            'h' | '♥' => Suit::Heart,
            's' | '♠' => Suit::Spade,
            other => return Err(CardParseError::InvalidSuit(other)),
        };
        Ok(Self(value, suit))
    }
}

/// Parses a whitespace separated list of cards, e.g. `"As Kd 7c"`.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, CardParseError> {
    s.split_whitespace().map(str::parse).collect()
}

/// A deck of cards dealt from the top. Shuffling is driven by an injected
/// RNG so a seeded generator reproduces the same deal.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    deck_idx: usize,
}

impl Deck {
    /// A deck that deals the given cards in order. Useful for scripting a
    /// deal exactly.
    pub fn stacked<I>(cards: I) -> Self
    where
        I: IntoIterator<Item = Card>,
    {
        Self {
            cards: cards.into_iter().collect(),
            deck_idx: 0,
        }
    }

    /// A full deck that deals `top` first and then the rest of the cards
    /// in their usual order.
    pub fn with_top_cards<I>(top: I) -> Self
    where
        I: IntoIterator<Item = Card>,
    {
        let mut cards: Vec<Card> = top.into_iter().collect();
        let rest: Vec<Card> = Self::default()
            .cards
            .into_iter()
            .filter(|card| !cards.contains(card))
            .collect();
        cards.extend(rest);
        Self { cards, deck_idx: 0 }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.shuffle(rng);
        deck
    }

    pub fn deal_card(&mut self) -> Result<Card, DeckError> {
        let card = self
            .cards
            .get(self.deck_idx)
            .copied()
            .ok_or(DeckError::Exhausted {
                dealt: self.deck_idx,
            })?;
        self.deck_idx += 1;
        Ok(card)
    }

    pub fn burn_card(&mut self) -> Result<(), DeckError> {
        self.deal_card().map(|_| ())
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.deck_idx
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.deck_idx = 0;
    }
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for value in 2..=ACE {
            for suit in Suit::ALL {
                cards.push(Card(value, suit));
            }
        }
        Self { cards, deck_idx: 0 }
    }
}

/// Type alias for whole chips. All bets, stacks and pots are whole chips;
/// uneven splits are settled one chip at a time.
pub type Chips = u32;

pub type SeatIndex = usize;

/// Unified betting streets. Board games use pre-flop through river; stud
/// games map third through seventh street onto pre-flop through final.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Street {
    #[default]
    Start,
    PreFlop,
    Flop,
    Turn,
    River,
    Final,
    Showdown,
}

impl Street {
    const BETTING: [Self; 5] = [
        Self::PreFlop,
        Self::Flop,
        Self::Turn,
        Self::River,
        Self::Final,
    ];

    /// Zero-based position among the betting streets.
    #[must_use]
    pub fn betting_index(self) -> Option<usize> {
        Self::BETTING.iter().position(|s| *s == self)
    }

    #[must_use]
    pub fn from_betting_index(idx: usize) -> Option<Self> {
        Self::BETTING.get(idx).copied()
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Start => "start",
            Self::PreFlop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Final => "final street",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

/// What a player asks to do. `Raise(Some(to))` raises to a street total of
/// `to`; `Raise(None)` makes the minimum legal raise.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Action {
    AllIn,
    Call,
    Check,
    Fold,
    Raise(Option<Chips>),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::AllIn => "all-in",
            Self::Call => "call",
            Self::Check => "check",
            Self::Fold => "fold",
            Self::Raise(Some(to)) => &format!("raise to ${to}"),
            Self::Raise(None) => "min-raise",
        };
        write!(f, "{repr}")
    }
}

impl From<Bet> for Action {
    fn from(value: Bet) -> Self {
        match value.action {
            BetAction::AllIn => Self::AllIn,
            BetAction::Call | BetAction::Post => Self::Call,
            BetAction::Check => Self::Check,
            BetAction::Fold => Self::Fold,
            BetAction::Raise => Self::Raise(Some(value.to)),
        }
    }
}

/// A legal option offered to a player, carrying the chips involved: the
/// call amount, the minimum raise-to total, or the all-in total.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum ActionChoice {
    AllIn(Chips),
    Call(Chips),
    Check,
    Fold,
    Raise(Chips),
}

impl fmt::Display for ActionChoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::AllIn(to) => format!("all-in (== ${to})"),
            Self::Call(amount) => format!("call (== ${amount})"),
            Self::Check => "check".to_string(),
            Self::Fold => "fold".to_string(),
            Self::Raise(to) => format!("raise (>= ${to})"),
        };
        write!(f, "{repr}")
    }
}

// Choices are compared by variant only. The amounts are informational;
// the betting round validates the actual chips.
impl Eq for ActionChoice {}

impl Hash for ActionChoice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
    }
}

impl PartialEq for ActionChoice {
    fn eq(&self, other: &Self) -> bool {
        discriminant(self) == discriminant(other)
    }
}

impl From<ActionChoice> for Action {
    fn from(value: ActionChoice) -> Self {
        match value {
            ActionChoice::AllIn(_) => Self::AllIn,
            ActionChoice::Call(_) => Self::Call,
            ActionChoice::Check => Self::Check,
            ActionChoice::Fold => Self::Fold,
            ActionChoice::Raise(to) => Self::Raise(Some(to)),
        }
    }
}

/// The set of legal options for the player to act.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ActionChoices(pub HashSet<ActionChoice>);

impl ActionChoices {
    fn key(action: &Action) -> ActionChoice {
        match action {
            Action::AllIn => ActionChoice::AllIn(0),
            Action::Call => ActionChoice::Call(0),
            Action::Check => ActionChoice::Check,
            Action::Fold => ActionChoice::Fold,
            Action::Raise(_) => ActionChoice::Raise(0),
        }
    }

    #[must_use]
    pub fn contains(&self, action: &Action) -> bool {
        self.0.contains(&Self::key(action))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Chips needed to call, if calling is an option.
    #[must_use]
    pub fn call_amount(&self) -> Option<Chips> {
        match self.0.get(&ActionChoice::Call(0)) {
            Some(ActionChoice::Call(amount)) => Some(*amount),
            _ => None,
        }
    }

    /// Smallest legal raise-to total, if raising is an option.
    #[must_use]
    pub fn min_raise_to(&self) -> Option<Chips> {
        match self.0.get(&ActionChoice::Raise(0)) {
            Some(ActionChoice::Raise(to)) => Some(*to),
            _ => None,
        }
    }

    /// Street total after shoving, if shoving is an option.
    #[must_use]
    pub fn all_in_to(&self) -> Option<Chips> {
        match self.0.get(&ActionChoice::AllIn(0)) {
            Some(ActionChoice::AllIn(to)) => Some(*to),
            _ => None,
        }
    }
}

impl fmt::Display for ActionChoices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut choices: Vec<&ActionChoice> = self.0.iter().collect();
        choices.sort_by_key(|choice| match choice {
            ActionChoice::Fold => 0,
            ActionChoice::Check => 1,
            ActionChoice::Call(_) => 2,
            ActionChoice::Raise(_) => 3,
            ActionChoice::AllIn(_) => 4,
        });
        let num_options = choices.len();
        let repr = choices
            .iter()
            .enumerate()
            .map(|(i, action_choice)| {
                let repr = action_choice.to_string();
                match i {
                    0 if num_options == 1 => repr,
                    0 if num_options == 2 => format!("{repr} "),
                    0 if num_options >= 3 => format!("{repr}, "),
                    i if i == num_options - 1 && num_options != 1 => format!("or {repr}"),
                    _ => format!("{repr}, "),
                }
            })
            .collect::<String>();
        write!(f, "{repr}")
    }
}

impl<I> From<I> for ActionChoices
where
    I: IntoIterator<Item = ActionChoice>,
{
    fn from(iter: I) -> Self {
        Self(iter.into_iter().collect::<HashSet<_>>())
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum BetAction {
    AllIn,
    Call,
    Check,
    Fold,
    /// A forced bet: blind, ante or bring-in.
    Post,
    Raise,
}

/// The concrete action a ledger applied. `amount` is what moved from the
/// stack; `to` is the player's street total afterwards.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bet {
    pub action: BetAction,
    pub amount: Chips,
    pub to: Chips,
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Self { amount, to, .. } = self;
        let repr = match self.action {
            BetAction::AllIn => format!("goes all-in for ${to}"),
            BetAction::Call => format!("calls ${amount}"),
            BetAction::Check => "checks".to_string(),
            BetAction::Fold => "folds".to_string(),
            BetAction::Post => format!("posts ${amount}"),
            BetAction::Raise => format!("raises to ${to}"),
        };
        write!(f, "{repr}")
    }
}
