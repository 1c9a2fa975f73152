//! Hand evaluation.
//!
//! Everything here is a pure function over card slices. High hands use the
//! usual category order with a tie-break sequence built from the cards that
//! make the category. Low hands use ace-to-five ranking where the ace counts
//! as one and straights and flushes are ignored.

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, fmt};

use super::{
    constants::{LOW_QUALIFIER, UNQUALIFIED_LOW_VALUE},
    entities::{ACE, Card, Value},
};

/// High-hand categories numbered one through ten. `Incomplete` ranks below
/// everything and only describes hands with fewer than five cards.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Category {
    Incomplete = 0,
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl Category {
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Incomplete => "Incomplete hand",
            Self::HighCard => "High Card",
            Self::OnePair => "One Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOfAKind => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
            Self::RoyalFlush => "Royal Flush",
        };
        write!(f, "{repr}")
    }
}

fn value_name(value: Value) -> &'static str {
    match value {
        1 | 14 => "Ace",
        2 => "Two",
        3 => "Three",
        4 => "Four",
        5 => "Five",
        6 => "Six",
        7 => "Seven",
        8 => "Eight",
        9 => "Nine",
        10 => "Ten",
        11 => "Jack",
        12 => "Queen",
        13 => "King",
        _ => "?",
    }
}

fn value_plural(value: Value) -> String {
    match value {
        6 => "Sixes".to_string(),
        v => format!("{}s", value_name(v)),
    }
}

/// A totally ordered high-hand rank. Two ranks compare by category and then
/// by `values`; `cards` only records which five cards made the hand.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HandRank {
    pub category: Category,
    pub values: Vec<Value>,
    pub cards: Vec<Card>,
}

impl HandRank {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.category != Category::Incomplete
    }
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.values.cmp(&other.values))
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HandRank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HandRank {}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.values.first().copied().unwrap_or_default();
        let second = self.values.get(1).copied().unwrap_or_default();
        let category = self.category;
        let repr = match category {
            Category::Incomplete | Category::RoyalFlush => category.to_string(),
            Category::HighCard | Category::Straight | Category::Flush | Category::StraightFlush => {
                format!("{category}: {} high", value_name(first))
            }
            Category::OnePair | Category::ThreeOfAKind | Category::FourOfAKind => {
                format!("{category}: {}", value_plural(first))
            }
            Category::TwoPair => format!(
                "{category}: {} and {}",
                value_plural(first),
                value_plural(second)
            ),
            Category::FullHouse => format!(
                "{category}: {} full of {}",
                value_plural(first),
                value_plural(second)
            ),
        };
        write!(f, "{repr}")
    }
}

/// Groups values by multiplicity, largest group first and higher values
/// first within the same group size.
fn group_values(cards: &[Card]) -> Vec<(usize, Value)> {
    let mut counts: BTreeMap<Value, usize> = BTreeMap::new();
    for card in cards {
        *counts.entry(card.0).or_default() += 1;
    }
    let mut groups: Vec<(usize, Value)> = counts.into_iter().map(|(v, c)| (c, v)).collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    groups
}

/// High card of a five-card straight, treating the wheel as five high.
fn straight_high(sorted_desc: &[Value]) -> Option<Value> {
    let distinct = sorted_desc.windows(2).all(|w| w[0] != w[1]);
    if !distinct || sorted_desc.len() != 5 {
        return None;
    }
    if sorted_desc[0] - sorted_desc[4] == 4 {
        Some(sorted_desc[0])
    } else if sorted_desc == [ACE, 5, 4, 3, 2] {
        Some(5)
    } else {
        None
    }
}

fn eval_five(cards: &[Card]) -> HandRank {
    let mut values: Vec<Value> = cards.iter().map(|c| c.0).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));
    let is_flush = cards.windows(2).all(|w| w[0].1 == w[1].1);
    let straight = straight_high(&values);
    let groups = group_values(cards);

    let (category, values) = match (is_flush, straight) {
        (true, Some(ACE)) => (Category::RoyalFlush, vec![ACE]),
        (true, Some(high)) => (Category::StraightFlush, vec![high]),
        _ => match groups.as_slice() {
            [(4, quad), (1, kicker)] => (Category::FourOfAKind, vec![*quad, *kicker]),
            [(3, trips), (2, pair)] => (Category::FullHouse, vec![*trips, *pair]),
            _ if is_flush => (Category::Flush, values),
            _ if straight.is_some() => (Category::Straight, straight.into_iter().collect()),
            [(3, trips), (1, k1), (1, k2)] => (Category::ThreeOfAKind, vec![*trips, *k1, *k2]),
            [(2, high), (2, low), (1, kicker)] => (Category::TwoPair, vec![*high, *low, *kicker]),
            [(2, pair), rest @ ..] => {
                let mut tie_break = vec![*pair];
                tie_break.extend(rest.iter().map(|(_, v)| *v));
                (Category::OnePair, tie_break)
            }
            _ => (Category::HighCard, values),
        },
    };

    HandRank {
        category,
        values,
        cards: cards.to_vec(),
    }
}

/// Index combinations of `k` out of `n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] != i + n - k {
                break;
            }
            if i == 0 {
                return out;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

fn pick(cards: &[Card], idx: &[usize]) -> Vec<Card> {
    idx.iter().map(|&i| cards[i]).collect()
}

/// Best five-card high hand from any five of `cards`. Fewer than five
/// cards yields the `Incomplete` category with the values high to low.
#[must_use]
pub fn eval_high(cards: &[Card]) -> HandRank {
    if cards.len() < 5 {
        let mut values: Vec<Value> = cards.iter().map(|c| c.0).collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        return HandRank {
            category: Category::Incomplete,
            values,
            cards: cards.to_vec(),
        };
    }
    if cards.len() == 5 {
        return eval_five(cards);
    }
    combinations(cards.len(), 5)
        .iter()
        .map(|idx| eval_five(&pick(cards, idx)))
        .max()
        .unwrap_or_else(|| eval_five(&cards[..5]))
}

/// Best high hand using exactly two of `hole` and three of `board`.
#[must_use]
pub fn eval_omaha_high(hole: &[Card], board: &[Card]) -> HandRank {
    omaha_hands(hole, board)
        .iter()
        .map(|five| eval_five(five))
        .max()
        .unwrap_or_else(|| {
            let mut cards = hole.to_vec();
            cards.extend_from_slice(board);
            eval_high(&cards[..cards.len().min(4)])
        })
}

fn omaha_hands(hole: &[Card], board: &[Card]) -> Vec<Vec<Card>> {
    let mut hands = Vec::new();
    for hole_idx in combinations(hole.len(), 2) {
        for board_idx in combinations(board.len(), 3) {
            let mut five = pick(hole, &hole_idx);
            five.extend(pick(board, &board_idx));
            hands.push(five);
        }
    }
    hands
}

/// Ranks the face-up cards of a stud hand. Only pairs, trips and quads
/// count; straights and flushes need five cards.
#[must_use]
pub fn rank_exposed(cards: &[Card]) -> HandRank {
    if cards.len() >= 5 {
        return eval_high(cards);
    }
    let groups = group_values(cards);
    let category = match groups.as_slice() {
        [] => Category::Incomplete,
        [(4, _), ..] => Category::FourOfAKind,
        [(3, _), ..] => Category::ThreeOfAKind,
        [(2, _), (2, _), ..] => Category::TwoPair,
        [(2, _), ..] => Category::OnePair,
        _ => Category::HighCard,
    };
    let values = groups.iter().map(|(_, v)| *v).collect();
    HandRank {
        category,
        values,
        cards: cards.to_vec(),
    }
}

/// Penalty added per pair, trips or quads in an ace-to-five hand.
const fn group_penalty(count: usize) -> u32 {
    match count {
        2 => 100,
        3 => 300,
        4 => 500,
        _ => 0,
    }
}

/// An ace-to-five low rank. The ordering is by strength: a better (lower)
/// low compares greater, so lows and highs can share `argmax`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LowHandRank {
    /// Five distinct ranks, all eight or below.
    pub qualified: bool,
    /// Inflation for paired hands; zero when all five ranks differ.
    pub penalty: u32,
    /// Low values (ace is one), ascending.
    pub values: Vec<Value>,
    pub cards: Vec<Card>,
}

impl LowHandRank {
    /// The rank of a hand with no qualifying low. Loses to every real low
    /// and ties with other unqualified hands.
    #[must_use]
    pub fn unqualified() -> Self {
        Self {
            qualified: false,
            penalty: u32::MAX,
            values: vec![UNQUALIFIED_LOW_VALUE; 5],
            cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_unqualified(&self) -> bool {
        self.penalty == u32::MAX
    }
}

impl Ord for LowHandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower penalty wins, then the lower sequence read from the top card.
        other.penalty.cmp(&self.penalty).then_with(|| {
            let ours = self.values.iter().rev();
            let theirs = other.values.iter().rev();
            theirs.cmp(ours)
        })
    }
}

impl PartialOrd for LowHandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LowHandRank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LowHandRank {}

impl fmt::Display for LowHandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unqualified() {
            return write!(f, "No qualifying low");
        }
        let top = self.values.last().copied().unwrap_or_default();
        let sequence = self
            .values
            .iter()
            .rev()
            .map(|v| match v {
                1 => "A".to_string(),
                v => v.to_string(),
            })
            .collect::<Vec<_>>()
            .join("-");
        write!(f, "{} low: {sequence}", value_name(top))
    }
}

fn low_five(cards: &[Card]) -> LowHandRank {
    let mut values: Vec<Value> = cards.iter().map(Card::low_value).collect();
    values.sort_unstable();
    let penalty = group_values(cards)
        .iter()
        .map(|(count, _)| group_penalty(*count))
        .sum::<u32>();
    let qualified = penalty == 0 && values.iter().all(|v| *v <= LOW_QUALIFIER);
    LowHandRank {
        qualified,
        penalty,
        values,
        cards: cards.to_vec(),
    }
}

/// Best eight-or-better low from any five of `cards`, or the unqualified
/// rank when none exists.
#[must_use]
pub fn eval_low(cards: &[Card]) -> LowHandRank {
    combinations(cards.len(), 5)
        .iter()
        .map(|idx| low_five(&pick(cards, idx)))
        .filter(|low| low.qualified)
        .max()
        .unwrap_or_else(LowHandRank::unqualified)
}

/// Best ace-to-five low from any five of `cards` with no qualifier; paired
/// hands are ranked behind unpaired ones.
#[must_use]
pub fn eval_low_any(cards: &[Card]) -> LowHandRank {
    combinations(cards.len(), 5)
        .iter()
        .map(|idx| low_five(&pick(cards, idx)))
        .max()
        .unwrap_or_else(LowHandRank::unqualified)
}

/// Best eight-or-better low using exactly two of `hole` and three of `board`.
#[must_use]
pub fn eval_omaha_low(hole: &[Card], board: &[Card]) -> LowHandRank {
    omaha_hands(hole, board)
        .iter()
        .map(|five| low_five(five))
        .filter(|low| low.qualified)
        .max()
        .unwrap_or_else(LowHandRank::unqualified)
}

/// Best ace-to-five low using exactly two hole and three board cards, with
/// no qualifier.
#[must_use]
pub fn eval_omaha_low_any(hole: &[Card], board: &[Card]) -> LowHandRank {
    omaha_hands(hole, board)
        .iter()
        .map(|five| low_five(five))
        .max()
        .unwrap_or_else(LowHandRank::unqualified)
}

/// Indices of every item tied for the maximum.
pub fn argmax<T: Ord>(items: &[T]) -> Vec<usize> {
    let Some(best) = items.iter().max() else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| *item == best)
        .map(|(i, _)| i)
        .collect()
}
