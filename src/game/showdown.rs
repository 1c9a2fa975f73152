//! Showdown resolution.
//!
//! Every pot is settled on its own, highest side pot first. Hands are only
//! compared among the pot's eligible players, so folded players never
//! appear here.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{
    entities::{Card, Chips, SeatIndex},
    functional::{
        HandRank, LowHandRank, argmax, eval_high, eval_low, eval_low_any, eval_omaha_high,
        eval_omaha_low, eval_omaha_low_any,
    },
    pot::Pot,
    variant::{HandResolution, PotResolution, VariantDescriptor},
};

/// A player's evaluated cards at showdown.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ShowdownHand {
    pub seat: SeatIndex,
    pub cards: Vec<Card>,
    pub high: HandRank,
    /// Present in hi-lo variants; may be the unqualified rank.
    pub low: Option<LowHandRank>,
}

impl ShowdownHand {
    /// Evaluates `cards` (a player's own cards) with `board` under the
    /// variant's hand and pot resolution rules.
    #[must_use]
    pub fn evaluate(
        variant: &VariantDescriptor,
        seat: SeatIndex,
        cards: &[Card],
        board: &[Card],
    ) -> Self {
        let (high, low) = match variant.hand_resolution {
            HandResolution::AnyFive => {
                let mut all = cards.to_vec();
                all.extend_from_slice(board);
                let low = match variant.pot_resolution {
                    PotResolution::HighOnly => None,
                    PotResolution::HiLoAceToFive => Some(eval_low_any(&all)),
                    PotResolution::HiLoMustQualify => Some(eval_low(&all)),
                };
                (eval_high(&all), low)
            }
            HandResolution::TwoPlusThree => {
                let low = match variant.pot_resolution {
                    PotResolution::HighOnly => None,
                    PotResolution::HiLoAceToFive => Some(eval_omaha_low_any(cards, board)),
                    PotResolution::HiLoMustQualify => Some(eval_omaha_low(cards, board)),
                };
                (eval_omaha_high(cards, board), low)
            }
        };
        Self {
            seat,
            cards: cards.to_vec(),
            high,
            low,
        }
    }

    /// A low that can win the low half.
    fn qualifying_low(&self) -> Option<&LowHandRank> {
        self.low.as_ref().filter(|low| !low.is_unqualified())
    }
}

/// Which part of a pot a payout came from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Share {
    Uncontested,
    High,
    Low,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Payout {
    pub seat: SeatIndex,
    pub amount: Chips,
    pub share: Share,
}

/// The settlement of one pot.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PotAward {
    pub pot_index: usize,
    pub amount: Chips,
    pub high_winners: Vec<SeatIndex>,
    pub low_winners: Vec<SeatIndex>,
    pub payouts: Vec<Payout>,
}

impl PotAward {
    #[must_use]
    pub fn is_chopped(&self) -> bool {
        self.high_winners.len() > 1 || self.low_winners.len() > 1
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Settlement {
    /// Awards in the order pots were settled: last side pot first.
    pub awards: Vec<PotAward>,
    /// Some pot had more than one winner on either side.
    pub chopped: bool,
}

impl Settlement {
    /// Net chips won per seat, in seat order.
    #[must_use]
    pub fn payouts(&self) -> Vec<(SeatIndex, Chips)> {
        let mut totals: BTreeMap<SeatIndex, Chips> = BTreeMap::new();
        for payout in self.awards.iter().flat_map(|award| &award.payouts) {
            *totals.entry(payout.seat).or_default() += payout.amount;
        }
        totals.into_iter().collect()
    }

    #[must_use]
    pub fn total(&self) -> Chips {
        self.awards.iter().map(|award| award.amount).sum()
    }

    #[must_use]
    pub fn winners(&self) -> BTreeSet<SeatIndex> {
        self.payouts().into_iter().map(|(seat, _)| seat).collect()
    }
}

/// Splits `amount` among `winners` as evenly as whole chips allow. The
/// leftover chips go one each to the earliest winners.
#[must_use]
pub fn split_evenly(amount: Chips, winners: &[SeatIndex], share: Share) -> Vec<Payout> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = Chips::try_from(winners.len()).unwrap_or(Chips::MAX);
    let base = amount / n;
    let remainder = (amount % n) as usize;
    winners
        .iter()
        .enumerate()
        .map(|(i, &seat)| Payout {
            seat,
            amount: base + Chips::from(i < remainder),
            share,
        })
        .collect()
}

fn best_seats<'a, T: Ord + 'a>(
    entries: impl Iterator<Item = (SeatIndex, &'a T)>,
) -> Vec<SeatIndex> {
    let (seats, ranks): (Vec<SeatIndex>, Vec<&T>) = entries.unzip();
    argmax(&ranks).into_iter().map(|i| seats[i]).collect()
}

/// Settles every pot against the showdown hands.
///
/// # Panics
///
/// Panics when a pot has no eligible player or an eligible player has no
/// hand; either means the pots were built wrong.
#[must_use]
pub fn resolve(
    pots: &[Pot],
    hands: &BTreeMap<SeatIndex, ShowdownHand>,
    resolution: PotResolution,
) -> Settlement {
    let mut awards = Vec::with_capacity(pots.len());
    for (pot_index, pot) in pots.iter().enumerate().rev() {
        assert!(
            !pot.eligible.is_empty(),
            "pot {pot_index} holds ${} with nobody eligible",
            pot.amount
        );

        if pot.eligible.len() == 1 {
            let winners: Vec<SeatIndex> = pot.eligible.iter().copied().collect();
            awards.push(PotAward {
                pot_index,
                amount: pot.amount,
                payouts: split_evenly(pot.amount, &winners, Share::Uncontested),
                high_winners: winners,
                low_winners: Vec::new(),
            });
            continue;
        }

        let contenders: Vec<&ShowdownHand> = pot
            .eligible
            .iter()
            .map(|seat| {
                let Some(hand) = hands.get(seat) else {
                    panic!("seat {seat} is eligible for pot {pot_index} but has no hand");
                };
                hand
            })
            .collect();

        let high_winners = best_seats(contenders.iter().map(|hand| (hand.seat, &hand.high)));
        let low_winners = if resolution.is_hi_lo() {
            best_seats(
                contenders
                    .iter()
                    .filter_map(|hand| hand.qualifying_low().map(|low| (hand.seat, low))),
            )
        } else {
            Vec::new()
        };

        let (high_half, low_half) = if low_winners.is_empty() {
            (pot.amount, 0)
        } else {
            (pot.amount - pot.amount / 2, pot.amount / 2)
        };
        let mut payouts = split_evenly(high_half, &high_winners, Share::High);
        payouts.extend(split_evenly(low_half, &low_winners, Share::Low));

        awards.push(PotAward {
            pot_index,
            amount: pot.amount,
            high_winners,
            low_winners,
            payouts,
        });
    }

    let chopped = awards.iter().any(PotAward::is_chopped);
    Settlement { awards, chopped }
}
