//! The hand engine.
//!
//! A `Hand` owns one deal from forced bets to settlement. It deals the
//! variant's streets, runs a `BettingRound` per street over the
//! contribution ledger, sweeps each closed street into the pot ledger and
//! resolves the pots once one player is left or the last street closes.
//! Everything that happens is queued as a `GameEvent`.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
};

use super::{
    constants::MAX_PLAYERS,
    betting::BettingRound,
    entities::{Action, ActionChoices, Bet, Card, Chips, Deck, SeatIndex, Street},
    errors::{ActionError, HandError, HandResult},
    functional::rank_exposed,
    ledger::{ContributionLedger, PlayerLedger},
    pot::{Pot, PotLedger},
    showdown::{self, Settlement, Share, ShowdownHand},
    variant::{
        BettingStructure, GameStructure, HandResolution, PotResolution, StreetDeal,
        VariantDescriptor,
    },
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ForcedBet {
    Ante,
    SmallBlind,
    BigBlind,
    BringIn,
}

impl fmt::Display for ForcedBet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Ante => "the ante",
            Self::SmallBlind => "the small blind",
            Self::BigBlind => "the big blind",
            Self::BringIn => "the bring-in",
        };
        write!(f, "{repr}")
    }
}

/// Everything that happens during a hand, in order.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameEvent {
    HandStarted {
        number: u64,
        button: SeatIndex,
        players: usize,
    },
    ForcedBetPosted {
        seat: SeatIndex,
        kind: ForcedBet,
        bet: Bet,
    },
    CardsDealt {
        seat: SeatIndex,
        cards: Vec<Card>,
        face_up: bool,
    },
    BoardDealt {
        street: Street,
        cards: Vec<Card>,
    },
    Acted {
        seat: SeatIndex,
        street: Street,
        bet: Bet,
    },
    StreetClosed {
        street: Street,
        pot_total: Chips,
        pots: usize,
    },
    /// Betting is over with two or more players left; the remaining
    /// streets are dealt without action.
    RunOut { from: Street },
    Revealed {
        seat: SeatIndex,
        high: String,
        low: Option<String>,
    },
    PotAwarded {
        pot_index: usize,
        seat: SeatIndex,
        amount: Chips,
        share: Share,
    },
    HandFinished {
        number: u64,
        showdown: bool,
        chopped: bool,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HandStarted {
                number,
                button,
                players,
            } => format!("hand #{number} starts with {players} players, button on seat {button}"),
            Self::ForcedBetPosted { seat, kind, bet } => {
                format!("seat {seat} posts ${} for {kind}", bet.amount)
            }
            Self::CardsDealt {
                seat,
                cards,
                face_up,
            } => {
                let how = if *face_up { "up" } else { "down" };
                format!("seat {seat} is dealt {} {how}", join_cards(cards))
            }
            Self::BoardDealt { street, cards } => {
                format!("{street}: {}", join_cards(cards))
            }
            Self::Acted { seat, bet, .. } => format!("seat {seat} {bet}"),
            Self::StreetClosed {
                street,
                pot_total,
                pots,
            } => {
                if *pots > 1 {
                    format!("{street} closes with ${pot_total} across {pots} pots")
                } else {
                    format!("{street} closes with ${pot_total} in the pot")
                }
            }
            Self::RunOut { from } => format!("all-in after the {from}, running out the board"),
            Self::Revealed { seat, high, low } => match low {
                Some(low) => format!("seat {seat} shows {high} / {low}"),
                None => format!("seat {seat} shows {high}"),
            },
            Self::PotAwarded {
                pot_index,
                seat,
                amount,
                share,
            } => {
                let pot = if *pot_index == 0 {
                    "the main pot".to_string()
                } else {
                    format!("side pot {pot_index}")
                };
                match share {
                    Share::Uncontested => format!("seat {seat} takes ${amount} from {pot}"),
                    Share::High => format!("seat {seat} wins ${amount} (high) from {pot}"),
                    Share::Low => format!("seat {seat} wins ${amount} (low) from {pot}"),
                }
            }
            Self::HandFinished {
                number, chopped, ..
            } => {
                if *chopped {
                    format!("hand #{number} over, pot chopped")
                } else {
                    format!("hand #{number} over")
                }
            }
        };
        write!(f, "{repr}")
    }
}

fn join_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A player's own cards and which of them are face up.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Holding {
    cards: Vec<Card>,
    face_up: Vec<bool>,
}

impl Holding {
    fn push(&mut self, card: Card, face_up: bool) {
        self.cards.push(card);
        self.face_up.push(face_up);
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn up_cards(&self) -> Vec<Card> {
        self.cards
            .iter()
            .zip(&self.face_up)
            .filter(|(_, up)| **up)
            .map(|(card, _)| *card)
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// What a seat can see when it's asked to act.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct VisibleState {
    pub seat: SeatIndex,
    pub street: Street,
    pub structure: GameStructure,
    pub betting: BettingStructure,
    pub hand_resolution: HandResolution,
    pub pot_resolution: PotResolution,
    /// The seat's own cards, up and down.
    pub cards: Vec<Card>,
    pub board: Vec<Card>,
    /// Face-up cards of every seat still in the hand, by seat.
    pub exposed: BTreeMap<SeatIndex, Vec<Card>>,
    pub stack: Chips,
    pub committed: Chips,
    pub bet_to_match: Chips,
    /// Chips in the pots plus everything committed this street.
    pub pot: Chips,
    pub bet_size: Chips,
    pub players_in_hand: usize,
    pub raises: u8,
}

impl VisibleState {
    #[must_use]
    pub fn to_call(&self) -> Chips {
        self.bet_to_match
            .saturating_sub(self.committed)
            .min(self.stack)
    }

    /// Share of the final pot a call would be, in `[0, 1)`.
    #[must_use]
    pub fn pot_odds(&self) -> f32 {
        let to_call = self.to_call();
        if to_call == 0 {
            return 0.0;
        }
        to_call as f32 / (self.pot + to_call) as f32
    }
}

/// Record of a finished hand.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HandSummary {
    pub number: u64,
    pub variant: String,
    pub button: SeatIndex,
    pub board: Vec<Card>,
    /// Pots as they stood at settlement, main pot first.
    pub pots: Vec<Pot>,
    /// Evaluated hands, empty when the hand ended uncontested.
    pub showdown: Vec<ShowdownHand>,
    pub settlement: Settlement,
    pub starting_stacks: Vec<Chips>,
    pub final_stacks: Vec<Chips>,
}

impl HandSummary {
    #[must_use]
    pub fn had_side_pots(&self) -> bool {
        self.pots.len() > 1
    }

    #[must_use]
    pub fn went_to_showdown(&self) -> bool {
        !self.showdown.is_empty()
    }

    /// Chips won (positive) or lost by `seat` over the hand.
    #[must_use]
    pub fn net(&self, seat: SeatIndex) -> i64 {
        i64::from(self.final_stacks[seat]) - i64::from(self.starting_stacks[seat])
    }

    #[must_use]
    pub fn pot_total(&self) -> Chips {
        self.pots.iter().map(|pot| pot.amount).sum()
    }
}

/// Knobs a table sets per hand.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandOptions {
    pub number: u64,
    /// Burn a card before each board deal.
    pub burn_cards: bool,
}

#[derive(Debug)]
pub struct Hand {
    variant: VariantDescriptor,
    options: HandOptions,
    button: SeatIndex,
    deck: Deck,
    ledger: ContributionLedger,
    pots: PotLedger,
    round: BettingRound,
    board: Vec<Card>,
    holdings: Vec<Holding>,
    starting_stacks: Vec<Chips>,
    ran_out: bool,
    showdown: BTreeMap<SeatIndex, ShowdownHand>,
    settlement: Option<Settlement>,
    events: VecDeque<GameEvent>,
}

impl Hand {
    /// Posts forced bets, deals the first street and runs the hand up to
    /// the first decision. Seats with an empty stack sit the hand out.
    ///
    /// # Errors
    ///
    /// Fails when the variant is invalid, the button isn't a seat, fewer
    /// than two seats have chips, or the deck can't cover the deal.
    pub fn start(
        variant: &VariantDescriptor,
        stacks: &[Chips],
        button: SeatIndex,
        deck: Deck,
        options: HandOptions,
    ) -> HandResult<Self> {
        variant.validate()?;
        if button >= stacks.len() {
            return Err(HandError::InvalidButton(button));
        }
        if stacks.len() > MAX_PLAYERS {
            return Err(HandError::TooManyPlayers {
                players: stacks.len(),
                max: MAX_PLAYERS,
            });
        }
        let funded = stacks.iter().filter(|stack| **stack > 0).count();
        if funded < 2 {
            return Err(HandError::NotEnoughPlayers { funded });
        }
        let max = variant.max_players(options.burn_cards);
        if funded > max {
            return Err(HandError::TooManyPlayers {
                players: funded,
                max,
            });
        }
        let burns = if options.burn_cards {
            variant.burn_cards()
        } else {
            0
        };
        let needed = funded * variant.cards_per_player() + variant.board_cards() + burns;
        if deck.remaining() < needed {
            return Err(HandError::NotEnoughCards {
                needed,
                remaining: deck.remaining(),
            });
        }

        let first_street = Street::PreFlop;
        let mut hand = Self {
            variant: variant.clone(),
            options,
            button,
            deck,
            ledger: ContributionLedger::new(stacks),
            pots: PotLedger::new(),
            round: BettingRound::new(
                first_street,
                stacks.len(),
                variant.betting,
                variant.bet_size(first_street),
                variant.effective_raise_cap(),
            ),
            board: Vec::new(),
            holdings: vec![Holding::default(); stacks.len()],
            starting_stacks: stacks.to_vec(),
            ran_out: false,
            showdown: BTreeMap::new(),
            settlement: None,
            events: VecDeque::new(),
        };
        info!(
            "hand #{} of {variant}: {funded} players, button on seat {button}",
            options.number
        );
        hand.events.push_back(GameEvent::HandStarted {
            number: options.number,
            button,
            players: funded,
        });

        match variant.structure {
            GameStructure::Board => hand.start_board(),
            GameStructure::Stud => hand.start_stud(),
        }
        hand.advance();
        Ok(hand)
    }

    fn start_board(&mut self) {
        let deal = self.street_deal(Street::PreFlop);
        self.deal_street(Street::PreFlop, deal);

        let blinds = self.variant.forced_bets;
        let small = if self.ledger.num_in_hand() == 2 && self.ledger.player(self.button).in_hand()
        {
            self.button
        } else {
            self.next_in_hand(self.button)
        };
        let big = self.next_in_hand(small);
        self.post(small, blinds.small_blind, ForcedBet::SmallBlind);
        self.post(big, blinds.big_blind, ForcedBet::BigBlind);
        self.round
            .open_facing(&self.ledger, (big + 1) % self.ledger.len(), blinds.big_blind);
    }

    fn start_stud(&mut self) {
        let ante = self.variant.forced_bets.ante;
        if ante > 0 {
            for seat in self.seats_in_hand() {
                self.post(seat, ante, ForcedBet::Ante);
            }
            let contributions = self.ledger.sweep();
            self.pots.sweep_round(&contributions);
        }

        let deal = self.street_deal(Street::PreFlop);
        self.deal_street(Street::PreFlop, deal);

        // Lowest up card brings it in; suits break ties.
        let bring_in_seat = self
            .seats_in_hand()
            .into_iter()
            .filter(|&seat| self.ledger.player(seat).can_act())
            .min_by_key(|&seat| self.holdings[seat].up_cards().into_iter().min());
        let bring_in = self.variant.forced_bets.bring_in;
        match bring_in_seat {
            Some(seat) if bring_in > 0 => {
                self.post(seat, bring_in, ForcedBet::BringIn);
                self.round.mark_acted(seat);
                self.round
                    .open_facing(&self.ledger, (seat + 1) % self.ledger.len(), bring_in);
            }
            Some(seat) => self.round.open(&self.ledger, seat),
            None => self.round.open(&self.ledger, self.button),
        }
    }

    fn post(&mut self, seat: SeatIndex, amount: Chips, kind: ForcedBet) {
        if amount == 0 {
            return;
        }
        let bet = self.ledger.post(seat, amount);
        debug!("seat {seat} posts ${} for {kind}", bet.amount);
        self.events
            .push_back(GameEvent::ForcedBetPosted { seat, kind, bet });
    }

    fn street_deal(&self, street: Street) -> StreetDeal {
        street
            .betting_index()
            .and_then(|idx| self.variant.deal_plan().get(idx).copied())
            .unwrap_or_default()
    }

    /// Seats still in the hand, starting left of the button.
    fn seats_in_hand(&self) -> Vec<SeatIndex> {
        let n = self.ledger.len();
        (1..=n)
            .map(|offset| (self.button + offset) % n)
            .filter(|&seat| self.ledger.player(seat).in_hand())
            .collect()
    }

    fn next_in_hand(&self, seat: SeatIndex) -> SeatIndex {
        let n = self.ledger.len();
        (1..=n)
            .map(|offset| (seat + offset) % n)
            .find(|&other| self.ledger.player(other).in_hand())
            .unwrap_or(seat)
    }

    fn draw(&mut self) -> Card {
        match self.deck.deal_card() {
            Ok(card) => card,
            Err(err) => panic!("{err} though the deal was counted at the start of the hand"),
        }
    }

    fn deal_street(&mut self, street: Street, deal: StreetDeal) {
        if deal.board > 0 {
            if self.options.burn_cards {
                if let Err(err) = self.deck.burn_card() {
                    panic!("{err} though the deal was counted at the start of the hand");
                }
            }
            let cards: Vec<Card> = (0..deal.board).map(|_| self.draw()).collect();
            debug!("{street}: {}", join_cards(&cards));
            self.board.extend_from_slice(&cards);
            self.events
                .push_back(GameEvent::BoardDealt { street, cards });
        }

        let seats = self.seats_in_hand();
        for (count, face_up) in [(deal.down, false), (deal.up, true)] {
            if count == 0 {
                continue;
            }
            let mut dealt: Vec<Vec<Card>> = vec![Vec::new(); seats.len()];
            for _ in 0..count {
                for (idx, &seat) in seats.iter().enumerate() {
                    let card = self.draw();
                    self.holdings[seat].push(card, face_up);
                    dealt[idx].push(card);
                }
            }
            for (&seat, cards) in seats.iter().zip(dealt) {
                self.events.push_back(GameEvent::CardsDealt {
                    seat,
                    cards,
                    face_up,
                });
            }
        }
    }

    /// Applies `action` for `seat`, then moves the hand forward as far as
    /// it can go without another decision.
    ///
    /// # Errors
    ///
    /// Refuses actions out of turn, illegal actions and any action once
    /// the hand is over. A refused action changes nothing.
    pub fn act(&mut self, seat: SeatIndex, action: &Action) -> Result<Bet, ActionError> {
        if self.is_over() {
            return Err(ActionError::HandOver);
        }
        if seat >= self.ledger.len() {
            return Err(ActionError::OutOfTurn { seat });
        }
        let street = self.round.street();
        let bet = self.round.apply(&mut self.ledger, seat, action)?;
        if self.ledger.player(seat).folded {
            self.pots.remove_folded(seat);
        }
        debug!(
            "seat {seat} {bet} on {}",
            self.variant.street_name(street)
        );
        self.events
            .push_back(GameEvent::Acted { seat, street, bet });
        self.check_conservation();
        self.advance();
        Ok(bet)
    }

    fn advance(&mut self) {
        while self.settlement.is_none() {
            if self.ledger.num_in_hand() >= 2 && !self.round.is_closed(&self.ledger) {
                return;
            }
            let street = self.round.street();
            self.close_street();

            let next = street
                .betting_index()
                .map(|idx| idx + 1)
                .filter(|idx| *idx < self.variant.num_streets())
                .and_then(Street::from_betting_index);
            match next {
                Some(next) if self.ledger.num_in_hand() >= 2 => {
                    if self.ledger.num_can_act() < 2 && !self.ran_out {
                        self.ran_out = true;
                        info!("all-in on {}, running out", self.variant.street_name(street));
                        self.events.push_back(GameEvent::RunOut { from: street });
                    }
                    self.open_street(next);
                }
                _ => self.settle(),
            }
        }
    }

    fn close_street(&mut self) {
        let street = self.round.street();
        let contributions = self.ledger.sweep();
        self.pots.sweep_round(&contributions);
        self.events.push_back(GameEvent::StreetClosed {
            street,
            pot_total: self.pots.total(),
            pots: self.pots.pots().len(),
        });
    }

    fn open_street(&mut self, street: Street) {
        let deal = self.street_deal(street);
        self.deal_street(street, deal);
        self.round = BettingRound::new(
            street,
            self.ledger.len(),
            self.variant.betting,
            self.variant.bet_size(street),
            self.variant.effective_raise_cap(),
        );
        let first = match self.variant.structure {
            GameStructure::Board => self.next_in_hand(self.button),
            GameStructure::Stud => self.best_exposed(),
        };
        self.round.open(&self.ledger, first);
    }

    /// Seat showing the strongest up cards; the highest card's suit, then
    /// seat order from the button, break ties.
    fn best_exposed(&self) -> SeatIndex {
        self.seats_in_hand()
            .into_iter()
            .enumerate()
            .max_by(|(a_pos, a), (b_pos, b)| {
                let a_up = self.holdings[*a].up_cards();
                let b_up = self.holdings[*b].up_cards();
                rank_exposed(&a_up)
                    .cmp(&rank_exposed(&b_up))
                    .then_with(|| a_up.iter().max().cmp(&b_up.iter().max()))
                    .then_with(|| b_pos.cmp(a_pos))
            })
            .map_or(self.button, |(_, seat)| seat)
    }

    fn settle(&mut self) {
        let contenders = self.seats_in_hand();
        if contenders.len() > 1 {
            for seat in contenders {
                let hand = ShowdownHand::evaluate(
                    &self.variant,
                    seat,
                    self.holdings[seat].cards(),
                    &self.board,
                );
                self.events.push_back(GameEvent::Revealed {
                    seat,
                    high: hand.high.to_string(),
                    low: hand.low.as_ref().map(ToString::to_string),
                });
                self.showdown.insert(seat, hand);
            }
        }

        let settlement =
            showdown::resolve(self.pots.pots(), &self.showdown, self.variant.pot_resolution);
        assert_eq!(
            settlement.total(),
            self.pots.total(),
            "settlement pays ${} out of ${} in pots",
            settlement.total(),
            self.pots.total()
        );
        for award in &settlement.awards {
            for payout in &award.payouts {
                self.ledger.award(payout.seat, payout.amount);
                self.events.push_back(GameEvent::PotAwarded {
                    pot_index: award.pot_index,
                    seat: payout.seat,
                    amount: payout.amount,
                    share: payout.share,
                });
            }
        }

        let final_total: Chips = self.stacks().iter().sum();
        let starting_total: Chips = self.starting_stacks.iter().sum();
        assert_eq!(
            final_total, starting_total,
            "hand #{} ended with ${final_total} of ${starting_total}",
            self.options.number
        );

        info!(
            "hand #{} settled: ${} in {} pot(s){}",
            self.options.number,
            settlement.total(),
            self.pots.pots().len(),
            if settlement.chopped { ", chopped" } else { "" }
        );
        self.events.push_back(GameEvent::HandFinished {
            number: self.options.number,
            showdown: !self.showdown.is_empty(),
            chopped: settlement.chopped,
        });
        self.settlement = Some(settlement);
    }

    /// Stacks, street commitments and pots always add up to what the hand
    /// started with.
    fn check_conservation(&self) {
        let on_table: Chips = self
            .ledger
            .players()
            .iter()
            .map(|player| player.stack + player.committed)
            .sum();
        let starting_total: Chips = self.starting_stacks.iter().sum();
        assert_eq!(
            on_table + self.pots.total(),
            starting_total,
            "chips leaked during hand #{}",
            self.options.number
        );
        let committed: Chips = self
            .ledger
            .players()
            .iter()
            .map(|player| player.committed)
            .sum();
        assert_eq!(self.pots.total() + committed, self.ledger.total_committed());
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.settlement.is_some()
    }

    /// The street being bet, or `Street::Showdown` once the hand is over.
    #[must_use]
    pub fn street(&self) -> Street {
        if self.is_over() {
            Street::Showdown
        } else {
            self.round.street()
        }
    }

    #[must_use]
    pub fn current_actor(&self) -> Option<SeatIndex> {
        if self.is_over() {
            None
        } else {
            self.round.actor()
        }
    }

    #[must_use]
    pub fn bet_to_match(&self) -> Chips {
        self.round.bet_to_match()
    }

    #[must_use]
    pub fn legal_actions(&self, seat: SeatIndex) -> ActionChoices {
        if self.is_over() || seat >= self.ledger.len() {
            return ActionChoices::default();
        }
        self.round.legal_actions(&self.ledger, seat)
    }

    #[must_use]
    pub fn number(&self) -> u64 {
        self.options.number
    }

    #[must_use]
    pub fn button(&self) -> SeatIndex {
        self.button
    }

    #[must_use]
    pub fn variant(&self) -> &VariantDescriptor {
        &self.variant
    }

    #[must_use]
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    #[must_use]
    pub fn holding(&self, seat: SeatIndex) -> &Holding {
        &self.holdings[seat]
    }

    #[must_use]
    pub fn player(&self, seat: SeatIndex) -> &PlayerLedger {
        self.ledger.player(seat)
    }

    #[must_use]
    pub fn players(&self) -> &[PlayerLedger] {
        self.ledger.players()
    }

    #[must_use]
    pub fn stacks(&self) -> Vec<Chips> {
        self.ledger
            .players()
            .iter()
            .map(|player| player.stack)
            .collect()
    }

    /// Pots swept so far, main pot first. Chips bet on the current street
    /// are not in a pot yet.
    #[must_use]
    pub fn pots(&self) -> &[Pot] {
        self.pots.pots()
    }

    /// Pots plus every street commitment.
    #[must_use]
    pub fn pot_total(&self) -> Chips {
        let committed: Chips = self
            .ledger
            .players()
            .iter()
            .map(|player| player.committed)
            .sum();
        self.pots.total() + committed
    }

    #[must_use]
    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    #[must_use]
    pub fn showdown_hands(&self) -> &BTreeMap<SeatIndex, ShowdownHand> {
        &self.showdown
    }

    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn visible_state(&self, seat: SeatIndex) -> VisibleState {
        let player = self.ledger.player(seat);
        let exposed = self
            .seats_in_hand()
            .into_iter()
            .map(|other| (other, self.holdings[other].up_cards()))
            .collect();
        let street = self.street();
        VisibleState {
            seat,
            street,
            structure: self.variant.structure,
            betting: self.variant.betting,
            hand_resolution: self.variant.hand_resolution,
            pot_resolution: self.variant.pot_resolution,
            cards: self.holdings[seat].cards().to_vec(),
            board: self.board.clone(),
            exposed,
            stack: player.stack,
            committed: player.committed,
            bet_to_match: self.round.bet_to_match(),
            pot: self.pot_total(),
            bet_size: self.variant.bet_size(street),
            players_in_hand: self.ledger.num_in_hand(),
            raises: self.round.raises(),
        }
    }

    /// Summary of the finished hand; `None` while it's still running.
    #[must_use]
    pub fn summary(&self) -> Option<HandSummary> {
        let settlement = self.settlement.clone()?;
        Some(HandSummary {
            number: self.options.number,
            variant: self.variant.name.clone(),
            button: self.button,
            board: self.board.clone(),
            pots: self.pots.pots().to_vec(),
            showdown: self.showdown.values().cloned().collect(),
            settlement,
            starting_stacks: self.starting_stacks.clone(),
            final_stacks: self.stacks(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{BetAction, parse_cards};

    fn deck(top: &str) -> Deck {
        Deck::with_top_cards(parse_cards(top).unwrap())
    }

    fn holdem(stacks: &[Chips], button: SeatIndex, top: &str) -> Hand {
        Hand::start(
            &VariantDescriptor::texas_holdem(),
            stacks,
            button,
            deck(top),
            HandOptions::default(),
        )
        .unwrap()
    }

    fn check_down(hand: &mut Hand) {
        while let Some(seat) = hand.current_actor() {
            hand.act(seat, &Action::Check).unwrap();
        }
    }

    // === Start Tests ===

    #[test]
    fn test_heads_up_button_posts_small_blind() {
        let hand = holdem(&[1000, 1000], 0, "");
        assert_eq!(hand.player(0).committed, 10);
        assert_eq!(hand.player(1).committed, 20);
        assert_eq!(hand.current_actor(), Some(0));
        assert_eq!(hand.street(), Street::PreFlop);
        assert_eq!(hand.holding(0).cards().len(), 2);
        assert!(hand.board().is_empty());
    }

    #[test]
    fn test_blinds_left_of_button() {
        let hand = holdem(&[1000, 1000, 1000, 1000], 1, "");
        assert_eq!(hand.player(2).committed, 10);
        assert_eq!(hand.player(3).committed, 20);
        assert_eq!(hand.current_actor(), Some(0));
    }

    #[test]
    fn test_empty_seats_sit_out() {
        let hand = holdem(&[1000, 0, 1000, 1000], 0, "");
        assert!(hand.holding(1).is_empty());
        assert_eq!(hand.player(2).committed, 10);
        assert_eq!(hand.player(3).committed, 20);
    }

    #[test]
    fn test_start_errors() {
        let variant = VariantDescriptor::texas_holdem();
        let opts = HandOptions::default();
        assert!(matches!(
            Hand::start(&variant, &[1000, 0], 0, Deck::default(), opts),
            Err(HandError::NotEnoughPlayers { funded: 1 })
        ));
        assert!(matches!(
            Hand::start(&variant, &[1000, 1000], 2, Deck::default(), opts),
            Err(HandError::InvalidButton(2))
        ));
        let short = Deck::stacked(parse_cards("As Ks Qs").unwrap());
        assert!(matches!(
            Hand::start(&variant, &[1000, 1000], 0, short, opts),
            Err(HandError::NotEnoughCards {
                needed: 9,
                remaining: 3
            })
        ));
        assert!(matches!(
            Hand::start(&variant, &[100; 11], 0, Deck::default(), opts),
            Err(HandError::TooManyPlayers { players: 11, .. })
        ));
        let mut broken = variant.clone();
        broken.hole_cards = 0;
        assert!(matches!(
            Hand::start(&broken, &[1000, 1000], 0, Deck::default(), opts),
            Err(HandError::Variant(_))
        ));
    }

    // === Action Tests ===

    #[test]
    fn test_out_of_turn_changes_nothing() {
        let mut hand = holdem(&[1000, 1000], 0, "");
        assert_eq!(
            hand.act(1, &Action::Check),
            Err(ActionError::OutOfTurn { seat: 1 })
        );
        assert_eq!(
            hand.act(7, &Action::Check),
            Err(ActionError::OutOfTurn { seat: 7 })
        );
        assert_eq!(hand.player(1).committed, 20);
        assert_eq!(hand.current_actor(), Some(0));
    }

    #[test]
    fn test_fold_ends_hand_uncontested() {
        let mut hand = holdem(&[1000, 1000], 0, "");
        let bet = hand.act(0, &Action::Fold).unwrap();
        assert_eq!(bet.action, BetAction::Fold);
        assert!(hand.is_over());
        assert_eq!(hand.street(), Street::Showdown);
        assert_eq!(hand.stacks(), vec![990, 1010]);
        assert!(hand.showdown_hands().is_empty());
        assert_eq!(hand.current_actor(), None);
        assert_eq!(hand.act(1, &Action::Check), Err(ActionError::HandOver));

        let summary = hand.summary().unwrap();
        assert!(!summary.went_to_showdown());
        assert_eq!(summary.net(1), 10);
        assert_eq!(summary.net(0), -10);
    }

    #[test]
    fn test_board_plays_chops_pot() {
        let mut hand = holdem(&[1000, 1000], 0, "2c 3d 2h 3s Ah Kh Qh Jh Th");
        hand.act(0, &Action::Call).unwrap();
        check_down(&mut hand);
        assert!(hand.is_over());
        assert_eq!(hand.board().len(), 5);
        let settlement = hand.settlement().unwrap();
        assert!(settlement.chopped);
        assert_eq!(settlement.total(), 40);
        assert_eq!(hand.stacks(), vec![1000, 1000]);
    }

    #[test]
    fn test_first_to_act_after_flop_is_left_of_button() {
        let mut hand = holdem(&[1000, 1000, 1000], 0, "");
        // Seat 1 small blind, seat 2 big blind, seat 0 first pre-flop.
        hand.act(0, &Action::Call).unwrap();
        hand.act(1, &Action::Call).unwrap();
        hand.act(2, &Action::Check).unwrap();
        assert_eq!(hand.street(), Street::Flop);
        assert_eq!(hand.board().len(), 3);
        assert_eq!(hand.current_actor(), Some(1));
        assert_eq!(hand.pots()[0].amount, 60);
    }

    #[test]
    fn test_all_in_runs_out_board() {
        let mut hand = holdem(&[1000, 1000], 0, "As 7c Ad 2d 3h 8s 9c Jd Kh");
        hand.act(0, &Action::AllIn).unwrap();
        hand.act(1, &Action::Call).unwrap();
        assert!(hand.is_over());
        assert_eq!(hand.board().len(), 5);
        assert_eq!(hand.stacks(), vec![0, 2000]);
        let events = hand.drain_events();
        assert!(events.contains(&GameEvent::RunOut {
            from: Street::PreFlop
        }));
        assert!(hand.drain_events().is_empty());
    }

    #[test]
    fn test_short_stack_builds_side_pot() {
        let mut hand = holdem(
            &[1000, 1000, 150],
            0,
            "Kc Ac 7c Kd Ad 2d 3h 8s 9c Jd 4h",
        );
        hand.act(0, &Action::Raise(Some(400))).unwrap();
        hand.act(1, &Action::Call).unwrap();
        let bet = hand.act(2, &Action::Call).unwrap();
        assert_eq!(bet.action, BetAction::AllIn);
        assert_eq!(hand.street(), Street::Flop);

        let pots = hand.pots();
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 450);
        assert_eq!(pots[0].eligible.len(), 3);
        assert_eq!(pots[1].amount, 500);
        assert!(!pots[1].eligible.contains(&2));

        check_down(&mut hand);
        assert!(hand.is_over());
        assert_eq!(hand.stacks(), vec![600, 1100, 450]);
        let summary = hand.summary().unwrap();
        assert!(summary.had_side_pots());
        assert_eq!(summary.pot_total(), 950);
    }

    #[test]
    fn test_fold_to_short_big_blind_heads_up() {
        let mut hand = holdem(&[1000, 5], 0, "");
        assert!(hand.player(1).all_in);
        assert!(hand.legal_actions(0).contains(&Action::Fold));
        hand.act(0, &Action::Fold).unwrap();
        assert!(hand.is_over());
        assert_eq!(hand.pots().len(), 1);
        assert_eq!(hand.pots()[0].amount, 15);
        assert_eq!(hand.stacks(), vec![990, 15]);
    }

    #[test]
    fn test_folds_to_short_big_blind_three_handed() {
        let mut hand = holdem(&[1000, 1000, 5], 0, "");
        hand.act(0, &Action::Fold).unwrap();
        hand.act(1, &Action::Fold).unwrap();
        assert!(hand.is_over());
        assert_eq!(hand.stacks(), vec![1000, 990, 15]);
    }

    #[test]
    fn test_small_blind_folds_behind_short_big_blind_call() {
        let mut hand = holdem(&[1000, 1000, 5], 0, "2c Ac 7d 3h Ad 8s Kd Qs 9c 5h 4d");
        hand.act(0, &Action::Call).unwrap();
        hand.act(1, &Action::Fold).unwrap();
        assert!(hand.is_over());

        let amounts: Vec<Chips> = hand.pots().iter().map(|pot| pot.amount).collect();
        assert_eq!(amounts, vec![20, 15]);
        assert!(!hand.pots()[0].eligible.contains(&1));
        // Seat 2's aces take the main pot, the uncalled part goes back.
        assert_eq!(hand.stacks(), vec![995, 990, 20]);
    }

    #[test]
    fn test_burn_cards_skip_a_card_per_board_deal() {
        let mut hand = Hand::start(
            &VariantDescriptor::texas_holdem(),
            &[1000, 1000],
            0,
            deck("2c 3d 2h 3s 9s Ah Kh Qh 8s Jh 7s Th"),
            HandOptions {
                number: 1,
                burn_cards: true,
            },
        )
        .unwrap();
        hand.act(0, &Action::Call).unwrap();
        check_down(&mut hand);
        assert_eq!(hand.board(), parse_cards("Ah Kh Qh Jh Th").unwrap().as_slice());
    }

    // === Limit Tests ===

    #[test]
    fn test_limit_raise_cap() {
        let mut hand = Hand::start(
            &VariantDescriptor::omaha_hi_lo(),
            &[1000, 1000],
            0,
            Deck::default(),
            HandOptions::default(),
        )
        .unwrap();
        for (seat, to) in [(0, 40), (1, 60), (0, 80), (1, 100)] {
            let bet = hand.act(seat, &Action::Raise(None)).unwrap();
            assert_eq!(bet.to, to);
        }
        assert_eq!(
            hand.act(0, &Action::Raise(None)),
            Err(ActionError::RaiseCapReached { cap: 4 })
        );
        assert!(hand.legal_actions(0).min_raise_to().is_none());
        hand.act(0, &Action::Call).unwrap();
        assert_eq!(hand.street(), Street::Flop);
        assert_eq!(hand.bet_to_match(), 0);
    }

    // === Stud Tests ===

    fn stud(top: &str) -> Hand {
        Hand::start(
            &VariantDescriptor::seven_card_stud(),
            &[500, 500, 500],
            0,
            deck(top),
            HandOptions::default(),
        )
        .unwrap()
    }

    const STUD_DEAL: &str = "Ah Kh Qh Ad Kd Qd 9c 2s 2c Kc 2d Ac";

    #[test]
    fn test_stud_lowest_up_card_brings_in() {
        let mut hand = stud(STUD_DEAL);
        assert_eq!(hand.pots()[0].amount, 15);
        assert_eq!(hand.player(0).committed, 10);
        assert_eq!(hand.holding(0).up_cards(), parse_cards("2c").unwrap());
        assert_eq!(hand.current_actor(), Some(1));
        let events = hand.drain_events();
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::ForcedBetPosted {
                seat: 0,
                kind: ForcedBet::BringIn,
                ..
            }
        )));
    }

    #[test]
    fn test_stud_best_up_cards_act_first() {
        let mut hand = stud(STUD_DEAL);
        hand.act(1, &Action::Call).unwrap();
        hand.act(2, &Action::Call).unwrap();
        assert_eq!(hand.street(), Street::Flop);
        assert_eq!(hand.holding(2).up_cards(), parse_cards("2s 2d").unwrap());
        assert_eq!(hand.current_actor(), Some(2));
        assert_eq!(hand.pots()[0].amount, 45);
    }

    #[test]
    fn test_stud_complete_to_small_bet() {
        let mut hand = stud(STUD_DEAL);
        let bet = hand.act(1, &Action::Raise(None)).unwrap();
        assert_eq!(bet.to, 20);
        assert_eq!(hand.bet_to_match(), 20);
    }

    // === View Tests ===

    #[test]
    fn test_visible_state() {
        let hand = holdem(&[1000, 1000], 0, "");
        let view = hand.visible_state(0);
        assert_eq!(view.to_call(), 10);
        assert_eq!(view.pot, 30);
        assert_eq!(view.cards.len(), 2);
        assert!(view.pot_odds() > 0.0 && view.pot_odds() < 1.0);
    }

    #[test]
    fn test_event_display() {
        let event = GameEvent::PotAwarded {
            pot_index: 1,
            seat: 3,
            amount: 250,
            share: Share::Low,
        };
        assert_eq!(event.to_string(), "seat 3 wins $250 (low) from side pot 1");
        let event = GameEvent::RunOut {
            from: Street::Turn,
        };
        assert_eq!(event.to_string(), "all-in after the turn, running out the board");
    }
}
