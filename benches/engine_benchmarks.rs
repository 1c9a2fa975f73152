use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use poker_settle::{
    bot::{CallingStation, DecisionPolicy},
    game::{
        entities::{Card, Deck, Suit, parse_cards},
        functional::{argmax, eval_high, eval_low, eval_omaha_high, eval_omaha_low},
        ledger::Contribution,
        pot::PotLedger,
        state_machine::{Hand, HandOptions},
        variant::VariantDescriptor,
    },
};
use rand::{SeedableRng, rngs::StdRng};

/// Plays a hand between calling stations until it's over
fn play_out(variant: &VariantDescriptor, n_players: usize, deck: Deck) -> Hand {
    let stacks = vec![1000; n_players];
    let mut hand = Hand::start(variant, &stacks, 0, deck, HandOptions::default()).unwrap();
    let mut policy = CallingStation;
    while let Some(seat) = hand.current_actor() {
        let state = hand.visible_state(seat);
        let legal = hand.legal_actions(seat);
        let action = policy.decide(&state, &legal);
        hand.act(seat, &action).unwrap();
    }
    hand
}

/// Benchmark hand evaluation with 7 cards (full hand + board)
fn bench_eval_high_7_cards(c: &mut Criterion) {
    let cards = vec![
        Card(14, Suit::Spade),  // Pocket: Ace of Spades
        Card(13, Suit::Spade),  // Pocket: King of Spades
        Card(12, Suit::Spade),  // Board: Queen of Spades
        Card(11, Suit::Spade),  // Board: Jack of Spades
        Card(10, Suit::Spade),  // Board: 10 of Spades (royal flush)
        Card(2, Suit::Heart),   // Board: 2 of Hearts
        Card(3, Suit::Diamond), // Board: 3 of Diamonds
    ];

    c.bench_function("eval_high_7_cards", |b| {
        b.iter(|| eval_high(&cards));
    });
}

fn bench_eval_low_7_cards(c: &mut Criterion) {
    let cards = parse_cards("Ah 2c 3d 5s 8h Kd Kc").unwrap();

    c.bench_function("eval_low_7_cards", |b| {
        b.iter(|| eval_low(&cards));
    });
}

/// Omaha evaluates 60 two-plus-three combinations per side
fn bench_eval_omaha(c: &mut Criterion) {
    let hole = parse_cards("Ah 2h Kd Qc").unwrap();
    let board = parse_cards("3h 5h 9h Ks 4c").unwrap();

    c.bench_function("eval_omaha_high", |b| {
        b.iter(|| eval_omaha_high(&hole, &board));
    });
    c.bench_function("eval_omaha_low", |b| {
        b.iter(|| eval_omaha_low(&hole, &board));
    });
}

/// Benchmark comparing hands to find the winner
fn bench_argmax(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let ranks: Vec<_> = (0..10)
        .map(|_| {
            let mut deck = Deck::shuffled(&mut rng);
            let cards: Vec<Card> = (0..7).map(|_| deck.deal_card().unwrap()).collect();
            eval_high(&cards)
        })
        .collect();

    c.bench_function("argmax_10_hands", |b| {
        b.iter(|| argmax(&ranks));
    });
}

/// Benchmark sweeping a street with one all-in level per player
fn bench_pot_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("pot_sweep");

    for n_players in [2, 6, 10].iter() {
        let contributions: Vec<Contribution> = (0..*n_players)
            .map(|seat| Contribution {
                seat,
                committed: 100 * (seat as u32 + 1),
                folded: false,
                all_in: seat + 1 < *n_players,
            })
            .collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            &contributions,
            |b, contributions| {
                b.iter(|| {
                    let mut pots = PotLedger::new();
                    pots.sweep_round(contributions);
                    pots
                });
            },
        );
    }

    group.finish();
}

/// Benchmark a full hand from forced bets to payouts
fn bench_full_hand(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_hand");
    let variants = [
        VariantDescriptor::texas_holdem(),
        VariantDescriptor::omaha_hi_lo(),
        VariantDescriptor::seven_card_stud_hi_lo(),
    ];

    for variant in &variants {
        for n_players in [2, 6].iter() {
            group.bench_with_input(
                BenchmarkId::new(&variant.name, format!("{}_players", n_players)),
                n_players,
                |b, &n| {
                    let mut rng = StdRng::seed_from_u64(42);
                    b.iter_batched(
                        || Deck::shuffled(&mut rng),
                        |deck| play_out(variant, n, deck),
                        criterion::BatchSize::SmallInput,
                    );
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    hand_evaluation,
    bench_eval_high_7_cards,
    bench_eval_low_7_cards,
    bench_eval_omaha,
    bench_argmax,
);

criterion_group!(game_operations, bench_pot_sweep, bench_full_hand);

criterion_main!(hand_evaluation, game_operations);
