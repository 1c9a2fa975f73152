//! Hand Evaluation Example
//!
//! Demonstrates the high and eight-or-better low evaluators, Omaha's
//! two-plus-three rule and how ties come back from `argmax`.

use anyhow::Error;
use poker_settle::game::{
    entities::parse_cards,
    functional::{argmax, eval_high, eval_low, eval_omaha_high, eval_omaha_low},
};

fn main() -> Result<(), Error> {
    println!("=== Poker Hand Evaluation Example ===\n");

    // Example 1: Best five of seven
    println!("Example 1: Evaluating a 7-card hand");
    let cards = parse_cards("Ah Kh Qh Jh Th 9s 2c")?;
    println!("Best 5-card hand: {}\n", eval_high(&cards));

    // Example 2: Compare two hands
    println!("Example 2: Comparing two hands");
    let aces = eval_high(&parse_cards("As Ah Tc 9d 2s")?);
    let kings = eval_high(&parse_cards("Ks Kh Tc 9d 2s")?);
    println!("Hand A: {aces}");
    println!("Hand B: {kings}");
    match argmax(&[aces, kings]).as_slice() {
        [0] => println!("Winner: Hand A\n"),
        [1] => println!("Winner: Hand B\n"),
        _ => println!("Tie!\n"),
    }

    // Example 3: Ties come back together
    println!("Example 3: Three-way comparison with a tie");
    let hands = ["Th Td 5c 3s 2h", "Ts Tc 5h 3d 2c", "9h 9d 5c 3s 2h"];
    let mut ranks = Vec::with_capacity(hands.len());
    for (i, hand) in hands.iter().enumerate() {
        let rank = eval_high(&parse_cards(hand)?);
        println!("Hand {}: {rank}", i + 1);
        ranks.push(rank);
    }
    let winners: Vec<usize> = argmax(&ranks).iter().map(|&i| i + 1).collect();
    println!("Winner(s): Hands {winners:?}\n");

    // Example 4: Eight-or-better lows
    println!("Example 4: Low hands");
    for hand in ["Ah 2c 3d 4s 5h Kd Kc", "Ah 2c 3d 7s 8h", "Ah 2c 3d 9s Th"] {
        let low = eval_low(&parse_cards(hand)?);
        if low.qualified {
            println!("{hand}: {low}");
        } else {
            println!("{hand}: no qualifying low");
        }
    }

    // Example 5: Omaha must use exactly two hole cards
    println!("\nExample 5: Omaha two-plus-three");
    let hole = parse_cards("Ah Ac Kd 2h")?;
    let board = parse_cards("3h 5h 9h Ks 4c")?;
    println!("Hole: Ah Ac Kd 2h  Board: 3h 5h 9h Ks 4c");
    println!("High: {}", eval_omaha_high(&hole, &board));
    println!("Low:  {}", eval_omaha_low(&hole, &board));

    Ok(())
}
