//! Hand Evaluation Example
//!
//! Demonstrates how to use the hand evaluation functions to compare poker
//! hands, and the odds estimator to put a number on a draw.

use rand::SeedableRng;
use rand::rngs::StdRng;

use holdem_core::Card;
use holdem_core::functional::{argmax, eval};
use holdem_core::odds::estimate;

fn cards(short: &[&str]) -> Vec<Card> {
    short.iter().map(|s| s.parse().expect("valid card")).collect()
}

fn main() {
    println!("=== Poker Hand Evaluation Example ===\n");

    // Example 1: Evaluate a 7-card hand
    println!("Example 1: Evaluating a 7-card hand");
    let hand = cards(&["AH", "KH", "QH", "JH", "TH", "9S", "2C"]);
    let value = eval(&hand);
    println!("Cards: {hand:?}");
    println!("Best 5-card hand: {} (kickers {:?})\n", value.category, value.kickers);

    // Example 2: Compare two hands
    println!("Example 2: Comparing two hands");
    let hand_a = eval(&cards(&["AS", "AH", "TC", "9D", "2S"]));
    let hand_b = eval(&cards(&["KS", "KH", "TC", "9D", "2S"]));
    match argmax(&[hand_a, hand_b]).as_slice() {
        [0] => println!("Winner: Hand A (pair of aces)\n"),
        [1] => println!("Winner: Hand B (pair of kings)\n"),
        _ => println!("Tie!\n"),
    }

    // Example 3: Three-way comparison with a tie
    println!("Example 3: Three-way comparison with a tie");
    let hands = vec![
        eval(&cards(&["TH", "TD", "5C", "3S", "2H"])),
        eval(&cards(&["TS", "TC", "5H", "3D", "2C"])),
        eval(&cards(&["9H", "9D", "5C", "3S", "2H"])),
    ];
    let winners = argmax(&hands);
    println!(
        "Winner(s): hands {:?}\n",
        winners.iter().map(|&i| i + 1).collect::<Vec<_>>()
    );

    // Example 4: What are pocket aces worth preflop?
    println!("Example 4: Estimating win odds");
    let hole = ["AS".parse().expect("valid card"), "AC".parse().expect("valid card")];
    let mut rng = StdRng::seed_from_u64(42);
    for opponents in [1, 4, 8] {
        let p = estimate(hole, &[], opponents, 10_000, &mut rng).expect("valid inputs");
        println!("  AS AC vs {opponents} random opponents: {:.1}%", p * 100.0);
    }

    println!("\n=== End of Hand Evaluation Example ===");
}
