//! Monte Carlo win-probability estimation.
//!
//! The estimator is read-only with respect to any live game: it builds a
//! private working deck from the cards the caller already knows and samples
//! complete runouts from it. Results are approximate; variance shrinks as
//! the iteration count grows, and callers pick the count as a
//! speed/precision trade-off.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::constants::{BOARD_SIZE, HOLE_CARDS};
use super::entities::{Card, Deck, DeckError, HandValue};
use super::functional::eval;

#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum OddsError {
    #[error("at least one iteration is required")]
    NoIterations,
    #[error("a board holds at most {BOARD_SIZE} cards, got {0}")]
    TooManyBoardCards(usize),
    #[error("card {0} appears more than once among the known cards")]
    DuplicateCard(Card),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

fn known_cards(hole: [Card; 2], board: &[Card]) -> Result<HashSet<Card>, OddsError> {
    if board.len() > BOARD_SIZE {
        return Err(OddsError::TooManyBoardCards(board.len()));
    }
    let mut known = HashSet::with_capacity(HOLE_CARDS + board.len());
    for &card in hole.iter().chain(board) {
        if !known.insert(card) {
            return Err(OddsError::DuplicateCard(card));
        }
    }
    Ok(known)
}

/// Estimate P(win or weighted split) for `hole` against `opponents` random
/// hands, given 0 to 5 known board cards.
///
/// Each iteration shuffles the unknown remainder of the deck, completes
/// the board to 5 cards from the front, then deals 2 cards per opponent
/// from the cards immediately following. The iteration scores 1.0 when the
/// player's 7-card hand strictly beats every opponent, 0.0 when it is
/// strictly beaten, and `1/(k+1)` when tied with `k` opponents for best.
/// The estimate is the mean score.
pub fn estimate<R: Rng + ?Sized>(
    hole: [Card; 2],
    board: &[Card],
    opponents: usize,
    iterations: u32,
    rng: &mut R,
) -> Result<f64, OddsError> {
    if iterations == 0 {
        return Err(OddsError::NoIterations);
    }
    let known = known_cards(hole, board)?;
    let mut deck = Deck::excluding(&known);
    let missing = BOARD_SIZE - board.len();

    let mut full_board = Vec::with_capacity(BOARD_SIZE);
    let mut seven = Vec::with_capacity(HOLE_CARDS + BOARD_SIZE);
    let mut total = 0.0;

    for _ in 0..iterations {
        deck.shuffle(rng);

        full_board.clear();
        full_board.extend_from_slice(board);
        for _ in 0..missing {
            full_board.push(deck.draw()?);
        }

        seven.clear();
        seven.extend_from_slice(&hole);
        seven.extend_from_slice(&full_board);
        let player_value = eval(&seven);

        let mut best_opponent: Option<HandValue> = None;
        let mut best_count = 0usize;
        for _ in 0..opponents {
            let first = deck.draw()?;
            let second = deck.draw()?;
            seven.clear();
            seven.push(first);
            seven.push(second);
            seven.extend_from_slice(&full_board);
            let opponent_value = eval(&seven);
            match &best_opponent {
                Some(best) if opponent_value > *best => {
                    best_opponent = Some(opponent_value);
                    best_count = 1;
                }
                Some(best) if opponent_value == *best => best_count += 1,
                Some(_) => {}
                None => {
                    best_opponent = Some(opponent_value);
                    best_count = 1;
                }
            }
        }

        total += match &best_opponent {
            None => 1.0,
            Some(best) if player_value > *best => 1.0,
            Some(best) if player_value == *best => 1.0 / (best_count as f64 + 1.0),
            Some(_) => 0.0,
        };
    }

    Ok(total / f64::from(iterations))
}

/// [`estimate`] with iterations sharded across OS threads.
///
/// Iterations are independent, so each shard runs the sequential estimator
/// with its own generator seeded from `rng`, and shard means are averaged
/// back together weighted by shard size. A seeded `rng` keeps the result
/// reproducible for a fixed (`iterations`, `shards`) pair.
pub fn estimate_parallel<R: Rng + ?Sized>(
    hole: [Card; 2],
    board: &[Card],
    opponents: usize,
    iterations: u32,
    shards: usize,
    rng: &mut R,
) -> Result<f64, OddsError> {
    if iterations == 0 {
        return Err(OddsError::NoIterations);
    }
    known_cards(hole, board)?;

    let shards = shards.clamp(1, iterations as usize);
    let base = iterations / shards as u32;
    let extra = iterations % shards as u32;
    let jobs: Vec<(u32, u64)> = (0..shards as u32)
        .map(|shard| (base + u32::from(shard < extra), rng.random()))
        .filter(|&(count, _)| count > 0)
        .collect();

    let mut weighted = 0.0;
    std::thread::scope(|scope| -> Result<(), OddsError> {
        let handles: Vec<_> = jobs
            .iter()
            .map(|&(count, seed)| {
                scope.spawn(move || {
                    let mut shard_rng = StdRng::seed_from_u64(seed);
                    estimate(hole, board, opponents, count, &mut shard_rng)
                })
            })
            .collect();
        for (handle, &(count, _)) in handles.into_iter().zip(&jobs) {
            let shard_mean = handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
            weighted += shard_mean * f64::from(count);
        }
        Ok(())
    })?;

    Ok(weighted / f64::from(iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cards(short: &[&str]) -> Vec<Card> {
        short.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn hole(a: &str, b: &str) -> [Card; 2] {
        [a.parse().unwrap(), b.parse().unwrap()]
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = estimate(hole("AS", "AC"), &[], 1, 0, &mut rng);
        assert_eq!(result, Err(OddsError::NoIterations));
    }

    #[test]
    fn test_oversized_board_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = cards(&["2C", "3C", "4C", "5C", "6C", "7C"]);
        let result = estimate(hole("AS", "AC"), &board, 1, 10, &mut rng);
        assert_eq!(result, Err(OddsError::TooManyBoardCards(6)));
    }

    #[test]
    fn test_duplicate_known_card_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = cards(&["AS", "3C", "4C"]);
        let result = estimate(hole("AS", "AC"), &board, 1, 10, &mut rng);
        assert_eq!(
            result,
            Err(OddsError::DuplicateCard("AS".parse().unwrap()))
        );
    }

    #[test]
    fn test_no_opponents_is_certain_win() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = estimate(hole("2S", "7C"), &[], 0, 50, &mut rng).unwrap();
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_result_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = cards(&["KH", "8D", "2C"]);
        let p = estimate(hole("QS", "JS"), &board, 3, 500, &mut rng).unwrap();
        assert!((0.0..=1.0).contains(&p), "p = {p}");
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let board = cards(&["KH", "8D", "2C"]);
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = estimate(hole("QS", "JS"), &board, 2, 200, &mut rng_a).unwrap();
        let b = estimate(hole("QS", "JS"), &board, 2, 200, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nuts_on_complete_board_never_loses() {
        // Royal flush on the board's suit: no opponent hand beats it.
        let board = cards(&["AH", "KH", "QH", "2C", "7D"]);
        let mut rng = StdRng::seed_from_u64(4);
        let p = estimate(hole("JH", "TH"), &board, 3, 300, &mut rng).unwrap();
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_parallel_matches_contract() {
        let board = cards(&["KH", "8D", "2C"]);
        let mut rng = StdRng::seed_from_u64(5);
        let p = estimate_parallel(hole("QS", "JS"), &board, 2, 1000, 4, &mut rng).unwrap();
        assert!((0.0..=1.0).contains(&p), "p = {p}");
    }

    #[test]
    fn test_parallel_validates_before_spawning() {
        let mut rng = StdRng::seed_from_u64(6);
        let result = estimate_parallel(hole("AS", "AS"), &[], 1, 100, 4, &mut rng);
        assert_eq!(
            result,
            Err(OddsError::DuplicateCard("AS".parse().unwrap()))
        );
    }
}
