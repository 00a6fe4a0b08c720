//! Pure functions for scoring hands and picking winners.
//!
//! Evaluation counts value and suit frequencies instead of enumerating
//! 5-card subsets, checking categories in strictly descending priority so
//! the first hit is the best 5-card hand obtainable from the input.

use super::entities::{Card, HandCategory, HandValue, SUITS, Value};

/// Highest straight end-value among the present card values, if any.
///
/// The wheel (A-2-3-4-5) counts as a straight with high card 5; the Ace
/// never plays low in any other pattern.
fn straight_high(present: &[bool; 15]) -> Option<Value> {
    for high in (6..=14u8).rev() {
        if (high - 4..=high).all(|value| present[value as usize]) {
            return Some(high);
        }
    }
    if present[14] && present[2] && present[3] && present[4] && present[5] {
        return Some(5);
    }
    None
}

/// Distinct card values present, descending.
fn values_desc(value_counts: &[u8; 15]) -> Vec<Value> {
    (2..=14u8)
        .rev()
        .filter(|&value| value_counts[value as usize] > 0)
        .collect()
}

/// Evaluate 5 to 7 cards down to the best obtainable [`HandValue`].
///
/// Pure and deterministic. Callers must supply at least 5 cards; below
/// that the result is unspecified.
#[must_use]
pub fn eval(cards: &[Card]) -> HandValue {
    debug_assert!(cards.len() >= 5, "hand evaluation needs at least 5 cards");

    let mut value_counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    for &Card(value, suit) in cards {
        value_counts[value as usize] += 1;
        suit_counts[suit.index()] += 1;
    }

    let flush_suit = SUITS
        .into_iter()
        .find(|&suit| suit_counts[suit.index()] >= 5);

    if let Some(suit) = flush_suit {
        let mut present = [false; 15];
        for &Card(value, card_suit) in cards {
            if card_suit == suit {
                present[value as usize] = true;
            }
        }
        if let Some(high) = straight_high(&present) {
            return HandValue {
                category: HandCategory::StraightFlush,
                kickers: vec![high],
            };
        }
    }

    let distinct = values_desc(&value_counts);

    if let Some(&quad) = distinct
        .iter()
        .find(|&&value| value_counts[value as usize] == 4)
    {
        let mut kickers = vec![quad];
        kickers.extend(distinct.iter().copied().find(|&value| value != quad));
        return HandValue {
            category: HandCategory::FourOfAKind,
            kickers,
        };
    }

    let trips: Vec<Value> = distinct
        .iter()
        .copied()
        .filter(|&value| value_counts[value as usize] >= 3)
        .collect();

    // A second set of trips supplies the pair of a full house.
    if let Some(&top_trips) = trips.first() {
        if let Some(&pair) = distinct
            .iter()
            .find(|&&value| value != top_trips && value_counts[value as usize] >= 2)
        {
            return HandValue {
                category: HandCategory::FullHouse,
                kickers: vec![top_trips, pair],
            };
        }
    }

    if let Some(suit) = flush_suit {
        let mut kickers: Vec<Value> = cards
            .iter()
            .filter(|card| card.1 == suit)
            .map(|card| card.0)
            .collect();
        kickers.sort_unstable_by(|a, b| b.cmp(a));
        kickers.truncate(5);
        return HandValue {
            category: HandCategory::Flush,
            kickers,
        };
    }

    let mut present = [false; 15];
    for &value in &distinct {
        present[value as usize] = true;
    }
    if let Some(high) = straight_high(&present) {
        return HandValue {
            category: HandCategory::Straight,
            kickers: vec![high],
        };
    }

    if let Some(&top_trips) = trips.first() {
        let mut kickers = vec![top_trips];
        kickers.extend(
            distinct
                .iter()
                .copied()
                .filter(|&value| value != top_trips)
                .take(2),
        );
        return HandValue {
            category: HandCategory::ThreeOfAKind,
            kickers,
        };
    }

    let pairs: Vec<Value> = distinct
        .iter()
        .copied()
        .filter(|&value| value_counts[value as usize] == 2)
        .collect();

    if pairs.len() >= 2 {
        let (high_pair, low_pair) = (pairs[0], pairs[1]);
        let mut kickers = vec![high_pair, low_pair];
        kickers.extend(
            distinct
                .iter()
                .copied()
                .find(|&value| value != high_pair && value != low_pair),
        );
        return HandValue {
            category: HandCategory::TwoPair,
            kickers,
        };
    }

    if let Some(&pair) = pairs.first() {
        let mut kickers = vec![pair];
        kickers.extend(
            distinct
                .iter()
                .copied()
                .filter(|&value| value != pair)
                .take(3),
        );
        return HandValue {
            category: HandCategory::OnePair,
            kickers,
        };
    }

    HandValue {
        category: HandCategory::HighCard,
        kickers: distinct.into_iter().take(5).collect(),
    }
}

/// Indices of all maximal hands, ascending. Ties produce multiple winners.
#[must_use]
pub fn argmax(hands: &[HandValue]) -> Vec<usize> {
    let Some(best) = hands.iter().max() else {
        return Vec::new();
    };
    hands
        .iter()
        .enumerate()
        .filter(|(_, hand)| *hand == best)
        .map(|(idx, _)| idx)
        .collect()
}
