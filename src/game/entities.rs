use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::HashSet, fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

use super::constants;

/// The four suits, in deck-construction order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

pub const SUITS: [Suit; 4] = [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart];

impl Suit {
    /// One-character wire symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Spade => 'S',
            Self::Heart => 'H',
            Self::Diamond => 'D',
            Self::Club => 'C',
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Club => 0,
            Self::Spade => 1,
            Self::Diamond => 2,
            Self::Heart => 3,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Placeholder for card values. Deuce is 2, Ace is 14 (high).
pub type Value = u8;

/// A card is a tuple of a uInt8 value (two=2u8 ... ace=14u8) and a suit.
///
/// The canonical text form is `<rank><suit>`, e.g. `AS`, `TH`, `2C`. That
/// short string is also the card's only wire representation: serde goes
/// through [`fmt::Display`] and [`FromStr`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Card(pub Value, pub Suit);

fn value_symbol(value: Value) -> char {
    match value {
        2..=9 => (b'0' + value) as char,
        10 => 'T',
        11 => 'J',
        12 => 'Q',
        13 => 'K',
        14 => 'A',
        _ => '?',
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", value_symbol(self.0), self.1)
    }
}

/// Errors from parsing a card short string.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum CardError {
    #[error("invalid card format: {0:?}")]
    InvalidCardFormat(String),
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CardError::InvalidCardFormat(s.to_string());
        let mut chars = s.chars();
        let value = match chars.next().ok_or_else(err)? {
            c @ '2'..='9' => c as Value - b'0' as Value,
            'T' => 10,
            // A leading 1 is only valid as part of the spelled-out "10".
            '1' => match chars.next() {
                Some('0') => 10,
                _ => return Err(err()),
            },
            'J' => 11,
            'Q' => 12,
            'K' => 13,
            'A' => 14,
            _ => return Err(err()),
        };
        let suit = match chars.next().ok_or_else(err)? {
            'S' => Suit::Spade,
            'H' => Suit::Heart,
            'D' => Suit::Diamond,
            'C' => Suit::Club,
            _ => return Err(err()),
        };
        if chars.next().is_some() {
            return Err(err());
        }
        Ok(Self(value, suit))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors from drawing out of an exhausted deck.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum DeckError {
    #[error("no cards remain in the deck")]
    EmptyDeck,
}

/// An ordered, duplicate-free sequence of cards with a draw cursor.
///
/// Shuffling permutes the whole sequence and rewinds the cursor, so it is
/// only legal between hands, when no drawn card is still in play.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    deck_idx: usize,
}

impl Deck {
    /// The full 52-card universe in a fixed order.
    #[must_use]
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(constants::DECK_SIZE);
        for value in 2..=14 {
            for suit in SUITS {
                cards.push(Card(value, suit));
            }
        }
        Self { cards, deck_idx: 0 }
    }

    /// The 52-card universe minus `known`, so simulations never reuse a
    /// card the caller already sees.
    #[must_use]
    pub fn excluding(known: &HashSet<Card>) -> Self {
        let mut deck = Self::new();
        deck.cards.retain(|card| !known.contains(card));
        deck
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.deck_idx = 0;
    }

    /// Draw the top card.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        let card = self
            .cards
            .get(self.deck_idx)
            .copied()
            .ok_or(DeckError::EmptyDeck)?;
        self.deck_idx += 1;
        Ok(card)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.deck_idx
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for whole chips. All bets and player stacks are represented
/// as whole chips, non-negative by construction.
pub type Chips = u32;

/// Type alias for seat positions during the game.
pub type SeatIndex = usize;

/// Type alias for the caller-assigned identity of a player.
pub type PlayerId = Uuid;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blinds {
    pub small: Chips,
    pub big: Chips,
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${}/{}", self.small, self.big)
    }
}

/// A betting decision. Only bets and raises carry an amount; the amount is
/// the total bet level the player moves to, not the increment.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Bet(Chips),
    Raise(Chips),
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "folds".to_string(),
            Self::Check => "checks".to_string(),
            Self::Call => "calls".to_string(),
            Self::Bet(amount) => format!("bets ${amount}"),
            Self::Raise(amount) => format!("raises to ${amount}"),
        };
        write!(f, "{repr}")
    }
}

/// One seat's state within a single hand.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Player {
    pub user_id: PlayerId,
    /// Remaining stack.
    pub credit: Chips,
    /// Hole cards, empty until the deal.
    pub cards: Vec<Card>,
    /// Chips committed this betting round; swept into the pot when the
    /// round completes.
    pub current_bet: Chips,
    /// Cumulative chips committed this hand.
    pub total_bets: Chips,
    pub has_folded: bool,
    /// Whether the player has acted this betting round.
    pub has_acted: bool,
    pub last_action: Option<PlayerAction>,
}

impl Player {
    #[must_use]
    pub fn new(user_id: PlayerId, credit: Chips) -> Self {
        Self {
            user_id,
            credit,
            cards: Vec::with_capacity(constants::HOLE_CARDS),
            current_bet: 0,
            total_bets: 0,
            has_folded: false,
            has_acted: false,
            last_action: None,
        }
    }

    /// Clear per-hand state ahead of the next deal. Credit survives.
    pub fn reset(&mut self) {
        self.cards.clear();
        self.current_bet = 0;
        self.total_bets = 0;
        self.has_folded = false;
        self.has_acted = false;
        self.last_action = None;
    }
}

/// Hand categories in ascending strength. The discriminant order is the
/// comparison order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "high card",
            Self::OnePair => "one pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "straight",
            Self::Flush => "flush",
            Self::FullHouse => "full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "straight flush",
        };
        write!(f, "{repr}")
    }
}

/// A fully-ordered hand strength: category first, then the tie-break
/// kickers most-significant-first. The derived lexicographic ordering on
/// `kickers` is the comparison rule, so kicker lists are always truncated
/// to the ranks meaningful for a 5-card hand.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct HandValue {
    pub category: HandCategory,
    pub kickers: Vec<Value>,
}
