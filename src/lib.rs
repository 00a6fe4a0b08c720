//! # Holdem Core
//!
//! The rules-and-probability core of a Texas Hold'em poker engine: a deck
//! and card model, a 5-to-7 card hand evaluator, a Monte Carlo win-odds
//! estimator, and a per-hand betting state machine with strict turn-order
//! and legality rules.
//!
//! ## Architecture
//!
//! The engine is split into two layers:
//!
//! - [`game`]: the synchronous core. A [`game::state_machine::Game`] owns
//!   its deck and players, validates and applies betting actions, advances
//!   phases, and resolves showdowns with the pure evaluator in
//!   [`game::functional`]. The odds estimator in [`game::odds`] reads a
//!   snapshot of known cards and never touches live game state.
//! - [`table`]: the serialization boundary. Each game is owned by exactly
//!   one actor task that drains its command inbox sequentially, so two
//!   concurrent actions for the same game id can never interleave.
//!
//! ## Example
//!
//! ```
//! use holdem_core::functional::eval;
//! use holdem_core::entities::{Card, HandCategory, Suit};
//!
//! let cards = [
//!     Card(14, Suit::Heart),
//!     Card(13, Suit::Heart),
//!     Card(12, Suit::Heart),
//!     Card(11, Suit::Heart),
//!     Card(10, Suit::Heart),
//! ];
//! assert_eq!(eval(&cards).category, HandCategory::StraightFlush);
//! ```

/// Core game logic: cards, evaluation, odds, and the betting state machine.
pub mod game;
pub use game::{
    constants,
    entities::{
        self, Blinds, Card, CardError, Chips, Deck, DeckError, HandCategory, HandValue, Player,
        PlayerAction, PlayerId, SeatIndex, Suit, Value,
    },
    functional, odds,
    state_machine::{Game, GameError, GameId, GameSettings, GameSnapshot, Phase},
};

/// Actor layer serializing access to each game.
pub mod table;
pub use table::{GameActor, GameHandle, GameManager, messages};
