//! Table limits and default stakes.

use super::entities::Chips;

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

/// Maximum number of seats at one table.
pub const MAX_PLAYERS: usize = 10;

/// Minimum number of seated players needed to start a hand.
pub const MIN_PLAYERS: usize = 2;

/// Private cards dealt to each player.
pub const HOLE_CARDS: usize = 2;

/// Community cards on a complete board.
pub const BOARD_SIZE: usize = 5;

pub const DEFAULT_BUY_IN: Chips = 1000;
pub const DEFAULT_BIG_BLIND: Chips = DEFAULT_BUY_IN / 50;
pub const DEFAULT_SMALL_BLIND: Chips = DEFAULT_BIG_BLIND / 2;
