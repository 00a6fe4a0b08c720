//! Actor layer serializing access to each game.
//!
//! A single game must never be mutated by two concurrent actions: each
//! action's legality depends on the immediately preceding action's
//! effects. Every game is therefore owned by exactly one actor task that
//! drains its command inbox sequentially; callers hold a cloneable
//! [`GameHandle`] and a [`GameManager`] routes commands by game id.

pub mod actor;
pub mod manager;
pub mod messages;

pub use actor::{GameActor, GameHandle};
pub use manager::GameManager;
