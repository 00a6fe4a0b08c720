//! Poker engine core - cards, evaluation, odds, and the betting FSM.
//!
//! This module provides the in-memory poker hand implementation including:
//! - Card and deck model with the two-character short-string codec
//! - Pure hand evaluation over 5 to 7 cards
//! - Monte Carlo win-probability estimation
//! - Per-hand betting state machine with turn-order and legality rules

pub mod constants;
pub mod entities;
pub mod functional;
pub mod odds;
pub mod state_machine;
