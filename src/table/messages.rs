//! Game actor command and response types.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::game::entities::{Chips, Player, PlayerAction, PlayerId, SeatIndex};
use crate::game::state_machine::{GameError, GameSnapshot};

/// Commands that can be sent to a [`crate::table::GameActor`].
///
/// Every command that touches game state carries a `oneshot` reply channel
/// so the caller observes the outcome of its own command, not a later one.
#[derive(Debug)]
pub enum GameMessage {
    /// Seat a player with their buy-in.
    SeatPlayer {
        user_id: PlayerId,
        buy_in: Chips,
        response: oneshot::Sender<Result<SeatIndex, GameError>>,
    },

    /// Remove a player; mid-hand this archives the game.
    RemovePlayer {
        user_id: PlayerId,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    /// Post blinds, deal, and open the preflop betting round.
    StartHand {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    /// Apply one betting action for a player.
    TakeAction {
        user_id: PlayerId,
        action: PlayerAction,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    /// Resolve the showdown and distribute the pot.
    DetermineWinners {
        response: oneshot::Sender<Result<Vec<Player>, GameError>>,
    },

    /// Reset per-hand state after `GameOver`.
    NextHand {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    /// A read-only snapshot, redacted for `viewer`.
    GetSnapshot {
        viewer: Option<PlayerId>,
        response: oneshot::Sender<GameSnapshot>,
    },

    /// Stop the actor. The game is dropped with it.
    Close,
}

/// Failure to deliver a command or receive its reply.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("game task is gone")]
    Closed,
    #[error(transparent)]
    Game(#[from] GameError),
}
