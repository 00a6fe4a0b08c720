//! Registry mapping game ids to their actor handles.

use log::info;
use std::collections::HashMap;
use uuid::Uuid;

use super::actor::{GameActor, GameHandle};
use crate::game::state_machine::{GameId, GameSettings};

/// Creates, tracks, and closes game actors. One actor task per game id;
/// the manager itself never touches game state.
#[derive(Default)]
pub struct GameManager {
    games: HashMap<GameId, GameHandle>,
}

impl GameManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new game actor and return its handle. Must be called from
    /// within a tokio runtime.
    pub fn create_game(&mut self, settings: GameSettings) -> GameHandle {
        let id = Uuid::new_v4();
        let (actor, handle) = GameActor::new(id, settings);
        tokio::spawn(actor.run());
        self.games.insert(id, handle.clone());
        info!("manager: created game {id}");
        handle
    }

    #[must_use]
    pub fn get(&self, id: GameId) -> Option<GameHandle> {
        self.games.get(&id).cloned()
    }

    /// Close a game's actor and forget it. Returns false for unknown ids.
    pub async fn close_game(&mut self, id: GameId) -> bool {
        match self.games.remove(&id) {
            Some(handle) => {
                // A closed inbox means the actor already stopped on its own.
                let _ = handle.close().await;
                info!("manager: closed game {id}");
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
