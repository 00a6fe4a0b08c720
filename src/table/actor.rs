//! Game actor with async message handling.

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};

use super::messages::{CommandError, GameMessage};
use crate::game::entities::{Chips, Player, PlayerAction, PlayerId, SeatIndex};
use crate::game::state_machine::{Game, GameId, GameSettings, GameSnapshot};

const INBOX_CAPACITY: usize = 64;

/// Handle for sending commands to a game actor. Cheap to clone; all clones
/// feed the same sequential inbox.
#[derive(Clone)]
pub struct GameHandle {
    sender: mpsc::Sender<GameMessage>,
    game_id: GameId,
}

impl GameHandle {
    #[must_use]
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Send a raw command to the game.
    pub async fn send(&self, message: GameMessage) -> Result<(), CommandError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| CommandError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> GameMessage,
    ) -> Result<T, CommandError> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| CommandError::Closed)
    }

    pub async fn seat_player(
        &self,
        user_id: PlayerId,
        buy_in: Chips,
    ) -> Result<SeatIndex, CommandError> {
        let result = self
            .request(|response| GameMessage::SeatPlayer {
                user_id,
                buy_in,
                response,
            })
            .await?;
        Ok(result?)
    }

    pub async fn remove_player(&self, user_id: PlayerId) -> Result<(), CommandError> {
        let result = self
            .request(|response| GameMessage::RemovePlayer { user_id, response })
            .await?;
        Ok(result?)
    }

    pub async fn start_hand(&self) -> Result<(), CommandError> {
        let result = self
            .request(|response| GameMessage::StartHand { response })
            .await?;
        Ok(result?)
    }

    pub async fn take_action(
        &self,
        user_id: PlayerId,
        action: PlayerAction,
    ) -> Result<(), CommandError> {
        let result = self
            .request(|response| GameMessage::TakeAction {
                user_id,
                action,
                response,
            })
            .await?;
        Ok(result?)
    }

    pub async fn determine_winners(&self) -> Result<Vec<Player>, CommandError> {
        let result = self
            .request(|response| GameMessage::DetermineWinners { response })
            .await?;
        Ok(result?)
    }

    pub async fn next_hand(&self) -> Result<(), CommandError> {
        let result = self
            .request(|response| GameMessage::NextHand { response })
            .await?;
        Ok(result?)
    }

    pub async fn snapshot(&self, viewer: Option<PlayerId>) -> Result<GameSnapshot, CommandError> {
        self.request(|response| GameMessage::GetSnapshot { viewer, response })
            .await
    }

    pub async fn close(&self) -> Result<(), CommandError> {
        self.send(GameMessage::Close).await
    }
}

/// Actor owning a single game. Commands are processed strictly in arrival
/// order; there is no other way to reach the game.
pub struct GameActor {
    game: Game,
    inbox: mpsc::Receiver<GameMessage>,
    rng: StdRng,
}

impl GameActor {
    /// Create an actor and its handle.
    #[must_use]
    pub fn new(id: GameId, settings: GameSettings) -> (Self, GameHandle) {
        Self::with_rng(id, settings, StdRng::from_os_rng())
    }

    /// Like [`GameActor::new`] but with a caller-supplied generator, so
    /// tests can replay a deal.
    #[must_use]
    pub fn with_rng(id: GameId, settings: GameSettings, rng: StdRng) -> (Self, GameHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let actor = Self {
            game: Game::new(id, settings),
            inbox,
            rng,
        };
        let handle = GameHandle {
            sender,
            game_id: id,
        };
        (actor, handle)
    }

    /// Run the actor event loop until `Close` or until every handle is
    /// dropped.
    pub async fn run(mut self) {
        info!("game {}: actor started", self.game.id());
        while let Some(message) = self.inbox.recv().await {
            if self.handle_message(message) {
                break;
            }
        }
        info!("game {}: actor stopped", self.game.id());
    }

    /// Apply one command. Returns true when the actor should stop.
    fn handle_message(&mut self, message: GameMessage) -> bool {
        match message {
            GameMessage::SeatPlayer {
                user_id,
                buy_in,
                response,
            } => {
                let _ = response.send(self.game.seat_player(user_id, buy_in));
            }
            GameMessage::RemovePlayer { user_id, response } => {
                let _ = response.send(self.game.remove_player(user_id));
            }
            GameMessage::StartHand { response } => {
                let _ = response.send(self.game.start_betting_round(&mut self.rng));
            }
            GameMessage::TakeAction {
                user_id,
                action,
                response,
            } => {
                let _ = response.send(self.game.process_player_action(user_id, action));
            }
            GameMessage::DetermineWinners { response } => {
                let _ = response.send(self.game.determine_winners());
            }
            GameMessage::NextHand { response } => {
                let _ = response.send(self.game.prepare_next_hand());
            }
            GameMessage::GetSnapshot { viewer, response } => {
                let _ = response.send(self.game.snapshot_for(viewer));
            }
            GameMessage::Close => return true,
        }
        false
    }
}
