//! Per-hand betting state machine.
//!
//! A [`Game`] owns its deck and players and drives one poker hand through
//! its phases, validating every player action before applying it. A
//! rejected action leaves the game entirely unchanged; there is no partial
//! pot or turn mutation to roll back.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::constants::{BOARD_SIZE, HOLE_CARDS, MAX_PLAYERS, MIN_PLAYERS};
use super::constants::{DEFAULT_BIG_BLIND, DEFAULT_BUY_IN, DEFAULT_SMALL_BLIND};
use super::entities::{
    Blinds, Card, Chips, Deck, DeckError, Player, PlayerAction, PlayerId, SeatIndex,
};
use super::functional::{argmax, eval};

/// Type alias for the identity of one game (one table's current hand).
pub type GameId = Uuid;

/// Phases of a hand, in strict forward order. `Archived` is the
/// out-of-band terminal for hands no longer eligible for any action.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Phase {
    Waiting,
    Ready,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    GameOver,
    Archived,
}

impl Phase {
    #[must_use]
    pub const fn is_betting(self) -> bool {
        matches!(self, Self::Preflop | Self::Flop | Self::Turn | Self::River)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::Ready => "ready",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
            Self::GameOver => "game over",
            Self::Archived => "archived",
        };
        write!(f, "{repr}")
    }
}

/// Errors that can occur while driving a hand.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("game is full")]
    CapacityReached,
    #[error("player already seated")]
    PlayerAlreadySeated,
    #[error("player does not exist")]
    PlayerNotFound,
    #[error("need 2+ players")]
    NotEnoughPlayers,
    #[error("need >= ${big_blind} for the big blind")]
    InsufficientFunds { big_blind: Chips },
    #[error("not your turn")]
    NotYourTurn,
    #[error("invalid action")]
    InvalidAction,
    #[error("illegal bet of ${amount}")]
    InvalidBet { amount: Chips },
    #[error("no hand ready to start")]
    NotReady,
    #[error("no betting round in progress")]
    NoBettingRound,
    #[error("hand in progress")]
    HandInProgress,
    #[error("hand is not over")]
    HandNotOver,
    #[error("showdown requires {BOARD_SIZE} community cards, board has {board_len}")]
    InsufficientBoard { board_len: usize },
    #[error("game is archived")]
    GameArchived,
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Game configuration settings.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSettings {
    pub buy_in: Chips,
    pub blinds: Blinds,
    pub max_players: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_BUY_IN,
            Blinds {
                small: DEFAULT_SMALL_BLIND,
                big: DEFAULT_BIG_BLIND,
            },
            MAX_PLAYERS,
        )
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(buy_in: Chips, blinds: Blinds, max_players: usize) -> Self {
        Self {
            buy_in,
            blinds,
            max_players,
        }
    }
}

/// One seat's public state, as seen by another player.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlayerSnapshot {
    pub user_id: PlayerId,
    pub credit: Chips,
    pub current_bet: Chips,
    pub total_bets: Chips,
    pub has_folded: bool,
    pub last_action: Option<PlayerAction>,
    /// Hole cards; populated only for the viewer's own seat.
    pub cards: Vec<Card>,
}

/// A read-only view of the whole game, redacted for one viewer.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GameSnapshot {
    pub id: GameId,
    pub phase: Phase,
    pub blinds: Blinds,
    pub board: Vec<Card>,
    pub pot: Chips,
    pub call_amount: Chips,
    pub small_blind_idx: SeatIndex,
    pub big_blind_idx: SeatIndex,
    pub current_player_idx: SeatIndex,
    pub players: Vec<PlayerSnapshot>,
}

/// A poker hand with data and logic for running it end-to-end.
///
/// All mutating operations validate first and only then apply, so any
/// returned error guarantees the game was left untouched. A `Game` is
/// exclusively owned by its caller; serialize concurrent access through
/// one owner per game id (see [`crate::table`]).
#[derive(Debug)]
pub struct Game {
    id: GameId,
    settings: GameSettings,
    phase: Phase,
    deck: Deck,
    players: Vec<Player>,
    board: Vec<Card>,
    pot: Chips,
    call_amount: Chips,
    small_blind_idx: SeatIndex,
    big_blind_idx: SeatIndex,
    current_player_idx: SeatIndex,
    hand_count: u32,
}

impl Game {
    #[must_use]
    pub fn new(id: GameId, settings: GameSettings) -> Self {
        Self {
            id,
            settings,
            phase: Phase::Waiting,
            deck: Deck::new(),
            players: Vec::with_capacity(settings.max_players),
            board: Vec::with_capacity(BOARD_SIZE),
            pot: 0,
            call_amount: 0,
            small_blind_idx: 0,
            big_blind_idx: 1,
            current_player_idx: 0,
            hand_count: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    #[must_use]
    pub fn pot(&self) -> Chips {
        self.pot
    }

    #[must_use]
    pub fn call_amount(&self) -> Chips {
        self.call_amount
    }

    #[must_use]
    pub fn small_blind_idx(&self) -> SeatIndex {
        self.small_blind_idx
    }

    #[must_use]
    pub fn big_blind_idx(&self) -> SeatIndex {
        self.big_blind_idx
    }

    #[must_use]
    pub fn current_player_idx(&self) -> SeatIndex {
        self.current_player_idx
    }

    /// Total chips in play: pot plus every seat's pending bet and stack.
    /// Constant across a hand; chips are neither created nor destroyed.
    #[must_use]
    pub fn chips_in_play(&self) -> Chips {
        self.pot
            + self
                .players
                .iter()
                .map(|player| player.current_bet + player.credit)
                .sum::<Chips>()
    }

    fn seat_of(&self, user_id: PlayerId) -> Result<SeatIndex, GameError> {
        self.players
            .iter()
            .position(|player| player.user_id == user_id)
            .ok_or(GameError::PlayerNotFound)
    }

    /// First non-folded seat at or after `start`, wrapping.
    fn first_active_from(&self, start: SeatIndex) -> SeatIndex {
        let count = self.players.len();
        (0..count)
            .map(|offset| (start + offset) % count)
            .find(|&seat| !self.players[seat].has_folded)
            .unwrap_or(start)
    }

    fn active_count(&self) -> usize {
        self.players
            .iter()
            .filter(|player| !player.has_folded)
            .count()
    }

    fn ensure_not_archived(&self) -> Result<(), GameError> {
        if self.phase == Phase::Archived {
            return Err(GameError::GameArchived);
        }
        Ok(())
    }

    /// Take a seat. Only legal between hands; the second seated player
    /// makes the table ready.
    pub fn seat_player(&mut self, user_id: PlayerId, buy_in: Chips) -> Result<SeatIndex, GameError> {
        self.ensure_not_archived()?;
        if !matches!(self.phase, Phase::Waiting | Phase::Ready) {
            return Err(GameError::HandInProgress);
        }
        if self.players.len() >= self.settings.max_players {
            return Err(GameError::CapacityReached);
        }
        if self.players.iter().any(|player| player.user_id == user_id) {
            return Err(GameError::PlayerAlreadySeated);
        }
        if buy_in < self.settings.blinds.big {
            return Err(GameError::InsufficientFunds {
                big_blind: self.settings.blinds.big,
            });
        }
        self.players.push(Player::new(user_id, buy_in));
        let seat = self.players.len() - 1;
        if self.phase == Phase::Waiting && self.players.len() >= MIN_PLAYERS {
            self.phase = Phase::Ready;
        }
        info!("game {}: seated player {user_id} at seat {seat}", self.id);
        Ok(seat)
    }

    /// Give up a seat. Leaving mid-hand archives the whole game: the hand
    /// can no longer be resolved fairly and accepts no further actions.
    pub fn remove_player(&mut self, user_id: PlayerId) -> Result<(), GameError> {
        self.ensure_not_archived()?;
        let seat = self.seat_of(user_id)?;
        if self.phase.is_betting() || self.phase == Phase::Showdown {
            info!(
                "game {}: player {user_id} left mid-hand, archiving",
                self.id
            );
            self.phase = Phase::Archived;
            return Ok(());
        }
        self.players.remove(seat);
        if self.phase == Phase::Ready && self.players.len() < MIN_PLAYERS {
            self.phase = Phase::Waiting;
        }
        info!("game {}: removed player {user_id}", self.id);
        Ok(())
    }

    /// Mark the game as no longer eligible for any action.
    pub fn archive(&mut self) {
        info!("game {}: archived", self.id);
        self.phase = Phase::Archived;
    }

    /// Start the hand: rotate and post blinds, deal hole cards, and open
    /// the preflop betting round at the seat after the big blind.
    ///
    /// Only legal from `Ready`, so a double invocation is rejected instead
    /// of silently re-dealing.
    pub fn start_betting_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        self.ensure_not_archived()?;
        if self.phase != Phase::Ready {
            return Err(GameError::NotReady);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }

        let count = self.players.len();
        if self.hand_count > 0 {
            self.small_blind_idx = (self.small_blind_idx + 1) % count;
        } else {
            self.small_blind_idx = 0;
        }
        self.big_blind_idx = (self.small_blind_idx + 1) % count;

        self.deck.shuffle(rng);

        // Blinds are forced bets; a short stack posts what it has.
        let small = self.settings.blinds.small;
        let big = self.settings.blinds.big;
        self.post_blind(self.small_blind_idx, small);
        self.post_blind(self.big_blind_idx, big);
        self.call_amount = big;

        for seat in 0..count {
            for _ in 0..HOLE_CARDS {
                let card = self.deck.draw()?;
                self.players[seat].cards.push(card);
            }
        }

        self.current_player_idx = (self.big_blind_idx + 1) % count;
        self.phase = Phase::Preflop;
        self.hand_count += 1;
        info!(
            "game {}: hand {} started, blinds {} at seats {}/{}",
            self.id, self.hand_count, self.settings.blinds, self.small_blind_idx, self.big_blind_idx,
        );
        Ok(())
    }

    fn post_blind(&mut self, seat: SeatIndex, amount: Chips) {
        let player = &mut self.players[seat];
        let posted = amount.min(player.credit);
        player.credit -= posted;
        player.current_bet = posted;
        player.total_bets += posted;
    }

    /// Validate and apply one player action, then advance the turn and, if
    /// the betting round completed, the phase.
    pub fn process_player_action(
        &mut self,
        user_id: PlayerId,
        action: PlayerAction,
    ) -> Result<(), GameError> {
        self.ensure_not_archived()?;
        if !self.phase.is_betting() {
            return Err(GameError::NoBettingRound);
        }
        let seat = self.seat_of(user_id)?;
        if seat != self.current_player_idx {
            return Err(GameError::NotYourTurn);
        }

        // Everything below the validation block mutates; nothing above does.
        let player = &self.players[seat];
        match action {
            PlayerAction::Fold => {}
            PlayerAction::Check => {
                if self.call_amount > player.current_bet {
                    return Err(GameError::InvalidAction);
                }
            }
            PlayerAction::Call => {}
            PlayerAction::Bet(amount) => {
                if self.call_amount > 0 {
                    return Err(GameError::InvalidAction);
                }
                if amount == 0 || amount > player.credit {
                    return Err(GameError::InvalidBet { amount });
                }
            }
            PlayerAction::Raise(amount) => {
                if amount <= self.call_amount {
                    return Err(GameError::InvalidAction);
                }
                if amount - player.current_bet > player.credit {
                    return Err(GameError::InvalidBet { amount });
                }
            }
        }

        let player = &mut self.players[seat];
        match action {
            PlayerAction::Fold => {
                player.has_folded = true;
            }
            PlayerAction::Check => {}
            PlayerAction::Call => {
                // A short call is an implicit all-in for the rest of the stack.
                let new_bet = self.call_amount.min(player.current_bet + player.credit);
                let delta = new_bet - player.current_bet;
                player.credit -= delta;
                player.current_bet = new_bet;
                player.total_bets += delta;
            }
            PlayerAction::Bet(amount) | PlayerAction::Raise(amount) => {
                let delta = amount - player.current_bet;
                player.credit -= delta;
                player.current_bet = amount;
                player.total_bets += delta;
                self.call_amount = amount;
            }
        }
        let player = &mut self.players[seat];
        player.has_acted = true;
        player.last_action = Some(action);
        debug!("game {}: seat {seat} {action}", self.id);

        self.current_player_idx = self.first_active_from((seat + 1) % self.players.len());

        if self.is_betting_round_complete() {
            self.complete_betting_round()?;
        }
        Ok(())
    }

    /// A betting round is complete when at most one non-folded player
    /// remains, or when every non-folded player has acted and their bets
    /// are level. A player with an empty stack counts as level; they are
    /// all-in and cannot act again.
    #[must_use]
    pub fn is_betting_round_complete(&self) -> bool {
        let active: Vec<&Player> = self
            .players
            .iter()
            .filter(|player| !player.has_folded)
            .collect();
        if active.len() <= 1 {
            return true;
        }
        active
            .iter()
            .all(|player| player.has_acted && (player.current_bet == self.call_amount || player.credit == 0))
    }

    /// Sweep bets into the pot and advance the phase, dealing community
    /// cards as required. With one player left the hand short-circuits to
    /// `GameOver` and the pot is awarded without a reveal.
    fn complete_betting_round(&mut self) -> Result<(), GameError> {
        for player in &mut self.players {
            self.pot += player.current_bet;
            player.current_bet = 0;
            player.has_acted = false;
        }
        self.call_amount = 0;

        if self.active_count() <= 1 {
            let pot = self.pot;
            if let Some(winner) = self.players.iter_mut().find(|player| !player.has_folded) {
                winner.credit += pot;
                info!(
                    "game {}: everyone else folded, {} wins ${pot}",
                    self.id, winner.user_id,
                );
            }
            self.pot = 0;
            self.phase = Phase::GameOver;
            return Ok(());
        }

        let next = match self.phase {
            Phase::Preflop => {
                self.deal_community(3)?;
                Phase::Flop
            }
            Phase::Flop => {
                self.deal_community(1)?;
                Phase::Turn
            }
            Phase::Turn => {
                self.deal_community(1)?;
                Phase::River
            }
            Phase::River => Phase::Showdown,
            _ => return Err(GameError::NoBettingRound),
        };
        self.phase = next;
        if self.phase.is_betting() {
            self.current_player_idx = self.first_active_from(self.small_blind_idx);
        }
        info!(
            "game {}: betting round complete, pot ${}, phase {}",
            self.id, self.pot, self.phase,
        );
        Ok(())
    }

    fn deal_community(&mut self, count: usize) -> Result<(), GameError> {
        for _ in 0..count {
            let card = self.deck.draw()?;
            self.board.push(card);
        }
        Ok(())
    }

    /// Resolve the showdown: evaluate every non-folded player's 7 cards,
    /// split the pot among the maximal hands, and end the hand. Odd chips
    /// go to the earliest winner seats counting from the small blind.
    ///
    /// # Panics
    ///
    /// Panics if no non-folded player remains; that is a fatal bookkeeping
    /// violation, not a recoverable condition.
    pub fn determine_winners(&mut self) -> Result<Vec<Player>, GameError> {
        self.ensure_not_archived()?;
        if self.board.len() != BOARD_SIZE {
            return Err(GameError::InsufficientBoard {
                board_len: self.board.len(),
            });
        }
        if self.phase != Phase::Showdown {
            return Err(GameError::HandNotOver);
        }

        let contenders: Vec<SeatIndex> = (0..self.players.len())
            .filter(|&seat| !self.players[seat].has_folded)
            .collect();
        let values: Vec<_> = contenders
            .iter()
            .map(|&seat| {
                let player = &self.players[seat];
                let mut seven = player.cards.clone();
                seven.extend_from_slice(&self.board);
                eval(&seven)
            })
            .collect();

        let best = argmax(&values);
        assert!(
            !best.is_empty(),
            "game {}: no winners at showdown, every player folded",
            self.id,
        );
        let mut winner_seats: Vec<SeatIndex> = best.into_iter().map(|i| contenders[i]).collect();

        // Seat order from the small blind decides who takes the odd chips.
        let count = self.players.len();
        let sb = self.small_blind_idx;
        winner_seats.sort_by_key(|&seat| (seat + count - sb) % count);

        let share = self.pot / winner_seats.len() as Chips;
        let mut remainder = self.pot % winner_seats.len() as Chips;
        for &seat in &winner_seats {
            let extra = u32::from(remainder > 0);
            remainder = remainder.saturating_sub(1);
            self.players[seat].credit += share + extra;
        }
        info!(
            "game {}: showdown, pot ${} split across seats {:?}",
            self.id, self.pot, winner_seats,
        );
        self.pot = 0;
        self.phase = Phase::GameOver;

        Ok(winner_seats
            .iter()
            .map(|&seat| self.players[seat].clone())
            .collect())
    }

    /// Reset per-hand state so the next hand can start. Seats, stacks, and
    /// blind positions survive; blind rotation happens at the next start.
    pub fn prepare_next_hand(&mut self) -> Result<(), GameError> {
        self.ensure_not_archived()?;
        if self.phase != Phase::GameOver {
            return Err(GameError::HandNotOver);
        }
        self.board.clear();
        self.pot = 0;
        self.call_amount = 0;
        for player in &mut self.players {
            player.reset();
        }
        self.phase = if self.players.len() >= MIN_PLAYERS {
            Phase::Ready
        } else {
            Phase::Waiting
        };
        Ok(())
    }

    /// A read-only snapshot with hole cards redacted for everyone but the
    /// viewer.
    #[must_use]
    pub fn snapshot_for(&self, viewer: Option<PlayerId>) -> GameSnapshot {
        GameSnapshot {
            id: self.id,
            phase: self.phase,
            blinds: self.settings.blinds,
            board: self.board.clone(),
            pot: self.pot,
            call_amount: self.call_amount,
            small_blind_idx: self.small_blind_idx,
            big_blind_idx: self.big_blind_idx,
            current_player_idx: self.current_player_idx,
            players: self
                .players
                .iter()
                .map(|player| PlayerSnapshot {
                    user_id: player.user_id,
                    credit: player.credit,
                    current_bet: player.current_bet,
                    total_bets: player.total_bets,
                    has_folded: player.has_folded,
                    last_action: player.last_action,
                    cards: if viewer == Some(player.user_id) {
                        player.cards.clone()
                    } else {
                        Vec::new()
                    },
                })
                .collect(),
        }
    }
}
