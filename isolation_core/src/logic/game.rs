use crate::engine::move_list::MoveList;
use crate::logic::board::{Board, BoardConfig, BoardError, Coord};
use crate::logic::generator::{generate_moves, has_legal_moves};
use crate::logic::rules::{is_valid_move, MoveError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("player 1"),
            Self::Two => f.write_str("player 2"),
        }
    }
}

/// Everything `undo_move` needs to reverse one `apply_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    pub mv: Coord,
    pub mover: Player,
    pub previous: Option<Coord>,
}

/// Why a serialized game state was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("{player} stands on {cell}, outside the board")]
    LocationOffBoard { player: Player, cell: Coord },
    #[error("{player} stands on {cell}, which is not marked as blocked")]
    LocationOpen { player: Player, cell: Coord },
    #[error("both players stand on {0}")]
    SharedLocation(Coord),
    #[error("{active} cannot be on move after {move_count} moves")]
    TurnMismatch { active: Player, move_count: u32 },
    #[error("{move_count} moves cannot leave {player} unplaced")]
    MissingLocation { player: Player, move_count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGameState")]
pub struct GameState {
    board: Board,
    locations: [Option<Coord>; 2],
    active: Player,
    move_count: u32,
}

/// Wire form of [`GameState`]; the board is already checked by its own `TryFrom`.
#[derive(Deserialize)]
struct RawGameState {
    board: Board,
    locations: [Option<Coord>; 2],
    active: Player,
    move_count: u32,
}

impl TryFrom<RawGameState> for GameState {
    type Error = StateError;

    fn try_from(raw: RawGameState) -> Result<Self, Self::Error> {
        let state = Self {
            board: raw.board,
            locations: raw.locations,
            active: raw.active,
            move_count: raw.move_count,
        };

        // Player one moves on even plies.
        let expected = if state.move_count % 2 == 0 {
            Player::One
        } else {
            Player::Two
        };
        if state.active != expected {
            return Err(StateError::TurnMismatch {
                active: state.active,
                move_count: state.move_count,
            });
        }

        for (player, placed_after) in [(Player::One, 1), (Player::Two, 2)] {
            match state.location(player) {
                Some(cell) if !state.board.contains(cell) => {
                    return Err(StateError::LocationOffBoard { player, cell });
                }
                Some(cell) if state.board.is_open(cell) => {
                    return Err(StateError::LocationOpen { player, cell });
                }
                None if state.move_count >= placed_after => {
                    return Err(StateError::MissingLocation {
                        player,
                        move_count: state.move_count,
                    });
                }
                _ => {}
            }
        }

        if let [Some(one), Some(two)] = state.locations {
            if one == two {
                return Err(StateError::SharedLocation(one));
            }
        }
        Ok(state)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A fresh 7x7 game with the bottom-right corner reserved.
    #[must_use]
    pub fn new() -> Self {
        Self::from_board(Board::from_config_unchecked(&BoardConfig::default()))
    }

    /// # Errors
    ///
    /// Returns the [`BoardError`] when `config` does not describe a playable board.
    pub fn with_config(config: &BoardConfig) -> Result<Self, BoardError> {
        Ok(Self::from_board(Board::new(config)?))
    }

    const fn from_board(board: Board) -> Self {
        Self {
            board,
            locations: [None, None],
            active: Player::One,
            move_count: 0,
        }
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn active_player(&self) -> Player {
        self.active
    }

    #[must_use]
    pub const fn inactive_player(&self) -> Player {
        self.active.opposite()
    }

    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn opponent(&self, player: Player) -> Player {
        player.opposite()
    }

    #[must_use]
    pub const fn move_count(&self) -> u32 {
        self.move_count
    }

    #[must_use]
    pub const fn location(&self, player: Player) -> Option<Coord> {
        let [one, two] = self.locations;
        match player {
            Player::One => one,
            Player::Two => two,
        }
    }

    const fn location_mut(&mut self, player: Player) -> &mut Option<Coord> {
        let [one, two] = &mut self.locations;
        match player {
            Player::One => one,
            Player::Two => two,
        }
    }

    /// Legal destinations for the player to move, in generation order.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        self.legal_moves_for(self.active)
    }

    /// Destinations reachable by `player` if it were their turn.
    #[must_use]
    pub fn legal_moves_for(&self, player: Player) -> MoveList {
        generate_moves(&self.board, self.location(player))
    }

    #[must_use]
    pub fn has_legal_moves(&self) -> bool {
        has_legal_moves(&self.board, self.location(self.active))
    }

    #[must_use]
    pub fn blank_spaces(&self) -> MoveList {
        self.board.blank_spaces()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.has_legal_moves()
    }

    #[must_use]
    pub fn is_loser(&self, player: Player) -> bool {
        player == self.active && self.is_terminal()
    }

    #[must_use]
    pub fn is_winner(&self, player: Player) -> bool {
        player == self.inactive_player() && self.is_terminal()
    }

    /// `-inf` for a lost game, `+inf` for a won one, `0` while undecided.
    #[must_use]
    pub fn utility(&self, player: Player) -> f64 {
        if self.is_loser(player) {
            f64::NEG_INFINITY
        } else if self.is_winner(player) {
            f64::INFINITY
        } else {
            0.0
        }
    }

    /// # Errors
    ///
    /// Returns the [`MoveError`] explaining why `mv` is not a legal destination.
    pub fn validate_move(&self, mv: Coord) -> Result<(), MoveError> {
        is_valid_move(&self.board, self.location(self.active), mv)
    }

    /// The state after the active player moves to `mv`. `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Fails like [`GameState::validate_move`].
    pub fn forecast(&self, mv: Coord) -> Result<Self, MoveError> {
        let mut next = *self;
        next.make_move(mv)?;
        Ok(next)
    }

    /// Checked in-place move.
    ///
    /// # Errors
    ///
    /// Fails like [`GameState::validate_move`], leaving the state unchanged.
    pub fn make_move(&mut self, mv: Coord) -> Result<UndoRecord, MoveError> {
        if let Err(err) = self.validate_move(mv) {
            log::trace!("{} rejected move {mv}: {err}", self.active);
            return Err(err);
        }
        Ok(self.apply_move(mv))
    }

    /// Applies `mv` without validation. The caller must take `mv` from `legal_moves`
    /// and hand the returned record back to `undo_move` in stack order.
    pub fn apply_move(&mut self, mv: Coord) -> UndoRecord {
        debug_assert!(self.validate_move(mv).is_ok(), "illegal move {mv}");
        let mover = self.active;
        let previous = self.location_mut(mover).replace(mv);
        self.board.occupy(mv);
        self.active = mover.opposite();
        self.move_count += 1;
        UndoRecord { mv, mover, previous }
    }

    pub fn undo_move(&mut self, undo: UndoRecord) {
        debug_assert_eq!(self.active, undo.mover.opposite(), "undo out of order");
        self.board.vacate(undo.mv);
        *self.location_mut(undo.mover) = undo.previous;
        self.active = undo.mover;
        self.move_count -= 1;
    }

    /// Text rendering: `1`/`2` for the players, `-` for blocked cells, `.` for blanks.
    #[must_use]
    pub fn to_board_string(&self) -> String {
        let mut out = String::new();
        for row in 0..self.board.height() {
            for col in 0..self.board.width() {
                let cell = Coord::new(col, row);
                let mark = if self.location(Player::One) == Some(cell) {
                    '1'
                } else if self.location(Player::Two) == Some(cell) {
                    '2'
                } else if self.board.is_occupied(cell) {
                    '-'
                } else {
                    '.'
                };
                out.push(mark);
            }
            out.push('\n');
        }
        out
    }
}
