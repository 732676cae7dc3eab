use std::fmt;

use serde::Serialize;

use crate::board::{BOARD_SIZE, Side};
use crate::error::EngineError;

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Builds a position from caller-supplied coordinates that may be negative
    /// or past the board edge.
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        if in_bounds(row, col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn in_bounds(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Steps by `(dr, dc)`. Returns `None` when the step leaves the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Self> {
        Self::checked(self.row as i32 + dr, self.col as i32 + dc)
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) as u32 + self.col.abs_diff(other.col) as u32
    }

    pub(crate) fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl TryFrom<(i32, i32)> for Position {
    type Error = EngineError;

    fn try_from((row, col): (i32, i32)) -> Result<Self, Self::Error> {
        Self::checked(row, col).ok_or(EngineError::OutOfBounds { row, col })
    }
}

/// A single step of one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// What the automated side did after a human move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "move", rename_all = "snake_case")]
pub enum Reply {
    Moved(Move),
    Passed,
}

/// State of the game once a move request has been fully processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "winner", rename_all = "snake_case")]
pub enum GameEvent {
    Continued,
    Won(Side),
}

/// Result of a successful `attempt_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    /// Contract:
    /// - `Won(side)` when either the submitted move or the automated reply
    ///   ended the game.
    /// - `Continued` otherwise.
    pub event: GameEvent,
    /// Contract:
    /// - `None` in two-player mode, or when the submitted move won.
    /// - `Some(Passed)` when the automated side had no legal move.
    pub reply: Option<Reply>,
}

/// Public game snapshot returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    /// 64 cells in scan order: 0=empty, 1=near, 2=far.
    pub board: Vec<u8>,
    pub current_turn: Side,
    pub selection: Option<Position>,
    pub near_count: u8,
    pub far_count: u8,
    pub winner: Option<Side>,
    pub last_move: Option<Move>,
    pub last_capture: Option<Position>,
    pub last_reply: Option<Reply>,
}

fn in_bounds(row: i32, col: i32) -> bool {
    let range = 0..BOARD_SIZE as i32;
    range.contains(&row) && range.contains(&col)
}
