use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::Position;

pub const BOARD_SIZE: usize = 8;
const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const NEAR_HOME_ROW: u8 = 6;
const FAR_HOME_ROW: u8 = 1;

/// One of the two competing players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Starts on row 6 and advances toward row 0.
    Near,
    /// Starts on row 1 and advances toward row 7.
    Far,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Near => "near",
            Side::Far => "far",
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Near => Side::Far,
            Side::Far => Side::Near,
        }
    }

    pub fn home_row(self) -> u8 {
        match self {
            Side::Near => NEAR_HOME_ROW,
            Side::Far => FAR_HOME_ROW,
        }
    }

    /// The edge this side must reach to win.
    pub fn goal_row(self) -> u8 {
        match self {
            Side::Near => 0,
            Side::Far => (BOARD_SIZE - 1) as u8,
        }
    }

    /// Row delta of a step toward the goal edge.
    pub fn forward(self) -> i32 {
        match self {
            Side::Near => -1,
            Side::Far => 1,
        }
    }

    /// Rows advanced from the far end of the board toward the goal edge.
    /// For `Far` this is the row itself.
    pub fn progress(self, row: u8) -> u8 {
        match self {
            Side::Near => (BOARD_SIZE - 1) as u8 - row,
            Side::Far => row,
        }
    }
}

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Square {
    Empty,
    Occupied(Side),
}

impl Square {
    pub fn side(self) -> Option<Side> {
        match self {
            Square::Empty => None,
            Square::Occupied(side) => Some(side),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Square::Empty
    }
}

/// 8x8 board represented by two occupancy bitboards, bit `row * 8 + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    near: u64,
    far: u64,
}

impl Board {
    /// Creates the starting position: a full rank of Far on row 1 and of
    /// Near on row 6.
    pub fn create_initial() -> Self {
        Self {
            near: rank_mask(Side::Near.home_row()),
            far: rank_mask(Side::Far.home_row()),
        }
    }

    /// A board with no pieces, for building custom positions.
    pub fn empty() -> Self {
        Self { near: 0, far: 0 }
    }

    pub fn get(&self, row: u8, col: u8) -> Result<Square, EngineError> {
        let pos = checked_position(row, col)?;
        Ok(self.square(pos))
    }

    pub fn set(&mut self, row: u8, col: u8, square: Square) -> Result<(), EngineError> {
        let pos = checked_position(row, col)?;
        self.put(pos, square);
        Ok(())
    }

    /// Returns the number of pieces `side` has on the board.
    pub fn count(&self, side: Side) -> u8 {
        self.mask(side).count_ones() as u8
    }

    /// Positions of `side`'s pieces in scan order (row-major, ascending).
    pub fn pieces(&self, side: Side) -> Vec<Position> {
        let mut bits = self.mask(side);
        let mut out = Vec::with_capacity(bits.count_ones() as usize);
        while bits != 0 {
            let idx = bits.trailing_zeros() as usize;
            out.push(Position::new(
                (idx / BOARD_SIZE) as u8,
                (idx % BOARD_SIZE) as u8,
            ));
            bits &= bits - 1;
        }
        out
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=near, 2=far.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            let square = bit(pos);
            *cell = if (self.near & square) != 0 {
                1
            } else if (self.far & square) != 0 {
                2
            } else {
                0
            };
        }
        board
    }

    /// Reads an in-bounds square. Out-of-bounds positions read as empty.
    pub(crate) fn square(&self, pos: Position) -> Square {
        if !pos.in_bounds() {
            return Square::Empty;
        }
        let square = bit(pos.index());
        if (self.near & square) != 0 {
            Square::Occupied(Side::Near)
        } else if (self.far & square) != 0 {
            Square::Occupied(Side::Far)
        } else {
            Square::Empty
        }
    }

    /// Writes an in-bounds square, keeping the two masks disjoint.
    pub(crate) fn put(&mut self, pos: Position, square: Square) {
        if !pos.in_bounds() {
            return;
        }
        let cell = bit(pos.index());
        self.near &= !cell;
        self.far &= !cell;
        match square {
            Square::Empty => {}
            Square::Occupied(Side::Near) => self.near |= cell,
            Square::Occupied(Side::Far) => self.far |= cell,
        }
    }

    fn mask(&self, side: Side) -> u64 {
        match side {
            Side::Near => self.near,
            Side::Far => self.far,
        }
    }
}

fn checked_position(row: u8, col: u8) -> Result<Position, EngineError> {
    let pos = Position::new(row, col);
    if pos.in_bounds() {
        Ok(pos)
    } else {
        Err(EngineError::OutOfBounds {
            row: row as i32,
            col: col as i32,
        })
    }
}

fn rank_mask(row: u8) -> u64 {
    0xFFu64 << (row as usize * BOARD_SIZE)
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}
