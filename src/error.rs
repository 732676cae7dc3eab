use thiserror::Error;

use crate::board::Side;
use crate::types::Move;

/// Validation failures reported to the caller of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("coordinate ({row}, {col}) is off the board")]
    OutOfBounds { row: i32, col: i32 },
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    #[error("no piece is selected")]
    NoSelection,
    #[error("{0:?} still has a legal move and cannot pass")]
    PassRejected(Side),
}
