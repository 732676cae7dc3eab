use serde::{Deserialize, Serialize};

use crate::board::{Board, Side, Square};
use crate::types::{Move, Position};

/// What happens when a piece steps onto an opposing piece.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapturePolicy {
    /// The opposing piece is removed.
    #[default]
    Capture,
    /// Any occupied destination blocks the move.
    Blocked,
}

/// Step kinds relative to the mover, in the order moves are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Forward,
    Left,
    Right,
    Backward,
}

impl Step {
    pub(crate) const ADVANCING: [Step; 3] = [Step::Forward, Step::Left, Step::Right];
    pub(crate) const ALL: [Step; 4] = [Step::Forward, Step::Left, Step::Right, Step::Backward];

    pub(crate) fn delta(self, mover: Side) -> (i32, i32) {
        match self {
            Step::Forward => (mover.forward(), 0),
            Step::Left => (0, -1),
            Step::Right => (0, 1),
            Step::Backward => (-mover.forward(), 0),
        }
    }

    pub(crate) fn target(self, from: Position, mover: Side) -> Option<Position> {
        let (dr, dc) = self.delta(mover);
        from.offset(dr, dc)
    }
}

/// Returns whether `mover` may step from `from` to `to`.
///
/// Out-of-bounds coordinates make a move illegal; they are never an error.
pub fn is_legal(
    board: &Board,
    from: Position,
    to: Position,
    mover: Side,
    policy: CapturePolicy,
) -> bool {
    if !from.in_bounds() || !to.in_bounds() {
        return false;
    }
    if board.square(from) != Square::Occupied(mover) {
        return false;
    }
    if from.manhattan(to) != 1 {
        return false;
    }

    match (policy, board.square(to)) {
        (_, Square::Empty) => true,
        (CapturePolicy::Capture, Square::Occupied(side)) => side != mover,
        (CapturePolicy::Blocked, Square::Occupied(_)) => false,
    }
}

/// Moves a piece and returns the position of the piece it captured, if any.
///
/// Caller contract: `mv` has passed `is_legal` for the piece's owner.
pub fn apply_move(board: &mut Board, mv: Move) -> Option<Position> {
    let mover = board.square(mv.from).side();
    debug_assert!(mover.is_some(), "apply_move() from an empty square");
    debug_assert_eq!(
        mv.from.manhattan(mv.to),
        1,
        "apply_move() requires an adjacent step"
    );

    let mover = mover?;
    let captured = match board.square(mv.to) {
        Square::Occupied(side) if side != mover => Some(mv.to),
        _ => None,
    };

    board.put(mv.to, Square::Occupied(mover));
    board.put(mv.from, Square::Empty);
    captured
}

/// Returns whether `mover` has won after landing on `destination_row`.
///
/// A side wins by reaching its goal edge or by leaving the opponent with no
/// pieces.
pub fn check_win(board: &Board, mover: Side, destination_row: u8) -> bool {
    destination_row == mover.goal_row() || board.count(mover.opponent()) == 0
}

/// All legal moves for `mover` in scan order: pieces row-major, then
/// forward, left, right and backward.
pub fn legal_moves(board: &Board, mover: Side, policy: CapturePolicy) -> Vec<Move> {
    moves_in_order(board, mover, policy, &Step::ALL).collect()
}

/// Legal destinations of the piece on `from`, in scan order.
pub fn legal_destinations(board: &Board, from: Position, policy: CapturePolicy) -> Vec<Position> {
    let Some(mover) = board.square(from).side() else {
        return Vec::new();
    };
    Step::ALL
        .iter()
        .filter_map(|step| step.target(from, mover))
        .filter(|&to| is_legal(board, from, to, mover, policy))
        .collect()
}

pub fn has_legal_move(board: &Board, mover: Side, policy: CapturePolicy) -> bool {
    moves_in_order(board, mover, policy, &Step::ALL)
        .next()
        .is_some()
}

/// Returns whether any piece of `side` is orthogonally adjacent to `pos`.
pub fn is_adjacent_to(board: &Board, pos: Position, side: Side) -> bool {
    [(-1, 0), (1, 0), (0, -1), (0, 1)]
        .into_iter()
        .filter_map(|(dr, dc)| pos.offset(dr, dc))
        .any(|at| board.square(at) == Square::Occupied(side))
}

pub(crate) fn moves_in_order<'a>(
    board: &'a Board,
    mover: Side,
    policy: CapturePolicy,
    steps: &'a [Step],
) -> impl Iterator<Item = Move> + 'a {
    board.pieces(mover).into_iter().flat_map(move |from| {
        steps
            .iter()
            .filter_map(move |step| step.target(from, mover))
            .filter(move |&to| is_legal(board, from, to, mover, policy))
            .map(move |to| Move::new(from, to))
    })
}
