use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, trace};

use crate::board::{Board, Side, Square};
use crate::game::MoveSelector;
use crate::rules::{CapturePolicy, Step, is_adjacent_to, moves_in_order};
use crate::types::Move;

const PROGRESS_WEIGHT: i32 = 10;
const SAFETY_BONUS: i32 = 50;
/// Exclusive upper bound of the tie-breaking noise. Must stay below the gap
/// between progress steps so noise only reorders near-equal moves.
const NOISE_CEILING: i32 = 5;

/// Which priority tier produced the automated move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tier {
    Capture,
    Scored,
    Fallback,
}

/// Picks a move for `mover` with the fixed-priority heuristic.
///
/// 1. The first capture found in scan order (forward, left, right only).
/// 2. Otherwise the highest-scoring non-capturing forward or sideways move.
/// 3. Otherwise the first legal move in scan order, including retreats.
///
/// Returns `None` only when `mover` has no legal move at all.
pub fn select_automated_move(
    board: &Board,
    mover: Side,
    policy: CapturePolicy,
    noise: Option<&mut dyn RngCore>,
) -> Option<Move> {
    select_with_tier(board, mover, policy, noise).map(|(mv, _)| mv)
}

pub(crate) fn select_with_tier(
    board: &Board,
    mover: Side,
    policy: CapturePolicy,
    mut noise: Option<&mut dyn RngCore>,
) -> Option<(Move, Tier)> {
    let opponent = mover.opponent();

    if policy == CapturePolicy::Capture
        && let Some(mv) = moves_in_order(board, mover, policy, &Step::ADVANCING)
            .find(|mv| board.square(mv.to) == Square::Occupied(opponent))
    {
        debug!(%mv, ?mover, "automated capture");
        return Some((mv, Tier::Capture));
    }

    let mut best: Option<(Move, i32)> = None;
    for mv in moves_in_order(board, mover, policy, &Step::ADVANCING) {
        if !board.square(mv.to).is_empty() {
            continue;
        }
        let mut score = PROGRESS_WEIGHT * mover.progress(mv.to.row) as i32;
        if !is_adjacent_to(board, mv.to, opponent) {
            score += SAFETY_BONUS;
        }
        if let Some(rng) = noise.as_deref_mut() {
            score += rng.random_range(0..NOISE_CEILING);
        }
        trace!(%mv, score, "scored candidate");

        if best.is_none_or(|(_, top)| score > top) {
            best = Some((mv, score));
        }
    }
    if let Some((mv, score)) = best {
        debug!(%mv, score, ?mover, "automated advance");
        return Some((mv, Tier::Scored));
    }

    let fallback = moves_in_order(board, mover, policy, &Step::ALL).next();
    match fallback {
        Some(mv) => {
            debug!(%mv, ?mover, "automated fallback");
            Some((mv, Tier::Fallback))
        }
        None => {
            debug!(?mover, "automated side has no legal move");
            None
        }
    }
}

/// The heuristic opponent. Plays deterministically unless seeded with noise.
#[derive(Debug, Clone, Default)]
pub struct HeuristicSelector {
    noise: Option<StdRng>,
}

impl HeuristicSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds tie-breaking noise drawn from an RNG seeded with `seed`.
    pub fn with_noise(seed: u64) -> Self {
        Self {
            noise: Some(StdRng::seed_from_u64(seed)),
        }
    }
}

impl MoveSelector for HeuristicSelector {
    fn select_move(&mut self, board: &Board, mover: Side, policy: CapturePolicy) -> Option<Move> {
        let noise = self.noise.as_mut().map(|rng| rng as &mut dyn RngCore);
        select_automated_move(board, mover, policy, noise)
    }
}
