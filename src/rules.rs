//! Seega rules: placement validity, movement legality, custodian capture,
//! chain-capture eligibility and win detection.
//!
//! All functions are free functions over a [`Board`] so they can run on the
//! live board or on a scratch copy. Only [`apply_move`] mutates, and it does
//! no validation; callers validate with [`check_placement`] and
//! [`check_move`] first.

use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use crate::board::{Board, Side, Square};
use crate::constants::DIRECTIONS;

/// Game phase. The transition Placement -> Movement happens once per match.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Placement,
    Movement,
}

/// A single orthogonal step of one piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Why a command was rejected. Rejections never change the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("cell ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("pieces cannot be placed on the center cell")]
    CenterForbidden,
    #[error("cell {0} is occupied")]
    CellOccupied(Square),
    #[error("cell {square} does not hold a piece of side {side}")]
    CellNotOwnedBySide { square: Square, side: Side },
    #[error("{0} is not a single orthogonal step into an empty cell")]
    NotAdjacentOrEmpty(Move),
    #[error("chain capture in progress: {0} does not capture")]
    CaptureRequiredButDestinationNonCapturing(Move),
    #[error("chain capture in progress: the piece on {must_move_from} has to move")]
    WrongPieceDuringChain { must_move_from: Square },
    #[error("it is not side {0}'s turn")]
    WrongTurn(Side),
    #[error("the game is already over")]
    GameAlreadyOver,
    #[error("command not allowed during the {0:?} phase")]
    WrongPhase(Phase),
    #[error("an AI turn is still being resolved")]
    Busy,
    #[error("side {0} is controlled by the AI")]
    AiControlled(Side),
    #[error("side {0} still has to act before the turn can end")]
    TurnNotFinished(Side),
}

/// True iff a piece may be placed at `(row, col)`: on the board, off-center, empty.
pub fn is_valid_placement(board: &Board, row: usize, col: usize) -> bool {
    check_placement(board, row, col).is_ok()
}

/// Typed version of [`is_valid_placement`].
pub fn check_placement(board: &Board, row: usize, col: usize) -> Result<Square, RuleError> {
    let sq = Square::checked(row, col).ok_or(RuleError::OutOfBounds { row, col })?;
    if sq.is_center() {
        return Err(RuleError::CenterForbidden);
    }
    if !board.is_empty(sq) {
        return Err(RuleError::CellOccupied(sq));
    }
    Ok(sq)
}

/// Empty orthogonal neighbours of `from`, or nothing if `from` is not `side`'s.
pub fn legal_moves(board: &Board, side: Side, from: Square) -> Vec<Square> {
    if board.get(from) != Some(side) {
        return Vec::new();
    }
    from.neighbors().filter(|&to| board.is_empty(to)).collect()
}

/// Validate a step of `side` from `from` to `to` without applying it.
pub fn check_move(board: &Board, side: Side, from: Square, to: Square) -> Result<(), RuleError> {
    if board.get(from) != Some(side) {
        return Err(RuleError::CellNotOwnedBySide { square: from, side });
    }
    if !from.is_adjacent(to) || !board.is_empty(to) {
        return Err(RuleError::NotAdjacentOrEmpty(Move::new(from, to)));
    }
    Ok(())
}

/// Opponent pieces flanked by a `side` piece standing on `dest`.
///
/// In each direction the adjacent cell must hold the opponent and the cell
/// beyond it must hold `side`. Each direction yields at most one capture.
pub fn capture_targets(board: &Board, side: Side, dest: Square) -> Vec<Square> {
    let opp = side.other();
    DIRECTIONS
        .into_iter()
        .filter_map(|dir| {
            let adjacent = dest.offset(dir, 1)?;
            let beyond = dest.offset(dir, 2)?;
            (board.get(adjacent) == Some(opp) && board.get(beyond) == Some(side))
                .then_some(adjacent)
        })
        .collect()
}

/// Move the piece and remove every capture it makes, all at once.
///
/// Returns the removed squares. The move is assumed legal.
pub fn apply_move(board: &mut Board, side: Side, from: Square, to: Square) -> Vec<Square> {
    board.set(from, None);
    board.set(to, Some(side));
    let captured = capture_targets(board, side, to);
    for &sq in &captured {
        board.set(sq, None);
    }
    captured
}

/// Number of pieces a move would capture, simulated on a scratch board.
pub fn simulate_captures(board: &Board, side: Side, mv: Move) -> usize {
    let mut scratch = *board;
    apply_move(&mut scratch, side, mv.from, mv.to).len()
}

/// Moves of the piece on `from` that capture at least once, with their counts.
pub fn capturing_moves(board: &Board, side: Side, from: Square) -> Vec<(Move, usize)> {
    legal_moves(board, side, from)
        .into_iter()
        .map(|to| Move::new(from, to))
        .filter_map(|mv| {
            let n = simulate_captures(board, side, mv);
            trace!(%mv, captures = n, "chain candidate");
            (n > 0).then_some((mv, n))
        })
        .collect()
}

/// True iff the piece on `sq` must keep capturing.
pub fn has_capture_from(board: &Board, side: Side, sq: Square) -> bool {
    !capturing_moves(board, side, sq).is_empty()
}

/// Every legal move of `side`, in row-major order of origin.
pub fn all_legal_moves(board: &Board, side: Side) -> Vec<Move> {
    board
        .squares_of(side)
        .flat_map(|from| {
            legal_moves(board, side, from)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}

/// True iff some piece of `side` can step somewhere.
pub fn has_any_move(board: &Board, side: Side) -> bool {
    board
        .squares_of(side)
        .any(|from| !legal_moves(board, side, from).is_empty())
}

/// The winner, if any.
///
/// A side without pieces loses. In the movement phase a side that still has
/// pieces but cannot move any of them loses as well (no draws).
pub fn check_winner(board: &Board, phase: Phase) -> Option<Side> {
    for side in Side::ALL {
        if board.count(side) == 0 {
            return Some(side.other());
        }
    }
    if phase == Phase::Movement {
        for side in Side::ALL {
            if !has_any_move(board, side) {
                return Some(side.other());
            }
        }
    }
    None
}
