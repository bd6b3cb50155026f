//! Greedy move selector.
//!
//! The opponent is deliberately simple: it scores every legal move by the
//! number of pieces it captures right away and plays the best one. Ties are
//! broken by shuffling the candidates before a first-max scan, so any of the
//! best moves is equally likely. Placement is uniformly random.
//!
//! All randomness goes through a [`fastrand::Rng`] owned by the selector; seed
//! it to make choices reproducible.

use fastrand::Rng;
use tracing::trace;

use crate::board::{Board, Side, Square};
use crate::rules::{Move, all_legal_moves, is_valid_placement, legal_moves, simulate_captures};

/// A candidate move together with its immediate capture count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub captures: usize,
}

#[derive(Clone, Debug)]
pub struct GreedySelector {
    rng: Rng,
}

impl Default for GreedySelector {
    fn default() -> Self {
        Self::new()
    }
}

impl GreedySelector {
    /// Selector seeded from system entropy.
    pub fn new() -> Self {
        Self::from_rng(Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Rng::with_seed(seed))
    }

    pub fn from_rng(rng: Rng) -> Self {
        Self { rng }
    }

    /// A uniformly random valid placement cell.
    pub fn choose_placement(&mut self, board: &Board) -> Option<Square> {
        let empties: Vec<Square> = Board::squares()
            .filter(|sq| is_valid_placement(board, sq.row, sq.col))
            .collect();
        if empties.is_empty() {
            return None;
        }
        Some(empties[self.rng.usize(..empties.len())])
    }

    /// Best move over every piece of `side`; `None` if `side` cannot move.
    pub fn choose_move(&mut self, board: &Board, side: Side) -> Option<ScoredMove> {
        let candidates = all_legal_moves(board, side);
        self.pick_best(board, side, candidates)
    }

    /// Best capturing continuation for the piece on `from`.
    ///
    /// Returns `None` when no step from `from` captures, which ends the chain.
    pub fn choose_chain_step(
        &mut self,
        board: &Board,
        side: Side,
        from: Square,
    ) -> Option<ScoredMove> {
        let candidates = legal_moves(board, side, from)
            .into_iter()
            .map(|to| Move::new(from, to))
            .collect();
        self.pick_best(board, side, candidates)
            .filter(|best| best.captures > 0)
    }

    fn pick_best(
        &mut self,
        board: &Board,
        side: Side,
        mut candidates: Vec<Move>,
    ) -> Option<ScoredMove> {
        self.rng.shuffle(&mut candidates);

        let mut best: Option<ScoredMove> = None;
        for mv in candidates {
            let captures = simulate_captures(board, side, mv);
            trace!(%side, %mv, captures, "candidate");
            if best.is_none_or(|b| captures > b.captures) {
                best = Some(ScoredMove { mv, captures });
            }
        }
        best
    }
}
