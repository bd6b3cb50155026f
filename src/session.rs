//! A single Seega match: the board plus everything needed to referee it.
//!
//! [`Session`] is the only mutable game state. Every command validates fully
//! before touching anything, so a rejected command leaves the session
//! exactly as it was.
//!
//! AI turns can be run in one go with [`Session::run_ai_turn`], or step by
//! step with [`Session::begin_ai_turn`] and [`Session::ai_step`] when the
//! caller wants to pause between steps. While an AI turn is open the session
//! is busy and refuses every other command.

use serde::Serialize;
use tracing::{debug, info};

use crate::ai::GreedySelector;
use crate::board::{Board, PerSide, Side, Square};
use crate::constants::{PIECES_PER_SIDE, SIZE};
use crate::rules::{
    Move, Phase, RuleError, apply_move, capturing_moves, check_move, check_placement,
    check_winner, has_capture_from, is_valid_placement, legal_moves, simulate_captures,
};
use crate::turn::TurnState;

/// Session settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Seed for the AI's random choices; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Side played by the AI. Human commands for this side are refused.
    pub ai_side: Option<Side>,
}

/// The most recent movement-phase step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LastMove {
    pub side: Side,
    pub from: Square,
    pub to: Square,
    pub captured: usize,
}

/// Immutable view of a session for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub board: Board,
    pub phase: Phase,
    pub turn: TurnState,
    pub turn_owner: Option<Side>,
    pub remaining: PerSide<u8>,
    /// Pieces of each side removed by the opponent.
    pub captured: PerSide<u32>,
    pub must_continue_from: Option<Square>,
    pub winner: Option<Side>,
    pub last_move: Option<LastMove>,
    pub busy: bool,
}

/// Result of an accepted move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub captured: Vec<Square>,
    /// Set when the same piece has to capture again.
    pub must_continue_from: Option<Square>,
    pub winner: Option<Side>,
}

/// One action taken by the AI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum AiAction {
    Place { side: Side, at: Square },
    Step { side: Side, mv: Move, captured: Vec<Square> },
}

impl std::fmt::Display for AiAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiAction::Place { at, .. } => write!(f, "{at}"),
            AiAction::Step { mv, captured, .. } => write!(f, "{mv}x{}", captured.len()),
        }
    }
}

/// Everything the AI did in one turn, in order, for sequential animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiTurn {
    pub side: Side,
    pub trace: Vec<AiAction>,
}

#[derive(Clone, Debug)]
pub struct Session {
    board: Board,
    turn: TurnState,
    remaining: PerSide<u8>,
    captured: PerSide<u32>,
    last_move: Option<LastMove>,
    config: Config,
    selector: GreedySelector,
    /// Side whose AI turn is being resolved. Doubles as the re-entrancy lock.
    ai_turn: Option<Side>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Hot-seat session with an unseeded AI.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let selector = match config.seed {
            Some(seed) => GreedySelector::with_seed(seed),
            None => GreedySelector::new(),
        };
        Self {
            board: Board::new(),
            turn: TurnState::INITIAL,
            remaining: PerSide::splat(PIECES_PER_SIDE),
            captured: PerSide::splat(0),
            last_move: None,
            config,
            selector,
            ai_turn: None,
        }
    }

    /// Back to the initial placement state. The config is kept; the AI's
    /// random stream is re-seeded from it.
    pub fn reset(&mut self) -> Result<(), RuleError> {
        self.ensure_idle()?;
        *self = Self::with_config(self.config);
        info!("session reset");
        Ok(())
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn is_busy(&self) -> bool {
        self.ai_turn.is_some()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            phase: self.turn.phase(),
            turn: self.turn,
            turn_owner: self.turn.owner(),
            remaining: self.remaining,
            captured: self.captured,
            must_continue_from: self.turn.must_continue_from(),
            winner: self.turn.winner(),
            last_move: self.last_move,
            busy: self.is_busy(),
        }
    }

    // =========================================================================
    // Human commands
    // =========================================================================

    /// Place a piece of `side` at `(row, col)`.
    pub fn place(&mut self, side: Side, row: usize, col: usize) -> Result<Square, RuleError> {
        self.ensure_human(side)?;
        self.apply_placement(side, row, col)
    }

    /// Move the piece of `side` on `from` one step to `to`.
    pub fn play_move(
        &mut self,
        side: Side,
        from: Square,
        to: Square,
    ) -> Result<MoveOutcome, RuleError> {
        self.ensure_human(side)?;
        self.apply_step(side, from, to)
    }

    /// Explicit request to end `side`'s turn.
    ///
    /// Turns end on their own once the required placements or moves are
    /// done, so this is always refused; in particular a pending chain capture
    /// cannot be declined.
    pub fn end_turn(&mut self, side: Side) -> Result<(), RuleError> {
        self.ensure_human(side)?;
        if self.turn.owner() != Some(side) {
            return Err(RuleError::WrongTurn(side));
        }
        Err(RuleError::TurnNotFinished(side))
    }

    /// Destinations the current owner may move the piece on `from` to.
    ///
    /// During a chain capture only capturing steps of the chained piece count.
    pub fn legal_moves_from(&self, from: Square) -> Vec<Square> {
        let Some(side) = self.turn.owner() else {
            return Vec::new();
        };
        if Square::checked(from.row, from.col).is_none() {
            return Vec::new();
        }
        match self.turn {
            TurnState::Movement { .. } => legal_moves(&self.board, side, from),
            TurnState::ChainCapture { .. } => self
                .capturing_moves_from(from)
                .into_iter()
                .map(|(mv, _)| mv.to)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Capturing steps of the current owner's piece on `from`, with the
    /// number of pieces each one removes.
    ///
    /// Empty during placement, once the game is over, and for any piece other
    /// than the chained one during a chain capture.
    pub fn capturing_moves_from(&self, from: Square) -> Vec<(Move, usize)> {
        if Square::checked(from.row, from.col).is_none() {
            return Vec::new();
        }
        match self.turn {
            TurnState::Movement { side } => capturing_moves(&self.board, side, from),
            TurnState::ChainCapture { side, must_move_from } if must_move_from == from => {
                capturing_moves(&self.board, side, from)
            }
            _ => Vec::new(),
        }
    }

    // =========================================================================
    // AI turns
    // =========================================================================

    /// Play the current owner's whole turn with the AI, chain steps included.
    pub fn run_ai_turn(&mut self) -> Result<AiTurn, RuleError> {
        let side = self.begin_ai_turn()?;
        let mut trace = Vec::new();
        while let Some(action) = self.ai_step() {
            trace.push(action);
        }
        debug!(%side, steps = trace.len(), "AI turn done");
        Ok(AiTurn { side, trace })
    }

    /// Lock the session for an AI turn of the current owner.
    pub fn begin_ai_turn(&mut self) -> Result<Side, RuleError> {
        self.ensure_idle()?;
        let side = self.turn.owner().ok_or(RuleError::GameAlreadyOver)?;
        self.ai_turn = Some(side);
        Ok(side)
    }

    /// Perform one AI action. Returns `None`, and unlocks the session, once
    /// the AI's turn is over.
    pub fn ai_step(&mut self) -> Option<AiAction> {
        let side = self.ai_turn?;
        let action = if self.turn.owner() == Some(side) {
            self.next_ai_action(side)
        } else {
            None
        };
        if action.is_none() {
            self.ai_turn = None;
        }
        action
    }

    fn next_ai_action(&mut self, side: Side) -> Option<AiAction> {
        let choice = match self.turn {
            TurnState::Placement { .. } => {
                let at = self.selector.choose_placement(&self.board)?;
                self.apply_placement(side, at.row, at.col).ok()?;
                return Some(AiAction::Place { side, at });
            }
            TurnState::Movement { .. } => self.selector.choose_move(&self.board, side),
            TurnState::ChainCapture { must_move_from, .. } => {
                self.selector
                    .choose_chain_step(&self.board, side, must_move_from)
            }
            TurnState::GameOver { .. } => return None,
        };
        let Some(best) = choice else {
            // A stuck side has lost; make sure the state says so.
            self.settle_winner();
            return None;
        };
        let outcome = self.apply_step(side, best.mv.from, best.mv.to).ok()?;
        Some(AiAction::Step {
            side,
            mv: best.mv,
            captured: outcome.captured,
        })
    }

    // =========================================================================
    // Shared validation and application
    // =========================================================================

    fn ensure_idle(&self) -> Result<(), RuleError> {
        if self.is_busy() {
            return Err(RuleError::Busy);
        }
        Ok(())
    }

    fn ensure_human(&self, side: Side) -> Result<(), RuleError> {
        self.ensure_idle()?;
        if self.turn.is_over() {
            return Err(RuleError::GameAlreadyOver);
        }
        if self.config.ai_side == Some(side) {
            return Err(RuleError::AiControlled(side));
        }
        Ok(())
    }

    fn apply_placement(
        &mut self,
        side: Side,
        row: usize,
        col: usize,
    ) -> Result<Square, RuleError> {
        let owner = match self.turn {
            TurnState::Placement { side, .. } => side,
            TurnState::GameOver { .. } => return Err(RuleError::GameAlreadyOver),
            _ => return Err(RuleError::WrongPhase(Phase::Movement)),
        };
        if owner != side {
            return Err(RuleError::WrongTurn(side));
        }
        let sq = check_placement(&self.board, row, col)?;
        debug_assert!(self.remaining[side] > 0, "placing side has no pieces left");

        self.board.set(sq, Some(side));
        self.remaining[side] -= 1;
        self.turn = self.turn.after_placement(&self.remaining);
        debug!(%side, %sq, remaining = self.remaining[side], "placed");

        if let TurnState::Placement { side: next, .. } = self.turn {
            debug_assert!(
                self.remaining[next] > 0 && has_placement_cell(&self.board),
                "{next} owns a placement turn with nothing to place"
            );
        }

        if self.turn.phase() == Phase::Movement {
            info!("placement complete, movement begins");
            self.settle_winner();
        }
        Ok(sq)
    }

    fn apply_step(
        &mut self,
        side: Side,
        from: Square,
        to: Square,
    ) -> Result<MoveOutcome, RuleError> {
        let (owner, chain) = match self.turn {
            TurnState::Movement { side } => (side, None),
            TurnState::ChainCapture { side, must_move_from } => (side, Some(must_move_from)),
            TurnState::Placement { .. } => return Err(RuleError::WrongPhase(Phase::Placement)),
            TurnState::GameOver { .. } => return Err(RuleError::GameAlreadyOver),
        };
        if owner != side {
            return Err(RuleError::WrongTurn(side));
        }
        for sq in [from, to] {
            if sq.row >= SIZE || sq.col >= SIZE {
                return Err(RuleError::OutOfBounds { row: sq.row, col: sq.col });
            }
        }
        if let Some(must_move_from) = chain {
            if from != must_move_from {
                return Err(RuleError::WrongPieceDuringChain { must_move_from });
            }
        }
        check_move(&self.board, side, from, to)?;
        let mv = Move::new(from, to);
        if chain.is_some() && simulate_captures(&self.board, side, mv) == 0 {
            return Err(RuleError::CaptureRequiredButDestinationNonCapturing(mv));
        }

        let captured = apply_move(&mut self.board, side, from, to);
        self.captured[side.other()] += captured.len() as u32;
        self.last_move = Some(LastMove {
            side,
            from,
            to,
            captured: captured.len(),
        });
        debug!(%side, %mv, captured = captured.len(), "moved");

        let chain_from =
            (!captured.is_empty() && has_capture_from(&self.board, side, to)).then_some(to);
        self.turn = TurnState::after_move(side, chain_from);
        if let Some(sq) = chain_from {
            debug!(%side, %sq, "chain capture pending");
        }
        self.settle_winner();

        Ok(MoveOutcome {
            captured,
            must_continue_from: self.turn.must_continue_from(),
            winner: self.turn.winner(),
        })
    }

    /// Move to `GameOver` if the board is decided.
    fn settle_winner(&mut self) {
        if self.turn.is_over() || self.turn.phase() != Phase::Movement {
            return;
        }
        if let Some(winner) = check_winner(&self.board, Phase::Movement) {
            info!(%winner, "game over");
            self.turn = TurnState::GameOver { winner };
        }
    }

    #[cfg(test)]
    pub(crate) fn set_position_for_test(&mut self, board: Board, turn: TurnState) {
        self.board = board;
        self.turn = turn;
        self.remaining = PerSide::splat(0);
    }
}

/// Whether an empty non-center cell is left to place on.
fn has_placement_cell(board: &Board) -> bool {
    Board::squares().any(|sq| is_valid_placement(board, sq.row, sq.col))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col)
    }

    fn board_with(a: &[(usize, usize)], b: &[(usize, usize)]) -> Board {
        let mut board = Board::new();
        for &(r, c) in a {
            board.set(sq(r, c), Some(Side::A));
        }
        for &(r, c) in b {
            board.set(sq(r, c), Some(Side::B));
        }
        board
    }

    fn movement(board: Board, side: Side) -> Session {
        let mut session = Session::with_config(Config { seed: Some(1), ai_side: None });
        session.set_position_for_test(board, TurnState::Movement { side });
        session
    }

    #[test]
    fn new_session_state() {
        let snap = Session::new().snapshot();
        assert_eq!(snap.phase, Phase::Placement);
        assert_eq!(snap.turn_owner, Some(Side::A));
        assert_eq!(snap.remaining, PerSide { a: 12, b: 12 });
        assert_eq!(snap.captured, PerSide { a: 0, b: 0 });
        assert_eq!(snap.winner, None);
        assert!(!snap.busy);
    }

    #[test]
    fn first_two_placements_pass_the_turn() {
        let mut s = Session::new();
        assert_eq!(s.place(Side::A, 0, 0), Ok(sq(0, 0)));
        assert_eq!(s.place(Side::A, 0, 1), Ok(sq(0, 1)));
        let snap = s.snapshot();
        assert_eq!(snap.remaining.a, 10);
        assert_eq!(snap.turn_owner, Some(Side::B));
    }

    #[test]
    fn placement_errors() {
        let mut s = Session::new();
        assert_eq!(s.place(Side::B, 0, 0), Err(RuleError::WrongTurn(Side::B)));
        assert_eq!(s.place(Side::A, 2, 2), Err(RuleError::CenterForbidden));
        assert_eq!(s.place(Side::A, 7, 0), Err(RuleError::OutOfBounds { row: 7, col: 0 }));
        s.place(Side::A, 0, 0).unwrap();
        assert_eq!(s.place(Side::A, 0, 0), Err(RuleError::CellOccupied(sq(0, 0))));
        assert_eq!(
            s.play_move(Side::A, sq(0, 0), sq(1, 0)),
            Err(RuleError::WrongPhase(Phase::Placement))
        );
    }

    #[test]
    fn capture_updates_tally_and_passes_turn() {
        let mut s = movement(board_with(&[(0, 2), (3, 2), (4, 4)], &[(2, 2), (4, 0)]), Side::A);
        let out = s.play_move(Side::A, sq(0, 2), sq(1, 2)).unwrap();
        assert_eq!(out.captured, vec![sq(2, 2)]);
        assert_eq!(out.must_continue_from, None);
        let snap = s.snapshot();
        assert_eq!(snap.captured.b, 1);
        assert_eq!(snap.captured.a, 0);
        assert_eq!(snap.turn_owner, Some(Side::B));
        assert_eq!(
            snap.last_move,
            Some(LastMove { side: Side::A, from: sq(0, 2), to: sq(1, 2), captured: 1 })
        );
    }

    #[test]
    fn chain_capture_is_mandatory() {
        // A (3,0)->(2,0) takes (2,1) against (2,2); from (2,0) a step to (1,0)
        // then takes (1,1) against (1,2).
        let board = board_with(&[(3, 0), (2, 2), (1, 2), (4, 4)], &[(2, 1), (1, 1), (4, 2)]);
        let mut s = movement(board, Side::A);

        let out = s.play_move(Side::A, sq(3, 0), sq(2, 0)).unwrap();
        assert_eq!(out.captured, vec![sq(2, 1)]);
        assert_eq!(out.must_continue_from, Some(sq(2, 0)));
        assert_eq!(
            s.turn(),
            TurnState::ChainCapture { side: Side::A, must_move_from: sq(2, 0) }
        );

        let before = s.snapshot();
        assert_eq!(
            s.play_move(Side::A, sq(4, 4), sq(3, 4)),
            Err(RuleError::WrongPieceDuringChain { must_move_from: sq(2, 0) })
        );
        assert_eq!(
            s.play_move(Side::A, sq(2, 0), sq(3, 0)),
            Err(RuleError::CaptureRequiredButDestinationNonCapturing(Move::new(
                sq(2, 0),
                sq(3, 0)
            )))
        );
        assert_eq!(s.end_turn(Side::A), Err(RuleError::TurnNotFinished(Side::A)));
        assert_eq!(
            s.play_move(Side::B, sq(4, 2), sq(4, 1)),
            Err(RuleError::WrongTurn(Side::B))
        );
        assert_eq!(s.snapshot(), before);

        assert_eq!(s.legal_moves_from(sq(2, 0)), vec![sq(1, 0)]);
        let out = s.play_move(Side::A, sq(2, 0), sq(1, 0)).unwrap();
        assert_eq!(out.captured, vec![sq(1, 1)]);
        assert_eq!(out.must_continue_from, None);
        assert_eq!(s.turn(), TurnState::Movement { side: Side::B });
        assert_eq!(s.snapshot().captured.b, 2);
    }

    /// A on the left edge can capture three times in a row, walking north:
    /// (4,0)->(3,0) takes (3,1), ->(2,0) takes (2,1), ->(1,0) takes (1,1).
    fn three_step_chain() -> Board {
        board_with(
            &[(4, 0), (3, 2), (2, 2), (1, 2), (4, 4)],
            &[(3, 1), (2, 1), (1, 1), (0, 4)],
        )
    }

    #[test]
    fn chain_capture_follows_the_moving_piece() {
        let mut s = movement(three_step_chain(), Side::A);

        let out = s.play_move(Side::A, sq(4, 0), sq(3, 0)).unwrap();
        assert_eq!(out.captured, vec![sq(3, 1)]);
        assert_eq!(
            s.turn(),
            TurnState::ChainCapture { side: Side::A, must_move_from: sq(3, 0) }
        );

        let out = s.play_move(Side::A, sq(3, 0), sq(2, 0)).unwrap();
        assert_eq!(out.captured, vec![sq(2, 1)]);
        assert_eq!(out.must_continue_from, Some(sq(2, 0)));
        assert_eq!(
            s.turn(),
            TurnState::ChainCapture { side: Side::A, must_move_from: sq(2, 0) }
        );
        assert_eq!(
            s.play_move(Side::A, sq(3, 0), sq(3, 1)),
            Err(RuleError::WrongPieceDuringChain { must_move_from: sq(2, 0) })
        );

        let out = s.play_move(Side::A, sq(2, 0), sq(1, 0)).unwrap();
        assert_eq!(out.captured, vec![sq(1, 1)]);
        assert_eq!(out.must_continue_from, None);
        assert_eq!(out.winner, None);
        assert_eq!(s.turn(), TurnState::Movement { side: Side::B });
        assert_eq!(s.snapshot().captured.b, 3);
    }

    #[test]
    fn ai_chain_keeps_the_lock_between_steps() {
        let mut s = movement(three_step_chain(), Side::A);
        assert_eq!(s.begin_ai_turn(), Ok(Side::A));

        let expected = [
            (Move::new(sq(4, 0), sq(3, 0)), Some(sq(3, 0))),
            (Move::new(sq(3, 0), sq(2, 0)), Some(sq(2, 0))),
            (Move::new(sq(2, 0), sq(1, 0)), None),
        ];
        for (want, chained) in expected {
            match s.ai_step() {
                Some(AiAction::Step { side: Side::A, mv, captured }) => {
                    assert_eq!(mv, want);
                    assert_eq!(captured.len(), 1);
                }
                other => panic!("expected a step, got {other:?}"),
            }
            assert!(s.is_busy());
            assert_eq!(s.snapshot().must_continue_from, chained);
            assert_eq!(s.play_move(Side::A, sq(4, 4), sq(3, 4)), Err(RuleError::Busy));
        }

        assert_eq!(s.ai_step(), None);
        assert!(!s.is_busy());
        assert_eq!(s.turn(), TurnState::Movement { side: Side::B });
    }

    #[test]
    fn capturing_moves_from_tracks_the_turn() {
        let mut s = Session::new();
        assert!(s.capturing_moves_from(sq(0, 0)).is_empty());

        let mut s2 = movement(three_step_chain(), Side::A);
        assert_eq!(
            s2.capturing_moves_from(sq(4, 0)),
            vec![(Move::new(sq(4, 0), sq(3, 0)), 1)]
        );
        assert!(s2.capturing_moves_from(sq(4, 4)).is_empty());
        // B's pieces are not the owner's.
        assert!(s2.capturing_moves_from(sq(3, 1)).is_empty());

        s2.play_move(Side::A, sq(4, 0), sq(3, 0)).unwrap();
        assert_eq!(
            s2.capturing_moves_from(sq(3, 0)),
            vec![(Move::new(sq(3, 0), sq(2, 0)), 1)]
        );
        assert!(s2.capturing_moves_from(sq(3, 2)).is_empty());
        assert_eq!(s2.legal_moves_from(sq(3, 0)), vec![sq(2, 0)]);

        s = movement(board_with(&[(0, 2), (3, 2)], &[(2, 2)]), Side::A);
        s.play_move(Side::A, sq(0, 2), sq(1, 2)).unwrap();
        assert!(s.snapshot().winner.is_some());
        assert!(s.capturing_moves_from(sq(1, 2)).is_empty());
    }

    #[test]
    fn placement_turns_always_have_a_cell_to_fill() {
        let mut s = Session::new();
        while let TurnState::Placement { side, .. } = s.turn() {
            let at = Board::squares()
                .find(|&at| is_valid_placement(s.board(), at.row, at.col))
                .expect("placement owner has a free cell");
            s.place(side, at.row, at.col).unwrap();
        }
        let empties: Vec<Square> = Board::squares().filter(|&at| s.board().is_empty(at)).collect();
        assert_eq!(empties, vec![crate::constants::CENTER]);
        assert_eq!(s.snapshot().remaining, PerSide { a: 0, b: 0 });
    }

    #[test]
    fn last_capture_wins_the_game() {
        let mut s = movement(board_with(&[(0, 2), (3, 2)], &[(2, 2)]), Side::A);
        let out = s.play_move(Side::A, sq(0, 2), sq(1, 2)).unwrap();
        assert_eq!(out.winner, Some(Side::A));
        assert_eq!(
            s.play_move(Side::A, sq(1, 2), sq(0, 2)),
            Err(RuleError::GameAlreadyOver)
        );
        assert_eq!(s.run_ai_turn(), Err(RuleError::GameAlreadyOver));
    }

    #[test]
    fn blocking_the_opponent_wins() {
        // B in the corner; A closes the last exit.
        let mut s = movement(board_with(&[(0, 1), (2, 0), (4, 4)], &[(0, 0)]), Side::A);
        let out = s.play_move(Side::A, sq(2, 0), sq(1, 0)).unwrap();
        assert!(out.captured.is_empty());
        assert_eq!(out.winner, Some(Side::A));
    }

    #[test]
    fn ai_controlled_side_rejects_human_commands() {
        let mut s = Session::with_config(Config { seed: Some(3), ai_side: Some(Side::A) });
        assert_eq!(s.place(Side::A, 0, 0), Err(RuleError::AiControlled(Side::A)));
        let turn = s.run_ai_turn().unwrap();
        assert_eq!(turn.side, Side::A);
        assert_eq!(turn.trace.len(), 2);
        assert_eq!(s.snapshot().turn_owner, Some(Side::B));
    }

    #[test]
    fn busy_while_ai_turn_is_open() {
        let mut s = Session::with_config(Config { seed: Some(9), ai_side: Some(Side::B) });
        s.place(Side::A, 0, 0).unwrap();
        s.place(Side::A, 0, 1).unwrap();

        assert_eq!(s.begin_ai_turn(), Ok(Side::B));
        assert!(s.is_busy());
        let before = s.snapshot();
        assert_eq!(s.place(Side::A, 1, 1), Err(RuleError::Busy));
        assert_eq!(s.begin_ai_turn(), Err(RuleError::Busy));
        assert_eq!(s.reset(), Err(RuleError::Busy));
        assert_eq!(s.snapshot(), before);

        assert!(matches!(s.ai_step(), Some(AiAction::Place { side: Side::B, .. })));
        assert!(matches!(s.ai_step(), Some(AiAction::Place { side: Side::B, .. })));
        assert_eq!(s.ai_step(), None);
        assert!(!s.is_busy());
        assert_eq!(s.snapshot().turn_owner, Some(Side::A));
    }

    #[test]
    fn ai_follows_its_chain() {
        let board = board_with(&[(2, 1), (1, 1), (4, 2)], &[(3, 0), (2, 2), (1, 2), (4, 4)]);
        let mut s = movement(board, Side::B);
        let turn = s.run_ai_turn().unwrap();
        let steps: Vec<_> = turn
            .trace
            .iter()
            .map(|a| match a {
                AiAction::Step { mv, captured, .. } => (*mv, captured.len()),
                AiAction::Place { .. } => panic!("placement in movement phase"),
            })
            .collect();
        assert_eq!(
            steps,
            vec![
                (Move::new(sq(3, 0), sq(2, 0)), 1),
                (Move::new(sq(2, 0), sq(1, 0)), 1),
            ]
        );
        assert_eq!(s.turn(), TurnState::Movement { side: Side::A });
        assert!(!s.is_busy());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut s = Session::with_config(Config { seed: Some(5), ai_side: Some(Side::B) });
        s.place(Side::A, 0, 0).unwrap();
        s.reset().unwrap();
        assert_eq!(s.snapshot(), Session::with_config(s.config()).snapshot());
        assert_eq!(s.config().ai_side, Some(Side::B));
    }
}
