//! Turn state machine.
//!
//! ```text
//! Placement(A,0) -> Placement(A,1) -> Placement(B,0) -> ... -> Movement(B)
//! Movement(s) --quiet or final capture--> Movement(!s)
//! Movement(s) --capture, more available--> ChainCapture(s, dest)
//! ChainCapture(s, p) --capture, more available--> ChainCapture(s, dest)
//! ChainCapture(s, p) --capture, none left--> Movement(!s)
//! any --winner found--> GameOver(w)
//! ```
//!
//! The machine only knows how states follow each other; deciding whether a
//! capture continues, or whether someone won, is done by the rules module.

use serde::Serialize;

use crate::board::{PerSide, Side, Square};
use crate::constants::{FIRST_MOVER, FIRST_PLACER, PLACEMENTS_PER_TURN};
use crate::rules::Phase;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state")]
pub enum TurnState {
    /// `side` places; `placed_this_turn` is 0 or 1.
    Placement { side: Side, placed_this_turn: u8 },
    Movement { side: Side },
    /// `side` must move the piece on `must_move_from` and it must capture.
    ChainCapture { side: Side, must_move_from: Square },
    GameOver { winner: Side },
}

impl Default for TurnState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl TurnState {
    pub const INITIAL: TurnState = TurnState::Placement {
        side: FIRST_PLACER,
        placed_this_turn: 0,
    };

    /// The side entitled to act, or `None` once the game is over.
    pub fn owner(self) -> Option<Side> {
        match self {
            TurnState::Placement { side, .. }
            | TurnState::Movement { side }
            | TurnState::ChainCapture { side, .. } => Some(side),
            TurnState::GameOver { .. } => None,
        }
    }

    /// A game can only be decided after movement has begun.
    pub fn phase(self) -> Phase {
        match self {
            TurnState::Placement { .. } => Phase::Placement,
            _ => Phase::Movement,
        }
    }

    pub fn must_continue_from(self) -> Option<Square> {
        match self {
            TurnState::ChainCapture { must_move_from, .. } => Some(must_move_from),
            _ => None,
        }
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            TurnState::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_over(self) -> bool {
        matches!(self, TurnState::GameOver { .. })
    }

    /// State after the owner of a placement turn placed one piece.
    ///
    /// `remaining` must already reflect the placement.
    pub fn after_placement(self, remaining: &PerSide<u8>) -> TurnState {
        let TurnState::Placement { side, placed_this_turn } = self else {
            return self;
        };
        if remaining.a == 0 && remaining.b == 0 {
            return TurnState::Movement { side: FIRST_MOVER };
        }
        let placed = placed_this_turn + 1;
        if placed >= PLACEMENTS_PER_TURN || remaining[side] == 0 {
            TurnState::Placement { side: side.other(), placed_this_turn: 0 }
        } else {
            TurnState::Placement { side, placed_this_turn: placed }
        }
    }

    /// State after `side` completed a move. `chain_from` is the destination
    /// if that piece must keep capturing.
    pub fn after_move(side: Side, chain_from: Option<Square>) -> TurnState {
        match chain_from {
            Some(must_move_from) => TurnState::ChainCapture { side, must_move_from },
            None => TurnState::Movement { side: side.other() },
        }
    }
}
