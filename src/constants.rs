//! Board geometry and game-rule constants.
//!
//! Everything that fixes the shape of a Seega match lives here: the grid size,
//! the forbidden center cell, how many pieces each side brings and how the
//! placement phase is paced.

use crate::board::{Side, Square};

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const SIZE: usize = 5;

/// Total number of cells.
pub const CELLS: usize = SIZE * SIZE;

/// The center cell. Placement is forbidden here; movement is not.
pub const CENTER: Square = Square::new(SIZE / 2, SIZE / 2);

/// Orthogonal unit offsets as (row, col). Order: North, South, West, East.
pub const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// =============================================================================
// Pieces and Pacing
// =============================================================================

/// Pieces each side places during the placement phase.
pub const PIECES_PER_SIDE: u8 = 12;

/// Upper bound on pieces on the board at any time.
pub const MAX_PIECES: usize = 2 * PIECES_PER_SIDE as usize;

/// Placements a side makes before the turn passes.
pub const PLACEMENTS_PER_TURN: u8 = 2;

/// Side that places first.
pub const FIRST_PLACER: Side = Side::A;

/// Side that moves first once placement is done (it placed last).
pub const FIRST_MOVER: Side = Side::B;
