//! Board representation: sides, squares and the 5x5 grid.
//!
//! The board holds no rules. It answers geometry questions (bounds, center,
//! neighbours) and stores one `Option<Side>` per cell. Since it is a plain
//! `Copy` array, simulation on a clone never aliases the live board.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::constants::{CENTER, DIRECTIONS, SIZE};

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Both sides, in placement order.
    pub const ALL: [Side; 2] = [Side::A, Side::B];

    /// The opposing side.
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Error returned when parsing a side or a square label fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown side '{0}' (expected A or B)")]
    Side(String),
    #[error("bad square '{0}' (expected A1..E5)")]
    Square(String),
}

impl FromStr for Side {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Side::A),
            "B" => Ok(Side::B),
            _ => Err(ParseError::Side(s.to_string())),
        }
    }
}

/// A cell coordinate, 0-indexed `(row, col)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Checked constructor for coordinates coming from outside the engine.
    pub fn checked(row: usize, col: usize) -> Option<Self> {
        (row < SIZE && col < SIZE).then_some(Self { row, col })
    }

    #[inline]
    pub fn is_center(self) -> bool {
        self == CENTER
    }

    /// The square `steps` cells away in direction `(dr, dc)`, if on the board.
    pub fn offset(self, (dr, dc): (isize, isize), steps: isize) -> Option<Square> {
        let row = self.row as isize + dr * steps;
        let col = self.col as isize + dc * steps;
        if in_bounds(row, col) {
            Some(Square::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// Orthogonal neighbours that lie on the board (2 to 4 of them).
    pub fn neighbors(self) -> impl Iterator<Item = Square> {
        DIRECTIONS.into_iter().filter_map(move |d| self.offset(d, 1))
    }

    /// True iff `other` is exactly one orthogonal step away.
    pub fn is_adjacent(self, other: Square) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

/// Labels follow the board's printed axes: column letter, then 1-based row.
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.col as u8) as char, self.row + 1)
    }
}

impl FromStr for Square {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseError::Square(s.to_string());
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(bad)?.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return Err(bad());
        }
        let row: usize = chars.as_str().parse().map_err(|_| bad())?;
        let col = (letter as u8 - b'A') as usize;
        row.checked_sub(1)
            .and_then(|row| Square::checked(row, col))
            .ok_or_else(bad)
    }
}

/// True iff the signed coordinate lies on the grid.
#[inline]
pub fn in_bounds(row: isize, col: isize) -> bool {
    (0..SIZE as isize).contains(&row) && (0..SIZE as isize).contains(&col)
}

/// A value per side, indexable by [`Side`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PerSide<T> {
    #[serde(rename = "A")]
    pub a: T,
    #[serde(rename = "B")]
    pub b: T,
}

impl<T: Copy> PerSide<T> {
    pub fn splat(value: T) -> Self {
        Self { a: value, b: value }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }
}

/// The 5x5 grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Option<Side>; SIZE]; SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell content. Panics if `sq` is off the board; use [`Square::checked`]
    /// for untrusted input.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Side> {
        self.cells[sq.row][sq.col]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, value: Option<Side>) {
        self.cells[sq.row][sq.col] = value;
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// All squares in row-major order.
    pub fn squares() -> impl Iterator<Item = Square> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Square::new(row, col)))
    }

    /// Squares currently holding a piece of `side`, row-major.
    pub fn squares_of(&self, side: Side) -> impl Iterator<Item = Square> + '_ {
        Self::squares().filter(move |&sq| self.get(sq) == Some(side))
    }

    /// Number of `side` pieces on the board.
    pub fn count(&self, side: Side) -> usize {
        self.squares_of(side).count()
    }

    /// Rows of the grid, top to bottom.
    pub fn rows(&self) -> &[[Option<Side>; SIZE]; SIZE] {
        &self.cells
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..SIZE {
            write!(f, " {}", (b'A' + col as u8) as char)?;
        }
        writeln!(f)?;
        for row in 0..SIZE {
            write!(f, "{:>2}", row + 1)?;
            for col in 0..SIZE {
                let sq = Square::new(row, col);
                let ch = match self.get(sq) {
                    Some(Side::A) => 'A',
                    Some(Side::B) => 'B',
                    None if sq.is_center() => 'x',
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
