//! Board representation for Caro

pub mod board;
pub mod symmetry;

#[cfg(test)]
mod tests;

// Re-exports
pub use board::Board;
pub use symmetry::{
    canonicalize, inverse_transform_move, transform_move_to_canonical, Canonical, Transform,
};

use serde::{Deserialize, Serialize};

/// Standard Caro board size (15x15)
pub const BOARD_SIZE: usize = 15;

/// Largest side length a `Board` accepts (coordinates are stored as `u8`)
pub const MAX_BOARD_SIZE: usize = u8::MAX as usize;

/// Cell contents. Wire values: `Empty = 0`, `Black = 1`, `White = 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Stone {
    Empty,
    /// Player 1
    Black,
    /// Player 2
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        match self {
            Stone::Empty => 0,
            Stone::Black => 1,
            Stone::White => 2,
        }
    }

    #[inline]
    pub fn from_u8(value: u8) -> Option<Stone> {
        match value {
            0 => Some(Stone::Empty),
            1 => Some(Stone::Black),
            2 => Some(Stone::White),
            _ => None,
        }
    }
}

impl From<Stone> for u8 {
    fn from(stone: Stone) -> u8 {
        stone.to_u8()
    }
}

impl TryFrom<u8> for Stone {
    type Error = BoardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Stone::from_u8(value).ok_or(BoardError::InvalidCell(value))
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major index on a board with the given side length
    #[inline]
    pub fn to_index(self, size: usize) -> usize {
        self.row as usize * size + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize, size: usize) -> Self {
        Self {
            row: (idx / size) as u8,
            col: (idx % size) as u8,
        }
    }

    /// Chebyshev (king-move) distance between two cells
    #[inline]
    pub fn distance(self, other: Pos) -> u8 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rejections for externally supplied boards and moves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("move ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
    #[error("invalid cell value {0}; expected 0, 1 or 2")]
    InvalidCell(u8),
    #[error("row {row} has {len} cells; expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },
    #[error("board size {0} is not supported")]
    InvalidSize(usize),
    #[error("cannot place an empty stone")]
    EmptyStone,
}
