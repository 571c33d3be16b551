//! Opening book
//!
//! The book maps a canonical position and the side to move to a ranked list
//! of moves in canonical coordinates. Callers canonicalize the live board,
//! look the position up, and map the chosen move back with
//! [`inverse_transform_move`](crate::board::inverse_transform_move).
//!
//! Two stores are provided: [`MemoryBook`] and [`JsonFileBook`], the same map
//! persisted as one JSON document.

pub mod generator;
pub mod json_store;
pub mod sequences;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardError, Pos, Stone};

pub use generator::{BookGenerator, GenerationConfig, GenerationEvent, GenerationSummary};
pub use json_store::JsonFileBook;
pub use sequences::{builtin_sequences, Candidate, OpeningSequence, Role, SequenceStep};

/// Score given to scripted main-line moves; alternatives add a negative delta.
pub const BOOK_MAIN_SCORE: f64 = 1e12;

/// Positions with fewer moves played than this are in the opening phase.
pub const OPENING_PHASE_MOVES: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error("book I/O on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed book {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("book entry {hash}: {reason}")]
    InvalidPosition { hash: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Opening,
    EarlyMiddle,
}

impl GamePhase {
    pub fn from_move_number(move_number: usize) -> Self {
        if move_number < OPENING_PHASE_MOVES {
            GamePhase::Opening
        } else {
            GamePhase::EarlyMiddle
        }
    }
}

/// A recommended move on the canonical board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookMove {
    pub row: u8,
    pub col: u8,
    pub score: f64,
}

impl BookMove {
    /// Non-finite scores are clamped so the entry survives JSON storage.
    pub fn new(pos: Pos, score: f64) -> Self {
        Self {
            row: pos.row,
            col: pos.col,
            score: finite_score(score),
        }
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        Pos::new(self.row, self.col)
    }
}

/// Clamp infinities to the largest finite values; NaN becomes 0.
pub fn finite_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(f64::MIN, f64::MAX)
    }
}

/// One book entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningPosition {
    /// Position hash of the canonical board
    pub hash: String,
    pub side_to_move: Stone,
    /// Moves played before this position
    pub move_number: usize,
    /// Canonical board as wire-value rows
    pub board: Vec<Vec<u8>>,
    /// Best first
    pub recommendations: Vec<BookMove>,
    pub evaluation_score: f64,
    pub phase: GamePhase,
}

impl OpeningPosition {
    /// Build an entry for `canonical`, ranking `recommendations` best first.
    pub fn new(
        canonical: &Board,
        side_to_move: Stone,
        move_number: usize,
        mut recommendations: Vec<BookMove>,
    ) -> Self {
        rank(&mut recommendations);
        let evaluation_score = recommendations.first().map_or(0.0, |m| m.score);
        Self {
            hash: canonical.position_hash(),
            side_to_move,
            move_number,
            board: canonical.to_rows(),
            recommendations,
            evaluation_score,
            phase: GamePhase::from_move_number(move_number),
        }
    }

    /// The stored canonical board.
    pub fn to_board(&self) -> Result<Board, BookError> {
        Ok(Board::from_rows(&self.board)?)
    }

    /// The stored board, after checking the entry is usable: a real side to
    /// move, a hash matching the board, and every recommendation on an
    /// empty cell.
    pub fn validate(&self) -> Result<Board, BookError> {
        let board = self.to_board()?;
        let invalid = |reason: String| BookError::InvalidPosition {
            hash: self.hash.clone(),
            reason,
        };

        if self.side_to_move == Stone::Empty {
            return Err(invalid("side to move is empty".into()));
        }
        if self.hash != board.position_hash() {
            return Err(invalid("hash does not match the stored board".into()));
        }
        for m in &self.recommendations {
            let pos = m.pos();
            if !board.contains(i32::from(m.row), i32::from(m.col)) {
                return Err(invalid(format!("move {pos} is off the {0}x{0} board", board.size())));
            }
            if !board.is_empty(pos) {
                return Err(invalid(format!("move {pos} is on an occupied cell")));
            }
        }
        Ok(board)
    }

    /// Highest-scored recommendation
    pub fn best_move(&self) -> Option<BookMove> {
        self.recommendations
            .iter()
            .copied()
            .reduce(|best, m| if m.score > best.score { m } else { best })
    }
}

/// Sort best first; ties keep their order.
pub(crate) fn rank(moves: &mut [BookMove]) {
    moves.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Read/write contract the engine and the generator need from a book store.
pub trait OpeningBook {
    /// Entry for a canonical hash with `side` to move.
    fn get(&self, hash: &str, side: Stone) -> Result<Option<OpeningPosition>, BookError>;

    /// Insert, or replace the entry with the same hash and side to move.
    fn upsert(&mut self, position: OpeningPosition) -> Result<(), BookError>;

    /// Number of stored positions
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ranked recommendations, best first; empty when the position is unknown.
    fn lookup(&self, hash: &str, side: Stone) -> Result<Vec<BookMove>, BookError> {
        Ok(self
            .get(hash, side)?
            .map(|p| {
                let mut moves = p.recommendations;
                rank(&mut moves);
                moves
            })
            .unwrap_or_default())
    }
}

/// In-process book.
#[derive(Debug, Clone, Default)]
pub struct MemoryBook {
    positions: HashMap<(String, Stone), OpeningPosition>,
}

impl MemoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries ordered by hash, then side to move.
    pub fn positions(&self) -> Vec<&OpeningPosition> {
        let mut all: Vec<_> = self.positions.values().collect();
        all.sort_by(|a, b| {
            a.hash
                .cmp(&b.hash)
                .then(a.side_to_move.to_u8().cmp(&b.side_to_move.to_u8()))
        });
        all
    }
}

impl FromIterator<OpeningPosition> for MemoryBook {
    fn from_iter<I: IntoIterator<Item = OpeningPosition>>(iter: I) -> Self {
        Self {
            positions: iter
                .into_iter()
                .map(|p| ((p.hash.clone(), p.side_to_move), p))
                .collect(),
        }
    }
}

impl OpeningBook for MemoryBook {
    fn get(&self, hash: &str, side: Stone) -> Result<Option<OpeningPosition>, BookError> {
        Ok(self.positions.get(&(hash.to_owned(), side)).cloned())
    }

    fn upsert(&mut self, position: OpeningPosition) -> Result<(), BookError> {
        self.positions
            .insert((position.hash.clone(), position.side_to_move), position);
        Ok(())
    }

    fn len(&self) -> usize {
        self.positions.len()
    }
}
