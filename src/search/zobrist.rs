//! Zobrist hashing for transposition-table keys
//!
//! Keys are XORs of precomputed random values per (cell, stone), so placing
//! or removing a stone is an O(1) update. A key also folds in the side to
//! move and the perspective the search evaluates from: the same stones with
//! a different side to move, or scored for the other player, are different
//! nodes to the search.
//!
//! # Example
//!
//! ```
//! use caro::board::{Board, Pos, Stone};
//! use caro::search::ZobristTable;
//!
//! let zt = ZobristTable::new(15);
//! let mut board = Board::new();
//! let before = zt.hash(&board, Stone::Black, Stone::Black);
//!
//! let pos = Pos::new(7, 7);
//! board.place_stone(pos, Stone::Black);
//! let after = zt.hash(&board, Stone::White, Stone::Black);
//!
//! assert_eq!(zt.update_place(before, pos, Stone::Black), after);
//! ```

use crate::board::{Board, Pos, Stone};

/// Random keys for one board size.
#[derive(Debug, Clone)]
pub struct ZobristTable {
    size: usize,
    black: Vec<u64>,
    white: Vec<u64>,
    /// XORed when Black is to move
    black_to_move: u64,
    /// XORed when the search scores the position for White
    white_perspective: u64,
}

impl ZobristTable {
    /// Build keys for an `size` x `size` board.
    ///
    /// Values come from a fixed-seed LCG so keys are reproducible across runs.
    #[must_use]
    pub fn new(size: usize) -> Self {
        // Knuth's MMIX multiplier
        let mut seed: u64 = 0x1234_5678_9ABC_DEF0;
        let mut next_rand = || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1);
            seed
        };

        let cells = size * size;
        let mut black = Vec::with_capacity(cells);
        let mut white = Vec::with_capacity(cells);
        for _ in 0..cells {
            black.push(next_rand());
            white.push(next_rand());
        }

        Self {
            size,
            black,
            white,
            black_to_move: next_rand(),
            white_perspective: next_rand(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Full key of `board` with `side_to_move` to play, scored for `perspective`.
    #[must_use]
    pub fn hash(&self, board: &Board, side_to_move: Stone, perspective: Stone) -> u64 {
        debug_assert_eq!(board.size(), self.size);
        let mut h = 0u64;

        for pos in board.stones_of(Stone::Black) {
            h ^= self.black[pos.to_index(self.size)];
        }
        for pos in board.stones_of(Stone::White) {
            h ^= self.white[pos.to_index(self.size)];
        }

        if side_to_move == Stone::Black {
            h ^= self.black_to_move;
        }
        if perspective == Stone::White {
            h ^= self.white_perspective;
        }
        h
    }

    /// Key after `stone` is placed on `pos`. Also passes the turn.
    ///
    /// Applying the same update again takes the stone back.
    #[inline]
    #[must_use]
    pub fn update_place(&self, hash: u64, pos: Pos, stone: Stone) -> u64 {
        hash ^ self.stone_key(pos, stone) ^ self.black_to_move
    }

    #[inline]
    fn stone_key(&self, pos: Pos, stone: Stone) -> u64 {
        let idx = pos.to_index(self.size);
        match stone {
            Stone::Black => self.black[idx],
            Stone::White => self.white[idx],
            Stone::Empty => 0,
        }
    }
}
