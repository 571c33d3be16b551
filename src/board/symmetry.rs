//! Board symmetries and canonical forms
//!
//! The square board has 8 symmetries: 4 clockwise quarter turns, each with or
//! without a horizontal mirror. Opening-book entries are stored under the
//! canonical representative of a position so that all 8 orientations share
//! one entry.
//!
//! A [`Transform`] maps original coordinates to canonical ones by mirroring
//! first (`c -> N-1-c`) and then rotating `rotations` times
//! (`(r, c) -> (c, N-1-r)`). The inverse undoes the rotations before the
//! mirror.
//!
//! # Example
//!
//! ```
//! use caro::board::{canonicalize, Board, Pos, Stone};
//!
//! let mut board = Board::new();
//! board.place_stone(Pos::new(2, 11), Stone::Black);
//!
//! let canonical = canonicalize(&board);
//! let on_canonical = canonical.transform.to_canonical(Pos::new(2, 11), board.size());
//! assert_eq!(canonical.board.get(on_canonical), Stone::Black);
//! assert_eq!(
//!     canonical.transform.from_canonical(on_canonical, board.size()),
//!     Pos::new(2, 11)
//! );
//! ```

use super::{Board, Pos};

/// One of the 8 board symmetries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transform {
    /// Clockwise quarter turns (0..=3)
    pub rotations: u8,
    /// Horizontal mirror applied before rotating
    pub flipped: bool,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        rotations: 0,
        flipped: false,
    };

    /// All symmetries in enumeration order: mirror outer, rotation inner.
    pub fn all() -> [Transform; 8] {
        let mut out = [Transform::IDENTITY; 8];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = Transform {
                rotations: (i % 4) as u8,
                flipped: i >= 4,
            };
        }
        out
    }

    /// Map an original-board coordinate onto the transformed board.
    pub fn to_canonical(self, pos: Pos, size: usize) -> Pos {
        let n = size as u8 - 1;
        let mut p = pos;
        if self.flipped {
            p.col = n - p.col;
        }
        for _ in 0..self.rotations % 4 {
            p = Pos::new(p.col, n - p.row);
        }
        p
    }

    /// Map a transformed-board coordinate back to the original board.
    pub fn from_canonical(self, pos: Pos, size: usize) -> Pos {
        let n = size as u8 - 1;
        let mut p = pos;
        for _ in 0..(4 - self.rotations % 4) % 4 {
            p = Pos::new(p.col, n - p.row);
        }
        if self.flipped {
            p.col = n - p.col;
        }
        p
    }

    /// Apply the symmetry to a whole board.
    pub fn apply(self, board: &Board) -> Board {
        let size = board.size();
        let mut out = Board::with_size(size);
        for row in 0..size as u8 {
            for col in 0..size as u8 {
                let pos = Pos::new(row, col);
                out.place_stone(self.to_canonical(pos, size), board.get(pos));
            }
        }
        out
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

/// Canonical representative of a board's symmetry class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub board: Board,
    /// Transform taking the input board to `board`
    pub transform: Transform,
    /// `board.position_hash()`
    pub hash: String,
}

/// Pick the variant with the lexicographically smallest position hash.
///
/// Ties keep the earliest variant in [`Transform::all`] order, starting from
/// the untransformed board.
pub fn canonicalize(board: &Board) -> Canonical {
    let mut best = Canonical {
        board: board.clone(),
        transform: Transform::IDENTITY,
        hash: board.position_hash(),
    };

    for transform in Transform::all().into_iter().skip(1) {
        let candidate = transform.apply(board);
        let hash = candidate.position_hash();
        if hash < best.hash {
            best = Canonical {
                board: candidate,
                transform,
                hash,
            };
        }
    }

    log::trace!(
        "canonical form {} via {:?}",
        &best.hash[..8],
        best.transform
    );
    best
}

/// Original-board move to canonical coordinates.
#[inline]
pub fn transform_move_to_canonical(pos: Pos, transform: Transform, size: usize) -> Pos {
    transform.to_canonical(pos, size)
}

/// Canonical-board move back to original coordinates.
#[inline]
pub fn inverse_transform_move(pos: Pos, transform: Transform, size: usize) -> Pos {
    transform.from_canonical(pos, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Stone;
    use proptest::prelude::*;

    fn sample_board() -> Board {
        let mut board = Board::new();
        board.place_stone(Pos::new(0, 1), Stone::Black);
        board.place_stone(Pos::new(3, 12), Stone::White);
        board.place_stone(Pos::new(7, 7), Stone::Black);
        board.place_stone(Pos::new(10, 4), Stone::White);
        board
    }

    #[test]
    fn test_enumeration_order() {
        let all = Transform::all();
        assert_eq!(all[0], Transform::IDENTITY);
        assert_eq!(
            all[3],
            Transform {
                rotations: 3,
                flipped: false
            }
        );
        assert_eq!(
            all[4],
            Transform {
                rotations: 0,
                flipped: true
            }
        );
    }

    #[test]
    fn test_single_rotation_is_clockwise() {
        let t = Transform {
            rotations: 1,
            flipped: false,
        };
        // Top-left corner goes to top-right on a clockwise turn
        assert_eq!(t.to_canonical(Pos::new(0, 0), 15), Pos::new(0, 14));
        assert_eq!(t.to_canonical(Pos::new(2, 5), 15), Pos::new(5, 12));
    }

    #[test]
    fn test_flip_then_rotate() {
        let t = Transform {
            rotations: 1,
            flipped: true,
        };
        // (2, 5) -> flip -> (2, 9) -> rotate -> (9, 12)
        assert_eq!(t.to_canonical(Pos::new(2, 5), 15), Pos::new(9, 12));
        assert_eq!(t.from_canonical(Pos::new(9, 12), 15), Pos::new(2, 5));
    }

    #[test]
    fn test_apply_matches_coordinate_map() {
        let board = sample_board();
        for t in Transform::all() {
            let out = t.apply(&board);
            for pos in board.stones_of(Stone::Black) {
                assert_eq!(out.get(t.to_canonical(pos, 15)), Stone::Black, "{t:?}");
            }
            assert_eq!(out.stone_count(), board.stone_count());
        }
    }

    #[test]
    fn test_empty_board_is_its_own_canonical_form() {
        let board = Board::new();
        let canonical = canonicalize(&board);
        assert_eq!(canonical.board, board);
        assert_eq!(canonical.transform, Transform::IDENTITY);
    }

    #[test]
    fn test_canonical_hash_is_minimal() {
        let board = sample_board();
        let canonical = canonicalize(&board);
        for t in Transform::all() {
            assert!(canonical.hash <= t.apply(&board).position_hash());
        }
        assert_eq!(canonical.hash, canonical.board.position_hash());
    }

    #[test]
    fn test_symmetric_positions_share_canonical_board() {
        let board = sample_board();
        let canonical = canonicalize(&board);
        for t in Transform::all() {
            let variant = t.apply(&board);
            let other = canonicalize(&variant);
            assert_eq!(other.board, canonical.board, "{t:?}");
            assert_eq!(other.transform.apply(&variant), other.board);
        }
    }

    fn arb_transform() -> impl Strategy<Value = Transform> {
        (0u8..4, any::<bool>()).prop_map(|(rotations, flipped)| Transform { rotations, flipped })
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        prop::collection::vec((0u8..9, 0u8..9, 1u8..=2), 0..12).prop_map(|stones| {
            let mut board = Board::with_size(9);
            for (row, col, value) in stones {
                if let Some(stone) = Stone::from_u8(value) {
                    board.place_stone(Pos::new(row, col), stone);
                }
            }
            board
        })
    }

    proptest! {
        #[test]
        fn prop_move_round_trip(row in 0u8..15, col in 0u8..15, t in arb_transform()) {
            let pos = Pos::new(row, col);
            let there = transform_move_to_canonical(pos, t, 15);
            prop_assert_eq!(inverse_transform_move(there, t, 15), pos);
        }

        #[test]
        fn prop_canonical_form_is_orientation_independent(
            board in arb_board(),
            t in arb_transform(),
        ) {
            let base = canonicalize(&board);
            let variant = t.apply(&board);
            let other = canonicalize(&variant);
            prop_assert_eq!(&other.board, &base.board);
            prop_assert_eq!(other.transform.apply(&variant), other.board.clone());
            // Every stone maps back to its original cell
            for pos in variant.stones_of(Stone::Black) {
                let back = other.transform.from_canonical(other.transform.to_canonical(pos, 9), 9);
                prop_assert_eq!(back, pos);
            }
        }
    }
}
