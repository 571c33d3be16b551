//! Incremental static evaluation for make/unmake search
//!
//! A stone at `pos` can only change windows whose cells, or the one-cell
//! flank read by the five rule, include `pos`: the window starts from
//! `pos - 6*dir` to `pos + dir` in each direction. Re-scoring those before
//! and after a change keeps both running totals equal to
//! [`detailed_score`](super::detailed_score).

use crate::board::{Board, Pos, Stone};
use crate::rules::DIRECTIONS;

use super::heuristic::{detailed_score, window_score};
use super::patterns::PatternWeights;

/// Running totals of `detailed_score` for both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalState {
    player: Stone,
    opponent: Stone,
    own: f64,
    other: f64,
}

impl EvalState {
    /// Full evaluation of `board` from `player`'s point of view.
    pub fn new(board: &Board, player: Stone, opponent: Stone, weights: &PatternWeights) -> Self {
        Self {
            player,
            opponent,
            own: detailed_score(board, player, opponent, weights),
            other: detailed_score(board, opponent, player, weights),
        }
    }

    /// Current value of `score_board(board, player, opponent)`.
    #[inline]
    pub fn score(&self) -> f64 {
        self.own - self.other
    }

    /// Place `stone` on the empty cell `pos` and update the totals.
    pub fn place(&mut self, board: &mut Board, pos: Pos, stone: Stone, weights: &PatternWeights) {
        let before = self.affected(board, pos, weights);
        board.place_stone(pos, stone);
        let after = self.affected(board, pos, weights);
        self.own += after.0 - before.0;
        self.other += after.1 - before.1;
    }

    /// Take the stone at `pos` back off the board.
    pub fn remove(&mut self, board: &mut Board, pos: Pos, weights: &PatternWeights) {
        let before = self.affected(board, pos, weights);
        board.remove_stone(pos);
        let after = self.affected(board, pos, weights);
        self.own += after.0 - before.0;
        self.other += after.1 - before.1;
    }

    /// Sum of both sides' window scores over every window `pos` can influence.
    fn affected(&self, board: &Board, pos: Pos, weights: &PatternWeights) -> (f64, f64) {
        let (row, col) = (pos.row as i32, pos.col as i32);
        let mut own = 0.0;
        let mut other = 0.0;
        for dir in DIRECTIONS {
            for k in -1..=6 {
                let (r, c) = (row - k * dir.0, col - k * dir.1);
                if !board.contains(r, c) {
                    continue;
                }
                own += window_score(board, r, c, dir, self.player, self.opponent, weights);
                other += window_score(board, r, c, dir, self.opponent, self.player, weights);
            }
        }
        (own, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::score_board;
    use proptest::prelude::*;

    #[test]
    fn test_place_and_remove_track_full_evaluation() {
        let weights = PatternWeights::default();
        let mut board = Board::new();
        let mut state = EvalState::new(&board, Stone::Black, Stone::White, &weights);

        let moves = [
            (Pos::new(7, 7), Stone::Black),
            (Pos::new(7, 8), Stone::White),
            (Pos::new(6, 6), Stone::Black),
            (Pos::new(8, 8), Stone::Black),
            (Pos::new(5, 5), Stone::Black),
            (Pos::new(9, 9), Stone::White),
            (Pos::new(4, 4), Stone::Black),
        ];
        for &(pos, stone) in &moves {
            state.place(&mut board, pos, stone, &weights);
            assert_eq!(
                state.score(),
                score_board(&board, Stone::Black, Stone::White, &weights),
                "after placing {pos}"
            );
        }
        for &(pos, _) in moves.iter().rev() {
            state.remove(&mut board, pos, &weights);
            assert_eq!(
                state.score(),
                score_board(&board, Stone::Black, Stone::White, &weights)
            );
        }
        assert_eq!(state.score(), 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_incremental_matches_full(moves in prop::collection::vec((0u8..9, 0u8..9), 1..30)) {
            let weights = PatternWeights::default();
            let mut board = Board::with_size(9);
            let mut state = EvalState::new(&board, Stone::White, Stone::Black, &weights);
            let mut stone = Stone::Black;
            for (row, col) in moves {
                let pos = Pos::new(row, col);
                if !board.is_empty(pos) {
                    continue;
                }
                state.place(&mut board, pos, stone, &weights);
                prop_assert_eq!(
                    state.score(),
                    score_board(&board, Stone::White, Stone::Black, &weights)
                );
                stone = stone.opponent();
            }
        }
    }
}
