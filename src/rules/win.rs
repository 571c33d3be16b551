//! Win condition checking for Caro
//!
//! A win is a run of exactly five stones. The run does not count if:
//! 1. A sixth own stone touches either end (overline)
//! 2. Opponent stones sit on both ends (doubly-blocked five)
//!
//! The board edge is never an opponent stone, so a five against the edge
//! blocked by the opponent on the far side still wins.

use crate::board::{Board, Pos, Stone};

/// Direction vectors for line checking (4 directions)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Whether the five cells from `(row, col)` stepping by `dir` form a valid win
/// for `player`.
#[inline]
pub fn is_winning_five(
    board: &Board,
    player: Stone,
    opponent: Stone,
    row: i32,
    col: i32,
    dir: (i32, i32),
) -> bool {
    let (dr, dc) = dir;
    for i in 0..5 {
        if board.cell(row + i * dr, col + i * dc) != Some(player) {
            return false;
        }
    }

    let before = board.cell(row - dr, col - dc);
    let after = board.cell(row + 5 * dr, col + 5 * dc);

    if before == Some(player) || after == Some(player) {
        return false;
    }
    !(before == Some(opponent) && after == Some(opponent))
}

/// Find the first valid winning five for `player`, scanning rows, columns,
/// then both diagonal families.
pub fn find_winning_five(board: &Board, player: Stone, opponent: Stone) -> Option<[Pos; 5]> {
    let n = board.size() as i32;
    if n < 5 {
        return None;
    }

    let starts = |dir: (i32, i32)| -> Vec<(i32, i32)> {
        let (rows, cols) = match dir {
            (0, 1) => (0..n, 0..n - 4),
            (1, 0) => (0..n - 4, 0..n),
            (1, 1) => (0..n - 4, 0..n - 4),
            _ => (0..n - 4, 4..n),
        };
        rows.flat_map(|r| cols.clone().map(move |c| (r, c)))
            .collect()
    };

    for dir in DIRECTIONS {
        for (row, col) in starts(dir) {
            if is_winning_five(board, player, opponent, row, col, dir) {
                let mut line = [Pos::new(0, 0); 5];
                for (i, slot) in line.iter_mut().enumerate() {
                    let i = i as i32;
                    *slot = Pos::new((row + i * dir.0) as u8, (col + i * dir.1) as u8);
                }
                return Some(line);
            }
        }
    }
    None
}

/// Whether `player` has a valid winning five anywhere on the board
#[inline]
pub fn check_win(board: &Board, player: Stone, opponent: Stone) -> bool {
    find_winning_five(board, player, opponent).is_some()
}

/// Whether a valid winning five for `player` passes through `pos`.
///
/// Only the runs containing `pos` are examined, so this is the cheap test
/// after simulating a single move.
#[inline]
pub fn wins_at(board: &Board, pos: Pos, player: Stone, opponent: Stone) -> bool {
    let (row, col) = (pos.row as i32, pos.col as i32);
    DIRECTIONS.iter().any(|&(dr, dc)| {
        (0..5).any(|k| {
            is_winning_five(board, player, opponent, row - k * dr, col - k * dc, (dr, dc))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_board(cells: &[(u8, Stone)]) -> Board {
        let mut board = Board::new();
        for &(col, stone) in cells {
            board.place_stone(Pos::new(7, col), stone);
        }
        board
    }

    #[test]
    fn test_five_in_row_horizontal() {
        let mut board = Board::new();
        for i in 0..5 {
            board.place_stone(Pos::new(9, i + 3), Stone::Black);
        }
        assert!(check_win(&board, Stone::Black, Stone::White));
        assert!(!check_win(&board, Stone::White, Stone::Black));
        assert!(is_winning_five(&board, Stone::Black, Stone::White, 9, 3, (0, 1)));
    }

    #[test]
    fn test_five_in_row_vertical() {
        let mut board = Board::new();
        for i in 0..5 {
            board.place_stone(Pos::new(i + 2, 9), Stone::Black);
        }
        assert!(check_win(&board, Stone::Black, Stone::White));
    }

    #[test]
    fn test_five_in_row_diagonal() {
        let mut board = Board::new();
        for i in 0..5 {
            board.place_stone(Pos::new(i + 1, i + 1), Stone::White);
        }
        assert!(check_win(&board, Stone::White, Stone::Black));
    }

    #[test]
    fn test_diagonal_sw_five() {
        let mut board = Board::new();
        // Diagonal from (4, 8) to (8, 4)
        for i in 0..5 {
            board.place_stone(Pos::new(4 + i, 8 - i), Stone::White);
        }
        let line = find_winning_five(&board, Stone::White, Stone::Black).unwrap();
        assert_eq!(line[0], Pos::new(4, 8));
        assert_eq!(line[4], Pos::new(8, 4));
    }

    #[test]
    fn test_five_flanked_by_two_opponents_not_win() {
        let board = row_board(&[
            (2, Stone::White),
            (3, Stone::Black),
            (4, Stone::Black),
            (5, Stone::Black),
            (6, Stone::Black),
            (7, Stone::Black),
            (8, Stone::White),
        ]);
        assert!(!check_win(&board, Stone::Black, Stone::White));
        assert!(!is_winning_five(&board, Stone::Black, Stone::White, 7, 3, (0, 1)));
    }

    #[test]
    fn test_five_flanked_by_one_opponent_wins() {
        let board = row_board(&[
            (2, Stone::White),
            (3, Stone::Black),
            (4, Stone::Black),
            (5, Stone::Black),
            (6, Stone::Black),
            (7, Stone::Black),
        ]);
        assert!(check_win(&board, Stone::Black, Stone::White));
    }

    #[test]
    fn test_six_in_row_not_win() {
        let mut board = Board::new();
        for i in 0..6 {
            board.place_stone(Pos::new(9, i + 2), Stone::Black);
        }
        assert!(!check_win(&board, Stone::Black, Stone::White));
    }

    #[test]
    fn test_four_in_row_not_win() {
        let mut board = Board::new();
        for i in 0..4 {
            board.place_stone(Pos::new(9, i), Stone::Black);
        }
        assert!(!check_win(&board, Stone::Black, Stone::White));
    }

    #[test]
    fn test_five_at_board_edge_blocked_far_side() {
        // Edge on the left, opponent on the right: still a win
        let board = row_board(&[
            (0, Stone::Black),
            (1, Stone::Black),
            (2, Stone::Black),
            (3, Stone::Black),
            (4, Stone::Black),
            (5, Stone::White),
        ]);
        assert!(check_win(&board, Stone::Black, Stone::White));
    }

    #[test]
    fn test_five_at_corner() {
        let mut board = Board::new();
        for i in 0..5 {
            board.place_stone(Pos::new(10 + i, 10 + i), Stone::White);
        }
        assert!(check_win(&board, Stone::White, Stone::Black));
    }

    #[test]
    fn test_wins_at_checks_runs_through_cell() {
        let board = row_board(&[
            (3, Stone::Black),
            (4, Stone::Black),
            (5, Stone::Black),
            (6, Stone::Black),
            (7, Stone::Black),
        ]);
        for col in 3..8 {
            assert!(wins_at(&board, Pos::new(7, col), Stone::Black, Stone::White));
        }
        assert!(!wins_at(&board, Pos::new(7, 8), Stone::Black, Stone::White));
        assert!(!wins_at(&board, Pos::new(3, 3), Stone::Black, Stone::White));
    }

    #[test]
    fn test_small_board_has_no_five() {
        let mut board = Board::with_size(4);
        for i in 0..4 {
            board.place_stone(Pos::new(0, i), Stone::Black);
        }
        assert!(!check_win(&board, Stone::Black, Stone::White));
    }

    #[test]
    fn test_empty_not_five() {
        let board = Board::new();
        assert!(!check_win(&board, Stone::Black, Stone::White));
        assert!(!check_win(&board, Stone::White, Stone::Black));
    }
}
