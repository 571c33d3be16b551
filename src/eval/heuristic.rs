//! Heuristic evaluation of Caro positions
//!
//! Two evaluators live here:
//! - [`score_board`]: the static evaluation used at search leaves. It sums the
//!   best pattern of every 6-cell window starting on the board, in all four
//!   directions, for each side and subtracts the opponent's total.
//! - [`evaluate_move`]: a cheap move-ordering heuristic that only looks at the
//!   windows passing through one candidate cell.

use crate::board::{Board, Pos, Stone};
use crate::rules::{is_winning_five, DIRECTIONS};

use super::patterns::{classify_line, Pattern, PatternWeights, Window};

/// Read the six cells from `(row, col)` stepping by `dir`.
#[inline]
pub fn window_at(board: &Board, row: i32, col: i32, dir: (i32, i32)) -> Window {
    let mut w = [None; 6];
    for (k, cell) in w.iter_mut().enumerate() {
        let k = k as i32;
        *cell = board.cell(row + k * dir.0, col + k * dir.1);
    }
    w
}

/// Best pattern of the window at `(row, col)`, with fives kept only when the
/// win rule accepts them.
#[inline]
pub fn window_pattern(
    board: &Board,
    row: i32,
    col: i32,
    dir: (i32, i32),
    player: Stone,
    opponent: Stone,
    weights: &PatternWeights,
) -> Option<Pattern> {
    let w = window_at(board, row, col, dir);
    match classify_line(&w, player, opponent, weights) {
        Some(Pattern::Five) => {
            let p = |i: usize| w[i] == Some(player);
            let head = p(0)
                && p(1)
                && p(2)
                && p(3)
                && p(4)
                && is_winning_five(board, player, opponent, row, col, dir);
            let tail = p(1)
                && p(2)
                && p(3)
                && p(4)
                && p(5)
                && is_winning_five(board, player, opponent, row + dir.0, col + dir.1, dir);
            (head || tail).then_some(Pattern::Five)
        }
        other => other,
    }
}

/// Score contribution of one window.
#[inline]
pub fn window_score(
    board: &Board,
    row: i32,
    col: i32,
    dir: (i32, i32),
    player: Stone,
    opponent: Stone,
    weights: &PatternWeights,
) -> f64 {
    window_pattern(board, row, col, dir, player, opponent, weights)
        .map_or(0.0, |pattern| weights.weight(pattern))
}

/// Sum of window scores for `player` over every on-board window start and
/// all four directions. Overlapping windows are counted independently.
pub fn detailed_score(
    board: &Board,
    player: Stone,
    opponent: Stone,
    weights: &PatternWeights,
) -> f64 {
    let n = board.size() as i32;
    let mut total = 0.0;
    for row in 0..n {
        for col in 0..n {
            for dir in DIRECTIONS {
                total += window_score(board, row, col, dir, player, opponent, weights);
            }
        }
    }
    total
}

/// Static evaluation from `player`'s point of view.
///
/// Positive values favor `player`. Each side is scored independently, so
/// `score_board(b, x, y) == -score_board(b, y, x)` holds exactly.
#[must_use]
pub fn score_board(board: &Board, player: Stone, opponent: Stone, weights: &PatternWeights) -> f64 {
    detailed_score(board, player, opponent, weights)
        - detailed_score(board, opponent, player, weights)
}

/// Best pattern per direction through `pos` once `player` stands there,
/// strongest first. Directions without a pattern are omitted.
fn patterns_through(
    board: &mut Board,
    pos: Pos,
    player: Stone,
    opponent: Stone,
    weights: &PatternWeights,
) -> Vec<(Pattern, f64)> {
    board.place_stone(pos, player);

    let (row, col) = (pos.row as i32, pos.col as i32);
    let mut found = Vec::with_capacity(DIRECTIONS.len());
    for dir in DIRECTIONS {
        let mut best: Option<(Pattern, f64)> = None;
        for i in 0..6 {
            let start = (row - i * dir.0, col - i * dir.1);
            if let Some(pattern) =
                window_pattern(board, start.0, start.1, dir, player, opponent, weights)
            {
                let score = weights.weight(pattern);
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((pattern, score));
                }
            }
        }
        if let Some(entry) = best.filter(|(_, score)| *score > 0.0) {
            found.push(entry);
        }
    }

    board.remove_stone(pos);
    found.sort_by(|a, b| b.1.total_cmp(&a.1));
    found
}

/// Lightweight move-ordering score for `player` taking the empty cell `pos`.
///
/// Combines the shapes `player` creates there (attack) with the shapes
/// `opponent` would create on the same cell (defense, weighted 1.1x).
/// Double threats get flat bonuses. The board is restored before returning.
pub fn evaluate_move(
    board: &mut Board,
    pos: Pos,
    player: Stone,
    opponent: Stone,
    weights: &PatternWeights,
) -> f64 {
    if !board.is_empty(pos) {
        return f64::MIN;
    }

    let attack_patterns = patterns_through(board, pos, player, opponent, weights);
    let defense_patterns = patterns_through(board, pos, opponent, player, weights);

    let nth = |list: &[(Pattern, f64)], i: usize| list.get(i).map_or(0.0, |(_, s)| *s);
    let mut attack = nth(&attack_patterns, 0)
        + nth(&attack_patterns, 1) * 0.9
        + nth(&attack_patterns, 2) * 0.5;
    let mut defense = nth(&defense_patterns, 0) + nth(&defense_patterns, 1) * 0.8;

    if attack >= weights.five {
        return weights.five * 10.0;
    }
    if defense >= weights.five {
        return weights.five * 5.0;
    }

    let has = |list: &[(Pattern, f64)], pattern: Pattern| list.iter().any(|(p, _)| *p == pattern);
    let live_threes =
        |list: &[(Pattern, f64)]| list.iter().filter(|(p, _)| p.is_live_three()).count();

    if has(&attack_patterns, Pattern::LiveFour) {
        attack *= 1.5;
    }
    if has(&defense_patterns, Pattern::LiveFour) {
        defense *= 1.6;
    }

    match live_threes(&defense_patterns) {
        0 => {}
        1 => defense += weights.live_three * 1.5,
        _ => defense += weights.live_three * 2.5,
    }

    let mut score = attack + defense * 1.1;

    if attack < weights.live_two && defense < weights.live_two {
        let mid = (board.size() / 2) as f64;
        let dist = pos.distance(board.center()) as f64;
        score += (mid - dist) * 0.1;
    }

    let live_twos = attack_patterns
        .iter()
        .filter(|(p, _)| *p == Pattern::LiveTwo)
        .count();
    if live_twos >= 2 {
        score += weights.multi_live_two_bonus;
    }

    let attack_threes = live_threes(&attack_patterns);
    if has(&attack_patterns, Pattern::LiveFour) && attack_threes > 0 {
        score += weights.four_three_bonus;
    }
    if attack_threes >= 2 {
        score += weights.double_three_bonus;
    }

    score
}
