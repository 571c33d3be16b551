//! Scripted opening lines
//!
//! Each step lists the moves one side may play, main line first. The
//! generator records every candidate as a book recommendation and continues
//! the line with the first one.

use serde::{Deserialize, Serialize};

use crate::board::{Pos, Stone};

/// Who plays a step, relative to the side the book is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Ai,
    Opponent,
}

impl Role {
    pub fn stone(self, ai: Stone) -> Stone {
        match self {
            Role::Ai => ai,
            Role::Opponent => ai.opponent(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub pos: Pos,
    /// Added to the main-line book score; 0 for the main line
    pub score_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub role: Role,
    pub name: String,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningSequence {
    pub name: String,
    /// Side that plays the first stone of the game
    pub first: Role,
    pub steps: Vec<SequenceStep>,
}

impl OpeningSequence {
    /// Main-line moves in order
    pub fn main_line(&self) -> Vec<Pos> {
        self.steps
            .iter()
            .filter_map(|s| s.candidates.first().map(|c| c.pos))
            .collect()
    }
}

fn step(role: Role, name: &str, candidates: &[(u8, u8, f64)]) -> SequenceStep {
    SequenceStep {
        role,
        name: name.to_owned(),
        candidates: candidates
            .iter()
            .map(|&(row, col, score_delta)| Candidate {
                pos: Pos::new(row, col),
                score_delta,
            })
            .collect(),
    }
}

/// The stock lines: AI opening in the center, the opponent opening in the
/// center, and the opponent opening one row above it at (6, 7).
pub fn builtin_sequences() -> Vec<OpeningSequence> {
    use Role::{Ai, Opponent};

    vec![
        OpeningSequence {
            name: "ai_first_center".into(),
            first: Ai,
            steps: vec![
                step(
                    Ai,
                    "center_or_adjacent",
                    &[
                        (7, 7, 0.0),
                        (7, 6, -10.0),
                        (6, 7, -10.0),
                        (6, 6, -20.0),
                        (8, 8, -20.0),
                        (7, 8, -30.0),
                        (8, 7, -30.0),
                    ],
                ),
                step(
                    Opponent,
                    "approach_center",
                    &[(6, 7, 0.0), (8, 7, -10.0), (7, 8, -10.0), (6, 6, -15.0)],
                ),
                step(Ai, "extend_row", &[(7, 6, 0.0), (8, 6, -10.0), (5, 7, -10.0)]),
                step(Opponent, "cap_diagonal", &[(6, 6, 0.0), (8, 6, -5.0)]),
            ],
        },
        OpeningSequence {
            name: "opponent_first_center".into(),
            first: Opponent,
            steps: vec![
                step(
                    Opponent,
                    "center_or_adjacent",
                    &[(7, 7, 0.0), (7, 6, -10.0), (6, 7, -10.0)],
                ),
                step(
                    Ai,
                    "diagonal_reply",
                    &[
                        (6, 6, 0.0),
                        (7, 6, -10.0),
                        (6, 7, -10.0),
                        (8, 8, -20.0),
                        (5, 5, -20.0),
                    ],
                ),
                step(
                    Opponent,
                    "block_diagonal_line",
                    &[(7, 6, 0.0), (5, 7, -10.0), (8, 7, -10.0)],
                ),
                step(Ai, "counter", &[(6, 7, 0.0), (5, 6, -10.0), (8, 5, -15.0)]),
            ],
        },
        OpeningSequence {
            name: "opponent_first_off_center".into(),
            first: Opponent,
            steps: vec![
                step(
                    Opponent,
                    "above_center",
                    &[(6, 7, 0.0), (6, 8, -5.0), (5, 7, -5.0)],
                ),
                step(
                    Ai,
                    "take_center",
                    &[(7, 7, 0.0), (7, 6, -5.0), (5, 7, -10.0), (6, 6, -15.0)],
                ),
                step(
                    Opponent,
                    "approach_ai_center",
                    &[(7, 6, 0.0), (5, 6, -10.0), (8, 7, -10.0)],
                ),
                step(Ai, "develop_diagonal", &[(8, 8, 0.0), (6, 8, -10.0), (8, 6, -10.0)]),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn test_roles_resolve_against_ai() {
        assert_eq!(Role::Ai.stone(Stone::White), Stone::White);
        assert_eq!(Role::Opponent.stone(Stone::White), Stone::Black);
    }

    #[test]
    fn test_builtin_lines_alternate_and_are_playable() {
        for sequence in builtin_sequences() {
            let mut expected = sequence.first;
            let mut board = Board::new();
            for step in &sequence.steps {
                assert_eq!(step.role, expected, "{} / {}", sequence.name, step.name);
                assert!(!step.candidates.is_empty());
                assert_eq!(step.candidates[0].score_delta, 0.0);
                assert!(step.candidates[1..].iter().all(|c| c.score_delta < 0.0));

                board.play(step.candidates[0].pos, step.role.stone(Stone::Black)).unwrap();
                expected = match expected {
                    Role::Ai => Role::Opponent,
                    Role::Opponent => Role::Ai,
                };
            }
        }
    }

    #[test]
    fn test_main_line() {
        let sequences = builtin_sequences();
        assert_eq!(
            sequences[2].main_line(),
            vec![Pos::new(6, 7), Pos::new(7, 7), Pos::new(7, 6), Pos::new(8, 8)]
        );
    }
}
