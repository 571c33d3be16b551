//! Game session: turn order, move history and the result
//!
//! Black moves first. A move is rejected when it is off the board, on an
//! occupied cell, or made after the game has ended.

use thiserror::Error;

use crate::board::{Board, BoardError, Pos, Stone};
use crate::rules::{find_winning_five, wins_at};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win { winner: Stone, line: [Pos; 5] },
    /// Board filled with no winner
    Draw,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("the game is already over")]
    Finished,
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    to_move: Stone,
    history: Vec<(Pos, Stone)>,
    outcome: Option<GameOutcome>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Stone::Black,
            history: Vec::new(),
            outcome: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn to_move(&self) -> Stone {
        self.to_move
    }

    #[must_use]
    pub fn history(&self) -> &[(Pos, Stone)] {
        &self.history
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Most recent move by either side
    #[must_use]
    pub fn last_move(&self) -> Option<Pos> {
        self.history.last().map(|&(pos, _)| pos)
    }

    /// Most recent move made by `stone`
    #[must_use]
    pub fn last_move_of(&self, stone: Stone) -> Option<Pos> {
        self.history
            .iter()
            .rev()
            .find(|&&(_, s)| s == stone)
            .map(|&(pos, _)| pos)
    }

    /// Place a stone for the side to move, then hand the turn over.
    ///
    /// Returns the outcome when this move ends the game.
    pub fn play(&mut self, pos: Pos) -> Result<Option<GameOutcome>, GameError> {
        if self.outcome.is_some() {
            return Err(GameError::Finished);
        }
        let mover = self.to_move;
        let opponent = mover.opponent();
        self.board.play(pos, mover)?;
        self.history.push((pos, mover));
        self.to_move = opponent;

        if wins_at(&self.board, pos, mover, opponent) {
            // No winning five existed before this move
            if let Some(line) = find_winning_five(&self.board, mover, opponent) {
                self.outcome = Some(GameOutcome::Win {
                    winner: mover,
                    line,
                });
            }
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        }
        if let Some(outcome) = self.outcome {
            log::info!("game over after {} moves: {outcome:?}", self.history.len());
        }
        Ok(self.outcome)
    }

    /// Take back the last move. Clears a finished result.
    pub fn undo(&mut self) -> Option<(Pos, Stone)> {
        let (pos, stone) = self.history.pop()?;
        self.board.remove_stone(pos);
        self.to_move = stone;
        self.outcome = None;
        Some((pos, stone))
    }
}
