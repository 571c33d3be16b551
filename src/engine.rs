//! Move selection
//!
//! [`CaroEngine`] answers one decision request at a time:
//!
//! 1. **Book**: canonicalize, look up the position for the AI to move, and
//!    play the best recommendation if it maps back onto an empty cell.
//! 2. **First move**: with no AI stones on the board, play a random cell near
//!    the center (empty board) or next to the opponent's first stone.
//! 3. **Search**: the best of [`Searcher::top_moves`].
//! 4. **Fallback**: a random empty cell, or no move on a full board.
//!
//! # Example
//!
//! ```
//! use caro::config::EngineConfig;
//! use caro::{Board, CaroEngine, Pos, Stone};
//!
//! let mut engine = CaroEngine::with_config(EngineConfig {
//!     seed: Some(1),
//!     ..EngineConfig::default()
//! });
//! let mut board = Board::new();
//! board.place_stone(Pos::new(7, 7), Stone::White);
//!
//! let reply = engine.get_best_move(&board, Stone::Black, Stone::White).unwrap();
//! assert!(reply.is_some_and(|p| p.distance(Pos::new(7, 7)) == 1));
//! ```

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::board::{canonicalize, inverse_transform_move, Board, BoardError, Pos, Stone};
use crate::book::{BookError, MemoryBook, OpeningBook};
use crate::config::EngineConfig;
use crate::search::{ScoredMove, Searcher, TTStats};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid players: ai {ai:?}, opponent {opponent:?}")]
    InvalidPlayers { ai: Stone, opponent: Stone },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Book(#[from] BookError),
}

/// Which step of the selection produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Book,
    FirstMove,
    Search,
    /// Search found nothing although cells were empty. Not expected.
    RandomFallback,
    /// The board is full
    NoMove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    pub best_move: Option<Pos>,
    /// Book score or search score; 0 for random choices
    pub score: f64,
    pub source: MoveSource,
    pub time_ms: u64,
    /// Search nodes visited for this request
    pub nodes: u64,
}

impl MoveResult {
    #[inline]
    fn book(pos: Pos, score: f64, time_ms: u64) -> Self {
        Self {
            best_move: Some(pos),
            score,
            source: MoveSource::Book,
            time_ms,
            nodes: 0,
        }
    }

    #[inline]
    fn random(pos: Pos, source: MoveSource, time_ms: u64, nodes: u64) -> Self {
        Self {
            best_move: Some(pos),
            score: 0.0,
            source,
            time_ms,
            nodes,
        }
    }

    #[inline]
    fn from_search(best: ScoredMove, time_ms: u64, nodes: u64) -> Self {
        Self {
            best_move: Some(best.pos),
            score: best.score,
            source: MoveSource::Search,
            time_ms,
            nodes,
        }
    }

    #[inline]
    fn no_move(time_ms: u64, nodes: u64) -> Self {
        Self {
            best_move: None,
            score: 0.0,
            source: MoveSource::NoMove,
            time_ms,
            nodes,
        }
    }
}

/// Caro move selector backed by an opening book and alpha-beta search.
pub struct CaroEngine<B: OpeningBook = MemoryBook> {
    config: EngineConfig,
    searcher: Searcher,
    book: B,
    rng: StdRng,
}

impl CaroEngine<MemoryBook> {
    /// Default configuration and an empty in-memory book.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_book(config, MemoryBook::new())
    }
}

impl Default for CaroEngine<MemoryBook> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: OpeningBook> CaroEngine<B> {
    pub fn with_book(config: EngineConfig, book: B) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            searcher: Searcher::new(&config),
            config,
            book,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn book(&self) -> &B {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut B {
        &mut self.book
    }

    pub fn into_book(self) -> B {
        self.book
    }

    /// Best move for `ai`, or `None` when the board is full.
    pub fn get_best_move(
        &mut self,
        board: &Board,
        ai: Stone,
        opponent: Stone,
    ) -> Result<Option<Pos>, EngineError> {
        Ok(self.get_move_with_stats(board, ai, opponent)?.best_move)
    }

    /// Best move for `ai` along with where it came from.
    pub fn get_move_with_stats(
        &mut self,
        board: &Board,
        ai: Stone,
        opponent: Stone,
    ) -> Result<MoveResult, EngineError> {
        check_players(ai, opponent)?;
        let start = Instant::now();
        let elapsed = |start: Instant| start.elapsed().as_millis() as u64;

        // 1. Opening book
        let canonical = canonicalize(board);
        log::debug!(
            "decision for {ai:?}: canonical {} via {:?}",
            &canonical.hash[..8],
            canonical.transform
        );
        if let Some(best) = self.book.lookup(&canonical.hash, ai)?.first() {
            let on_board = |p: Pos| board.contains(i32::from(p.row), i32::from(p.col));
            if !on_board(best.pos()) {
                log::warn!(
                    "{ai:?}: book move {} is off the board for {}; ignoring book",
                    best.pos(),
                    &canonical.hash[..8]
                );
            } else {
                let pos = inverse_transform_move(best.pos(), canonical.transform, board.size());
                if on_board(pos) && board.is_empty(pos) {
                    log::info!("{ai:?}: book move {pos} (score {})", best.score);
                    return Ok(MoveResult::book(pos, best.score, elapsed(start)));
                }
                log::warn!(
                    "{ai:?}: book move {} maps to occupied {pos} on {}; ignoring book",
                    best.pos(),
                    &canonical.hash[..8]
                );
            }
        }

        // 2. First stone of the game for the AI
        if board.count(ai) == 0 {
            if let Some(pos) = self.first_move(board, opponent) {
                log::info!("{ai:?}: first move {pos}");
                return Ok(MoveResult::random(pos, MoveSource::FirstMove, elapsed(start), 0));
            }
            log::debug!("{ai:?}: no cell for the first-move rule, searching");
        }

        // 3. Search
        let nodes_before = self.searcher.nodes();
        let best = self.searcher.top_moves(board, ai, opponent, 1).into_iter().next();
        let nodes = self.searcher.nodes() - nodes_before;
        if let Some(best) = best {
            log::info!("{ai:?}: search move {} (score {}, {nodes} nodes)", best.pos, best.score);
            return Ok(MoveResult::from_search(best, elapsed(start), nodes));
        }

        // 4. Fallbacks
        if let Some(&pos) = board.empty_cells().choose(&mut self.rng) {
            log::warn!(
                "{ai:?}: search returned no move with empty cells left; playing random {pos}"
            );
            return Ok(MoveResult::random(pos, MoveSource::RandomFallback, elapsed(start), nodes));
        }
        log::info!("{ai:?}: board is full, no move");
        Ok(MoveResult::no_move(elapsed(start), nodes))
    }

    /// The `k` best moves for `ai`, best first.
    pub fn top_moves(
        &mut self,
        board: &Board,
        ai: Stone,
        opponent: Stone,
        k: usize,
    ) -> Result<Vec<ScoredMove>, EngineError> {
        check_players(ai, opponent)?;
        Ok(self.searcher.top_moves(board, ai, opponent, k))
    }

    /// Clear the transposition table
    pub fn clear_cache(&mut self) {
        self.searcher.clear_tt();
    }

    #[must_use]
    pub fn tt_stats(&self) -> TTStats {
        self.searcher.tt_stats()
    }

    fn first_move(&mut self, board: &Board, opponent: Stone) -> Option<Pos> {
        let radius = self.config.first_move_radius;
        if board.is_board_empty() {
            return self.random_near(board, board.center(), radius);
        }
        match board.stones_of(opponent).first() {
            Some(&anchor) => self.random_near(board, anchor, 1),
            None => {
                log::warn!("no {opponent:?} stone to answer; using the center");
                self.random_near(board, board.center(), radius)
            }
        }
    }

    /// Uniformly random empty cell within Chebyshev `radius` of `anchor`.
    fn random_near(&mut self, board: &Board, anchor: Pos, radius: u8) -> Option<Pos> {
        let near: Vec<Pos> = board
            .empty_cells()
            .into_iter()
            .filter(|&p| p.distance(anchor) <= radius)
            .collect();
        near.choose(&mut self.rng).copied()
    }
}

fn check_players(ai: Stone, opponent: Stone) -> Result<(), EngineError> {
    if ai == Stone::Empty || opponent != ai.opponent() {
        return Err(EngineError::InvalidPlayers { ai, opponent });
    }
    Ok(())
}
