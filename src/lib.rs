//! Caro (Gomoku variant) engine
//!
//! Plays 15x15 Caro, where a player wins with exactly five in a row that is
//! not blocked by the opponent on both ends:
//! - Overlines (six or more) do not win
//! - A five flanked by opponent stones on both sides does not win
//! - The board edge does not count as a blocking stone
//!
//! # Architecture
//!
//! - [`board`]: Board representation and the 8-fold symmetry canonicalizer
//! - [`rules`]: Win detection
//! - [`eval`]: Pattern classification, board scoring and move heuristics
//! - [`search`]: Alpha-beta search with Zobrist hashing and a transposition table
//! - [`book`]: Opening book stores and the book generator
//! - [`engine`]: Move selection (book, first move, search)
//! - [`game`]: Game session with turn order, undo and the result
//! - [`config`]: Serde-backed engine configuration
//!
//! # Quick Start
//!
//! ```
//! use caro::{Board, CaroEngine, EngineConfig, Pos, Stone};
//!
//! let mut engine = CaroEngine::with_config(EngineConfig {
//!     seed: Some(7),
//!     ..EngineConfig::default()
//! });
//! let mut board = Board::new();
//!
//! // Black moves first on the empty board
//! if let Some(pos) = engine.get_best_move(&board, Stone::Black, Stone::White).unwrap() {
//!     board.place_stone(pos, Stone::Black);
//!     println!("AI plays at ({}, {})", pos.row, pos.col);
//! }
//! ```

pub mod board;
pub mod book;
pub mod config;
pub mod engine;
pub mod eval;
pub mod game;
pub mod rules;
pub mod search;

pub use board::{canonicalize, Board, BoardError, Pos, Stone, BOARD_SIZE};
pub use book::{JsonFileBook, MemoryBook, OpeningBook};
pub use config::EngineConfig;
pub use engine::{CaroEngine, EngineError, MoveResult, MoveSource};
pub use game::{Game, GameError, GameOutcome};
pub use rules::check_win;
pub use search::{ScoredMove, Searcher};
