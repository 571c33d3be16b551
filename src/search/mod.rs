//! Search module for the Caro engine
//!
//! Contains:
//! - Zobrist hashing for position identification
//! - Transposition table for caching search results
//! - Fixed-depth alpha-beta search and root move ranking

pub mod alphabeta;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{order_moves, DepthPolicy, ScoredMove, SearchResult, SearchStats, Searcher, INF};
pub use tt::{Bound, Query, TTEntry, TTStats, TableLifetime, TranspositionTable};
pub use zobrist::ZobristTable;
