//! Transposition table for caching search results
//!
//! Results are indexed by Zobrist key so a position reached through a
//! different move order is not searched twice. Entries carry a bound flag:
//! a node that failed low only proves an upper bound on its value, and one
//! that failed high only a lower bound.
//!
//! # Example
//!
//! ```
//! use caro::board::Pos;
//! use caro::search::{Bound, Query, TranspositionTable};
//!
//! let mut tt = TranspositionTable::new(1);
//! let hash = 0x1234_5678_9ABC_DEF0;
//! tt.store(hash, 2, 150.0, Bound::Exact, Some(Pos::new(7, 7)));
//!
//! match tt.query(hash, 2, f64::NEG_INFINITY, f64::INFINITY) {
//!     Query::Cutoff { score, best_move } => {
//!         assert_eq!(score, 150.0);
//!         assert_eq!(best_move, Some(Pos::new(7, 7)));
//!     }
//!     other => panic!("expected a cutoff, got {other:?}"),
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::board::Pos;

/// How a stored score relates to the true value of the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside the window
    Exact,
    /// value >= score (fail-high)
    LowerBound,
    /// value <= score (fail-low)
    UpperBound,
}

/// Whether the table is wiped at every top-level call or kept for the
/// lifetime of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableLifetime {
    #[default]
    PerRequest,
    PerEngine,
}

/// Transposition table entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTEntry {
    /// Full Zobrist key of the position
    pub hash: u64,
    /// Remaining depth the score was searched to
    pub depth: u8,
    pub score: f64,
    pub bound: Bound,
    pub best_move: Option<Pos>,
}

/// Outcome of querying the table at a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query {
    /// The stored result settles the node.
    Cutoff { score: f64, best_move: Option<Pos> },
    /// The stored bound narrowed the window but did not settle the node.
    Narrowed { alpha: f64, beta: f64 },
    /// Nothing usable for this key at this depth.
    Miss,
}

/// Direct-mapped transposition table: each key maps to exactly one slot.
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    size: usize,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes.
    ///
    /// ```
    /// use caro::search::TranspositionTable;
    ///
    /// let tt = TranspositionTable::new(16);
    /// assert!(tt.stats().size > 0);
    /// ```
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let size = ((size_mb * 1024 * 1024) / entry_size).max(1024);

        Self {
            entries: vec![None; size],
            size,
        }
    }

    #[inline]
    fn slot(&self, hash: u64) -> usize {
        (hash as usize) % self.size
    }

    /// Raw entry for `hash`, if the slot holds that exact key.
    #[must_use]
    pub fn lookup(&self, hash: u64) -> Option<TTEntry> {
        self.entries[self.slot(hash)].filter(|e| e.hash == hash)
    }

    /// Apply a stored result to a node searching `depth` plies with window
    /// `[alpha, beta]`.
    ///
    /// Entries searched shallower than `depth` are ignored. An exact score
    /// settles the node. A lower bound at or above `beta` (or an upper bound
    /// at or below `alpha`) also settles it; otherwise the bound tightens
    /// the window.
    #[must_use]
    pub fn query(&self, hash: u64, depth: u8, alpha: f64, beta: f64) -> Query {
        let Some(entry) = self.lookup(hash) else {
            return Query::Miss;
        };
        if entry.depth < depth {
            return Query::Miss;
        }

        let cutoff = Query::Cutoff {
            score: entry.score,
            best_move: entry.best_move,
        };
        match entry.bound {
            Bound::Exact => cutoff,
            Bound::LowerBound if entry.score >= beta => cutoff,
            Bound::LowerBound => Query::Narrowed {
                alpha: alpha.max(entry.score),
                beta,
            },
            Bound::UpperBound if entry.score <= alpha => cutoff,
            Bound::UpperBound => Query::Narrowed {
                alpha,
                beta: beta.min(entry.score),
            },
        }
    }

    /// Store a search result.
    ///
    /// Depth-preferred replacement: the slot is overwritten when empty,
    /// when it holds the same key, or when the new result is at least as deep.
    pub fn store(
        &mut self,
        hash: u64,
        depth: u8,
        score: f64,
        bound: Bound,
        best_move: Option<Pos>,
    ) {
        let idx = self.slot(hash);

        let should_replace = match &self.entries[idx] {
            None => true,
            Some(e) => e.hash == hash || e.depth <= depth,
        };

        if should_replace {
            self.entries[idx] = Some(TTEntry {
                hash,
                depth,
                score,
                bound,
                best_move,
            });
        }
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    #[must_use]
    pub fn stats(&self) -> TTStats {
        let used = self.entries.iter().filter(|e| e.is_some()).count();
        TTStats {
            size: self.size,
            used,
            usage_percent: (used as f64 / self.size as f64 * 100.0) as u8,
        }
    }
}

/// Statistics about transposition table usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTStats {
    /// Total number of slots in the table
    pub size: usize,
    /// Number of slots currently occupied
    pub used: usize,
    /// Percentage of table in use (0-100)
    pub usage_percent: u8,
}
