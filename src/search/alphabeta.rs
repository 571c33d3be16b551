//! Fixed-depth minimax with alpha-beta pruning and a transposition table
//!
//! The search works on one mutable board with apply/undo. Static scores at
//! the leaves come from an [`EvalState`] updated incrementally alongside the
//! board, so a leaf costs a few dozen window lookups instead of a full
//! rescan.
//!
//! Every empty cell is a candidate. At each node candidates are ordered by
//! [`order_moves`]: a move that completes a valid five for the mover comes
//! first, the rest follow the lightweight move heuristic, best first for the
//! side to move.
//!
//! # Example
//!
//! ```
//! use caro::board::{Board, Pos, Stone};
//! use caro::config::EngineConfig;
//! use caro::search::Searcher;
//!
//! let mut searcher = Searcher::new(&EngineConfig::default());
//! let mut board = Board::new();
//! for col in 3..7 {
//!     board.place_stone(Pos::new(7, col), Stone::Black);
//! }
//!
//! let top = searcher.top_moves(&board, Stone::Black, Stone::White, 1);
//! assert!(top[0].pos == Pos::new(7, 2) || top[0].pos == Pos::new(7, 7));
//! ```

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone};
use crate::config::EngineConfig;
use crate::eval::{evaluate_move, EvalState, PatternWeights};
use crate::rules::{check_win, wins_at};

use super::{Bound, Query, TTStats, TableLifetime, TranspositionTable, ZobristTable};

/// Bound for alpha-beta windows and the score of a move that wins outright
pub const INF: f64 = f64::INFINITY;

/// Search depth as a function of how full the board is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthPolicy {
    /// Plies searched while the board is open
    pub base_depth: u8,
    /// Plies searched once fewer than `endgame_threshold` cells are empty
    pub endgame_depth: u8,
    pub endgame_threshold: usize,
}

impl Default for DepthPolicy {
    fn default() -> Self {
        Self {
            base_depth: 2,
            endgame_depth: 3,
            endgame_threshold: 60,
        }
    }
}

impl DepthPolicy {
    /// Depth for a top-level call on `board`; never below 1.
    pub fn depth_for(&self, board: &Board) -> u8 {
        let empty = board.count(Stone::Empty);
        let depth = if empty < self.endgame_threshold {
            self.endgame_depth
        } else {
            self.base_depth
        };
        depth.max(1)
    }
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Total alpha-beta cutoffs
    pub cutoffs: u64,
    /// Cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    pub tt_queries: u64,
    /// Queries that settled the node outright
    pub tt_hits: u64,
}

impl SearchStats {
    /// Counts accumulated after `earlier` was taken
    pub fn since(&self, earlier: &SearchStats) -> SearchStats {
        SearchStats {
            cutoffs: self.cutoffs - earlier.cutoffs,
            first_move_cutoffs: self.first_move_cutoffs - earlier.first_move_cutoffs,
            tt_queries: self.tt_queries - earlier.tt_queries,
            tt_hits: self.tt_hits - earlier.tt_hits,
        }
    }

    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.cutoffs as f64 * 100.0
        }
    }

    /// TT hit rate in percent
    pub fn tt_hit_rate(&self) -> f64 {
        if self.tt_queries == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.tt_queries as f64 * 100.0
        }
    }
}

/// Result of one `search` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Minimax value from the AI's point of view
    pub score: f64,
    /// `None` at depth 0 or when the board is full
    pub best_move: Option<Pos>,
    /// Nodes visited by this call
    pub nodes: u64,
    pub stats: SearchStats,
}

/// A root candidate and its score for the AI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredMove {
    pub pos: Pos,
    pub score: f64,
}

/// Order the empty cells for `mover`.
///
/// Returned best first for the side to move: descending heuristic for the
/// maximizing side, ascending for the minimizing side. A move that wins on
/// the spot scores `+INF` for the maximizer and `-INF` for the minimizer.
/// The sort is stable, so ties keep row-major order.
pub fn order_moves(
    board: &mut Board,
    mover: Stone,
    other: Stone,
    maximizing: bool,
    weights: &PatternWeights,
) -> Vec<Pos> {
    let sign = if maximizing { 1.0 } else { -1.0 };
    let mut scored: Vec<(Pos, f64)> = board
        .empty_cells()
        .into_iter()
        .map(|pos| {
            board.place_stone(pos, mover);
            let wins = wins_at(board, pos, mover, other);
            board.remove_stone(pos);
            let score = if wins {
                INF
            } else {
                evaluate_move(board, pos, mover, other, weights)
            };
            (pos, sign * score)
        })
        .collect();

    if maximizing {
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    } else {
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    }
    scored.into_iter().map(|(pos, _)| pos).collect()
}

/// Board plus the incremental score that travels with it down the tree.
struct Node {
    board: Board,
    eval: EvalState,
    ai: Stone,
    opponent: Stone,
}

/// Alpha-beta searcher.
///
/// Owns the transposition table. With [`TableLifetime::PerRequest`] the table
/// is wiped at the start of every [`top_moves`](Searcher::top_moves) call;
/// with `PerEngine` it is kept until [`clear_tt`](Searcher::clear_tt).
pub struct Searcher {
    config: EngineConfig,
    zobrist: ZobristTable,
    tt: TranspositionTable,
    nodes: u64,
    stats: SearchStats,
}

impl Searcher {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.clone(),
            zobrist: ZobristTable::new(crate::board::BOARD_SIZE),
            tt: TranspositionTable::new(config.tt_size_mb),
            nodes: 0,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Minimax value of `board` searched `depth` plies deep, from `ai`'s
    /// point of view. `maximizing` is true when `ai` is to move.
    ///
    /// The table is consulted and filled but never cleared here.
    pub fn search(
        &mut self,
        board: &Board,
        depth: u8,
        alpha: f64,
        beta: f64,
        maximizing: bool,
        ai: Stone,
        opponent: Stone,
    ) -> SearchResult {
        let nodes_before = self.nodes;
        let stats_before = self.stats.clone();

        let mut node = self.node(board, ai, opponent);
        let to_move = if maximizing { ai } else { opponent };
        let hash = self.zobrist.hash(&node.board, to_move, ai);
        let (score, best_move) = self.alpha_beta(&mut node, depth, alpha, beta, maximizing, hash);

        SearchResult {
            score,
            best_move,
            nodes: self.nodes - nodes_before,
            stats: self.stats.since(&stats_before),
        }
    }

    /// Score every empty cell for `ai` and return the best `k`, best first.
    ///
    /// A cell that leaves `ai` with a valid five scores `INF`. Any other cell
    /// is scored by searching the resulting position one ply shallower than
    /// the depth policy, with the opponent to move.
    pub fn top_moves(
        &mut self,
        board: &Board,
        ai: Stone,
        opponent: Stone,
        k: usize,
    ) -> Vec<ScoredMove> {
        if self.config.tt_lifetime == TableLifetime::PerRequest {
            self.tt.clear();
        }
        let depth = self.config.depth.depth_for(board);
        log::debug!(
            "top_moves: depth {depth}, {} empty cells, k={k}",
            board.count(Stone::Empty)
        );

        let mut node = self.node(board, ai, opponent);
        let root_hash = self.zobrist.hash(&node.board, ai, ai);
        let nodes_before = self.nodes;
        let stats_before = self.stats.clone();

        let mut scored = Vec::new();
        for pos in node.board.empty_cells() {
            node.eval.place(&mut node.board, pos, ai, &self.config.weights);
            let score = if check_win(&node.board, ai, opponent) {
                INF
            } else {
                let child_hash = self.zobrist.update_place(root_hash, pos, ai);
                self.alpha_beta(&mut node, depth - 1, -INF, INF, false, child_hash).0
            };
            node.eval.remove(&mut node.board, pos, &self.config.weights);
            scored.push(ScoredMove { pos, score });
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);

        let stats = self.stats.since(&stats_before);
        log::debug!(
            "top_moves: {} nodes, first-move cutoffs {:.1}%, tt hits {:.1}%, best {:?}",
            self.nodes - nodes_before,
            stats.first_move_rate(),
            stats.tt_hit_rate(),
            scored.first().map(|m| (m.pos, m.score))
        );
        scored
    }

    /// Nodes visited since the searcher was created
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Cumulative search statistics
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }

    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    fn node(&mut self, board: &Board, ai: Stone, opponent: Stone) -> Node {
        if self.zobrist.size() != board.size() {
            // Keys for a different board size would alias entries
            self.zobrist = ZobristTable::new(board.size());
            self.tt.clear();
        }
        Node {
            board: board.clone(),
            eval: EvalState::new(board, ai, opponent, &self.config.weights),
            ai,
            opponent,
        }
    }

    fn alpha_beta(
        &mut self,
        node: &mut Node,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        hash: u64,
    ) -> (f64, Option<Pos>) {
        self.nodes += 1;
        let (alpha_orig, beta_orig) = (alpha, beta);

        if self.config.use_tt {
            self.stats.tt_queries += 1;
            match self.tt.query(hash, depth, alpha, beta) {
                Query::Cutoff { score, best_move } => {
                    self.stats.tt_hits += 1;
                    return (score, best_move);
                }
                Query::Narrowed { alpha: a, beta: b } => {
                    alpha = a;
                    beta = b;
                }
                Query::Miss => {}
            }
        }

        if depth == 0 {
            return (node.eval.score(), None);
        }

        let (mover, other) = if maximizing {
            (node.ai, node.opponent)
        } else {
            (node.opponent, node.ai)
        };
        let moves = order_moves(&mut node.board, mover, other, maximizing, &self.config.weights);
        let Some(&first) = moves.first() else {
            return (node.eval.score(), None);
        };

        let mut best_move = first;
        let mut value = if maximizing { -INF } else { INF };

        for (i, &mv) in moves.iter().enumerate() {
            node.eval.place(&mut node.board, mv, mover, &self.config.weights);
            let child_hash = self.zobrist.update_place(hash, mv, mover);
            let (score, _) = self.alpha_beta(node, depth - 1, alpha, beta, !maximizing, child_hash);
            node.eval.remove(&mut node.board, mv, &self.config.weights);

            if maximizing {
                if score > value {
                    value = score;
                    best_move = mv;
                }
                alpha = alpha.max(value);
            } else {
                if score < value {
                    value = score;
                    best_move = mv;
                }
                beta = beta.min(value);
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
        }

        if self.config.use_tt {
            let bound = if value <= alpha_orig {
                Bound::UpperBound
            } else if value >= beta_orig {
                Bound::LowerBound
            } else {
                Bound::Exact
            };
            self.tt.store(hash, depth, value, bound, Some(best_move));
        }

        (value, Some(best_move))
    }
}
