//! Position evaluation
//!
//! - `patterns`: 6-cell window classification and weights
//! - `heuristic`: whole-board static score and the move-ordering heuristic
//! - `incremental`: running static score for make/unmake search

pub mod heuristic;
pub mod incremental;
pub mod patterns;

pub use heuristic::{
    detailed_score, evaluate_move, score_board, window_at, window_pattern, window_score,
};
pub use incremental::EvalState;
pub use patterns::{classify_line, score_line, Pattern, PatternWeights, Window};
