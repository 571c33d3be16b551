//! Game rules for Caro
//!
//! Exactly five in a row wins; overlines and fives blocked by the opponent
//! on both ends do not.

pub mod win;

pub use win::{check_win, find_winning_five, is_winning_five, wins_at, DIRECTIONS};
