//! Pattern classification for 6-cell line windows
//!
//! Every static score in the engine is built from one question: what is the
//! most valuable shape a player has inside a window of six consecutive cells
//! along one direction. Cells beyond the board edge read as `None` and block
//! a run the same way an opponent stone does.

use serde::{Deserialize, Serialize};

use crate::board::Stone;

/// Six consecutive cells along a direction. `None` is off-board.
pub type Window = [Option<Stone>; 6];

/// Tactical shapes recognized inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Five own stones in a row
    Five,
    /// `_PPPP_`, or the split forms `_PP_PP` / `PP_PP_`
    LiveFour,
    /// Four with exactly one end blocked
    DeadFour,
    /// `_P_PP_` or `_PP_P_`
    BrokenLiveThree,
    /// `_PPP_`
    LiveThree,
    /// Three with exactly one end blocked
    DeadThree,
    /// Split three with one end blocked
    BrokenDeadThree,
    /// `_PP_`
    LiveTwo,
    /// Two with exactly one end blocked
    DeadTwo,
}

impl Pattern {
    /// Live or broken-live three
    #[inline]
    pub fn is_live_three(self) -> bool {
        matches!(self, Pattern::LiveThree | Pattern::BrokenLiveThree)
    }
}

/// Pattern weights for evaluation.
///
/// Only the ordering is load-bearing:
/// five >> live four >> dead four ~ broken live three > live three >
/// dead three ~ broken dead three >> live two > dead two.
/// Integral values keep incremental evaluation exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternWeights {
    pub five: f64,
    pub live_four: f64,
    pub dead_four: f64,
    pub broken_live_three: f64,
    pub live_three: f64,
    pub dead_three: f64,
    pub broken_dead_three: f64,
    pub live_two: f64,
    pub dead_two: f64,
    /// Move-ordering bonus for a move creating two or more live twos
    pub multi_live_two_bonus: f64,
    /// Move-ordering bonus for a live four together with a live three
    pub four_three_bonus: f64,
    /// Move-ordering bonus for two live threes at once
    pub double_three_bonus: f64,
}

impl Default for PatternWeights {
    fn default() -> Self {
        Self {
            five: 100_000_000.0,
            live_four: 1_000_000.0,
            dead_four: 60_000.0,
            broken_live_three: 55_000.0,
            live_three: 45_000.0,
            dead_three: 5_000.0,
            broken_dead_three: 4_000.0,
            live_two: 200.0,
            dead_two: 20.0,
            multi_live_two_bonus: 15_000.0,
            four_three_bonus: 500_000.0,
            double_three_bonus: 350_000.0,
        }
    }
}

impl PatternWeights {
    #[inline]
    pub fn weight(&self, pattern: Pattern) -> f64 {
        match pattern {
            Pattern::Five => self.five,
            Pattern::LiveFour => self.live_four,
            Pattern::DeadFour => self.dead_four,
            Pattern::BrokenLiveThree => self.broken_live_three,
            Pattern::LiveThree => self.live_three,
            Pattern::DeadThree => self.dead_three,
            Pattern::BrokenDeadThree => self.broken_dead_three,
            Pattern::LiveTwo => self.live_two,
            Pattern::DeadTwo => self.dead_two,
        }
    }

    /// Whether the weights respect the required pattern ordering.
    pub fn is_ordered(&self) -> bool {
        self.five > self.live_four
            && self.live_four > self.dead_four
            && self.live_four > self.broken_live_three
            && self.dead_four > self.live_three
            && self.broken_live_three > self.live_three
            && self.live_three > self.dead_three
            && self.live_three > self.broken_dead_three
            && self.dead_three > self.live_two
            && self.broken_dead_three > self.live_two
            && self.live_two > self.dead_two
            && self.dead_two > 0.0
    }
}

/// Classify the most valuable pattern `player` has in `w`.
///
/// Fives and live fours are reported as soon as they are seen; every other
/// candidate competes by weight. A reported `Five` still has to be confirmed
/// by the win rule at the caller.
pub fn classify_line(
    w: &Window,
    player: Stone,
    opponent: Stone,
    weights: &PatternWeights,
) -> Option<Pattern> {
    let p = |i: usize| w[i] == Some(player);
    let e = |i: usize| w[i] == Some(Stone::Empty);
    let x = |i: usize| w[i] == Some(opponent) || w[i].is_none();

    if (p(0) && p(1) && p(2) && p(3) && p(4)) || (p(1) && p(2) && p(3) && p(4) && p(5)) {
        return Some(Pattern::Five);
    }

    if e(0) && p(1) && p(2) && p(3) && p(4) && e(5) {
        return Some(Pattern::LiveFour);
    }
    if (e(0) && p(1) && p(2) && e(3) && p(4) && p(5))
        || (p(0) && p(1) && e(2) && p(3) && p(4) && e(5))
    {
        return Some(Pattern::LiveFour);
    }

    let mut best: Option<(Pattern, f64)> = None;
    let mut consider = |pattern: Pattern| {
        let score = weights.weight(pattern);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((pattern, score));
        }
    };

    let four_inside = p(1) && p(2) && p(3) && p(4);

    // Dead fours
    if four_inside && ((x(0) && !x(5)) || (!x(0) && x(5))) {
        consider(Pattern::DeadFour);
    }
    if (x(0) && p(1) && p(2) && e(3) && p(4) && p(5))
        || (p(0) && p(1) && e(2) && p(3) && p(4) && x(5))
    {
        consider(Pattern::DeadFour);
    }

    // Live threes
    if (e(0) && p(1) && p(2) && p(3) && e(4)) || (e(1) && p(2) && p(3) && p(4) && e(5)) {
        consider(Pattern::LiveThree);
    }
    if (e(0) && p(1) && e(2) && p(3) && p(4) && e(5))
        || (e(0) && p(1) && p(2) && e(3) && p(4) && e(5))
    {
        consider(Pattern::BrokenLiveThree);
    }

    // Dead threes, with the run at cells 1..=3 or 2..=4
    if p(1) && p(2) && p(3) && ((x(0) && e(4)) || (!x(0) && x(4))) {
        consider(Pattern::DeadThree);
    }
    if p(2) && p(3) && p(4) && ((x(1) && !x(5)) || (e(1) && x(5))) {
        consider(Pattern::DeadThree);
    }

    // Broken dead threes
    if (x(0) && p(1) && e(2) && p(3) && p(4) && e(5))
        || (e(0) && p(1) && e(2) && p(3) && p(4) && x(5))
        || (x(0) && p(1) && p(2) && e(3) && p(4) && e(5))
        || (e(0) && p(1) && p(2) && e(3) && p(4) && x(5))
    {
        consider(Pattern::BrokenDeadThree);
    }

    // Live twos
    if (e(0) && p(1) && p(2) && e(3))
        || (e(1) && p(2) && p(3) && e(4))
        || (e(2) && p(3) && p(4) && e(5))
    {
        consider(Pattern::LiveTwo);
    }

    // Dead twos
    let dead_two_at = |a: usize| {
        let (l, r) = (a - 1, a + 2);
        p(a) && p(a + 1) && ((x(l) && e(r)) || (e(l) && x(r)))
    };
    if dead_two_at(1) || dead_two_at(2) || dead_two_at(3) {
        consider(Pattern::DeadTwo);
    }
    if (!x(0) && p(1) && p(2) && x(3)) || (x(1) && p(2) && p(3) && !x(4)) {
        consider(Pattern::DeadTwo);
    }

    best.map(|(pattern, _)| pattern)
}

/// Score of the most valuable pattern in `w`, zero when there is none.
#[inline]
pub fn score_line(w: &Window, player: Stone, opponent: Stone, weights: &PatternWeights) -> f64 {
    classify_line(w, player, opponent, weights).map_or(0.0, |pattern| weights.weight(pattern))
}
