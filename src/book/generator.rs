//! Opening book generation
//!
//! Walks the scripted opening lines, stores every scripted alternative as a
//! book recommendation, then extends each line with search-backed
//! recommendations for a few more plies.
//!
//! Progress goes to a caller-supplied callback; the generator keeps no global
//! status.

use serde::{Deserialize, Serialize};

use crate::board::{
    canonicalize, inverse_transform_move, transform_move_to_canonical, Board, Pos, Stone,
};
use crate::config::EngineConfig;
use crate::rules::check_win;
use crate::search::Searcher;

use super::{
    rank, BookError, BookMove, OpeningBook, OpeningPosition, OpeningSequence, SequenceStep,
    BOOK_MAIN_SCORE,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Side the book is generated for
    pub ai: Stone,
    /// Number of sequences to run from the front of the table; 0 runs all
    pub sequences: usize,
    /// Plies explored past the end of each scripted line
    pub max_moves_after_sequence: usize,
    /// Search recommendations stored for an explored position
    pub recommendations_per_position: usize,
    /// Recommendations followed from each explored position
    pub branches_per_node: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            ai: Stone::Black,
            sequences: 0,
            max_moves_after_sequence: 2,
            recommendations_per_position: 3,
            branches_per_node: 2,
        }
    }
}

/// Progress notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    SequenceStarted { name: String, index: usize, total: usize },
    /// A scripted step was stored and its main-line move played.
    StepPlayed { sequence: String, step: String, played: Pos },
    /// The step's side did not match the side to move.
    StepSkipped { sequence: String, step: String },
    /// The line cannot continue (empty step or unplayable main move).
    SequenceAborted { sequence: String, step: String },
    /// Exploration played `path.last()`; `path` is the whole game so far.
    Explored { sequence: String, path: Vec<Pos> },
    Finished(GenerationSummary),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub sequences_run: usize,
    pub sequences_aborted: usize,
    pub steps_skipped: usize,
    pub positions_created: usize,
    pub positions_updated: usize,
    pub positions_unchanged: usize,
    pub branches_explored: usize,
}

/// What storing a position did to the book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stored {
    Created,
    Updated,
    Unchanged,
    /// Nothing to store
    Skipped,
}

/// Populates an [`OpeningBook`] from scripted lines and search.
pub struct BookGenerator {
    config: GenerationConfig,
    searcher: Searcher,
    summary: GenerationSummary,
}

impl BookGenerator {
    pub fn new(engine: &EngineConfig, config: GenerationConfig) -> Self {
        Self {
            config,
            searcher: Searcher::new(engine),
            summary: GenerationSummary::default(),
        }
    }

    /// Run the first `config.sequences` entries of `sequences` (all when 0)
    /// against `book`.
    pub fn generate<B: OpeningBook + ?Sized>(
        &mut self,
        book: &mut B,
        sequences: &[OpeningSequence],
        progress: &mut dyn FnMut(&GenerationEvent),
    ) -> Result<GenerationSummary, BookError> {
        self.summary = GenerationSummary::default();
        let total = match self.config.sequences {
            0 => sequences.len(),
            n => n.min(sequences.len()),
        };
        log::info!(
            "generating book for {:?}: {total} of {} sequences, {} plies of exploration",
            self.config.ai,
            sequences.len(),
            self.config.max_moves_after_sequence
        );

        for (index, sequence) in sequences.iter().take(total).enumerate() {
            progress(&GenerationEvent::SequenceStarted {
                name: sequence.name.clone(),
                index,
                total,
            });
            self.run_sequence(book, sequence, progress)?;
            self.summary.sequences_run += 1;
        }

        log::info!("book generation finished: {:?}", self.summary);
        progress(&GenerationEvent::Finished(self.summary.clone()));
        Ok(self.summary.clone())
    }

    fn run_sequence<B: OpeningBook + ?Sized>(
        &mut self,
        book: &mut B,
        sequence: &OpeningSequence,
        progress: &mut dyn FnMut(&GenerationEvent),
    ) -> Result<(), BookError> {
        let ai = self.config.ai;
        let max_plies = self.config.max_moves_after_sequence + sequence.steps.len();
        let mut board = Board::new();
        let mut path = Vec::new();
        let mut to_move = sequence.first.stone(ai);

        for step in &sequence.steps {
            let mover = step.role.stone(ai);
            if mover != to_move {
                log::warn!(
                    "{} / {}: expected {to_move:?} to move, step is for {mover:?}; skipping",
                    sequence.name,
                    step.name
                );
                to_move = to_move.opponent();
                self.summary.steps_skipped += 1;
                progress(&GenerationEvent::StepSkipped {
                    sequence: sequence.name.clone(),
                    step: step.name.clone(),
                });
                continue;
            }

            let Some(primary) = step.candidates.first().map(|c| c.pos) else {
                return self.abort(sequence, step, "no candidate moves", progress);
            };
            let playable = board.contains(i32::from(primary.row), i32::from(primary.col))
                && board.is_empty(primary);
            if !playable {
                return self.abort(sequence, step, "main-line move is not playable", progress);
            }

            self.store_step(book, &board, mover, step, path.len())?;
            board.play(primary, mover)?;
            path.push(primary);
            to_move = to_move.opponent();
            progress(&GenerationEvent::StepPlayed {
                sequence: sequence.name.clone(),
                step: step.name.clone(),
                played: primary,
            });

            if path.len() >= max_plies {
                log::info!("{}: reached {max_plies} plies inside the script", sequence.name);
                return Ok(());
            }
        }

        log::info!(
            "{}: script done after {} moves, exploring for {to_move:?}",
            sequence.name,
            path.len()
        );
        self.explore(book, &mut board, to_move, &mut path, max_plies, &sequence.name, progress)
    }

    fn abort(
        &mut self,
        sequence: &OpeningSequence,
        step: &SequenceStep,
        reason: &str,
        progress: &mut dyn FnMut(&GenerationEvent),
    ) -> Result<(), BookError> {
        log::warn!("{} / {}: {reason}; aborting sequence", sequence.name, step.name);
        self.summary.sequences_aborted += 1;
        progress(&GenerationEvent::SequenceAborted {
            sequence: sequence.name.clone(),
            step: step.name.clone(),
        });
        Ok(())
    }

    /// Store every candidate of `step` that lands on an empty canonical cell.
    fn store_step<B: OpeningBook + ?Sized>(
        &mut self,
        book: &mut B,
        board: &Board,
        mover: Stone,
        step: &SequenceStep,
        move_number: usize,
    ) -> Result<(), BookError> {
        let canonical = canonicalize(board);
        let size = board.size();

        let mut recommendations = Vec::with_capacity(step.candidates.len());
        for candidate in &step.candidates {
            let on_canonical =
                transform_move_to_canonical(candidate.pos, canonical.transform, size);
            if !canonical.board.contains(i32::from(on_canonical.row), i32::from(on_canonical.col))
                || !canonical.board.is_empty(on_canonical)
            {
                log::warn!(
                    "{}: alternative {} is not an empty cell; not stored",
                    step.name,
                    candidate.pos
                );
                continue;
            }
            recommendations.push(BookMove::new(
                on_canonical,
                BOOK_MAIN_SCORE + candidate.score_delta,
            ));
        }
        rank(&mut recommendations);

        let outcome = match book.get(&canonical.hash, mover)? {
            Some(mut existing) => {
                let evaluation = recommendations.first().map_or(0.0, |m| m.score);
                if same_moves(&existing.recommendations, &recommendations)
                    && existing.evaluation_score == evaluation
                {
                    Stored::Unchanged
                } else {
                    existing.recommendations = recommendations;
                    existing.evaluation_score = evaluation;
                    book.upsert(existing)?;
                    Stored::Updated
                }
            }
            None if recommendations.is_empty() => {
                log::warn!("{}: no storable alternatives for {}", step.name, &canonical.hash[..8]);
                Stored::Skipped
            }
            None => {
                book.upsert(OpeningPosition::new(
                    &canonical.board,
                    mover,
                    move_number,
                    recommendations,
                ))?;
                Stored::Created
            }
        };
        log::debug!("{}: {:?} {} for {mover:?}", step.name, outcome, &canonical.hash[..8]);
        self.count(outcome);
        Ok(())
    }

    /// Extend a line with search recommendations until it is `max_plies` long.
    ///
    /// Uses apply/undo on `board` and `path`; both are restored on return.
    #[allow(clippy::too_many_arguments)]
    fn explore<B: OpeningBook + ?Sized>(
        &mut self,
        book: &mut B,
        board: &mut Board,
        to_move: Stone,
        path: &mut Vec<Pos>,
        max_plies: usize,
        sequence: &str,
        progress: &mut dyn FnMut(&GenerationEvent),
    ) -> Result<(), BookError> {
        if path.len() >= max_plies {
            return Ok(());
        }

        let canonical = canonicalize(board);
        let other = to_move.opponent();
        let recommendations = match book.get(&canonical.hash, to_move)? {
            Some(existing) => {
                let mut moves = existing.recommendations;
                rank(&mut moves);
                moves
            }
            None => {
                self.searcher.clear_tt();
                let moves: Vec<BookMove> = self
                    .searcher
                    .top_moves(
                        &canonical.board,
                        to_move,
                        other,
                        self.config.recommendations_per_position,
                    )
                    .into_iter()
                    .map(|m| BookMove::new(m.pos, m.score))
                    .collect();
                if moves.is_empty() {
                    log::warn!(
                        "{sequence}: no recommendations for {}; stopping",
                        &canonical.hash[..8]
                    );
                    return Ok(());
                }
                book.upsert(OpeningPosition::new(
                    &canonical.board,
                    to_move,
                    path.len(),
                    moves.clone(),
                ))?;
                self.count(Stored::Created);
                moves
            }
        };

        for rec in recommendations.iter().take(self.config.branches_per_node) {
            let pos = inverse_transform_move(rec.pos(), canonical.transform, board.size());
            if !board.is_empty(pos) {
                log::warn!("{sequence}: recommended {pos} is occupied; skipping branch");
                continue;
            }

            board.place_stone(pos, to_move);
            path.push(pos);
            self.summary.branches_explored += 1;
            progress(&GenerationEvent::Explored {
                sequence: sequence.to_owned(),
                path: path.clone(),
            });

            let result = if check_win(board, to_move, other) {
                log::info!("{sequence}: {to_move:?} wins after {} moves", path.len());
                Ok(())
            } else if board.is_full() {
                Ok(())
            } else {
                self.explore(book, board, other, path, max_plies, sequence, progress)
            };

            path.pop();
            board.remove_stone(pos);
            result?;
        }
        Ok(())
    }

    fn count(&mut self, outcome: Stored) {
        match outcome {
            Stored::Created => self.summary.positions_created += 1,
            Stored::Updated => self.summary.positions_updated += 1,
            Stored::Unchanged => self.summary.positions_unchanged += 1,
            Stored::Skipped => {}
        }
    }
}

/// Same (cell, score) set regardless of order
fn same_moves(a: &[BookMove], b: &[BookMove]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let key = |m: &BookMove| (m.row, m.col);
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_by_key(key);
    b.sort_by_key(key);
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{builtin_sequences, Candidate, MemoryBook, Role};
    use crate::search::DepthPolicy;

    /// One-ply search keeps exploration cheap
    fn fast_engine() -> EngineConfig {
        EngineConfig {
            tt_size_mb: 1,
            depth: DepthPolicy {
                base_depth: 1,
                endgame_depth: 1,
                endgame_threshold: 0,
            },
            ..EngineConfig::default()
        }
    }

    fn script_only(sequences: usize) -> GenerationConfig {
        GenerationConfig {
            sequences,
            max_moves_after_sequence: 0,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_scripted_steps_are_stored() {
        let mut book = MemoryBook::new();
        let mut generator = BookGenerator::new(&fast_engine(), script_only(0));
        let mut events = Vec::new();
        let summary = generator
            .generate(&mut book, &builtin_sequences(), &mut |e| events.push(e.clone()))
            .unwrap();

        assert_eq!(summary.sequences_run, 3);
        assert_eq!(summary.sequences_aborted, 0);
        // Both opponent-first lines start from the empty board with the
        // opponent to move, so the third line rewrites that entry.
        assert_eq!(summary.positions_created, 11);
        assert_eq!(summary.positions_updated, 1);
        assert_eq!(summary.branches_explored, 0);
        assert_eq!(book.len(), 11);

        assert!(matches!(
            events.first(),
            Some(GenerationEvent::SequenceStarted { index: 0, total: 3, .. })
        ));
        assert!(matches!(events.last(), Some(GenerationEvent::Finished(s)) if *s == summary));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GenerationEvent::StepPlayed { .. }))
                .count(),
            12
        );
    }

    #[test]
    fn test_empty_board_entry_for_ai_first() {
        let mut book = MemoryBook::new();
        let mut generator = BookGenerator::new(&fast_engine(), script_only(1));
        generator.generate(&mut book, &builtin_sequences(), &mut |_| {}).unwrap();

        let empty = Board::new();
        let moves = book.lookup(&empty.position_hash(), Stone::Black).unwrap();
        assert_eq!(moves.len(), 7);
        assert_eq!(moves[0].pos(), Pos::new(7, 7));
        assert_eq!(moves[0].score, BOOK_MAIN_SCORE);
        assert_eq!(moves[6].score, BOOK_MAIN_SCORE - 30.0);

        let entry = book.get(&empty.position_hash(), Stone::Black).unwrap().unwrap();
        assert_eq!(entry.move_number, 0);
        assert_eq!(entry.evaluation_score, BOOK_MAIN_SCORE);
    }

    #[test]
    fn test_recommendations_are_canonical() {
        let mut book = MemoryBook::new();
        let mut generator = BookGenerator::new(&fast_engine(), script_only(1));
        generator.generate(&mut book, &builtin_sequences(), &mut |_| {}).unwrap();

        // Second step: AI (Black) at the center, White to move
        let mut board = Board::new();
        board.place_stone(Pos::new(7, 7), Stone::Black);
        let canonical = canonicalize(&board);
        let moves = book.lookup(&canonical.hash, Stone::White).unwrap();
        assert_eq!(moves.len(), 4);

        let originals: Vec<Pos> = moves
            .iter()
            .map(|m| inverse_transform_move(m.pos(), canonical.transform, 15))
            .collect();
        assert_eq!(originals[0], Pos::new(6, 7));
        assert!(originals.contains(&Pos::new(6, 6)));
    }

    #[test]
    fn test_rerun_leaves_book_unchanged() {
        let mut book = MemoryBook::new();
        let mut generator = BookGenerator::new(&fast_engine(), script_only(1));
        let first = generator.generate(&mut book, &builtin_sequences(), &mut |_| {}).unwrap();
        assert_eq!(first.positions_created, 4);

        let second = generator.generate(&mut book, &builtin_sequences(), &mut |_| {}).unwrap();
        assert_eq!(second.positions_created, 0);
        assert_eq!(second.positions_updated, 0);
        assert_eq!(second.positions_unchanged, 4);
        assert_eq!(book.len(), 4);
    }

    #[test]
    fn test_exploration_adds_search_positions() {
        let mut book = MemoryBook::new();
        let config = GenerationConfig {
            sequences: 1,
            max_moves_after_sequence: 1,
            ..GenerationConfig::default()
        };
        let mut generator = BookGenerator::new(&fast_engine(), config);
        let mut explored = Vec::new();
        let summary = generator
            .generate(&mut book, &builtin_sequences(), &mut |e| {
                if let GenerationEvent::Explored { path, .. } = e {
                    explored.push(path.clone());
                }
            })
            .unwrap();

        assert_eq!(summary.positions_created, 5);
        assert_eq!(summary.branches_explored, 2);
        assert_eq!(explored.len(), 2);
        for path in &explored {
            assert_eq!(path.len(), 5);
            assert_eq!(&path[..4], &builtin_sequences()[0].main_line()[..]);
        }
        assert_ne!(explored[0][4], explored[1][4]);

        // The explored entry holds three search recommendations
        let mut board = Board::new();
        for (i, pos) in builtin_sequences()[0].main_line().into_iter().enumerate() {
            board.place_stone(pos, if i % 2 == 0 { Stone::Black } else { Stone::White });
        }
        let canonical = canonicalize(&board);
        let entry = book.get(&canonical.hash, Stone::Black).unwrap().unwrap();
        assert_eq!(entry.recommendations.len(), 3);
        assert_eq!(entry.move_number, 4);
        assert!(entry.recommendations.iter().all(|m| m.score.is_finite()));
    }

    #[test]
    fn test_turn_mismatch_and_unplayable_lines() {
        let sequences = vec![
            OpeningSequence {
                name: "mismatch".into(),
                first: Role::Ai,
                steps: vec![
                    SequenceStep {
                        role: Role::Opponent,
                        name: "wrong_side".into(),
                        candidates: vec![Candidate {
                            pos: Pos::new(7, 7),
                            score_delta: 0.0,
                        }],
                    },
                    SequenceStep {
                        role: Role::Opponent,
                        name: "right_side_after_skip".into(),
                        candidates: vec![Candidate {
                            pos: Pos::new(7, 7),
                            score_delta: 0.0,
                        }],
                    },
                ],
            },
            OpeningSequence {
                name: "off_board".into(),
                first: Role::Ai,
                steps: vec![SequenceStep {
                    role: Role::Ai,
                    name: "outside".into(),
                    candidates: vec![Candidate {
                        pos: Pos::new(15, 0),
                        score_delta: 0.0,
                    }],
                }],
            },
        ];

        let mut book = MemoryBook::new();
        let mut generator = BookGenerator::new(&fast_engine(), script_only(0));
        let summary = generator.generate(&mut book, &sequences, &mut |_| {}).unwrap();

        assert_eq!(summary.steps_skipped, 1);
        assert_eq!(summary.sequences_aborted, 1);
        assert_eq!(summary.sequences_run, 2);
        // The skipped step still counts toward the ply limit, so the one
        // scripted move is followed by one ply of exploration.
        assert_eq!(summary.positions_created, 2);
        assert_eq!(summary.branches_explored, 2);
        assert!(book
            .get(&Board::new().position_hash(), Stone::White)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_same_moves_ignores_order() {
        let a = vec![BookMove::new(Pos::new(1, 1), 2.0), BookMove::new(Pos::new(0, 0), 1.0)];
        let b = vec![BookMove::new(Pos::new(0, 0), 1.0), BookMove::new(Pos::new(1, 1), 2.0)];
        assert!(same_moves(&a, &b));
        let c = vec![BookMove::new(Pos::new(0, 0), 1.5), BookMove::new(Pos::new(1, 1), 2.0)];
        assert!(!same_moves(&a, &c));
        assert!(!same_moves(&a, &a[..1]));
    }
}
