//! Caro engine command line
//!
//! - `caro best-move --board board.json --ai 1` - Pick a move
//! - `caro top-moves --board board.json --ai 2 -k 5` - Rank candidate moves
//! - `caro generate-book --book book.json` - Build or refresh an opening book
//! - `caro play --ai 2` - Play against the engine on the terminal
//! - `caro demo` - Play through a few stock positions
//!
//! Boards are JSON arrays of rows holding 0 (empty), 1 or 2.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use caro::book::{
    builtin_sequences, BookGenerator, GenerationConfig, GenerationEvent, GenerationSummary,
};
use caro::{
    Board, CaroEngine, EngineConfig, Game, GameOutcome, JsonFileBook, OpeningBook, Pos, Stone,
};

/// Caro (five in a row, both-ends-blocked fives do not count) engine
#[derive(Parser)]
#[command(name = "caro")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Engine configuration (JSON); defaults apply to missing keys
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose the AI's move for a board
    BestMove {
        #[arg(long)]
        board: PathBuf,
        /// AI player (1 or 2)
        #[arg(long)]
        ai: u8,
        /// Opening book to consult
        #[arg(long)]
        book: Option<PathBuf>,
    },
    /// Print the k best moves with their search scores
    TopMoves {
        #[arg(long)]
        board: PathBuf,
        #[arg(long)]
        ai: u8,
        #[arg(short, default_value_t = 5)]
        k: usize,
    },
    /// Populate an opening book from the built-in opening lines
    GenerateBook {
        #[arg(long)]
        book: PathBuf,
        /// Side the book is generated for (1 or 2)
        #[arg(long, default_value_t = 1)]
        ai: u8,
        /// Number of lines to run; 0 runs all
        #[arg(long, default_value_t = 0)]
        sequences: usize,
        /// Plies to explore past each scripted line
        #[arg(long, default_value_t = 2)]
        max_moves: usize,
    },
    /// Play a game against the engine; enter moves as `row col`
    Play {
        /// AI player (1 or 2)
        #[arg(long, default_value_t = 2)]
        ai: u8,
        /// Opening book to consult
        #[arg(long)]
        book: Option<PathBuf>,
    },
    /// Play through the stock positions
    Demo,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Some(Commands::BestMove { board, ai, book }) => {
            let board = read_board(&board)?;
            let ai = parse_player(ai)?;
            let result = match book {
                Some(path) => {
                    let book = JsonFileBook::open(&path)?;
                    CaroEngine::with_book(config, book)
                        .get_move_with_stats(&board, ai, ai.opponent())?
                }
                None => {
                    CaroEngine::with_config(config).get_move_with_stats(&board, ai, ai.opponent())?
                }
            };
            match result.best_move {
                Some(pos) => println!(
                    "{} {}  ({:?}, score {}, {} nodes, {}ms)",
                    pos.row, pos.col, result.source, result.score, result.nodes, result.time_ms
                ),
                None => println!("no move"),
            }
        }
        Some(Commands::TopMoves { board, ai, k }) => {
            let board = read_board(&board)?;
            let ai = parse_player(ai)?;
            let mut engine = CaroEngine::with_config(config);
            for (rank, m) in engine.top_moves(&board, ai, ai.opponent(), k)?.iter().enumerate() {
                println!("{:>2}. {} {}  {}", rank + 1, m.pos.row, m.pos.col, m.score);
            }
        }
        Some(Commands::GenerateBook {
            book,
            ai,
            sequences,
            max_moves,
        }) => {
            let generation = GenerationConfig {
                ai: parse_player(ai)?,
                sequences,
                max_moves_after_sequence: max_moves,
                ..GenerationConfig::default()
            };
            let (positions, summary) =
                generate_book(&config, &book, generation, &mut print_event)?;
            println!(
                "{} positions in {} ({} created, {} updated, {} unchanged)",
                positions,
                book.display(),
                summary.positions_created,
                summary.positions_updated,
                summary.positions_unchanged
            );
        }
        Some(Commands::Play { ai, book }) => {
            let ai = parse_player(ai)?;
            match book {
                Some(path) => {
                    let book = JsonFileBook::open(&path)?;
                    play(CaroEngine::with_book(config, book), ai)?
                }
                None => play(CaroEngine::with_config(config), ai)?,
            }
        }
        Some(Commands::Demo) | None => run_demo(config)?,
    }
    Ok(())
}

/// Run the built-in lines into the book at `path`; returns the stored
/// position count.
fn generate_book(
    config: &EngineConfig,
    path: &Path,
    generation: GenerationConfig,
    progress: &mut dyn FnMut(&GenerationEvent),
) -> Result<(usize, GenerationSummary)> {
    let mut store = JsonFileBook::open(path)?;
    let mut generator = BookGenerator::new(config, generation);
    let summary = generator.generate(&mut store, &builtin_sequences(), progress)?;
    store.save()?;
    Ok((store.len(), summary))
}

fn read_board(path: &Path) -> Result<Board> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading board {}", path.display()))?;
    let rows: Vec<Vec<u8>> =
        serde_json::from_str(&data).with_context(|| format!("parsing board {}", path.display()))?;
    Board::from_rows(&rows).with_context(|| format!("invalid board {}", path.display()))
}

fn parse_player(value: u8) -> Result<Stone> {
    match Stone::from_u8(value) {
        Some(stone) if stone != Stone::Empty => Ok(stone),
        _ => bail!("player must be 1 or 2, got {value}"),
    }
}

fn print_event(event: &GenerationEvent) {
    match event {
        GenerationEvent::SequenceStarted { name, index, total } => {
            println!("[{}/{}] {name}", index + 1, total)
        }
        GenerationEvent::SequenceAborted { sequence, step } => {
            println!("  {sequence}: aborted at {step}")
        }
        GenerationEvent::Explored { path, .. } => {
            let moves: Vec<String> = path.iter().map(Pos::to_string).collect();
            println!("  explored {}", moves.join(" "))
        }
        _ => {}
    }
}

fn play<B: OpeningBook>(mut engine: CaroEngine<B>, ai: Stone) -> Result<()> {
    let mut game = Game::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    println!("You are {:?}. Enter `row col`, `undo`, `new` or `quit`.", ai.opponent());

    loop {
        if let Some(outcome) = game.outcome() {
            println!("{}", game.board());
            match outcome {
                GameOutcome::Win { winner, line } => {
                    println!("{winner:?} wins with {} .. {}", line[0], line[4])
                }
                GameOutcome::Draw => println!("draw"),
            }
            println!("`undo`, `new` or `quit`");
        } else if game.to_move() == ai {
            let result = engine.get_move_with_stats(game.board(), ai, ai.opponent())?;
            let Some(pos) = result.best_move else {
                bail!("engine found no move on a board that is not finished");
            };
            game.play(pos)?;
            println!("{ai:?} plays {pos} ({:?}, {}ms)", result.source, result.time_ms);
            continue;
        } else {
            println!("{}", game.board());
            print!("{:?}> ", game.to_move());
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => {}
            ["quit" | "q"] => return Ok(()),
            ["new"] => game.reset(),
            ["undo"] => {
                // Take back the engine's reply along with the player's move
                game.undo();
                if game.to_move() == ai {
                    game.undo();
                }
            }
            [row, col] => match (row.parse::<u8>(), col.parse::<u8>()) {
                (Ok(row), Ok(col)) if !game.is_over() => {
                    if let Err(err) = game.play(Pos::new(row, col)) {
                        println!("{err}");
                    }
                }
                (Ok(_), Ok(_)) => println!("the game is over"),
                _ => println!("expected two numbers, got `{line}`"),
            },
            _ => println!("unrecognized input `{line}`"),
        }
    }
}

fn run_demo(config: EngineConfig) -> Result<()> {
    let config = EngineConfig {
        seed: config.seed.or(Some(2024)),
        ..config
    };
    let mut engine = CaroEngine::with_config(config);
    let (ai, opponent) = (Stone::Black, Stone::White);

    let positions: [(&str, &[(u8, u8, Stone)]); 4] = [
        ("Empty board", &[]),
        ("Reply to a center opening", &[(7, 7, opponent)]),
        (
            "Open four",
            &[(7, 5, ai), (7, 6, ai), (7, 7, ai), (7, 8, ai), (6, 6, opponent), (8, 8, opponent)],
        ),
        (
            "Opponent open three",
            &[(7, 6, opponent), (7, 7, opponent), (7, 8, opponent), (3, 3, ai), (11, 11, ai)],
        ),
    ];

    for (title, stones) in positions {
        let mut board = Board::new();
        for &(row, col, stone) in stones {
            board.play(Pos::new(row, col), stone)?;
        }
        let result = engine.get_move_with_stats(&board, ai, opponent)?;
        println!("=== {title} ===");
        println!("{board}");
        match result.best_move {
            Some(pos) => println!(
                "{ai:?} plays {pos} ({:?}, {}ms)\n",
                result.source, result.time_ms
            ),
            None => println!("no move\n"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_book_reports_stored_positions() {
        let path = std::env::temp_dir().join(format!("caro-cli-{}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        let generation = GenerationConfig {
            sequences: 1,
            max_moves_after_sequence: 0,
            ..GenerationConfig::default()
        };

        let mut events = 0;
        let (positions, summary) =
            generate_book(&EngineConfig::default(), &path, generation, &mut |_| events += 1)
                .unwrap();

        assert!(positions > 0);
        assert_eq!(positions, summary.positions_created);
        assert!(events > 0);
        assert_eq!(JsonFileBook::open(&path).unwrap().len(), positions);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_parse_player() {
        assert_eq!(parse_player(1).unwrap(), Stone::Black);
        assert_eq!(parse_player(2).unwrap(), Stone::White);
        assert!(parse_player(0).is_err());
        assert!(parse_player(3).is_err());
    }
}
