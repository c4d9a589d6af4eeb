//! Baduk-AI: a 9x9 Go opponent.
//!
//! ## Usage
//!
//! - `baduk-ai serve` - Answer move/score requests on stdin/stdout
//! - `baduk-ai demo` - Watch a random black player face the engine
//! - `baduk-ai score` - Score one JSON request read from stdin
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use baduk_ai::board::{Board, Color, Move};
use baduk_ai::constants::{DEFAULT_DEPTH, DEFAULT_KOMI};
use baduk_ai::eval::score;
use baduk_ai::protocol::Server;
use baduk_ai::rules::{Captures, apply_move, generate_moves};
use baduk_ai::search::{Engine, EngineConfig};
use baduk_ai::session::{self, ScoreRequest};

/// Baduk-AI: rules engine and alpha-beta opponent for 9x9 Go
#[derive(Parser)]
#[command(name = "baduk-ai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Search depth in plies
    #[arg(long, global = true, default_value_t = DEFAULT_DEPTH,
          value_parser = clap::value_parser!(u8).range(1..))]
    depth: u8,

    /// Komi awarded to White
    #[arg(long, global = true, default_value_t = DEFAULT_KOMI, value_parser = parse_komi)]
    komi: f64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer protocol commands on stdin/stdout
    Serve,
    /// Play a random black player against the engine
    Demo {
        /// Maximum number of black moves
        #[arg(long, default_value_t = 40)]
        moves: usize,
        /// Seed for the random player
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Score a JSON score request read from stdin
    Score,
}

/// Komi must be a finite number.
fn parse_komi(s: &str) -> Result<f64, String> {
    let komi: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if komi.is_finite() {
        Ok(komi)
    } else {
        Err(format!("komi must be finite, got {s}"))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("baduk_ai=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = EngineConfig {
        depth: cli.depth,
        komi: cli.komi,
    };

    match cli.command {
        Some(Commands::Serve) => {
            info!(depth = config.depth, komi = config.komi, "serving on stdin");
            let stdin = io::stdin();
            Server::new(config).run(stdin.lock(), io::stdout().lock())
        }
        Some(Commands::Score) => run_score(config),
        Some(Commands::Demo { moves, seed }) => {
            run_demo(config, moves, seed);
            Ok(())
        }
        None => {
            run_demo(config, 40, None);
            Ok(())
        }
    }
}

fn run_score(config: EngineConfig) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    let req: ScoreRequest = serde_json::from_str(&input).context("invalid score request")?;
    let resp = session::score(&Engine::new(config), &req)?;
    println!("{}", serde_json::to_string(&resp)?);
    Ok(())
}

fn run_demo(config: EngineConfig, moves: usize, seed: Option<u64>) {
    println!("Baduk-AI: random black vs engine (depth {})\n", config.depth);

    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let engine = Engine::new(config);
    let mut board = Board::new();
    let mut captures = Captures::new();
    // Position before White's last move, the ko reference for Black.
    let mut last: Option<Board> = None;

    for turn in 1..=moves {
        let candidates = generate_moves(&board, Color::Black, last.as_ref());
        let black = candidates[rng.usize(..candidates.len())];
        let before = board;
        apply_move(&mut board, &mut captures, black, Color::Black);

        let reply = engine.select_best_move(&board, &captures, Some(&before));
        last = Some(board);
        apply_move(&mut board, &mut captures, reply.mv, Color::White);

        println!(
            "{turn}: black {black}, white {} (score {:+.1}, {} nodes)",
            reply.mv, reply.score, reply.nodes
        );
        println!("{board}");

        if black == Move::Pass && reply.mv == Move::Pass {
            println!("Both players passed.");
            break;
        }
    }

    let s = score(&board, &captures, config.komi);
    println!(
        "Final score: black {:.1}, white {:.1} (captures: black {}, white {})",
        s.black,
        s.white,
        captures.by(Color::Black),
        captures.by(Color::White)
    );
}
