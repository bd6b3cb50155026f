//! Seega: a two-phase capture game on a 5x5 board.
//!
//! ## Usage
//!
//! - `seega` - Text protocol on stdin/stdout, AI playing side B
//! - `seega --ai none protocol` - Hot-seat protocol, no AI
//! - `seega --seed 7 demo` - AI against AI, printing every turn

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use seega::board::Side;
use seega::protocol::ProtocolEngine;
use seega::session::{Config, Session};

/// Seega game engine
#[derive(Parser)]
#[command(name = "seega")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed for the AI's random choices
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Side played by the AI
    #[arg(long, global = true, value_enum, default_value_t = AiSide::B)]
    ai: AiSide,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Copy, Clone, ValueEnum)]
enum AiSide {
    A,
    B,
    None,
}

impl From<AiSide> for Option<Side> {
    fn from(side: AiSide) -> Self {
        match side {
            AiSide::A => Some(Side::A),
            AiSide::B => Some(Side::B),
            AiSide::None => None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the text protocol on stdin/stdout
    Protocol,
    /// Let the AI play both sides until someone wins
    Demo {
        /// Stop after this many turns even without a winner
        #[arg(long, default_value_t = 500)]
        max_turns: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Some(Commands::Demo { max_turns }) => run_demo(cli.seed, max_turns),
        Some(Commands::Protocol) | None => {
            let config = Config {
                seed: cli.seed,
                ai_side: cli.ai.into(),
            };
            info!(?config, "serving protocol");
            let mut engine = ProtocolEngine::new(config);
            engine.run(io::stdin().lock(), io::stdout())
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn run_demo(seed: Option<u64>, max_turns: usize) -> Result<()> {
    println!("Seega: AI vs AI\n");

    // Both sides are driven through run_ai_turn, so no side is reserved.
    let mut session = Session::with_config(Config { seed, ai_side: None });
    for turn in 1..=max_turns {
        let played = session.run_ai_turn()?;
        let moves: Vec<String> = played.trace.iter().map(ToString::to_string).collect();
        println!("{turn:>3}. {}: {}", played.side, moves.join(" "));
        println!("{}", session.board());

        let snap = session.snapshot();
        if let Some(winner) = snap.winner {
            println!(
                "Winner: {winner} (captured A={} B={})",
                snap.captured.a, snap.captured.b
            );
            return Ok(());
        }
    }

    println!("No winner after {max_turns} turns");
    Ok(())
}
