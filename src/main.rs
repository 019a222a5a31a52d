use std::io::{self, BufRead, Write};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rust_chessboard::board::{Board, ClickOutcome};
use rust_chessboard::config::{Advance, BoardConfig, IllegalClickPolicy};
use rust_chessboard::game::Session;
use rust_chessboard::types::Position;

/// Click-driven chessboard with pawns and rooks.
///
/// Squares are given as `row,column` (both 0-7) or in algebraic form
/// (`a1` is row 0, column 0).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// What clicking an unreachable square does while a piece is selected
    #[arg(long, value_enum, default_value_t = IllegalClickPolicy::Stay)]
    illegal_click: IllegalClickPolicy,

    /// Which way white pawns advance
    #[arg(long, value_enum, default_value_t = Advance::TowardRowZero)]
    white_advance: Advance,

    /// Start from this layout instead of the standard one, e.g. `R6R/8/8/8/8/8/8/r6r`
    #[arg(long)]
    layout: Option<String>,

    /// Space separated clicks to replay, then exit
    #[arg(long)]
    clicks: Option<String>,

    /// Play this many random clicks, then exit
    #[arg(long)]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Log board activity
    #[arg(short, long)]
    verbose: bool,
}

fn describe(outcome: &ClickOutcome) -> String {
    match outcome {
        ClickOutcome::Ignored => "nothing to select".to_string(),
        ClickOutcome::Selected(pos) => format!("selected {}", pos.to_algebraic()),
        ClickOutcome::Moved(mv) => mv.to_human(),
        ClickOutcome::Rejected { from, to } => format!(
            "{} cannot reach {}",
            from.to_algebraic(),
            to.to_algebraic()
        ),
        ClickOutcome::Deselected(pos) => format!("deselected {}", pos.to_algebraic()),
    }
}

fn replay(session: &mut Session, clicks: &str) -> Result<()> {
    for token in clicks.split_whitespace() {
        let position: Position = token
            .parse()
            .wrap_err_with(|| format!("bad click {:?}", token))?;
        let outcome = session.click(position)?;
        println!("{}: {}", token, describe(&outcome));
    }
    Ok(())
}

fn interactive(session: &mut Session) -> Result<()> {
    session.board().draw_to_terminal();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "show" => session.board().draw_to_terminal(),
            "history" => println!("{}", session.transcript()),
            input => {
                for token in input.split_whitespace() {
                    match token.parse::<Position>() {
                        Ok(position) => match session.click(position) {
                            Ok(outcome) => println!("{}", describe(&outcome)),
                            Err(e) => println!("{}", e),
                        },
                        Err(e) => println!("{}", e),
                    }
                }
                session.board().draw_to_terminal();
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = BoardConfig::new(args.illegal_click, args.white_advance);
    let board = match &args.layout {
        Some(layout) => Board::from_layout(layout, config).wrap_err("could not read --layout")?,
        None => Board::standard(config),
    };
    let mut session = Session::new(board);

    if let Some(clicks) = &args.clicks {
        replay(&mut session, clicks)?;
        session.board().draw_to_terminal();
        return Ok(());
    }

    if let Some(count) = args.random {
        let mut rng = StdRng::seed_from_u64(args.seed);
        let outcomes = session.play_random(&mut rng, count);
        info!("played {} random clicks", outcomes.len());
        session.board().draw_to_terminal();
        println!("{}", session.transcript());
        return Ok(());
    }

    interactive(&mut session)
}
