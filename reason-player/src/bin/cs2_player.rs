//! Plays one match against a CS2 referee over stdin/stdout.
//! Diagnostics go to stderr so they never mix with protocol lines.

use clap::Parser;
use reason_othello::Player;
use reason_player::connectors::Cs2Connector;
use reason_player::players::{BuiltinConfig, PlayerKind};
use reason_player::{run_match, StrategyConfig};
use reason_solver::SolveMode;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(about = "Play Othello against a CS2 referee")]
struct Args {
    /// Our color, "Black" or "White"
    color: Player,

    /// The strategy to play with until the solver takes over
    #[arg(long, value_enum, default_value_t = PlayerKind::Random)]
    strategy: PlayerKind,

    /// Solve exactly once at most this many squares are empty
    #[arg(long, default_value_t = 16)]
    solver_depth: u8,

    /// Milliseconds of the total budget to set aside for the solver
    #[arg(long, default_value_t = 5000)]
    solver_reserve_ms: i64,

    /// Solve for the exact final score instead of just win/loss/draw
    #[arg(long)]
    exact: bool,

    /// Seed the strategy's random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);

    let mode = if args.exact {
        SolveMode::Exact
    } else {
        SolveMode::WinLossDraw
    };
    let config = BuiltinConfig::new(args.strategy, args.seed)
        .with_depth_solver(args.solver_depth, args.solver_reserve_ms)
        .with_mode(mode);

    let mut connector = Cs2Connector::stdio(args.color);
    run_match(&mut connector, config)?;
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
