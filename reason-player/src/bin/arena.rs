//! Plays local games between two built-in strategies and reports the tally.

use anyhow::Context;
use clap::Parser;
use reason_othello::Player;
use reason_player::arena::{play_game, GameOutcome};
use reason_player::players::{BuiltinConfig, PlayerKind};
use reason_player::{StrategyConfig, WithSolver};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(about = "Play Othello games between two built-in strategies")]
struct Args {
    /// Black's strategy
    #[arg(long, value_enum, default_value_t = PlayerKind::Mcts)]
    black: PlayerKind,

    /// White's strategy
    #[arg(long, value_enum, default_value_t = PlayerKind::Random)]
    white: PlayerKind,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Milliseconds each player gets per game. Unlimited if not given.
    #[arg(long)]
    max_time: Option<i64>,

    /// Hand the endgame to the solver at this many empty squares (0 disables)
    #[arg(long, default_value_t = 0)]
    solver_depth: u8,

    /// Milliseconds of each player's budget to set aside for the solver
    #[arg(long, default_value_t = 0)]
    solver_reserve_ms: i64,

    /// Base seed. Game `i` seeds black with `seed + 2i` and white with `seed + 2i + 1`.
    #[arg(long)]
    seed: Option<u64>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);

    let (mut black_wins, mut white_wins, mut draws) = (0, 0, 0);

    for game in 0..args.games {
        let seeds = args
            .seed
            .map(|seed| (seed + 2 * u64::from(game), seed + 2 * u64::from(game) + 1));
        let black = args.config(args.black, seeds.map(|s| s.0));
        let white = args.config(args.white, seeds.map(|s| s.1));

        let result = play_game(&black, &white, args.max_time)
            .with_context(|| format!("game {} between {} and {}", game + 1, black.name(), white.name()))?;

        match result.outcome {
            GameOutcome::Win(Player::Black) => black_wins += 1,
            GameOutcome::Win(Player::White) => white_wins += 1,
            GameOutcome::Draw => draws += 1,
        }

        info!(
            game = game + 1,
            outcome = %result.outcome,
            black = result.position.piece_count(Player::Black),
            white = result.position.piece_count(Player::White),
            "Finished game"
        );
        println!("{}", result.position);
    }

    println!(
        "{} (black) {} - {} {} (white), {} drawn",
        args.config(args.black, None).name(),
        black_wins,
        white_wins,
        args.config(args.white, None).name(),
        draws
    );
    Ok(())
}

impl Args {
    /// The configuration one side plays with, solver hand-off included.
    fn config(&self, kind: PlayerKind, seed: Option<u64>) -> WithSolver<BuiltinConfig> {
        BuiltinConfig::new(kind, seed).with_depth_solver(self.solver_depth, self.solver_reserve_ms)
    }
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
