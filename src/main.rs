//! Othello-MCTS: play the flip-capture game against a Monte Carlo Tree Search
//! engine.
//!
//! ## Usage
//!
//! - `othello-mcts` - Show a demo search from the opening
//! - `othello-mcts play` - Play against the engine on the console
//! - `othello-mcts self-play` - Let the engine play both sides
//!
//! Set `RUST_LOG=debug` for per-move search statistics.

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use othello_mcts::board::Color;
use othello_mcts::console::{Console, describe_ai_move, status};
use othello_mcts::constants::DEFAULT_THINK_TIME;
use othello_mcts::driver::think;
use othello_mcts::game::{Game, GameState};
use othello_mcts::mcts::{SearchConfig, SearchEngine};
use othello_mcts::session::Session;

/// Othello-MCTS: a Monte Carlo Tree Search Othello engine
#[derive(Parser)]
#[command(name = "othello-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Thinking time per engine move, in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_THINK_TIME.as_millis() as u64)]
    think_ms: u64,

    /// Seed for reproducible searches
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Random games per search iteration (defaults to the number of CPUs)
    #[arg(long, global = true)]
    playouts: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Copy, Clone, ValueEnum)]
enum Side {
    Black,
    White,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Color::Black,
            Side::White => Color::White,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the engine on the console
    Play {
        /// The color you play; white moves first
        #[arg(long, value_enum, default_value = "white")]
        human: Side,
    },
    /// Let the engine play both sides
    SelfPlay {
        /// Number of games to play
        #[arg(long, default_value_t = 1)]
        games: usize,
    },
    /// Run a single search from the opening position
    Demo,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let think_time = Duration::from_millis(cli.think_ms);
    let mut config = SearchConfig {
        seed: cli.seed,
        ..SearchConfig::default()
    };
    if let Some(playouts) = cli.playouts {
        config.playouts_per_iteration = playouts;
    }

    match cli.command {
        Some(Commands::Play { human }) => {
            let ai = Color::from(human).opposite();
            Console::new(Session::new(config, &[ai]), think_time).run()
        }
        Some(Commands::SelfPlay { games }) => self_play(config, think_time, games),
        Some(Commands::Demo) | None => {
            run_demo(config, think_time);
            Ok(())
        }
    }
}

fn self_play(config: SearchConfig, think_time: Duration, games: usize) -> anyhow::Result<()> {
    let mut session = Session::new(config, &[Color::Black, Color::White]);
    let (mut white, mut black, mut ties) = (0, 0, 0);

    for n in 1..=games {
        session.reset();
        while session.ai_to_move().is_some() {
            let ai = session.run_ai(think_time, |_| {})?;
            println!("{}", describe_ai_move(&ai));
        }

        let game = session.game();
        println!("Game {n}:\n{}{}\n", game.board(), status(game));
        match game.state() {
            GameState::Won(Color::White) => white += 1,
            GameState::Won(Color::Black) => black += 1,
            GameState::Tie => ties += 1,
            GameState::Turn(_) => unreachable!("self-play stops only at the end of a game"),
        }
    }

    println!("White {white}, Black {black}, Ties {ties}");
    Ok(())
}

fn run_demo(config: SearchConfig, think_time: Duration) {
    println!("Othello-MCTS: Monte Carlo Tree Search Othello engine\n");

    let game = Game::new();
    println!("{}{}\n", game.board(), status(&game));

    let mut engine = SearchEngine::with_config(game, Color::White, config);
    println!("Searching for {} ms...", think_time.as_millis());
    let Some(results) = think(&mut engine, think_time, |_| {}) else {
        println!("No search was run");
        return;
    };

    for m in &results.moves {
        println!(
            "move {} plays={} wins={} wr={:.3}",
            m.mv, m.plays, m.wins, m.win_rate
        );
    }
    println!(
        "Best move: {} after {} simulations",
        results.best_move, results.simulations
    );
}
