//! A game in progress between human and/or engine seats.
//!
//! The session owns the authoritative [`Game`]. Engines never touch it: an
//! AI turn moves the color's engine onto a worker thread, drives the search
//! there, streams result snapshots back over a channel and applies the move
//! it returns once the worker has been joined.

use std::fmt;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use log::{debug, info};

use crate::board::{Board, Color};
use crate::driver::think;
use crate::game::{Game, GameState};
use crate::mcts::{MoveStats, SearchConfig, SearchEngine, SearchResults};
use crate::moves::Move;

/// Why a human move was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    /// The game is over
    GameOver,
    /// The side to move is played by the engine
    AiSeat(Color),
    /// The move captures nothing or the cell is taken
    IllegalMove(Move),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::GameOver => write!(f, "the game is over"),
            PlayError::AiSeat(color) => write!(f, "{color} is played by the engine"),
            PlayError::IllegalMove(mv) => write!(f, "illegal move: {mv}"),
        }
    }
}

impl std::error::Error for PlayError {}

/// Outcome of one engine turn.
#[derive(Debug, Clone)]
pub struct AiMove {
    pub color: Color,
    pub mv: Move,
    pub results: SearchResults,
    pub elapsed: Duration,
}

impl AiMove {
    pub fn games_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.results.simulations as f64 / secs
        } else {
            0.0
        }
    }
}

/// Read-only view of the session for rendering.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub board: Board,
    pub state: GameState,
    pub white: usize,
    pub black: usize,
    /// Legal moves for the side to move
    pub tips: Vec<Move>,
    /// Root statistics from the latest search progress report
    pub highlights: Vec<MoveStats>,
}

fn seat(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

pub struct Session {
    game: Game,
    config: SearchConfig,
    ai_seats: [bool; 2],
    engines: [Option<SearchEngine>; 2],
    highlights: Vec<MoveStats>,
}

impl Session {
    /// Start a new game with the engine playing `ai_colors`.
    pub fn new(config: SearchConfig, ai_colors: &[Color]) -> Self {
        let mut ai_seats = [false; 2];
        for &color in ai_colors {
            ai_seats[seat(color)] = true;
        }
        Self {
            game: Game::new(),
            config,
            ai_seats,
            engines: [None, None],
            highlights: Vec::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn is_ai(&self, color: Color) -> bool {
        self.ai_seats[seat(color)]
    }

    /// The engine color to move, if any.
    pub fn ai_to_move(&self) -> Option<Color> {
        self.game.current_color().filter(|&c| self.is_ai(c))
    }

    /// Back to the opening position, discarding all search trees.
    pub fn reset(&mut self) {
        self.game = Game::new();
        self.engines = [None, None];
        self.highlights.clear();
    }

    pub fn snapshot(&self) -> Snapshot {
        let board = *self.game.board();
        Snapshot {
            board,
            state: self.game.state(),
            white: board.number_of_pieces(Color::White),
            black: board.number_of_pieces(Color::Black),
            tips: self
                .game
                .current_color()
                .map(|c| self.game.all_moves(c))
                .unwrap_or_default(),
            highlights: self.highlights.clone(),
        }
    }

    /// Play a human move for the side to move.
    pub fn play(&mut self, mv: Move) -> Result<(), PlayError> {
        let color = self.game.current_color().ok_or(PlayError::GameOver)?;
        if self.is_ai(color) {
            return Err(PlayError::AiSeat(color));
        }
        if !self.game.is_valid_move(mv, color) {
            return Err(PlayError::IllegalMove(mv));
        }
        self.game.make_move(mv, color);
        Ok(())
    }

    /// Search for the engine color to move for up to `budget` and play the
    /// chosen move.
    ///
    /// `on_progress` sees every snapshot the worker reports, newest last.
    pub fn run_ai(
        &mut self,
        budget: Duration,
        mut on_progress: impl FnMut(&SearchResults),
    ) -> anyhow::Result<AiMove> {
        let color = self
            .ai_to_move()
            .ok_or_else(|| anyhow!("no engine seat is to move"))?;
        let game = self.game;

        let mut engine = match self.engines[seat(color)].take() {
            Some(mut engine) => {
                engine.update_starting_state(game);
                engine
            }
            None => SearchEngine::with_config(game, color, self.engine_config(color)),
        };

        let (tx, rx) = mpsc::channel();
        let start = Instant::now();
        let worker = thread::Builder::new()
            .name(format!("search-{color}"))
            .spawn(move || {
                let results = think(&mut engine, budget, |snapshot| {
                    // The receiver only goes away if the owner stopped listening
                    let _ = tx.send(snapshot);
                });
                (engine, results)
            })
            .context("failed to spawn search worker")?;

        for progress in rx {
            self.highlights = progress.moves.clone();
            on_progress(&progress);
        }

        let (engine, results) = worker
            .join()
            .map_err(|_| anyhow!("search worker panicked"))?;
        let elapsed = start.elapsed();
        self.engines[seat(color)] = Some(engine);

        let results = results.context("search found no move to play")?;
        log_results(&results);
        info!(
            "{color} plays {} after {} simulations, confidence {:.2} ({:.0}% of playouts won)",
            results.best_move,
            results.simulations,
            results.confidence,
            results.best_win_rate() * 100.0
        );

        self.game.make_move(results.best_move, color);
        self.highlights.clear();

        Ok(AiMove {
            color,
            mv: results.best_move,
            results,
            elapsed,
        })
    }

    /// Each seat gets its own stream of randomness.
    fn engine_config(&self, color: Color) -> SearchConfig {
        SearchConfig {
            seed: self.config.seed.map(|s| s.wrapping_add(seat(color) as u64)),
            ..self.config.clone()
        }
    }
}

fn log_results(results: &SearchResults) {
    let mut moves: Vec<&MoveStats> = results.moves.iter().filter(|m| m.plays > 0).collect();
    moves.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
    for m in moves {
        debug!(
            "move {}: win confidence {:.0}%, {} plays",
            m.mv,
            m.win_rate * 100.0,
            m.plays
        );
    }
}
