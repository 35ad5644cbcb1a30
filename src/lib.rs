//! Othello-MCTS: an 8x8 flip-capture board game with a Monte Carlo Tree
//! Search opponent.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry and search parameters
//! - [`board`] - Bit-packed board, colors and pieces
//! - [`moves`] - Moves and text coordinates
//! - [`game`] - Rules engine (captures, passes, end of game)
//! - [`tree`] - Arena-backed search tree
//! - [`playout`] - Random game simulation
//! - [`mcts`] - The search engine
//! - [`driver`] - Time-budgeted search loop
//! - [`session`] - A game between human and engine seats
//! - [`console`] - Text front end
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use othello_mcts::board::Color;
//! use othello_mcts::driver::think;
//! use othello_mcts::game::Game;
//! use othello_mcts::mcts::SearchEngine;
//!
//! let game = Game::new();
//! let mut engine = SearchEngine::new(game, Color::White);
//! let results = think(&mut engine, Duration::from_millis(50), |_| {}).unwrap();
//! println!("Best move: {}", results.best_move);
//! ```

pub mod board;
pub mod console;
pub mod constants;
pub mod driver;
pub mod game;
pub mod mcts;
pub mod moves;
pub mod playout;
pub mod session;
pub mod tree;
