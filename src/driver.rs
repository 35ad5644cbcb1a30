//! Time-budgeted driving loop.
//!
//! Iterations are never interrupted: the budget is checked after each one, so
//! the last iteration may run slightly past it. At least one iteration runs
//! whenever the tree has anything left to simulate.

use std::time::{Duration, Instant};

use log::debug;

use crate::constants::REPORT_INTERVAL;
use crate::mcts::{SearchEngine, SearchResults};

/// Search until `budget` elapses or the tree is exhausted, handing a results
/// snapshot to `on_progress` roughly every [`REPORT_INTERVAL`].
///
/// Returns the final results, `None` if the root could not be expanded.
/// An expandable root always yields a move, even for a zero budget.
pub fn think(
    engine: &mut SearchEngine,
    budget: Duration,
    mut on_progress: impl FnMut(SearchResults),
) -> Option<SearchResults> {
    let start = Instant::now();
    let mut last_report = start;
    let mut iterations = 0u64;

    loop {
        if !engine.has_unsimulated_plays() {
            debug!("search exhausted after {iterations} iterations");
            break;
        }

        engine.iterate_search();
        iterations += 1;

        let now = Instant::now();
        if now.duration_since(last_report) > REPORT_INTERVAL {
            last_report = now;
            if let Some(results) = engine.results() {
                debug!(
                    "{} simulations, best {} at {:.1}%",
                    results.simulations,
                    results.best_move,
                    results.best_win_rate() * 100.0
                );
                on_progress(results);
            }
        }

        if start.elapsed() >= budget {
            break;
        }
    }

    engine.results()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::game::Game;
    use crate::mcts::SearchConfig;

    fn engine(seed: u64) -> SearchEngine {
        let config = SearchConfig {
            playouts_per_iteration: 2,
            seed: Some(seed),
            ..SearchConfig::default()
        };
        SearchEngine::with_config(Game::new(), Color::White, config)
    }

    #[test]
    fn test_think_returns_a_legal_move() {
        let mut engine = engine(1);
        let results = think(&mut engine, Duration::from_millis(150), |_| {}).unwrap();
        assert!(Game::new().is_valid_move(results.best_move, Color::White));
        assert!(results.simulations > 0);
    }

    #[test]
    fn test_think_reports_progress() {
        let mut engine = engine(2);
        let mut reports = Vec::new();
        let results = think(&mut engine, Duration::from_millis(400), |r| reports.push(r)).unwrap();

        assert!(!reports.is_empty());
        // Snapshots only ever grow
        for pair in reports.windows(2) {
            assert!(pair[0].simulations <= pair[1].simulations);
        }
        assert!(reports.last().unwrap().simulations <= results.simulations);
    }

    #[test]
    fn test_zero_budget_still_picks_a_move() {
        let mut engine = engine(3);
        let results = think(&mut engine, Duration::ZERO, |_| {}).unwrap();
        assert_eq!(engine.root().plays(), 1);
        assert_eq!(results.simulations, 1);
        assert!(Game::new().is_valid_move(results.best_move, Color::White));
    }

    #[test]
    fn test_terminal_position_returns_none() {
        let board = *Game::new().board();
        let over = Game::from_parts(board, crate::game::GameState::Tie);
        let mut engine = SearchEngine::with_config(over, Color::White, SearchConfig::default());
        assert!(think(&mut engine, Duration::from_millis(10), |_| {}).is_none());
        assert_eq!(engine.root().plays(), 0);
    }
}
