//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves for whoever is to move until
//! the game ends, then scores 1 if the optimized color won and 0 otherwise.
//! A tie is not a win.

use rayon::prelude::*;

use crate::board::Color;
use crate::game::{Game, GameState};

/// Play `game` out at random and score it for `color`.
///
/// `game` is copied; the caller's snapshot is never touched.
pub fn playout(game: &Game, color: Color, rng: &mut fastrand::Rng) -> u64 {
    let mut game = *game;

    loop {
        match game.state() {
            GameState::Won(winner) => return u64::from(winner == color),
            GameState::Tie => return 0,
            GameState::Turn(to_move) => {
                let moves = game.all_moves(to_move);
                assert!(
                    !moves.is_empty(),
                    "{to_move} to move without a legal move"
                );
                let mv = moves[rng.usize(..moves.len())];
                game.make_move(mv, to_move);
            }
        }
    }
}

/// Run one independent playout per seed in parallel and return the number
/// of wins for `color`.
///
/// Every playout gets its own copy of `game` and its own generator, so the
/// result only depends on the seeds. Returns once all playouts finished.
pub fn playout_batch(game: &Game, color: Color, seeds: &[u64]) -> u64 {
    seeds
        .par_iter()
        .map(|&seed| playout(game, color, &mut fastrand::Rng::with_seed(seed)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Piece};
    use crate::constants::{HEIGHT, WIDTH};

    #[test]
    fn test_playout_reaches_the_end() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..20 {
            let score = playout(&Game::new(), Color::Black, &mut rng);
            assert!(score <= 1);
        }
    }

    #[test]
    fn test_playout_of_finished_game() {
        let mut board = Board::new();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                board.set_piece(x, y, Piece::Color(Color::White));
            }
        }
        let won = Game::from_parts(board, GameState::Won(Color::White));
        let tie = Game::from_parts(board, GameState::Tie);
        let mut rng = fastrand::Rng::with_seed(1);

        assert_eq!(playout(&won, Color::White, &mut rng), 1);
        assert_eq!(playout(&won, Color::Black, &mut rng), 0);
        assert_eq!(playout(&tie, Color::White, &mut rng), 0);
    }

    #[test]
    fn test_batch_is_reproducible() {
        let seeds: Vec<u64> = (0..16).collect();
        let first = playout_batch(&Game::new(), Color::White, &seeds);
        let second = playout_batch(&Game::new(), Color::White, &seeds);
        assert_eq!(first, second);
        assert!(first <= seeds.len() as u64);

        let sequential: u64 = seeds
            .iter()
            .map(|&s| playout(&Game::new(), Color::White, &mut fastrand::Rng::with_seed(s)))
            .sum();
        assert_eq!(first, sequential);
    }
}
