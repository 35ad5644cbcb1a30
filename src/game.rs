//! Game rules: line captures, turn advancement, forced passes and the end of
//! the game.
//!
//! A [`Game`] is an immutable snapshot. [`Game::apply_move`] returns the next
//! snapshot and leaves its input untouched; [`Game::make_move`] is the
//! in-place convenience built on top of it.

use std::cmp::Ordering;

use crate::board::{Board, Color, Piece};
use crate::constants::{DIRECTIONS, HEIGHT, WIDTH};
use crate::moves::Move;

/// Whose turn it is, or how the game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    Turn(Color),
    Won(Color),
    Tie,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameState::Turn(_))
    }
}

/// A board together with its turn/terminal state.
///
/// Equality and hashing cover both parts, so two snapshots with the same
/// board but a different side to move are distinct tree positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Game {
    board: Board,
    state: GameState,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// The opening position: four center pieces, White to move.
    pub fn new() -> Self {
        let mut board = Board::new();
        board.set_piece(3, 3, Piece::Color(Color::White));
        board.set_piece(4, 4, Piece::Color(Color::White));
        board.set_piece(3, 4, Piece::Color(Color::Black));
        board.set_piece(4, 3, Piece::Color(Color::Black));
        Self {
            board,
            state: GameState::Turn(Color::White),
        }
    }

    /// Build a snapshot from an arbitrary board and state.
    ///
    /// The caller is responsible for the state being consistent with the
    /// board, e.g. a `Turn(c)` where `c` has a legal move.
    pub fn from_parts(board: Board, state: GameState) -> Self {
        Self { board, state }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The side to move, if the game is still running.
    pub fn current_color(&self) -> Option<Color> {
        match self.state {
            GameState::Turn(color) => Some(color),
            _ => None,
        }
    }

    pub fn is_turn_of(&self, color: Color) -> bool {
        self.state == GameState::Turn(color)
    }

    /// Bitset of the opposing pieces `color` would flip by playing `mv`.
    /// Zero when the cell is occupied or nothing is captured.
    fn captures(&self, mv: Move, color: Color) -> u64 {
        if !self.board.is_empty_at(mv.x(), mv.y()) {
            return 0;
        }

        let own = self.board.bits(color);
        let opposing = self.board.bits(color.opposite());
        let mut flips = 0u64;

        for &(dx, dy) in &DIRECTIONS {
            let mut x = mv.x() as isize + dx;
            let mut y = mv.y() as isize + dy;
            let mut line = 0u64;

            while self.board.is_valid_coordinate(x, y) {
                let bit = 1u64 << (x as usize + WIDTH * y as usize);
                if opposing & bit != 0 {
                    line |= bit;
                } else {
                    if own & bit != 0 {
                        flips |= line;
                    }
                    break;
                }
                x += dx;
                y += dy;
            }
        }

        flips
    }

    /// True iff the cell is empty and playing there captures at least one
    /// line of opposing pieces.
    pub fn is_valid_move(&self, mv: Move, color: Color) -> bool {
        self.captures(mv, color) != 0
    }

    /// Every legal move for `color`, in row-major order.
    pub fn all_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let mv = Move::new(x, y);
                if self.is_valid_move(mv, color) {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    pub fn has_moves(&self, color: Color) -> bool {
        (0..HEIGHT).any(|y| (0..WIDTH).any(|x| self.is_valid_move(Move::new(x, y), color)))
    }

    /// The snapshot after `color` plays `mv`.
    ///
    /// Returns `self` unchanged when it is not `color`'s turn. The move itself
    /// is expected to be legal (see [`Game::is_valid_move`]).
    #[must_use]
    pub fn apply_move(&self, mv: Move, color: Color) -> Game {
        if !self.is_turn_of(color) {
            return *self;
        }

        let mut next = *self;
        let flips = self.captures(mv, color);
        next.board.flip(flips | mv.mask(), color);

        // Full board first, then the opponent, then a forced pass back to
        // the mover, and only then the end of the game.
        next.state = if next.board.is_full() {
            final_state(&next.board)
        } else if next.has_moves(color.opposite()) {
            GameState::Turn(color.opposite())
        } else if next.has_moves(color) {
            GameState::Turn(color)
        } else {
            final_state(&next.board)
        };

        next
    }

    /// Replace `self` with [`Game::apply_move`]'s result.
    pub fn make_move(&mut self, mv: Move, color: Color) {
        *self = self.apply_move(mv, color);
    }
}

fn final_state(board: &Board) -> GameState {
    let white = board.number_of_pieces(Color::White);
    let black = board.number_of_pieces(Color::Black);
    match white.cmp(&black) {
        Ordering::Greater => GameState::Won(Color::White),
        Ordering::Less => GameState::Won(Color::Black),
        Ordering::Equal => GameState::Tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(white: &[(usize, usize)], black: &[(usize, usize)]) -> Board {
        let mut board = Board::new();
        for &(x, y) in white {
            board.set_piece(x, y, Piece::Color(Color::White));
        }
        for &(x, y) in black {
            board.set_piece(x, y, Piece::Color(Color::Black));
        }
        board
    }

    #[test]
    fn test_opening_position() {
        let game = Game::new();
        assert_eq!(game.state(), GameState::Turn(Color::White));
        assert_eq!(game.board().number_of_pieces(Color::White), 2);
        assert_eq!(game.board().number_of_pieces(Color::Black), 2);
        assert_eq!(game.current_color(), Some(Color::White));
    }

    #[test]
    fn test_opening_moves() {
        let game = Game::new();
        let moves = game.all_moves(Color::White);
        assert_eq!(
            moves,
            vec![
                Move::new(4, 2),
                Move::new(5, 3),
                Move::new(2, 4),
                Move::new(3, 5),
            ]
        );
        // Black is not to move but the capture rule still applies
        assert_eq!(game.all_moves(Color::Black).len(), 4);
    }

    #[test]
    fn test_occupied_and_non_capturing_cells_are_invalid() {
        let game = Game::new();
        assert!(!game.is_valid_move(Move::new(3, 3), Color::White));
        assert!(!game.is_valid_move(Move::new(0, 0), Color::White));
        assert!(!game.is_valid_move(Move::new(2, 2), Color::White));
    }

    #[test]
    fn test_apply_move_flips() {
        let game = Game::new();
        let next = game.apply_move(Move::new(4, 2), Color::White);

        assert_eq!(next.board().piece_at(4, 2), Piece::Color(Color::White));
        assert_eq!(next.board().piece_at(4, 3), Piece::Color(Color::White));
        assert_eq!(next.board().number_of_pieces(Color::White), 4);
        assert_eq!(next.board().number_of_pieces(Color::Black), 1);
        assert_eq!(next.state(), GameState::Turn(Color::Black));

        // The input snapshot is untouched
        assert_eq!(game, Game::new());
    }

    #[test]
    fn test_apply_move_flips_several_lines() {
        // White plays (3, 3) and closes a horizontal and a vertical line
        let board = board_with(
            &[(0, 3), (3, 0)],
            &[(1, 3), (2, 3), (3, 1), (3, 2), (4, 4)],
        );
        let game = Game::from_parts(board, GameState::Turn(Color::White));
        let next = game.apply_move(Move::new(3, 3), Color::White);

        for (x, y) in [(1, 3), (2, 3), (3, 1), (3, 2)] {
            assert_eq!(next.board().piece_at(x, y), Piece::Color(Color::White));
        }
        // No white piece beyond (4, 4) on the diagonal
        assert_eq!(next.board().piece_at(4, 4), Piece::Color(Color::Black));
    }

    #[test]
    fn test_wrong_color_is_a_no_op() {
        let game = Game::new();
        let next = game.apply_move(Move::new(4, 2), Color::Black);
        assert_eq!(next, game);
    }

    #[test]
    fn test_make_move_replaces_self() {
        let mut game = Game::new();
        let expected = game.apply_move(Move::new(5, 3), Color::White);
        game.make_move(Move::new(5, 3), Color::White);
        assert_eq!(game, expected);
    }

    #[test]
    fn test_forced_pass_keeps_turn() {
        // After White takes (1, 0), Black has no move but White can still
        // capture along the bottom row.
        let board = board_with(&[(0, 0), (0, 7)], &[(1, 0), (1, 7), (2, 7)]);
        let game = Game::from_parts(board, GameState::Turn(Color::White));

        let next = game.apply_move(Move::new(2, 0), Color::White);
        assert!(!next.has_moves(Color::Black));
        assert!(next.has_moves(Color::White));
        assert_eq!(next.state(), GameState::Turn(Color::White));
    }

    #[test]
    fn test_no_moves_for_anyone_ends_game() {
        let board = board_with(&[(0, 0)], &[(1, 0)]);
        let game = Game::from_parts(board, GameState::Turn(Color::White));

        let next = game.apply_move(Move::new(2, 0), Color::White);
        assert!(!next.board().is_full());
        assert_eq!(next.state(), GameState::Won(Color::White));
        assert!(next.is_terminal());
        assert_eq!(next.current_color(), None);
    }

    #[test]
    fn test_full_board_ends_game() {
        // Everything black except a white piece at (1, 0) and an empty (0, 0)
        let mut board = Board::new();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                board.set_piece(x, y, Piece::Color(Color::Black));
            }
        }
        board.set_piece(0, 0, Piece::Empty);
        board.set_piece(1, 0, Piece::Color(Color::White));
        let game = Game::from_parts(board, GameState::Turn(Color::Black));

        let next = game.apply_move(Move::new(0, 0), Color::Black);
        assert!(next.board().is_full());
        assert_eq!(next.state(), GameState::Won(Color::Black));
    }

    #[test]
    fn test_tie() {
        let mut board = Board::new();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let color = if y < HEIGHT / 2 { Color::White } else { Color::Black };
                board.set_piece(x, y, Piece::Color(color));
            }
        }
        assert_eq!(final_state(&board), GameState::Tie);
    }

    #[test]
    fn test_state_is_part_of_equality() {
        let board = *Game::new().board();
        let a = Game::from_parts(board, GameState::Turn(Color::White));
        let b = Game::from_parts(board, GameState::Turn(Color::Black));
        assert_ne!(a, b);
    }
}
